use log::LevelFilter;
use read_fillet::targets::{HEAD_ADAPTER, PCR_PRIMERS, TAIL_ADAPTER};
use read_fillet::{LibraryType, RunConfig, TargetConfig};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "read-fillet",
    about = "Split reads that are informatic concatamers at the adapter junction"
)]
pub(crate) struct ReadFillet {
    #[structopt(
        help = "Directory searched recursively for reads to split",
        parse(from_os_str)
    )]
    pub fastq_dir: PathBuf,
    #[structopt(help = "Output directory, must not exist", parse(from_os_str))]
    pub output_dir: PathBuf,
    #[structopt(
        short = "t",
        long = "type",
        help = "Library preparation, Native or PCR",
        default_value = "Native"
    )]
    pub library: LibraryType,
    #[structopt(
        long,
        help = "Bases masked from the end of the tail adapter",
        default_value = "14"
    )]
    pub mask_tail: usize,
    #[structopt(
        long,
        help = "Bases masked from the start of the head adapter",
        default_value = "5"
    )]
    pub mask_head: usize,
    #[structopt(
        long,
        help = "Number of N bases between the masked adapters",
        default_value = "11"
    )]
    pub degenerate_bases: usize,
    #[structopt(
        short,
        long,
        help = "Reads are split when the junction edit distance is below this [default: 9 for Native, 45 for PCR]"
    )]
    pub edit_threshold: Option<u32>,
    #[structopt(long, help = "Sequence used instead of the N bases between the adapters")]
    pub n_replacement: Option<String>,
    #[structopt(
        short,
        long,
        help = "Pattern matched against file names",
        default_value = "*.fastq.gz"
    )]
    pub pattern: String,
    #[structopt(long, help = "Write the sequence around each junction to a FASTA file")]
    pub debug: bool,
    #[structopt(long, help = "Print the alignment of each junction")]
    pub print_alignment: bool,
    #[structopt(
        long,
        help = "Print alignments below the edit threshold plus this value",
        default_value = "0",
        allow_hyphen_values = true
    )]
    pub print_threshold_delta: i64,
    #[structopt(
        short = "j",
        long,
        help = "Number of files processed in parallel [default: number of CPUs]"
    )]
    pub threads: Option<usize>,
    #[structopt(long, help = "Head adapter sequence")]
    pub head_adapter: Option<String>,
    #[structopt(long, help = "Tail adapter sequence")]
    pub tail_adapter: Option<String>,
    #[structopt(long, help = "PCR primers, comma separated")]
    pub primers: Option<String>,
    #[structopt(
        short,
        long,
        help = "Verbosity, repeat for more output",
        parse(from_occurrences)
    )]
    pub verbose: u8,
    #[structopt(short, long, help = "Only report errors")]
    pub quiet: bool,
}

impl ReadFillet {
    pub(crate) fn set_logging(&self) {
        let level = if self.quiet {
            LevelFilter::Error
        } else {
            match self.verbose {
                0 => LevelFilter::Warn,
                1 => LevelFilter::Info,
                2 => LevelFilter::Debug,
                _ => LevelFilter::Trace,
            }
        };
        env_logger::Builder::new().filter_level(level).init();
    }

    pub(crate) fn into_run_config(self) -> RunConfig {
        let pcr_primers = match self.primers {
            Some(ref primers) => primers
                .split(',')
                .map(|p| p.trim().to_string())
                .collect(),
            None => PCR_PRIMERS.iter().map(|p| p.to_string()).collect(),
        };
        let targets = TargetConfig {
            head_adapter: self
                .head_adapter
                .unwrap_or_else(|| HEAD_ADAPTER.to_string()),
            tail_adapter: self
                .tail_adapter
                .unwrap_or_else(|| TAIL_ADAPTER.to_string()),
            mask_head: self.mask_head,
            mask_tail: self.mask_tail,
            degenerate_bases: Some(self.degenerate_bases),
            n_replacement: self.n_replacement,
            pcr_primers,
        };

        RunConfig {
            input_dir: self.fastq_dir,
            output_dir: self.output_dir,
            pattern: self.pattern,
            library: self.library,
            targets,
            edit_threshold: self.edit_threshold,
            debug: self.debug,
            print_alignment: self.print_alignment,
            print_threshold_delta: self.print_threshold_delta,
            threads: self.threads.unwrap_or_else(num_cpus::get),
        }
    }
}
