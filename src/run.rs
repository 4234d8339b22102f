use crate::error::Error;
use crate::matcher::{ApproximateMatcher, Edlib};
use crate::outcome::Outcomes;
use crate::process::{split_output_path, FileProcessor, ProcessConfig};
use crate::targets::{LibraryType, TargetConfig};
use crate::Result;
use glob::Pattern;
use log::{info, warn};
use rayon::prelude::*;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Default pattern for input discovery
pub const DEFAULT_PATTERN: &str = "*.fastq.gz";

/// Settings of a whole run
#[derive(Debug, Clone)]
#[allow(missing_docs)]
pub struct RunConfig {
    /// Directory searched recursively for input files
    pub input_dir: PathBuf,
    /// Directory receiving the split files, must not exist yet
    pub output_dir: PathBuf,
    /// Glob matched against input file names
    pub pattern: String,
    pub library: LibraryType,
    pub targets: TargetConfig,
    /// Overrides the library default threshold
    pub edit_threshold: Option<u32>,
    pub debug: bool,
    pub print_alignment: bool,
    /// Alignments are printed below `edit_threshold + print_threshold_delta`
    pub print_threshold_delta: i64,
    /// Number of files processed concurrently
    pub threads: usize,
}

impl RunConfig {
    /// Run over `input_dir` writing to `output_dir` with the defaults of the command line
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(input_dir: P, output_dir: Q) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            pattern: DEFAULT_PATTERN.to_string(),
            library: LibraryType::Native,
            targets: TargetConfig::default(),
            edit_threshold: None,
            debug: false,
            print_alignment: false,
            print_threshold_delta: 0,
            threads: num_cpus::get(),
        }
    }

    /// Threshold in effect for the configured library
    pub fn edit_threshold(&self) -> u32 {
        self.edit_threshold
            .unwrap_or_else(|| self.library.default_edit_threshold())
    }

    fn process_config(&self) -> ProcessConfig {
        let edit_threshold = self.edit_threshold();
        let print_threshold = (i64::from(edit_threshold) + self.print_threshold_delta).max(0) as u32;
        ProcessConfig {
            output_dir: self.output_dir.clone(),
            edit_threshold,
            debug: self.debug,
            print_alignment: self.print_alignment,
            print_threshold,
        }
    }
}

/// Files below `dir` whose name matches `pattern`, in lexicographic path order
pub fn discover_inputs<P: AsRef<Path>>(dir: P, pattern: &str) -> Result<Vec<PathBuf>> {
    let pattern = Pattern::new(pattern)?;
    let mut inputs = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry?;
        if entry.file_type().is_file()
            && pattern.matches(&entry.file_name().to_string_lossy())
        {
            inputs.push(entry.into_path());
        }
    }
    inputs.sort();
    Ok(inputs)
}

fn check_unique_outputs(output_dir: &Path, inputs: &[PathBuf]) -> Result<()> {
    let mut seen = HashMap::new();
    for input in inputs {
        if let Some(previous) = seen.insert(split_output_path(output_dir, input), input) {
            return Err(Error::DuplicateOutput(previous.clone(), input.clone()));
        }
    }
    Ok(())
}

fn create_output_dir(dir: &Path) -> Result<()> {
    match std::fs::create_dir(dir) {
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(Error::OutputExists(dir.to_path_buf())),
        other => Ok(other?),
    }
}

/// Splits every input file with edlib as the matcher
pub fn run(config: &RunConfig) -> Result<Outcomes> {
    run_with(config, &Edlib)
}

/// Splits every input file, one file per worker, and returns the union of their outcomes after
/// writing it to the output directory.
pub fn run_with<M>(config: &RunConfig, matcher: &M) -> Result<Outcomes>
where
    M: ApproximateMatcher + Sync + ?Sized,
{
    let inputs = discover_inputs(&config.input_dir, &config.pattern)?;
    if inputs.is_empty() {
        warn!(
            "No files matching {} found in {}",
            config.pattern,
            config.input_dir.display()
        );
    }
    check_unique_outputs(&config.output_dir, &inputs)?;
    let targets = config.targets.build(config.library)?;
    create_output_dir(&config.output_dir)?;

    info!(
        "Searching {} files for {} {} junction motif(s) with edit threshold {}",
        inputs.len(),
        targets.len(),
        config.library,
        config.edit_threshold()
    );

    let process_config = config.process_config();
    let processor = FileProcessor::new(&targets, matcher, &process_config);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()
        .map_err(|_| Error::ThreadError)?;
    let per_file = pool.install(|| {
        inputs
            .par_iter()
            .map(|input| processor.process(input))
            .collect::<Result<Vec<Outcomes>>>()
    })?;

    let outcomes = per_file
        .into_iter()
        .fold(Outcomes::default(), |mut outcomes, file| {
            outcomes.merge(file);
            outcomes
        });
    outcomes.persist(&config.output_dir)?;
    info!(
        "Split {} reads, kept {} reads, {} reads had multiple junctions",
        outcomes.edited.len(),
        outcomes.unedited.len(),
        outcomes.split_multiple_times.len()
    );
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;

    #[test]
    fn discovers_recursively_in_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("b/nested")).unwrap();
        fs::create_dir_all(dir.path().join("a")).unwrap();
        for name in &["b/nested/z.fastq.gz", "a/y.fastq.gz", "x.fastq.gz", "a/skip.fasta", "b/w.fastq"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }

        let found = discover_inputs(dir.path(), DEFAULT_PATTERN).unwrap();
        let relative = found
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect::<Vec<_>>();
        assert_eq!(
            relative,
            vec![
                PathBuf::from("a/y.fastq.gz"),
                PathBuf::from("b/nested/z.fastq.gz"),
                PathBuf::from("x.fastq.gz"),
            ]
        );
    }

    #[test]
    fn invalid_pattern() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            discover_inputs(dir.path(), "[*.fastq"),
            Err(Error::Pattern(_))
        ));
    }

    #[test]
    fn existing_output_dir_fails_before_work() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunConfig::new(dir.path(), dir.path());
        assert!(matches!(run(&config), Err(Error::OutputExists(_))));
        assert!(!dir.path().join(crate::outcome::EDITED_FILE).exists());
    }

    #[test]
    fn duplicate_base_names_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("one")).unwrap();
        fs::create_dir_all(dir.path().join("two")).unwrap();
        fs::write(dir.path().join("one/reads.fastq.gz"), b"").unwrap();
        fs::write(dir.path().join("two/reads.fastq.gz"), b"").unwrap();

        let config = RunConfig::new(dir.path(), dir.path().join("out"));
        assert!(matches!(run(&config), Err(Error::DuplicateOutput(_, _))));
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn bad_targets_leave_no_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out");
        let mut config = RunConfig::new(dir.path(), &output);
        config.targets.mask_tail = 40;
        assert!(matches!(run(&config), Err(Error::TrimTooLong("tail", 40, _))));
        assert!(!output.exists());

        config.targets.mask_tail = 14;
        assert!(run(&config).is_ok());
    }

    #[test]
    fn one_bad_file_fails_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in");
        fs::create_dir(&input).unwrap();
        for (name, text) in &[
            ("good.fastq.gz", &b"@read\nACGT\n+\nIIII\n"[..]),
            ("bad.fastq.gz", &b"no header\nACGT\n"[..]),
        ] {
            let mut writer = niffler::to_path(
                input.join(name),
                niffler::compression::Format::Gzip,
                niffler::Level::One,
            )
            .unwrap();
            writer.write_all(text).unwrap();
        }

        let output = dir.path().join("out");
        let mut config = RunConfig::new(&input, &output);
        config.threads = 2;
        match run(&config) {
            Err(Error::File(path, _)) => assert_eq!(path, input.join("bad.fastq.gz")),
            other => panic!("expected a file error, got {:?}", other),
        }
        assert!(!output.join(crate::outcome::EDITED_FILE).exists());
    }

    #[test]
    fn thresholds() {
        let mut config = RunConfig::new("in", "out");
        assert_eq!(config.edit_threshold(), 9);
        config.library = LibraryType::Pcr;
        assert_eq!(config.edit_threshold(), 45);
        config.edit_threshold = Some(3);
        config.print_threshold_delta = -5;
        assert_eq!(config.process_config().print_threshold, 0);
        config.print_threshold_delta = 2;
        assert_eq!(config.process_config().print_threshold, 5);
    }

    #[test]
    fn empty_input_dir_persists_empty_sets() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out");
        let outcomes = run(&RunConfig::new(dir.path().join("."), &output)).unwrap();
        assert!(outcomes.is_empty());
        assert!(output.join(crate::outcome::UNEDITED_FILE).exists());
    }
}
