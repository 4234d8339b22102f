use crate::error::Error;
use crate::matcher::{find_junction, ApproximateMatcher};
use crate::outcome::Outcomes;
use crate::report::Sinks;
use crate::split::{context_window, decide, split_record, Decision};
use crate::Result;
use bio::io::{fasta, fastq};
use log::{debug, info};
use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Suffix appended to the base name of every rewritten FASTQ
pub const SPLIT_SUFFIX: &str = "_split.fastq.gz";
/// Suffix appended to the base name of the debug junction windows
pub const MIDDLE_SUFFIX: &str = "_middle.fasta";

/// File name up to the first `.`, `reads.fastq.gz` gives `reads`
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default()
        .split('.')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Where the rewritten reads of `input` are written
pub fn split_output_path(output_dir: &Path, input: &Path) -> PathBuf {
    output_dir.join(format!("{}{}", base_name(input), SPLIT_SUFFIX))
}

/// Where the junction windows of `input` are written in debug mode
pub fn middle_output_path(output_dir: &Path, input: &Path) -> PathBuf {
    output_dir.join(format!("{}{}", base_name(input), MIDDLE_SUFFIX))
}

/// Per-file settings shared by every worker
#[derive(Debug, Clone)]
#[allow(missing_docs)]
pub struct ProcessConfig {
    pub output_dir: PathBuf,
    /// Reads are split when the junction edit distance is strictly below this
    pub edit_threshold: u32,
    /// Write the sequence around every junction to a FASTA side file
    pub debug: bool,
    /// Print alignments with an edit distance below `print_threshold` to stdout
    pub print_alignment: bool,
    pub print_threshold: u32,
}

/// Streams the reads of one file through junction detection and writes the rewritten file
#[derive(Debug)]
pub struct FileProcessor<'a, M: ?Sized> {
    targets: &'a [Vec<u8>],
    matcher: &'a M,
    config: &'a ProcessConfig,
}

impl<'a, M> FileProcessor<'a, M>
where
    M: ApproximateMatcher + ?Sized,
{
    /// Creates a processor searching for `targets`
    pub fn new(targets: &'a [Vec<u8>], matcher: &'a M, config: &'a ProcessConfig) -> Self {
        Self {
            targets,
            matcher,
            config,
        }
    }

    /// Splits every read of the FASTQ at `path`, plain or compressed, into the output directory
    pub fn process(&self, path: &Path) -> Result<Outcomes> {
        self.process_file(path)
            .map_err(|e| Error::File(path.to_path_buf(), Box::new(e)))
    }

    fn process_file(&self, path: &Path) -> Result<Outcomes> {
        let output = split_output_path(&self.config.output_dir, path);
        info!("Splitting {} into {}", path.display(), output.display());

        let (rdr, _) = niffler::from_path(path)?;
        let reader = fastq::Reader::new(rdr);
        let out = niffler::to_path(
            &output,
            niffler::compression::Format::Gzip,
            niffler::Level::One,
        )?;
        let mut writer = fastq::Writer::new(out);

        let mut sinks = Sinks {
            print_threshold: self.config.print_threshold,
            ..Default::default()
        };
        if self.config.print_alignment {
            sinks.alignments = Some(Box::new(io::stdout()));
        }
        if self.config.debug {
            let middle = middle_output_path(&self.config.output_dir, path);
            let file: Box<dyn Write> = Box::new(File::create(middle)?);
            sinks.context = Some(fasta::Writer::new(file));
        }

        let outcomes = self.split_reads(reader, &mut writer, &mut sinks)?;
        writer.flush()?;
        sinks.flush()?;

        info!(
            "{}: split {}, kept {}, {} with multiple junctions",
            path.display(),
            outcomes.edited.len(),
            outcomes.unedited.len(),
            outcomes.split_multiple_times.len()
        );
        Ok(outcomes)
    }

    /// Decides every read from `reader` one at a time and writes the result to `writer`
    pub fn split_reads<B, W>(
        &self,
        reader: fastq::Reader<B>,
        writer: &mut fastq::Writer<W>,
        sinks: &mut Sinks<'_>,
    ) -> Result<Outcomes>
    where
        B: BufRead,
        W: Write,
    {
        let mut outcomes = Outcomes::default();

        for (i, record) in reader.records().enumerate() {
            let record = record.map_err(|e| Error::FastqRecord(i + 1, e.to_string()))?;
            let seq = record.seq();

            let result = find_junction(seq, self.targets, self.matcher)?;
            if let Some(ref result) = result {
                sinks.report_alignment(record.id(), result, &self.targets[result.motif_index], seq)?;
            }

            let decision = decide(result.as_ref(), self.config.edit_threshold);
            debug!("{}: {:?}", record.id(), decision);
            match decision {
                Decision::Split { start, end } => {
                    sinks.write_context(record.id(), context_window(seq, start, end))?;
                    let (left, right) = split_record(&record, start, end);
                    writer.write_record(&left)?;
                    writer.write_record(&right)?;
                }
                Decision::PassThrough | Decision::Ambiguous => writer.write_record(&record)?,
            }
            outcomes.record(record.id(), decision);
        }

        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::tests::{hit, Scripted};
    use crate::matcher::Edlib;
    use crate::targets::{LibraryType, TargetConfig, DEFAULT_DEGENERATE_BASES};

    fn config(dir: &Path) -> ProcessConfig {
        ProcessConfig {
            output_dir: dir.to_path_buf(),
            edit_threshold: 9,
            debug: false,
            print_alignment: false,
            print_threshold: 9,
        }
    }

    fn fastq_text(records: &[(&str, &[u8])]) -> Vec<u8> {
        let mut text = Vec::new();
        for (id, seq) in records {
            text.extend_from_slice(format!("@{} ch=1\n", id).as_bytes());
            text.extend_from_slice(seq);
            text.extend_from_slice(b"\n+\n");
            text.extend(vec![b'5'; seq.len()]);
            text.push(b'\n');
        }
        text
    }

    fn read_back(bytes: &[u8]) -> Vec<fastq::Record> {
        fastq::Reader::new(bytes)
            .records()
            .map(|r| r.unwrap())
            .collect()
    }

    #[test]
    fn output_names() {
        let out = Path::new("/out");
        let input = Path::new("/runs/a/FAK123_pass_0.fastq.gz");
        assert_eq!(base_name(input), "FAK123_pass_0");
        assert_eq!(
            split_output_path(out, input),
            PathBuf::from("/out/FAK123_pass_0_split.fastq.gz")
        );
        assert_eq!(
            middle_output_path(out, input),
            PathBuf::from("/out/FAK123_pass_0_middle.fasta")
        );
    }

    #[test]
    fn each_decision_is_written_and_recorded() {
        let dir = Path::new("unused");
        let config = config(dir);
        let targets = vec![b"ACGT".to_vec()];
        let long = vec![b'A'; 500];
        let matcher = Scripted::new(vec![
            hit(2, &[(50, 60)]),
            hit(9, &[(50, 60)]),
            hit(0, &[(10, 20), (80, 90)]),
        ]);
        let processor = FileProcessor::new(&targets, &matcher, &config);
        let input = fastq_text(&[("split", &long), ("kept", &long), ("multi", &long), ("short", b"ACGT")]);

        let mut buffer = Vec::new();
        let outcomes = {
            let mut writer = fastq::Writer::new(&mut buffer);
            let outcomes = processor
                .split_reads(fastq::Reader::new(&input[..]), &mut writer, &mut Sinks::default())
                .unwrap();
            writer.flush().unwrap();
            outcomes
        };

        let ids = read_back(&buffer)
            .iter()
            .map(|r| r.id().to_string())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["split_1", "split_2", "kept", "multi", "short"]);
        assert!(outcomes.edited.contains("split"));
        assert!(outcomes.unedited.contains("kept"));
        assert!(outcomes.unedited.contains("short"));
        assert!(outcomes.split_multiple_times.contains("multi"));
        assert_eq!(outcomes.len(), 4);
    }

    #[test]
    fn split_halves_keep_comment_and_quality() {
        let config = config(Path::new("unused"));
        let targets = vec![b"ACGT".to_vec()];
        let seq = (0..600).map(|i| b"ACGT"[i % 4]).collect::<Vec<_>>();
        let matcher = Scripted::new(vec![hit(1, &[(100, 120)])]);
        let processor = FileProcessor::new(&targets, &matcher, &config);
        let input = fastq_text(&[("r", &seq)]);

        let mut buffer = Vec::new();
        {
            let mut writer = fastq::Writer::new(&mut buffer);
            processor
                .split_reads(fastq::Reader::new(&input[..]), &mut writer, &mut Sinks::default())
                .unwrap();
            writer.flush().unwrap();
        }

        let records = read_back(&buffer);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].seq(), &seq[..300]);
        assert_eq!(records[1].seq(), &seq[320..]);
        assert_eq!(records[0].desc(), Some("ch=1"));
        assert_eq!(records[1].qual().len(), 280);
    }

    #[test]
    fn malformed_record_is_an_error() {
        let config = config(Path::new("unused"));
        let targets = vec![b"ACGT".to_vec()];
        let processor = FileProcessor::new(&targets, &Edlib, &config);
        let mut buffer = Vec::new();
        let mut writer = fastq::Writer::new(&mut buffer);
        let result = processor.split_reads(
            fastq::Reader::new(&b"read without header\nACGT\n"[..]),
            &mut writer,
            &mut Sinks::default(),
        );
        assert!(matches!(result, Err(Error::FastqRecord(1, _))));
    }

    #[test]
    fn process_writes_gzip_and_debug_windows() {
        let dir = tempfile::tempdir().unwrap();
        let input_path = dir.path().join("reads.fastq");
        let head = crate::targets::HEAD_ADAPTER.as_bytes();
        let tail = crate::targets::TAIL_ADAPTER.as_bytes();
        let mut seq = vec![b'C'; 250];
        seq.extend_from_slice(&tail[..tail.len() - 14]);
        seq.extend(vec![b'N'; DEFAULT_DEGENERATE_BASES]);
        seq.extend_from_slice(&head[5..]);
        seq.extend(vec![b'C'; 250]);
        std::fs::write(&input_path, fastq_text(&[("chimera", &seq)])).unwrap();

        let out_dir = dir.path().join("out");
        std::fs::create_dir(&out_dir).unwrap();
        let config = ProcessConfig {
            debug: true,
            ..config(&out_dir)
        };
        let targets = TargetConfig {
            degenerate_bases: Some(DEFAULT_DEGENERATE_BASES),
            ..Default::default()
        }
        .build(LibraryType::Native)
        .unwrap();

        let outcomes = FileProcessor::new(&targets, &Edlib, &config)
            .process(&input_path)
            .unwrap();
        assert!(outcomes.edited.contains("chimera"));

        let (rdr, format) = niffler::from_path(out_dir.join("reads_split.fastq.gz")).unwrap();
        assert_eq!(format, niffler::compression::Format::Gzip);
        let records = fastq::Reader::new(rdr)
            .records()
            .map(|r| r.unwrap())
            .collect::<Vec<_>>();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].seq(), &seq[..250]);
        assert_eq!(records[1].seq(), &seq[291..]);

        let middle = std::fs::read_to_string(out_dir.join("reads_middle.fasta")).unwrap();
        assert!(middle.starts_with(">chimera\n"));
    }

    #[test]
    fn missing_input_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let targets = vec![b"ACGT".to_vec()];
        let missing = dir.path().join("missing.fastq.gz");
        let result = FileProcessor::new(&targets, &Edlib, &config).process(&missing);
        match result {
            Err(Error::File(path, _)) => assert_eq!(path, missing),
            other => panic!("expected a file error, got {:?}", other),
        }
    }
}
