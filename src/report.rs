use crate::matcher::MatchResult;
use crate::Result;
use bio::alignment::AlignmentOperation;
use bio::io::fasta;
use std::fmt;
use std::io::Write;

/// Three rows of a pairwise alignment: motif, match markers and read
pub fn render_alignment(motif: &[u8], read: &[u8], trace: &[AlignmentOperation]) -> [String; 3] {
    let (mut top, mut middle, mut bottom) = (String::new(), String::new(), String::new());
    let (mut x, mut y) = (0, 0);
    let base = |seq: &[u8], i: usize| seq.get(i).map_or('?', |&b| b as char);

    for op in trace {
        match op {
            AlignmentOperation::Match | AlignmentOperation::Subst => {
                top.push(base(motif, x));
                middle.push(if *op == AlignmentOperation::Match { '|' } else { '.' });
                bottom.push(base(read, y));
                x += 1;
                y += 1;
            }
            AlignmentOperation::Ins => {
                top.push(base(motif, x));
                middle.push('-');
                bottom.push('-');
                x += 1;
            }
            AlignmentOperation::Del => {
                top.push('-');
                middle.push('-');
                bottom.push(base(read, y));
                y += 1;
            }
            AlignmentOperation::Xclip(_) | AlignmentOperation::Yclip(_) => {}
        }
    }

    [top, middle, bottom]
}

/// Optional diagnostic outputs of a file run. Nothing is written unless a sink is attached.
#[derive(Default)]
pub struct Sinks<'a> {
    /// Receives pretty printed alignments of junctions below `print_threshold`
    pub alignments: Option<Box<dyn Write + 'a>>,
    /// Edit distance below which alignments are printed
    pub print_threshold: u32,
    /// Receives the sequence around every junction that was cut out
    pub context: Option<fasta::Writer<Box<dyn Write + 'a>>>,
}

impl fmt::Debug for Sinks<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sinks")
            .field("alignments", &self.alignments.is_some())
            .field("print_threshold", &self.print_threshold)
            .field("context", &self.context.is_some())
            .finish()
    }
}

impl<'a> Sinks<'a> {
    /// Prints the winning alignment of a read
    pub fn report_alignment(
        &mut self,
        read_id: &str,
        result: &MatchResult,
        motif: &[u8],
        seq: &[u8],
    ) -> Result<()> {
        if result.edit_distance >= self.print_threshold {
            return Ok(());
        }
        if let (Some(out), Some(&(start, _))) = (self.alignments.as_mut(), result.locations.first())
        {
            let [top, middle, bottom] = render_alignment(motif, &seq[start..], &result.trace);
            let text = format!(
                "{} editdistance-{}\n{}\n{}\n{}\n",
                read_id, result.edit_distance, top, middle, bottom
            );
            out.write_all(text.as_bytes())?;
        }
        Ok(())
    }

    /// Stores the window around a junction, empty windows are skipped
    pub fn write_context(&mut self, read_id: &str, window: &[u8]) -> Result<()> {
        if let Some(ref mut writer) = self.context {
            if !window.is_empty() {
                writer.write(read_id, None, window)?;
            }
        }
        Ok(())
    }

    /// Flushes every attached sink
    pub fn flush(&mut self) -> Result<()> {
        if let Some(ref mut out) = self.alignments {
            out.flush()?;
        }
        if let Some(ref mut writer) = self.context {
            writer.flush()?;
        }
        Ok(())
    }
}
