use crate::locations::resolve_locations;
use crate::matcher::MatchResult;
use bio::io::fastq;

/// Half width of the debug window written around a junction
pub const CONTEXT_HALF_WIDTH: usize = 100;

/// What happens to a read once its best junction match is known
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// No junction below the threshold, the read is kept as is
    PassThrough,
    /// More than one junction, the read is kept as is and flagged
    Ambiguous,
    /// A single junction spanning `start..end` is cut out
    Split {
        /// First base of the junction
        start: usize,
        /// One past the last base of the junction
        end: usize,
    },
}

/// Decides the fate of a read. Only edit distances strictly below `edit_threshold` count as a
/// junction.
pub fn decide(result: Option<&MatchResult>, edit_threshold: u32) -> Decision {
    match result {
        Some(result) if result.edit_distance < edit_threshold => {
            match resolve_locations(&result.locations).as_slice() {
                [] => Decision::PassThrough,
                [(start, end)] => Decision::Split {
                    start: *start,
                    end: *end,
                },
                _ => Decision::Ambiguous,
            }
        }
        _ => Decision::PassThrough,
    }
}

/// Cuts `start..end` out of the record, returning the `_1` and `_2` halves
pub fn split_record(
    record: &fastq::Record,
    start: usize,
    end: usize,
) -> (fastq::Record, fastq::Record) {
    let (seq, qual) = (record.seq(), record.qual());
    let left = fastq::Record::with_attrs(
        &format!("{}_1", record.id()),
        record.desc(),
        &seq[..start],
        &qual[..start],
    );
    let right = fastq::Record::with_attrs(
        &format!("{}_2", record.id()),
        record.desc(),
        &seq[end..],
        &qual[end..],
    );
    (left, right)
}

/// Junction with flanks so that the window is [`CONTEXT_HALF_WIDTH`] wide on each side of its
/// middle, clipped to the read.
pub fn context_window(seq: &[u8], start: usize, end: usize) -> &[u8] {
    let half = (end - start) / 2;
    let flank = CONTEXT_HALF_WIDTH - half.min(CONTEXT_HALF_WIDTH);
    let from = start.saturating_sub(flank);
    let to = (end + flank).min(seq.len());
    &seq[from..to]
}
