use crate::error::Error;
use crate::Result;
use bio::alignment::AlignmentOperation;
use edlib_rs::edlibrs::{
    edlibAlignRs, EdlibAlignConfigRs, EdlibAlignModeRs, EdlibAlignTaskRs, EdlibEqualityPairRs,
};

/// Bases at each end of a read that hold the real adapters and are never searched
pub const TRIM_MARGIN: usize = 200;

/// `N` is equal to every nucleotide, in the motif and in the read
const WILDCARD_EQUALITIES: [(u8, u8); 4] = [(b'N', b'A'), (b'N', b'C'), (b'N', b'G'), (b'N', b'T')];

/// Best placement(s) of a motif inside a text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    /// Lowest edit distance of the motif anywhere in the text
    pub edit_distance: u32,
    /// `(start, end)` windows in text coordinates, all at `edit_distance`. `end` is the last
    /// aligned text position.
    pub locations: Vec<(usize, usize)>,
    /// Operations of the first window, motif as `x` and text as `y`
    pub trace: Vec<AlignmentOperation>,
}

/// Semi-global approximate matching where the motif must align in full but the text ends are
/// free, with `N` treated as a wildcard.
pub trait ApproximateMatcher {
    /// Aligns `motif` somewhere inside `text`
    fn align(&self, motif: &[u8], text: &[u8]) -> Result<Alignment>;
}

/// Matcher backed by edlib in infix (`HW`) mode
#[derive(Debug, Clone, Copy, Default)]
pub struct Edlib;

impl ApproximateMatcher for Edlib {
    fn align(&self, motif: &[u8], text: &[u8]) -> Result<Alignment> {
        let equalities = WILDCARD_EQUALITIES
            .iter()
            .map(|&(first, second)| EdlibEqualityPairRs {
                first: first as _,
                second: second as _,
            })
            .collect::<Vec<_>>();
        let config = EdlibAlignConfigRs {
            k: -1,
            mode: EdlibAlignModeRs::EDLIB_MODE_HW,
            task: EdlibAlignTaskRs::EDLIB_TASK_PATH,
            additionalequalities: &equalities,
        };

        let result = edlibAlignRs(motif, text, &config);
        let edit_distance = result.editDistance;
        if edit_distance < 0 {
            return Err(Error::Alignment(edit_distance));
        }

        let locations = match (result.startLocations.as_ref(), result.endLocations.as_ref()) {
            (Some(starts), Some(ends)) => starts
                .iter()
                .zip(ends.iter())
                .map(|(&start, &end)| (start as usize, end as usize))
                .collect(),
            _ => Vec::new(),
        };

        let trace = result
            .alignment
            .as_ref()
            .map(|ops| {
                ops.iter()
                    .map(|&op| match op {
                        0 => AlignmentOperation::Match,
                        1 => AlignmentOperation::Ins,
                        2 => AlignmentOperation::Del,
                        _ => AlignmentOperation::Subst,
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(Alignment {
            edit_distance: edit_distance as u32,
            locations,
            trace,
        })
    }
}

/// Best junction found in a read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// Position of the winning motif in the target set
    pub motif_index: usize,
    /// Edit distance of the winning motif
    pub edit_distance: u32,
    /// Windows in full read coordinates, in the order the matcher reported them
    pub locations: Vec<(usize, usize)>,
    /// Alignment operations of the first reported window
    pub trace: Vec<AlignmentOperation>,
}

/// Searches the interior of `seq` (everything but the outer [`TRIM_MARGIN`] bases on both ends)
/// for every motif and keeps the one with the lowest edit distance, the earliest motif winning
/// ties. Reads without an interior are not searched and give `None`.
pub fn find_junction<M>(seq: &[u8], targets: &[Vec<u8>], matcher: &M) -> Result<Option<MatchResult>>
where
    M: ApproximateMatcher + ?Sized,
{
    if seq.len() <= 2 * TRIM_MARGIN {
        return Ok(None);
    }
    let interior = &seq[TRIM_MARGIN..seq.len() - TRIM_MARGIN];

    let mut best: Option<(usize, Alignment)> = None;
    for (i, target) in targets.iter().enumerate() {
        let alignment = matcher.align(target, interior)?;
        let better = match best {
            Some((_, ref current)) => alignment.edit_distance < current.edit_distance,
            None => true,
        };
        if better {
            best = Some((i, alignment));
        }
    }

    Ok(best.map(|(motif_index, alignment)| MatchResult {
        motif_index,
        edit_distance: alignment.edit_distance,
        locations: alignment
            .locations
            .into_iter()
            .map(|(start, end)| (start + TRIM_MARGIN, end + TRIM_MARGIN))
            .collect(),
        trace: alignment.trace,
    }))
}
