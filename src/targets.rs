use crate::error::Error;
use crate::Result;
use bio::alphabets::dna;
use std::fmt;
use std::str::FromStr;

/// Head adapter ligated at the start of every read
pub const HEAD_ADAPTER: &str = "AATGTACTTCGTTCAGTTACGTATTGCT";
/// Tail adapter found at the end of every read
pub const TAIL_ADAPTER: &str = "GCAATACGTAACTGAACGAAGT";
/// Default number of bases masked from the start of the head adapter
pub const DEFAULT_MASK_HEAD: usize = 5;
/// Default number of bases masked from the end of the tail adapter
pub const DEFAULT_MASK_TAIL: usize = 14;
/// Default number of `N` bases between the masked adapters used on the command line
pub const DEFAULT_DEGENERATE_BASES: usize = 11;
/// Primers used for PCR library preparations
pub const PCR_PRIMERS: [&str; 2] = [
    "ACTTGCCTGTCGCTCTATCTTCGGCGTCTGCTTGGGTGTTTAACC",
    "TTTCTGTTGGTGCTGATATTGCGGCGTCTGCTTGGGTGTTTAACCT",
];

/// Library preparation of the sequenced sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryType {
    /// Native (ligation) library, junction is tail adapter followed by head adapter
    Native,
    /// PCR library, the junction is additionally flanked by primers
    Pcr,
}

impl LibraryType {
    /// Edit distance below which a read is split
    pub fn default_edit_threshold(self) -> u32 {
        match self {
            LibraryType::Native => 9,
            LibraryType::Pcr => 45,
        }
    }
}

impl FromStr for LibraryType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "native" => Ok(LibraryType::Native),
            "pcr" => Ok(LibraryType::Pcr),
            _ => Err(Error::InvalidLibraryType(s.to_string())),
        }
    }
}

impl fmt::Display for LibraryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LibraryType::Native => write!(f, "Native"),
            LibraryType::Pcr => write!(f, "PCR"),
        }
    }
}

/// Everything needed to build the junction motifs
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct TargetConfig {
    pub head_adapter: String,
    pub tail_adapter: String,
    /// Bases removed from the start of the head adapter
    pub mask_head: usize,
    /// Bases removed from the end of the tail adapter
    pub mask_tail: usize,
    /// Length of the `N` spacer, `mask_head + mask_tail` when unset
    pub degenerate_bases: Option<usize>,
    /// Literal spacer used instead of the `N` run
    pub n_replacement: Option<String>,
    pub pcr_primers: Vec<String>,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            head_adapter: HEAD_ADAPTER.to_string(),
            tail_adapter: TAIL_ADAPTER.to_string(),
            mask_head: DEFAULT_MASK_HEAD,
            mask_tail: DEFAULT_MASK_TAIL,
            degenerate_bases: None,
            n_replacement: None,
            pcr_primers: PCR_PRIMERS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Reverse complement of a nucleotide sequence
pub fn revcomp<T: AsRef<[u8]>>(seq: T) -> Vec<u8> {
    dna::revcomp(seq.as_ref())
}

impl TargetConfig {
    fn spacer(&self) -> Vec<u8> {
        match self.n_replacement {
            Some(ref replacement) => replacement.to_ascii_uppercase().into_bytes(),
            None => {
                let n = self
                    .degenerate_bases
                    .unwrap_or(self.mask_head + self.mask_tail);
                vec![b'N'; n]
            }
        }
    }

    /// Masked tail adapter, spacer and masked head adapter, in upper case
    pub fn native_motif(&self) -> Result<Vec<u8>> {
        let head = self.head_adapter.to_ascii_uppercase().into_bytes();
        let tail = self.tail_adapter.to_ascii_uppercase().into_bytes();
        if self.mask_head > head.len() {
            return Err(Error::TrimTooLong("head", self.mask_head, head.len()));
        }
        if self.mask_tail > tail.len() {
            return Err(Error::TrimTooLong("tail", self.mask_tail, tail.len()));
        }

        Ok([
            &tail[..tail.len() - self.mask_tail],
            &self.spacer()[..],
            &head[self.mask_head..],
        ]
        .concat())
    }

    /// Builds the ordered candidate motifs for the library type
    pub fn build(&self, library: LibraryType) -> Result<Vec<Vec<u8>>> {
        let native = self.native_motif()?;
        let targets = match library {
            LibraryType::Native => vec![native],
            LibraryType::Pcr => {
                let primers = self
                    .pcr_primers
                    .iter()
                    .map(|p| p.to_ascii_uppercase())
                    .filter(|p| !p.is_empty())
                    .collect::<Vec<_>>();
                primers
                    .iter()
                    .flat_map(|x| {
                        let native = &native;
                        primers.iter().map(move |y| {
                            [&revcomp(x)[..], &native[..], y.as_bytes()].concat()
                        })
                    })
                    .collect()
            }
        };

        if targets.is_empty() || targets.iter().any(|t| t.is_empty()) {
            return Err(Error::NoTargets(library));
        }
        Ok(targets)
    }
}
