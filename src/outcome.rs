use crate::split::Decision;
use crate::Result;
use log::info;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// File holding the identifiers of split reads
pub const EDITED_FILE: &str = "edited.json";
/// File holding the identifiers of reads kept because no junction was found
pub const UNEDITED_FILE: &str = "unedited.json";
/// File holding the identifiers of reads kept because several junctions were found
pub const SPLIT_MULTIPLE_TIMES_FILE: &str = "split_multiple_times.json";

/// Read identifiers grouped by what happened to the read
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcomes {
    /// Reads that were split in two
    pub edited: BTreeSet<String>,
    /// Reads written unchanged
    pub unedited: BTreeSet<String>,
    /// Reads with more than one junction, written unchanged
    pub split_multiple_times: BTreeSet<String>,
}

impl Outcomes {
    /// Files the read under the set matching its decision
    pub fn record(&mut self, read_id: &str, decision: Decision) {
        let set = match decision {
            Decision::Split { .. } => &mut self.edited,
            Decision::PassThrough => &mut self.unedited,
            Decision::Ambiguous => &mut self.split_multiple_times,
        };
        set.insert(read_id.to_string());
    }

    /// Union with the outcomes of another file
    pub fn merge(&mut self, other: Outcomes) {
        self.edited.extend(other.edited);
        self.unedited.extend(other.unedited);
        self.split_multiple_times.extend(other.split_multiple_times);
    }

    /// Number of distinct reads seen
    pub fn len(&self) -> usize {
        self.edited.len() + self.unedited.len() + self.split_multiple_times.len()
    }

    /// True when no read has been recorded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Writes the three sets as sorted JSON arrays into `dir`
    pub fn persist<P: AsRef<Path>>(&self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        for (name, ids) in &[
            (EDITED_FILE, &self.edited),
            (UNEDITED_FILE, &self.unedited),
            (SPLIT_MULTIPLE_TIMES_FILE, &self.split_multiple_times),
        ] {
            let path = dir.join(name);
            info!("Writing {} read ids to {}", ids.len(), path.display());
            let mut writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer(&mut writer, ids)?;
            writer.flush()?;
        }
        Ok(())
    }
}
