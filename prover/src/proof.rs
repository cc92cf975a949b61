use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};
use stark101::iop::transcript::TranscriptEntry;

/// The proof is the full transcript: every commitment, challenge and opening in the order a
/// verifier has to replay them.
#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct StarkProof {
    pub entries: Vec<TranscriptEntry>,
}

impl StarkProof {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.label.as_str())
    }

    /// Value of the first entry labelled `label`.
    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.value.as_str())
    }
}

impl From<Vec<TranscriptEntry>> for StarkProof {
    fn from(entries: Vec<TranscriptEntry>) -> Self {
        Self { entries }
    }
}

impl Display for StarkProof {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}
