//! Errors raised while writing or restoring snapshots.
use thiserror::Error;

use crate::dawg::DawgError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SnapshotError {
    /// Reading, writing or mapping the snapshot file failed
    #[error("Snapshot I/O error")]
    Io(#[from] std::io::Error),

    /// The data ended inside a member
    #[error("Snapshot truncated while reading {member}")]
    Truncated {
        /// the member being read
        member: &'static str,
    },

    /// A member was read in full but does not make sense
    #[error("Malformed {member}: {reason}")]
    Malformed {
        /// the offending member
        member: &'static str,
        /// what is wrong with it
        reason: String,
    },

    /// A variant tag this version does not know
    #[error("Unknown {member} discriminant {value}")]
    UnknownDiscriminant {
        /// the tagged member
        member: &'static str,
        /// the tag read
        value: u8,
    },

    /// The stored graph arrays were rejected
    #[error("Invalid graph in snapshot")]
    Dawg(#[from] DawgError),
}

impl SnapshotError {
    pub(crate) fn malformed(member: &'static str, reason: impl Into<String>) -> SnapshotError {
        SnapshotError::Malformed {
            member,
            reason: reason.into(),
        }
    }
}
