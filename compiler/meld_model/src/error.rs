//! Model errors.
//!
//! Every variant names the construct it concerns. Corrupt input and
//! internal-consistency errors are fatal to one compiled unit; the round
//! records them and continues. Programming errors come from misuse of the
//! round API and are returned to the caller.

use meld_descriptor::{ClassifyError, DecodeError, NameTableError};
use meld_host::{HostId, HostKind};
use thiserror::Error;

use crate::ElementKey;

/// Failure taxonomy.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCategory {
    /// The unit's metadata cannot be trusted.
    CorruptInput,
    /// Descriptor flags and this model disagree on layout.
    InternalConsistency,
    /// The caller misused the round API.
    ProgrammingError,
}

#[derive(Clone, Eq, PartialEq, Debug, Error)]
pub enum ModelError {
    #[error("unit {unit}: {source}")]
    UndecodableMetadata {
        unit: HostId,
        #[source]
        source: DecodeError,
    },
    #[error("unit {unit}: {source}")]
    NameTable {
        unit: HostId,
        #[source]
        source: NameTableError,
    },
    #[error("construct {construct}: {source}")]
    InconsistentFlags {
        construct: HostId,
        #[source]
        source: ClassifyError,
    },
    #[error("construct {construct} is not enclosed by {parent:?}")]
    UnknownEnclosedConstruct { parent: ElementKey, construct: HostId },
    #[error("enclosed elements of {node:?} requested while they are being computed")]
    ReentrantEnclosedAccess { node: ElementKey },
    #[error("{kind:?} construct {construct} has no element")]
    UnsupportedConstruct { construct: HostId, kind: HostKind },
}

impl ModelError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ModelError::UndecodableMetadata { .. } | ModelError::NameTable { .. } => {
                ErrorCategory::CorruptInput
            }
            ModelError::InconsistentFlags { .. } => ErrorCategory::InternalConsistency,
            ModelError::UnknownEnclosedConstruct { .. }
            | ModelError::ReentrantEnclosedAccess { .. }
            | ModelError::UnsupportedConstruct { .. } => ErrorCategory::ProgrammingError,
        }
    }

    /// Whether the round isolates this error to one unit and continues.
    pub fn is_unit_local(&self) -> bool {
        self.category() != ErrorCategory::ProgrammingError
    }
}

/// A unit the round could not build.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct UnitFailure {
    pub unit: HostId,
    pub error: ModelError,
}
