//! Metadata header validation.
//!
//! The header fields of a [`MetadataBlob`] are checked before the body
//! decoder sees the payload. An unrecognized kind or an unreadable format
//! version makes the unit undecodable; other units are unaffected.

use std::fmt;

use bitflags::bitflags;
use meld_host::MetadataBlob;
use thiserror::Error;

use crate::NameTableError;

/// What a compiled unit's metadata describes.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnitKind {
    Class,
    /// Top-level declarations of one source file.
    FileFacade,
    /// Compiler-generated class (lambda, mapping table, default
    /// implementations container).
    SyntheticClass,
    MultiFileClassFacade,
    MultiFileClassPart,
}

impl UnitKind {
    pub const fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(UnitKind::Class),
            2 => Some(UnitKind::FileFacade),
            3 => Some(UnitKind::SyntheticClass),
            4 => Some(UnitKind::MultiFileClassFacade),
            5 => Some(UnitKind::MultiFileClassPart),
            _ => None,
        }
    }

    pub const fn code(self) -> u32 {
        match self {
            UnitKind::Class => 1,
            UnitKind::FileFacade => 2,
            UnitKind::SyntheticClass => 3,
            UnitKind::MultiFileClassFacade => 4,
            UnitKind::MultiFileClassPart => 5,
        }
    }
}

/// Metadata format version.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct MetadataVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl MetadataVersion {
    /// Newest format this model was written against.
    pub const CURRENT: Self = Self::new(2, 1, 0);

    /// Oldest readable format.
    pub const EARLIEST: Self = Self::new(1, 4, 0);

    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        MetadataVersion {
            major,
            minor,
            patch,
        }
    }

    /// Read from the blob's version array; needs at least major and minor.
    pub fn from_components(components: &[u32]) -> Option<Self> {
        match components {
            [major, minor] => Some(Self::new(*major, *minor, 0)),
            [major, minor, patch, ..] => Some(Self::new(*major, *minor, *patch)),
            _ => None,
        }
    }

    /// Readable formats span [`Self::EARLIEST`] up to one minor version past
    /// [`Self::CURRENT`]; the format is forward compatible by one minor.
    pub fn is_compatible(self) -> bool {
        let key = (self.major, self.minor);
        key >= (Self::EARLIEST.major, Self::EARLIEST.minor)
            && key <= (Self::CURRENT.major, Self::CURRENT.minor + 1)
    }
}

impl fmt::Display for MetadataVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

bitflags! {
    /// Header flag bits carried in the blob's extra int.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct HeaderFlags: u32 {
        /// Multi-file class parts inherit from each other.
        const MULTI_FILE_INHERITING_PARTS = 1 << 0;
        const PRE_RELEASE = 1 << 1;
        const SCRIPT = 1 << 2;
        const STRICT_SEMANTICS = 1 << 3;
        const UNSTABLE_ABI = 1 << 4;
    }
}

/// The unit metadata cannot be decoded. Fatal for that unit only.
#[derive(Clone, Eq, PartialEq, Debug, Error)]
pub enum DecodeError {
    #[error("unrecognized metadata kind {0}")]
    UnknownKind(u32),
    #[error("malformed metadata version {0:?}")]
    MalformedVersion(Vec<u32>),
    #[error("metadata version {found} is not readable (supported {earliest} to {latest})")]
    IncompatibleVersion {
        found: MetadataVersion,
        earliest: MetadataVersion,
        latest: MetadataVersion,
    },
    #[error("{kind:?} metadata decoded to a {found} descriptor")]
    KindMismatch { kind: UnitKind, found: &'static str },
    #[error("undecodable metadata body: {0}")]
    Body(String),
    #[error(transparent)]
    Names(#[from] NameTableError),
}

/// Validated header of one unit's metadata.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct MetadataHeader {
    pub kind: UnitKind,
    pub version: MetadataVersion,
    pub flags: HeaderFlags,
    pub package_name: Option<String>,
}

impl MetadataHeader {
    pub fn read(blob: &MetadataBlob) -> Result<Self, DecodeError> {
        let kind = UnitKind::from_code(blob.kind).ok_or(DecodeError::UnknownKind(blob.kind))?;
        let version = MetadataVersion::from_components(&blob.version)
            .ok_or_else(|| DecodeError::MalformedVersion(blob.version.clone()))?;
        if !version.is_compatible() {
            return Err(DecodeError::IncompatibleVersion {
                found: version,
                earliest: MetadataVersion::EARLIEST,
                latest: MetadataVersion::new(
                    MetadataVersion::CURRENT.major,
                    MetadataVersion::CURRENT.minor + 1,
                    0,
                ),
            });
        }
        Ok(MetadataHeader {
            kind,
            version,
            flags: HeaderFlags::from_bits_truncate(blob.extra_int),
            package_name: blob.package_name.clone(),
        })
    }
}
