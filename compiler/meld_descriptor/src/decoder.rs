//! Body decoder interface.
//!
//! The binary body decoder is an external collaborator. This module fixes
//! its interface and wraps it with header validation and the header/body
//! agreement check, producing a [`DecodedUnit`].

use meld_host::MetadataBlob;

use crate::{
    ClassName, ClassNameIdx, DecodeError, MetadataHeader, NameIdx, NameTable, NameTableError,
    UnitDescriptor,
};

/// Decodes the payload of a blob whose header already validated.
///
/// Closures of the matching shape implement this trait.
pub trait MetadataDecoder {
    fn decode_body(
        &self,
        header: &MetadataHeader,
        blob: &MetadataBlob,
    ) -> Result<(UnitDescriptor, NameTable), DecodeError>;
}

impl<F> MetadataDecoder for F
where
    F: Fn(&MetadataHeader, &MetadataBlob) -> Result<(UnitDescriptor, NameTable), DecodeError>,
{
    fn decode_body(
        &self,
        header: &MetadataHeader,
        blob: &MetadataBlob,
    ) -> Result<(UnitDescriptor, NameTable), DecodeError> {
        self(header, blob)
    }
}

/// One compiled unit's decoded metadata.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct DecodedUnit {
    pub header: MetadataHeader,
    pub descriptor: UnitDescriptor,
    pub names: NameTable,
}

impl DecodedUnit {
    #[inline]
    pub fn name(&self, idx: NameIdx) -> Result<&str, NameTableError> {
        self.names.string(idx)
    }

    #[inline]
    pub fn class_name(&self, idx: ClassNameIdx) -> Result<ClassName, NameTableError> {
        self.names.class_name(idx)
    }

    /// Resolved module name, if the descriptor declares one.
    pub fn module_name(&self) -> Result<Option<&str>, NameTableError> {
        self.descriptor
            .module_name()
            .map(|idx| self.names.string(idx))
            .transpose()
    }
}

/// Validate the header, decode the body, and check they agree.
#[tracing::instrument(level = "trace", skip_all, fields(kind = blob.kind))]
pub fn decode_unit(
    decoder: &dyn MetadataDecoder,
    blob: &MetadataBlob,
) -> Result<DecodedUnit, DecodeError> {
    let header = MetadataHeader::read(blob)?;
    let (descriptor, names) = decoder.decode_body(&header, blob)?;
    if !descriptor.agrees_with(header.kind) {
        return Err(DecodeError::KindMismatch {
            kind: header.kind,
            found: descriptor.shape_name(),
        });
    }
    tracing::trace!(
        version = %header.version,
        strings = names.strings_len(),
        "decoded unit metadata"
    );
    Ok(DecodedUnit {
        header,
        descriptor,
        names,
    })
}
