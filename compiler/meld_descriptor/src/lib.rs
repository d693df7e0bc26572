//! Compact-metadata descriptor view.
//!
//! A compiler attaches a dense metadata blob to every compiled unit. Once
//! the body decoder has turned it into a structured tree, this crate gives
//! that tree a typed shape:
//!
//! - Header validation ([`MetadataHeader`]) before any body decoding
//! - The descriptor tree ([`UnitDescriptor`] and friends), immutable once
//!   decoded
//! - Name table resolution ([`NameTable`]): every name in the tree is an
//!   index, resolved on demand
//! - Flag sets ([`DeclFlags`], [`TypeParamFlags`]) and pure classifiers
//!   mapping them to semantic enums ([`classify`])
//!
//! # Design
//!
//! - **Indices, not strings**: descriptors store [`NameIdx`] and
//!   [`ClassNameIdx`]; resolution can fail and reports the bad index
//! - **No silent defaults**: a descriptor that carries a visibility or
//!   modality facet with no matching flag is a decoder/model mismatch and
//!   is surfaced as [`ClassifyError`]

pub mod classify;
mod decoder;
mod descriptor;
mod flags;
mod header;
mod names;

pub use classify::{ClassKind, ClassifyError, Modality, Variance, Visibility};
pub use decoder::{decode_unit, DecodedUnit, MetadataDecoder};
pub use descriptor::{
    ClassDescriptor, ConstructorDescriptor, FunctionDescriptor, PackageDescriptor,
    PropertyDescriptor, TypeArgument, TypeClassifier, TypeParameterDescriptor, TypeRef,
    UnitDescriptor, ValueParameterDescriptor,
};
pub use flags::{DeclFlags, TypeParamFlags};
pub use header::{DecodeError, HeaderFlags, MetadataHeader, MetadataVersion, UnitKind};
pub use names::{
    ClassName, ClassNameIdx, NameIdx, NameTable, NameTableBuilder, NameTableError,
    QualifiedNameKind, QualifiedNameRecord, Table,
};
