//! Descriptor classifiers.
//!
//! Pure mappings from flag sets to semantic enums, one per facet. Each facet
//! has a descriptor form and, where the host carries the same information,
//! a host-modifier fallback used when a construct has no descriptor.

use meld_host::Modifiers;
use thiserror::Error;

use crate::{DeclFlags, TypeParamFlags};

/// Declared visibility.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Visibility {
    /// Visible within the declaring module.
    Internal,
    Private,
    Protected,
    Public,
    /// Private and only accessible on `this`.
    PrivateToThis,
    /// Declared inside a function body.
    Local,
    /// Host default visibility; only produced from host modifiers.
    PackagePrivate,
}

/// Declared modality.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Modality {
    Final,
    Open,
    Abstract,
    Sealed,
}

/// Declaration-site variance of a type parameter or type argument.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Variance {
    In,
    Out,
    Invariant,
}

/// What kind of classifier a class descriptor declares.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    EnumEntry,
    Annotation,
    Object,
    CompanionObject,
}

impl ClassKind {
    /// Object declarations and companion objects are singletons.
    #[inline]
    pub fn is_singleton(self) -> bool {
        matches!(self, ClassKind::Object | ClassKind::CompanionObject)
    }
}

/// A descriptor carries a facet but none of its flag bits is set.
///
/// This means the decoder and this model disagree on the flag layout; the
/// facet is never defaulted.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Error)]
pub enum ClassifyError {
    #[error("descriptor flags {flags:#x} carry no visibility")]
    MissingVisibilityFlag { flags: u64 },
    #[error("descriptor flags {flags:#x} carry no modality")]
    MissingModalityFlag { flags: u64 },
}

pub fn visibility(flags: DeclFlags) -> Result<Visibility, ClassifyError> {
    if flags.contains(DeclFlags::IS_INTERNAL) {
        Ok(Visibility::Internal)
    } else if flags.contains(DeclFlags::IS_PRIVATE) {
        Ok(Visibility::Private)
    } else if flags.contains(DeclFlags::IS_PROTECTED) {
        Ok(Visibility::Protected)
    } else if flags.contains(DeclFlags::IS_PUBLIC) {
        Ok(Visibility::Public)
    } else if flags.contains(DeclFlags::IS_PRIVATE_TO_THIS) {
        Ok(Visibility::PrivateToThis)
    } else if flags.contains(DeclFlags::IS_LOCAL) {
        Ok(Visibility::Local)
    } else {
        Err(ClassifyError::MissingVisibilityFlag { flags: flags.bits() })
    }
}

/// Host fallback: an explicit access modifier wins, otherwise the host
/// default applies.
pub fn visibility_from_modifiers(modifiers: Modifiers) -> Visibility {
    if modifiers.contains(Modifiers::PUBLIC) {
        Visibility::Public
    } else if modifiers.contains(Modifiers::PROTECTED) {
        Visibility::Protected
    } else if modifiers.contains(Modifiers::PRIVATE) {
        Visibility::Private
    } else {
        Visibility::PackagePrivate
    }
}

pub fn modality(flags: DeclFlags) -> Result<Modality, ClassifyError> {
    if flags.contains(DeclFlags::IS_FINAL) {
        Ok(Modality::Final)
    } else if flags.contains(DeclFlags::IS_OPEN) {
        Ok(Modality::Open)
    } else if flags.contains(DeclFlags::IS_ABSTRACT) {
        Ok(Modality::Abstract)
    } else if flags.contains(DeclFlags::IS_SEALED) {
        Ok(Modality::Sealed)
    } else {
        Err(ClassifyError::MissingModalityFlag { flags: flags.bits() })
    }
}

pub fn modality_from_modifiers(modifiers: Modifiers) -> Modality {
    if modifiers.contains(Modifiers::FINAL) {
        Modality::Final
    } else if modifiers.contains(Modifiers::ABSTRACT) {
        Modality::Abstract
    } else {
        Modality::Open
    }
}

pub fn variance(flags: TypeParamFlags) -> Variance {
    if flags.contains(TypeParamFlags::IN_VARIANCE) {
        Variance::In
    } else if flags.contains(TypeParamFlags::OUT_VARIANCE) {
        Variance::Out
    } else {
        Variance::Invariant
    }
}

pub fn class_kind(flags: DeclFlags) -> ClassKind {
    if flags.contains(DeclFlags::IS_COMPANION_OBJECT) {
        ClassKind::CompanionObject
    } else if flags.contains(DeclFlags::IS_OBJECT) {
        ClassKind::Object
    } else if flags.contains(DeclFlags::IS_INTERFACE) {
        ClassKind::Interface
    } else if flags.contains(DeclFlags::IS_ENUM_CLASS) {
        ClassKind::Enum
    } else if flags.contains(DeclFlags::IS_ENUM_ENTRY) {
        ClassKind::EnumEntry
    } else if flags.contains(DeclFlags::IS_ANNOTATION_CLASS) {
        ClassKind::Annotation
    } else {
        ClassKind::Class
    }
}
