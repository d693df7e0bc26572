//! Construct kind, modifier and origin tags.

use bitflags::bitflags;

/// Kind tag of a host construct.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum HostKind {
    Module,
    Package,
    Class,
    Interface,
    Enum,
    AnnotationType,
    Record,
    Method,
    Constructor,
    /// Static initializer block.
    StaticInit,
    Field,
    EnumConstant,
    Parameter,
    TypeParameter,
}

impl HostKind {
    /// Class, interface, enum, annotation type or record.
    #[inline]
    pub fn is_class_like(self) -> bool {
        matches!(
            self,
            Self::Class | Self::Interface | Self::Enum | Self::AnnotationType | Self::Record
        )
    }

    /// Method, constructor or static initializer.
    #[inline]
    pub fn is_executable(self) -> bool {
        matches!(self, Self::Method | Self::Constructor | Self::StaticInit)
    }

    /// Field or enum constant.
    #[inline]
    pub fn is_variable(self) -> bool {
        matches!(self, Self::Field | Self::EnumConstant)
    }
}

bitflags! {
    /// Modifier set as reported by the host.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct Modifiers: u16 {
        const PUBLIC = 1 << 0;
        const PROTECTED = 1 << 1;
        const PRIVATE = 1 << 2;
        const STATIC = 1 << 3;
        const FINAL = 1 << 4;
        const ABSTRACT = 1 << 5;
        /// Interface default method.
        const DEFAULT = 1 << 6;
        const SYNCHRONIZED = 1 << 7;
        const NATIVE = 1 << 8;
        const TRANSIENT = 1 << 9;
        const VOLATILE = 1 << 10;
        const STRICTFP = 1 << 11;
        const SEALED = 1 << 12;
        const NON_SEALED = 1 << 13;
    }
}

/// Provenance tag the host attaches to each construct.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum HostOrigin {
    /// Written in source.
    #[default]
    Explicit,
    /// Implicitly declared but required by the language (default
    /// constructors, implicit parameters).
    Mandated,
    /// Compiler-generated with no source counterpart.
    Synthetic,
    /// The host did not record an origin.
    Unknown,
}
