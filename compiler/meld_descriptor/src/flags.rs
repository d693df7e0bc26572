//! Descriptor flag sets.
//!
//! Every declaration descriptor carries one [`DeclFlags`] word. Visibility,
//! modality and class kind are one-hot groups: a well-formed descriptor sets
//! exactly one bit of each group it carries. The remaining bits are
//! independent booleans, grouped by the declaration kind that uses them.

use bitflags::bitflags;

bitflags! {
    /// Declaration flags for classes, functions, properties, constructors,
    /// accessors and value parameters.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct DeclFlags: u64 {
        const HAS_ANNOTATIONS = 1 << 0;

        // === Visibility (one-hot) ===
        const IS_INTERNAL = 1 << 1;
        const IS_PRIVATE = 1 << 2;
        const IS_PROTECTED = 1 << 3;
        const IS_PUBLIC = 1 << 4;
        const IS_PRIVATE_TO_THIS = 1 << 5;
        const IS_LOCAL = 1 << 6;

        // === Modality (one-hot) ===
        const IS_FINAL = 1 << 7;
        const IS_OPEN = 1 << 8;
        const IS_ABSTRACT = 1 << 9;
        const IS_SEALED = 1 << 10;

        // === Class kind (at most one; none means plain class) ===
        const IS_INTERFACE = 1 << 11;
        const IS_ENUM_CLASS = 1 << 12;
        const IS_ENUM_ENTRY = 1 << 13;
        const IS_ANNOTATION_CLASS = 1 << 14;
        const IS_OBJECT = 1 << 15;
        const IS_COMPANION_OBJECT = 1 << 16;

        // === Class ===
        const IS_INNER = 1 << 17;
        const IS_DATA = 1 << 18;
        const IS_EXTERNAL = 1 << 19;
        const IS_EXPECT = 1 << 20;
        const IS_VALUE = 1 << 21;
        const IS_FUN_INTERFACE = 1 << 22;

        // === Function ===
        const IS_OPERATOR = 1 << 23;
        const IS_INFIX = 1 << 24;
        const IS_INLINE = 1 << 25;
        const IS_TAILREC = 1 << 26;
        const IS_SUSPEND = 1 << 27;

        // === Property ===
        const IS_VAR = 1 << 28;
        const HAS_GETTER = 1 << 29;
        const HAS_SETTER = 1 << 30;
        const IS_CONST = 1 << 31;
        const IS_LATEINIT = 1 << 32;
        const HAS_CONSTANT = 1 << 33;
        const IS_DELEGATED = 1 << 34;

        // === Member kind ===
        const IS_FAKE_OVERRIDE = 1 << 35;
        const IS_DELEGATION = 1 << 36;
        const IS_SYNTHESIZED = 1 << 37;

        // === Constructor ===
        const IS_SECONDARY = 1 << 38;

        // === Value parameter ===
        const DECLARES_DEFAULT_VALUE = 1 << 39;
        const IS_CROSSINLINE = 1 << 40;
        const IS_NOINLINE = 1 << 41;

        // === Accessor ===
        /// The accessor has a body or annotations of its own.
        const IS_NOT_DEFAULT = 1 << 42;
    }
}

impl DeclFlags {
    pub const VISIBILITY_MASK: Self = Self::from_bits_truncate(
        Self::IS_INTERNAL.bits()
            | Self::IS_PRIVATE.bits()
            | Self::IS_PROTECTED.bits()
            | Self::IS_PUBLIC.bits()
            | Self::IS_PRIVATE_TO_THIS.bits()
            | Self::IS_LOCAL.bits(),
    );

    pub const MODALITY_MASK: Self = Self::from_bits_truncate(
        Self::IS_FINAL.bits() | Self::IS_OPEN.bits() | Self::IS_ABSTRACT.bits() | Self::IS_SEALED.bits(),
    );

    /// The visibility and modality bits only, as default accessors inherit
    /// them from their property.
    #[inline]
    pub const fn accessor_defaults(self) -> Self {
        Self::from_bits_truncate(
            self.bits() & (Self::VISIBILITY_MASK.bits() | Self::MODALITY_MASK.bits()),
        )
    }
}

bitflags! {
    /// Type parameter flags.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct TypeParamFlags: u8 {
        const IS_REIFIED = 1 << 0;
        const IN_VARIANCE = 1 << 1;
        const OUT_VARIANCE = 1 << 2;
    }
}
