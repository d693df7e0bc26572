//! Per-variant payloads of [`ElementKind`](super::ElementKind).

use std::rc::Rc;

use bitflags::bitflags;
use meld_descriptor::{ClassKind, DecodedUnit, Modality, UnitKind, Variance, Visibility};
use meld_host::{Annotation, HostId, HostType};

use super::Element;

/// How a class relates to its enclosing declaration.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Nesting {
    TopLevel,
    /// Member class without an outer instance.
    Nested,
    /// Member class holding a reference to its outer instance.
    Inner,
}

#[derive(Debug)]
pub struct ClassElement {
    pub(crate) qualified_name: String,
    pub(crate) class_kind: ClassKind,
    pub(crate) visibility: Visibility,
    pub(crate) modality: Modality,
    pub(crate) nesting: Nesting,
    pub(crate) is_data: bool,
    pub(crate) is_value: bool,
    pub(crate) synthetic: bool,
    pub(crate) module_name: Option<String>,
    pub(crate) companion: Option<String>,
    pub(crate) superclass: Option<HostType>,
    pub(crate) interfaces: Vec<HostType>,
    pub(crate) declared_type: Option<HostType>,
    pub(crate) type_parameters: Vec<Rc<Element>>,
    pub(crate) annotations: Vec<Annotation>,
    pub(crate) unit: Option<Rc<DecodedUnit>>,
}

impl ClassElement {
    #[inline]
    pub fn class_kind(&self) -> ClassKind {
        self.class_kind
    }

    #[inline]
    pub fn nesting(&self) -> Nesting {
        self.nesting
    }

    pub fn is_data(&self) -> bool {
        self.is_data
    }

    pub fn is_value(&self) -> bool {
        self.is_value
    }

    pub fn is_inner(&self) -> bool {
        self.nesting == Nesting::Inner
    }

    pub fn is_companion(&self) -> bool {
        self.class_kind == ClassKind::CompanionObject
    }

    /// Compiler-generated container class.
    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    /// Kind of the unit's metadata; `None` for host-only classes.
    pub fn unit_kind(&self) -> Option<UnitKind> {
        self.unit.as_ref().map(|unit| unit.header.kind)
    }

    /// Declaring module, when the metadata names one.
    pub fn module_name(&self) -> Option<&str> {
        self.module_name.as_deref()
    }

    /// Simple name of the companion object, if the class declares one.
    pub fn companion(&self) -> Option<&str> {
        self.companion.as_deref()
    }

    pub fn superclass(&self) -> Option<&HostType> {
        self.superclass.as_ref()
    }

    pub fn interfaces(&self) -> &[HostType] {
        &self.interfaces
    }

    /// The decoded metadata of this class's unit.
    pub fn unit(&self) -> Option<&DecodedUnit> {
        self.unit.as_deref()
    }
}

bitflags! {
    /// Declaration facts of a function that only the descriptor carries.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct FunctionFlags: u16 {
        const SUSPEND = 1 << 0;
        const INLINE = 1 << 1;
        const OPERATOR = 1 << 2;
        const INFIX = 1 << 3;
        const TAILREC = 1 << 4;
        const EXTERNAL = 1 << 5;
        const CONSTRUCTOR = 1 << 6;
        const SECONDARY = 1 << 7;
        /// Declared with an extension receiver.
        const EXTENSION = 1 << 8;
    }
}

/// One value parameter of a function.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Parameter {
    pub name: String,
    pub ty: Option<HostType>,
    pub has_default: bool,
    pub is_vararg: bool,
    pub host: Option<HostId>,
}

#[derive(Debug)]
pub struct FunctionElement {
    pub(crate) visibility: Visibility,
    pub(crate) modality: Modality,
    pub(crate) flags: FunctionFlags,
    pub(crate) type_parameters: Vec<Rc<Element>>,
    pub(crate) receiver: Option<HostType>,
    pub(crate) parameters: Vec<Parameter>,
    pub(crate) return_type: Option<HostType>,
    pub(crate) annotations: Vec<Annotation>,
}

impl FunctionElement {
    #[inline]
    pub fn flags(&self) -> FunctionFlags {
        self.flags
    }

    pub fn is_constructor(&self) -> bool {
        self.flags.contains(FunctionFlags::CONSTRUCTOR)
    }

    pub fn is_suspend(&self) -> bool {
        self.flags.contains(FunctionFlags::SUSPEND)
    }

    /// Extension receiver type.
    pub fn receiver(&self) -> Option<&HostType> {
        self.receiver.as_ref()
    }

    /// Declared value parameters; receiver and continuation excluded.
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn return_type(&self) -> Option<&HostType> {
        self.return_type.as_ref()
    }
}

/// A host method realizing a property accessor.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Accessor {
    pub host: HostId,
    pub visibility: Visibility,
}

bitflags! {
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct PropertyFlags: u8 {
        const VAR = 1 << 0;
        const CONST = 1 << 1;
        const LATEINIT = 1 << 2;
        const DELEGATED = 1 << 3;
        /// Constant of an enum class.
        const ENUM_ENTRY = 1 << 4;
    }
}

#[derive(Debug)]
pub struct PropertyElement {
    pub(crate) visibility: Visibility,
    pub(crate) modality: Modality,
    pub(crate) flags: PropertyFlags,
    pub(crate) ty: Option<HostType>,
    pub(crate) field: Option<HostId>,
    pub(crate) getter: Option<Accessor>,
    pub(crate) setter: Option<Accessor>,
    pub(crate) type_parameters: Vec<Rc<Element>>,
    pub(crate) annotations: Vec<Annotation>,
}

impl PropertyElement {
    #[inline]
    pub fn flags(&self) -> PropertyFlags {
        self.flags
    }

    pub fn is_var(&self) -> bool {
        self.flags.contains(PropertyFlags::VAR)
    }

    pub fn ty(&self) -> Option<&HostType> {
        self.ty.as_ref()
    }

    /// Backing field or enum constant.
    pub fn field(&self) -> Option<HostId> {
        self.field
    }

    pub fn getter(&self) -> Option<Accessor> {
        self.getter
    }

    pub fn setter(&self) -> Option<Accessor> {
        self.setter
    }
}

#[derive(Debug)]
pub struct TypeParameterElement {
    pub(crate) variance: Variance,
    pub(crate) reified: bool,
    pub(crate) bounds: Vec<HostType>,
    pub(crate) owner: HostId,
    pub(crate) index: usize,
    pub(crate) variable: HostType,
}

impl TypeParameterElement {
    pub fn is_reified(&self) -> bool {
        self.reified
    }

    pub fn bounds(&self) -> &[HostType] {
        &self.bounds
    }

    /// Host construct of the declaring class or executable.
    pub fn owner(&self) -> HostId {
        self.owner
    }

    /// Position in the owner's type parameter list.
    pub fn index(&self) -> usize {
        self.index
    }
}

#[derive(Debug)]
pub struct PackageElement {
    pub(crate) qualified_name: String,
}

impl PackageElement {
    /// The unnamed package.
    pub fn is_unnamed(&self) -> bool {
        self.qualified_name.is_empty()
    }
}

#[derive(Debug)]
pub struct ModuleElement {
    pub(crate) name: String,
}

impl ModuleElement {
    pub fn is_unnamed(&self) -> bool {
        self.name.is_empty()
    }
}
