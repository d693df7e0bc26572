//! The decoded descriptor tree.
//!
//! Plain data: immutable once the body decoder returns it, owned by the
//! [`DecodedUnit`](crate::DecodedUnit) that describes one compiled unit.
//! Names are table indices; resolve them through the unit's
//! [`NameTable`](crate::NameTable).

use crate::{ClassNameIdx, DeclFlags, NameIdx, TypeParamFlags, UnitKind, Variance};

/// A type as written in a declaration.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct TypeRef {
    pub classifier: TypeClassifier,
    pub arguments: Vec<TypeArgument>,
    pub nullable: bool,
}

impl TypeRef {
    /// A non-null class type with no arguments.
    pub fn class(name: ClassNameIdx) -> Self {
        TypeRef {
            classifier: TypeClassifier::Class(name),
            arguments: Vec::new(),
            nullable: false,
        }
    }

    /// A reference to the type parameter with the given id.
    pub fn type_parameter(id: u32) -> Self {
        TypeRef {
            classifier: TypeClassifier::TypeParameter(id),
            arguments: Vec::new(),
            nullable: false,
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeClassifier {
    Class(ClassNameIdx),
    /// Id of a type parameter in scope.
    TypeParameter(u32),
    TypeAlias(ClassNameIdx),
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeArgument {
    Star,
    Projection { variance: Variance, ty: TypeRef },
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct TypeParameterDescriptor {
    /// Unit-wide id; type references name parameters by id.
    pub id: u32,
    pub name: NameIdx,
    pub flags: TypeParamFlags,
    pub upper_bounds: Vec<TypeRef>,
}

impl TypeParameterDescriptor {
    pub fn new(id: u32, name: NameIdx) -> Self {
        TypeParameterDescriptor {
            id,
            name,
            flags: TypeParamFlags::empty(),
            upper_bounds: Vec::new(),
        }
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ValueParameterDescriptor {
    pub name: NameIdx,
    pub flags: DeclFlags,
    pub ty: TypeRef,
    /// Element type when the parameter is a vararg.
    pub vararg_element: Option<TypeRef>,
}

impl ValueParameterDescriptor {
    pub fn new(name: NameIdx, ty: TypeRef) -> Self {
        ValueParameterDescriptor {
            name,
            flags: DeclFlags::empty(),
            ty,
            vararg_element: None,
        }
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct FunctionDescriptor {
    pub name: NameIdx,
    pub flags: DeclFlags,
    pub type_parameters: Vec<TypeParameterDescriptor>,
    /// Extension receiver type.
    pub receiver: Option<TypeRef>,
    pub value_parameters: Vec<ValueParameterDescriptor>,
    pub return_type: TypeRef,
}

impl FunctionDescriptor {
    pub fn new(name: NameIdx, flags: DeclFlags, return_type: TypeRef) -> Self {
        FunctionDescriptor {
            name,
            flags,
            type_parameters: Vec::new(),
            receiver: None,
            value_parameters: Vec::new(),
            return_type,
        }
    }

    /// Parameter count of the host method this function compiles to: the
    /// receiver and a suspend continuation are passed as parameters.
    pub fn host_arity(&self) -> usize {
        self.value_parameters.len()
            + usize::from(self.receiver.is_some())
            + usize::from(self.flags.contains(DeclFlags::IS_SUSPEND))
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct PropertyDescriptor {
    pub name: NameIdx,
    pub flags: DeclFlags,
    pub getter_flags: DeclFlags,
    /// Present iff the property has a setter.
    pub setter_flags: Option<DeclFlags>,
    pub type_parameters: Vec<TypeParameterDescriptor>,
    pub receiver: Option<TypeRef>,
    pub return_type: TypeRef,
    pub setter_parameter: Option<ValueParameterDescriptor>,
}

impl PropertyDescriptor {
    /// A read-only property with default accessor flags.
    pub fn new(name: NameIdx, flags: DeclFlags, return_type: TypeRef) -> Self {
        PropertyDescriptor {
            name,
            flags: flags | DeclFlags::HAS_GETTER,
            getter_flags: flags.accessor_defaults(),
            setter_flags: None,
            type_parameters: Vec::new(),
            receiver: None,
            return_type,
            setter_parameter: None,
        }
    }

    /// Make the property mutable with a default setter.
    #[must_use]
    pub fn mutable(mut self) -> Self {
        self.flags |= DeclFlags::IS_VAR | DeclFlags::HAS_SETTER;
        self.setter_flags = Some(self.flags.accessor_defaults());
        self
    }

    #[inline]
    pub fn is_var(&self) -> bool {
        self.flags.contains(DeclFlags::IS_VAR)
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ConstructorDescriptor {
    pub flags: DeclFlags,
    pub value_parameters: Vec<ValueParameterDescriptor>,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ClassDescriptor {
    pub flags: DeclFlags,
    pub name: ClassNameIdx,
    pub type_parameters: Vec<TypeParameterDescriptor>,
    pub supertypes: Vec<TypeRef>,
    pub constructors: Vec<ConstructorDescriptor>,
    pub functions: Vec<FunctionDescriptor>,
    pub properties: Vec<PropertyDescriptor>,
    pub nested_classes: Vec<NameIdx>,
    pub enum_entries: Vec<NameIdx>,
    pub sealed_subclasses: Vec<ClassNameIdx>,
    pub companion_object: Option<NameIdx>,
    /// Declaring module; absent when the default module name applies.
    pub module_name: Option<NameIdx>,
}

impl ClassDescriptor {
    pub fn new(flags: DeclFlags, name: ClassNameIdx) -> Self {
        ClassDescriptor {
            flags,
            name,
            type_parameters: Vec::new(),
            supertypes: Vec::new(),
            constructors: Vec::new(),
            functions: Vec::new(),
            properties: Vec::new(),
            nested_classes: Vec::new(),
            enum_entries: Vec::new(),
            sealed_subclasses: Vec::new(),
            companion_object: None,
            module_name: None,
        }
    }
}

/// Top-level members of a file facade or multi-file class part.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct PackageDescriptor {
    pub functions: Vec<FunctionDescriptor>,
    pub properties: Vec<PropertyDescriptor>,
    pub module_name: Option<NameIdx>,
}

/// Root of one unit's descriptor tree.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnitDescriptor {
    Class(ClassDescriptor),
    Package(PackageDescriptor),
    /// Compiler-generated class; lambdas carry their function.
    SyntheticClass(Option<FunctionDescriptor>),
    /// Facade of a multi-file class, listing its parts' binary names.
    MultiFileFacade { parts: Vec<String> },
}

impl UnitDescriptor {
    /// Whether this descriptor is the shape the header kind announces.
    pub fn agrees_with(&self, kind: UnitKind) -> bool {
        matches!(
            (self, kind),
            (UnitDescriptor::Class(_), UnitKind::Class)
                | (
                    UnitDescriptor::Package(_),
                    UnitKind::FileFacade | UnitKind::MultiFileClassPart
                )
                | (UnitDescriptor::SyntheticClass(_), UnitKind::SyntheticClass)
                | (
                    UnitDescriptor::MultiFileFacade { .. },
                    UnitKind::MultiFileClassFacade
                )
        )
    }

    pub fn shape_name(&self) -> &'static str {
        match self {
            UnitDescriptor::Class(_) => "class",
            UnitDescriptor::Package(_) => "package",
            UnitDescriptor::SyntheticClass(_) => "synthetic class",
            UnitDescriptor::MultiFileFacade { .. } => "multi-file facade",
        }
    }

    pub fn functions(&self) -> &[FunctionDescriptor] {
        match self {
            UnitDescriptor::Class(class) => &class.functions,
            UnitDescriptor::Package(package) => &package.functions,
            UnitDescriptor::SyntheticClass(Some(function)) => std::slice::from_ref(function),
            UnitDescriptor::SyntheticClass(None) | UnitDescriptor::MultiFileFacade { .. } => &[],
        }
    }

    pub fn properties(&self) -> &[PropertyDescriptor] {
        match self {
            UnitDescriptor::Class(class) => &class.properties,
            UnitDescriptor::Package(package) => &package.properties,
            UnitDescriptor::SyntheticClass(_) | UnitDescriptor::MultiFileFacade { .. } => &[],
        }
    }

    pub fn constructors(&self) -> &[ConstructorDescriptor] {
        match self {
            UnitDescriptor::Class(class) => &class.constructors,
            _ => &[],
        }
    }

    pub fn type_parameters(&self) -> &[TypeParameterDescriptor] {
        match self {
            UnitDescriptor::Class(class) => &class.type_parameters,
            _ => &[],
        }
    }

    pub fn module_name(&self) -> Option<NameIdx> {
        match self {
            UnitDescriptor::Class(class) => class.module_name,
            UnitDescriptor::Package(package) => package.module_name,
            UnitDescriptor::SyntheticClass(_) | UnitDescriptor::MultiFileFacade { .. } => None,
        }
    }

    pub fn as_class(&self) -> Option<&ClassDescriptor> {
        match self {
            UnitDescriptor::Class(class) => Some(class),
            _ => None,
        }
    }
}
