//! Element nodes.
//!
//! An [`Element`] is the unified view of one declaration: a host construct,
//! its descriptor declaration, or both. Nodes are shared as `Rc<Element>`
//! and owned by the [`Round`](crate::Round) that built them. Apart from the
//! memoized enclosed set a node never changes after construction.
//!
//! Identity is the [`ElementKey`]: equality and hashing ignore everything
//! else.

mod variants;

use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use meld_host::{HostId, HostType};
use rustc_hash::FxHashMap;

use crate::capability::{
    ConvertibleToTypeMirror, HasAnnotations, HasModality, HasOrigin, HasQualifiedName,
    HasSimpleName, HasTypeParameters, HasVariance, HasVisibility,
};
use crate::Origin;

pub use variants::{
    Accessor, ClassElement, FunctionElement, FunctionFlags, ModuleElement, Nesting,
    PackageElement, Parameter, PropertyElement, PropertyFlags, TypeParameterElement,
};

/// Which descriptor declaration a descriptor-only node stands for.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum DescriptorSlot {
    /// Index into the owner descriptor's properties.
    Property(u32),
    /// Index into the owner descriptor's functions.
    Function(u32),
    /// Type parameter `id`, numbered within its declaring scope.
    TypeParameter { scope: TypeParameterScope, id: u32 },
}

/// The declaration a descriptor-only type parameter belongs to, relative to
/// the key's owner.
///
/// Sibling members number their type parameters from zero, so the id alone
/// does not identify one.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeParameterScope {
    /// The owner construct itself.
    Owner,
    /// Descriptor-only function of the owner class, by function index.
    Function(u32),
    /// Descriptor-only property of the owner class, by property index.
    Property(u32),
}

/// Node identity.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ElementKey {
    /// Wraps one host construct.
    Host(HostId),
    /// Exists only in the descriptor of `owner`'s unit.
    Descriptor { owner: HostId, slot: DescriptorSlot },
}

impl ElementKey {
    /// The host construct this key wraps, if any.
    pub fn host(self) -> Option<HostId> {
        match self {
            ElementKey::Host(id) => Some(id),
            ElementKey::Descriptor { .. } => None,
        }
    }
}

/// Variant tag of an [`ElementKind`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ElementTag {
    Class,
    Function,
    Property,
    TypeParameter,
    Package,
    Module,
}

#[derive(Debug)]
pub enum ElementKind {
    Class(ClassElement),
    Function(FunctionElement),
    Property(PropertyElement),
    TypeParameter(TypeParameterElement),
    Package(PackageElement),
    Module(ModuleElement),
}

/// Memoized children of a composite node.
#[derive(Default)]
pub(crate) struct Enclosed {
    pub(crate) elements: Vec<Rc<Element>>,
    pub(crate) by_host: FxHashMap<HostId, usize>,
}

impl Enclosed {
    /// Append `element`, reachable through each of `hosts`.
    pub(crate) fn push(&mut self, element: Rc<Element>, hosts: impl IntoIterator<Item = HostId>) {
        let index = self.elements.len();
        for host in hosts {
            self.by_host.entry(host).or_insert(index);
        }
        self.elements.push(element);
    }
}

pub(crate) enum EnclosedState {
    Pending,
    InProgress,
    Ready(Rc<Enclosed>),
}

pub struct Element {
    key: ElementKey,
    name: String,
    origin: Origin,
    kind: ElementKind,
    pub(crate) enclosed: RefCell<EnclosedState>,
}

impl Element {
    pub(crate) fn new(key: ElementKey, name: String, origin: Origin, kind: ElementKind) -> Self {
        Element {
            key,
            name,
            origin,
            kind,
            enclosed: RefCell::new(EnclosedState::Pending),
        }
    }

    #[inline]
    pub fn key(&self) -> ElementKey {
        self.key
    }

    /// The host construct this node wraps, if any.
    #[inline]
    pub fn host(&self) -> Option<HostId> {
        self.key.host()
    }

    #[inline]
    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    pub fn tag(&self) -> ElementTag {
        match &self.kind {
            ElementKind::Class(_) => ElementTag::Class,
            ElementKind::Function(_) => ElementTag::Function,
            ElementKind::Property(_) => ElementTag::Property,
            ElementKind::TypeParameter(_) => ElementTag::TypeParameter,
            ElementKind::Package(_) => ElementTag::Package,
            ElementKind::Module(_) => ElementTag::Module,
        }
    }

    /// Classes, packages and modules enclose other nodes.
    pub fn is_composite(&self) -> bool {
        matches!(
            self.kind,
            ElementKind::Class(_) | ElementKind::Package(_) | ElementKind::Module(_)
        )
    }

    pub fn as_class(&self) -> Option<&ClassElement> {
        match &self.kind {
            ElementKind::Class(class) => Some(class),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionElement> {
        match &self.kind {
            ElementKind::Function(function) => Some(function),
            _ => None,
        }
    }

    pub fn as_property(&self) -> Option<&PropertyElement> {
        match &self.kind {
            ElementKind::Property(property) => Some(property),
            _ => None,
        }
    }

    pub fn as_type_parameter(&self) -> Option<&TypeParameterElement> {
        match &self.kind {
            ElementKind::TypeParameter(tp) => Some(tp),
            _ => None,
        }
    }

    pub fn as_package(&self) -> Option<&PackageElement> {
        match &self.kind {
            ElementKind::Package(package) => Some(package),
            _ => None,
        }
    }

    pub fn as_module(&self) -> Option<&ModuleElement> {
        match &self.kind {
            ElementKind::Module(module) => Some(module),
            _ => None,
        }
    }

    // Capability views. Each match is exhaustive so a new variant must
    // decide which capabilities it carries.

    pub fn as_visibility(&self) -> Option<&dyn HasVisibility> {
        match &self.kind {
            ElementKind::Class(class) => Some(class),
            ElementKind::Function(function) => Some(function),
            ElementKind::Property(property) => Some(property),
            ElementKind::TypeParameter(_) | ElementKind::Package(_) | ElementKind::Module(_) => {
                None
            }
        }
    }

    pub fn as_modality(&self) -> Option<&dyn HasModality> {
        match &self.kind {
            ElementKind::Class(class) => Some(class),
            ElementKind::Function(function) => Some(function),
            ElementKind::Property(property) => Some(property),
            ElementKind::TypeParameter(_) | ElementKind::Package(_) | ElementKind::Module(_) => {
                None
            }
        }
    }

    pub fn as_type_parameters(&self) -> Option<&dyn HasTypeParameters> {
        match &self.kind {
            ElementKind::Class(class) => Some(class),
            ElementKind::Function(function) => Some(function),
            ElementKind::Property(property) => Some(property),
            ElementKind::TypeParameter(_) | ElementKind::Package(_) | ElementKind::Module(_) => {
                None
            }
        }
    }

    pub fn as_variance(&self) -> Option<&dyn HasVariance> {
        match &self.kind {
            ElementKind::TypeParameter(tp) => Some(tp),
            ElementKind::Class(_)
            | ElementKind::Function(_)
            | ElementKind::Property(_)
            | ElementKind::Package(_)
            | ElementKind::Module(_) => None,
        }
    }

    pub fn as_qualified_name(&self) -> Option<&dyn HasQualifiedName> {
        match &self.kind {
            ElementKind::Class(class) => Some(class),
            ElementKind::Package(package) => Some(package),
            ElementKind::Function(_)
            | ElementKind::Property(_)
            | ElementKind::TypeParameter(_)
            | ElementKind::Module(_) => None,
        }
    }

    pub fn as_type_mirror(&self) -> Option<&dyn ConvertibleToTypeMirror> {
        match &self.kind {
            ElementKind::Class(class) => Some(class),
            ElementKind::Function(function) => Some(function),
            ElementKind::Property(property) => Some(property),
            ElementKind::TypeParameter(tp) => Some(tp),
            ElementKind::Package(_) | ElementKind::Module(_) => None,
        }
    }

    pub fn as_annotations(&self) -> Option<&dyn HasAnnotations> {
        match &self.kind {
            ElementKind::Class(class) => Some(class),
            ElementKind::Function(function) => Some(function),
            ElementKind::Property(property) => Some(property),
            ElementKind::TypeParameter(_) | ElementKind::Package(_) | ElementKind::Module(_) => {
                None
            }
        }
    }

    /// Host type this node denotes; absent for packages and modules.
    pub fn type_mirror(&self) -> Option<HostType> {
        self.as_type_mirror().and_then(|t| t.type_mirror())
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Element {}

impl Hash for Element {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("key", &self.key)
            .field("name", &self.name)
            .field("tag", &self.tag())
            .field("origin", &self.origin)
            .finish()
    }
}

impl HasSimpleName for Element {
    fn simple_name(&self) -> &str {
        &self.name
    }
}

impl HasOrigin for Element {
    fn origin(&self) -> Origin {
        self.origin
    }
}
