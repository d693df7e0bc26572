//! Capability traits.
//!
//! Each trait is one facet a node may expose. Which variants carry which
//! facet is decided by the `Element::as_*` views.

use std::rc::Rc;

use meld_descriptor::{Modality, Variance, Visibility};
use meld_host::{Annotation, HostId, HostType};

use crate::element::{
    ClassElement, Element, FunctionElement, PackageElement, PropertyElement, TypeParameterElement,
};
use crate::Origin;

pub trait HasSimpleName {
    fn simple_name(&self) -> &str;
}

pub trait HasQualifiedName {
    fn qualified_name(&self) -> &str;
}

pub trait HasVisibility {
    fn visibility(&self) -> Visibility;
}

pub trait HasModality {
    fn modality(&self) -> Modality;
}

pub trait HasOrigin {
    fn origin(&self) -> Origin;
}

pub trait HasTypeParameters {
    /// Type parameter nodes in declaration order.
    fn type_parameters(&self) -> &[Rc<Element>];

    /// The node wrapping the host type parameter `host`.
    fn type_parameter_for(&self, host: HostId) -> Option<&Rc<Element>> {
        self.type_parameters()
            .iter()
            .find(|tp| tp.host() == Some(host))
    }
}

pub trait HasVariance {
    fn variance(&self) -> Variance;
}

pub trait ConvertibleToTypeMirror {
    fn type_mirror(&self) -> Option<HostType>;
}

pub trait HasAnnotations {
    fn annotations(&self) -> &[Annotation];

    fn annotation(&self, type_name: &str) -> Option<&Annotation> {
        self.annotations()
            .iter()
            .find(|annotation| annotation.type_name == type_name)
    }
}

impl HasQualifiedName for ClassElement {
    fn qualified_name(&self) -> &str {
        &self.qualified_name
    }
}

impl HasQualifiedName for PackageElement {
    fn qualified_name(&self) -> &str {
        &self.qualified_name
    }
}

macro_rules! impl_declaration_facets {
    ($($ty:ty),*) => {$(
        impl HasVisibility for $ty {
            fn visibility(&self) -> Visibility {
                self.visibility
            }
        }

        impl HasModality for $ty {
            fn modality(&self) -> Modality {
                self.modality
            }
        }

        impl HasTypeParameters for $ty {
            fn type_parameters(&self) -> &[Rc<Element>] {
                &self.type_parameters
            }
        }

        impl HasAnnotations for $ty {
            fn annotations(&self) -> &[Annotation] {
                &self.annotations
            }
        }
    )*};
}

impl_declaration_facets!(ClassElement, FunctionElement, PropertyElement);

impl HasVariance for TypeParameterElement {
    fn variance(&self) -> Variance {
        self.variance
    }
}

impl ConvertibleToTypeMirror for ClassElement {
    fn type_mirror(&self) -> Option<HostType> {
        self.declared_type.clone()
    }
}

impl ConvertibleToTypeMirror for FunctionElement {
    fn type_mirror(&self) -> Option<HostType> {
        self.return_type.clone()
    }
}

impl ConvertibleToTypeMirror for PropertyElement {
    fn type_mirror(&self) -> Option<HostType> {
        self.ty.clone()
    }
}

impl ConvertibleToTypeMirror for TypeParameterElement {
    fn type_mirror(&self) -> Option<HostType> {
        Some(self.variable.clone())
    }
}
