//! The host navigation trait.

use crate::{Annotation, HostId, HostKind, HostOrigin, HostType, MetadataBlob, Modifiers};

/// Read-only navigation over a host reflection tree.
///
/// Handles passed in must have been produced by the same host. Accessors
/// that do not apply to a construct's kind return an empty slice or `None`.
pub trait HostReflection {
    fn kind(&self, id: HostId) -> HostKind;

    fn simple_name(&self, id: HostId) -> &str;

    /// Dotted qualified name for packages and class-like constructs.
    fn qualified_name(&self, id: HostId) -> Option<&str>;

    fn modifiers(&self, id: HostId) -> Modifiers;

    fn origin(&self, id: HostId) -> HostOrigin;

    fn enclosing(&self, id: HostId) -> Option<HostId>;

    /// Members, nested classes, or packages, in declaration order.
    fn enclosed(&self, id: HostId) -> &[HostId];

    /// Parameters of an executable construct.
    fn parameters(&self, id: HostId) -> &[HostId];

    /// Type parameters of a class or executable construct.
    fn type_parameters(&self, id: HostId) -> &[HostId];

    /// Return type of an executable construct.
    fn return_type(&self, id: HostId) -> Option<&HostType>;

    /// Type of a field or parameter, the declared type of a class, or the
    /// type variable of a type parameter.
    fn declared_type(&self, id: HostId) -> Option<&HostType>;

    fn superclass(&self, id: HostId) -> Option<&HostType>;

    fn interfaces(&self, id: HostId) -> &[HostType];

    /// Upper bounds of a type parameter.
    fn bounds(&self, id: HostId) -> &[HostType];

    fn annotations(&self, id: HostId) -> &[Annotation];

    /// The compact metadata annotation attached to a compiled unit.
    fn metadata(&self, id: HostId) -> Option<&MetadataBlob>;
}
