//! Arena-backed host reflection tree.
//!
//! `HostTree` stores constructs in insertion order and hands out `HostId`
//! indices. Insertion files each construct under its parent by kind:
//! parameters into the parent's parameter list, type parameters into its
//! type-parameter list, everything else into its enclosed list.

use crate::{
    Annotation, HostId, HostKind, HostOrigin, HostReflection, HostType, MetadataBlob, Modifiers,
};

/// Description of one construct to insert into a [`HostTree`].
#[derive(Clone, Debug)]
pub struct ConstructSpec {
    kind: HostKind,
    name: String,
    modifiers: Modifiers,
    origin: HostOrigin,
    return_type: Option<HostType>,
    declared_type: Option<HostType>,
    superclass: Option<HostType>,
    interfaces: Vec<HostType>,
    bounds: Vec<HostType>,
    annotations: Vec<Annotation>,
    metadata: Option<MetadataBlob>,
}

impl ConstructSpec {
    pub fn new(kind: HostKind, name: impl Into<String>) -> Self {
        ConstructSpec {
            kind,
            name: name.into(),
            modifiers: Modifiers::empty(),
            origin: HostOrigin::Explicit,
            return_type: None,
            declared_type: None,
            superclass: None,
            interfaces: Vec::new(),
            bounds: Vec::new(),
            annotations: Vec::new(),
            metadata: None,
        }
    }

    #[must_use]
    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub fn origin(mut self, origin: HostOrigin) -> Self {
        self.origin = origin;
        self
    }

    #[must_use]
    pub fn returns(mut self, ty: HostType) -> Self {
        self.return_type = Some(ty);
        self
    }

    /// Set the field or parameter type.
    #[must_use]
    pub fn typed(mut self, ty: HostType) -> Self {
        self.declared_type = Some(ty);
        self
    }

    #[must_use]
    pub fn extends(mut self, ty: HostType) -> Self {
        self.superclass = Some(ty);
        self
    }

    #[must_use]
    pub fn implements(mut self, ty: HostType) -> Self {
        self.interfaces.push(ty);
        self
    }

    #[must_use]
    pub fn bound(mut self, ty: HostType) -> Self {
        self.bounds.push(ty);
        self
    }

    #[must_use]
    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    #[must_use]
    pub fn metadata(mut self, blob: MetadataBlob) -> Self {
        self.metadata = Some(blob);
        self
    }
}

#[derive(Clone, Debug)]
struct HostNode {
    spec: ConstructSpec,
    qualified_name: Option<String>,
    enclosing: Option<HostId>,
    enclosed: Vec<HostId>,
    parameters: Vec<HostId>,
    type_parameters: Vec<HostId>,
}

/// In-memory host reflection tree.
#[derive(Clone, Debug, Default)]
pub struct HostTree {
    nodes: Vec<HostNode>,
}

impl HostTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of constructs in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Insert a construct under `parent`, returning its handle.
    ///
    /// # Panics
    /// Panics if the tree holds more than `u32::MAX` constructs, or if
    /// `parent` was not produced by this tree.
    pub fn insert(&mut self, parent: Option<HostId>, spec: ConstructSpec) -> HostId {
        let id = HostId::from_raw(
            u32::try_from(self.nodes.len())
                .unwrap_or_else(|_| panic!("host tree exceeded {} constructs", u32::MAX)),
        );

        let qualified_name = self.qualify(parent, &spec);
        let mut spec = spec;
        if spec.kind.is_class_like() && spec.declared_type.is_none() {
            if let Some(name) = &qualified_name {
                spec.declared_type = Some(HostType::declared(name.clone()));
            }
        }
        if spec.kind == HostKind::TypeParameter && spec.declared_type.is_none() {
            spec.declared_type = Some(HostType::TypeVariable(spec.name.clone()));
        }

        let kind = spec.kind;
        let type_variable = spec.name.clone();
        self.nodes.push(HostNode {
            spec,
            qualified_name,
            enclosing: parent,
            enclosed: Vec::new(),
            parameters: Vec::new(),
            type_parameters: Vec::new(),
        });

        if let Some(parent) = parent {
            let parent_node = &mut self.nodes[parent.index()];
            match kind {
                HostKind::Parameter => parent_node.parameters.push(id),
                HostKind::TypeParameter => {
                    parent_node.type_parameters.push(id);
                    // A class's declared type carries its type variables.
                    if parent_node.spec.kind.is_class_like() {
                        if let Some(HostType::Declared { arguments, .. }) =
                            &mut parent_node.spec.declared_type
                        {
                            arguments.push(HostType::TypeVariable(type_variable));
                        }
                    }
                }
                _ => parent_node.enclosed.push(id),
            }
        }

        id
    }

    pub fn module(&mut self, name: &str) -> HostId {
        self.insert(None, ConstructSpec::new(HostKind::Module, name))
    }

    /// Insert a package; `name` is the full dotted package name.
    pub fn package(&mut self, module: Option<HostId>, name: &str) -> HostId {
        self.insert(module, ConstructSpec::new(HostKind::Package, name))
    }

    fn qualify(&self, parent: Option<HostId>, spec: &ConstructSpec) -> Option<String> {
        if spec.kind == HostKind::Package {
            return Some(spec.name.clone());
        }
        if !spec.kind.is_class_like() {
            return None;
        }
        let Some(parent) = parent else {
            return Some(spec.name.clone());
        };
        let parent_node = &self.nodes[parent.index()];
        match (&parent_node.qualified_name, parent_node.spec.kind) {
            (Some(prefix), HostKind::Package) if prefix.is_empty() => Some(spec.name.clone()),
            (Some(prefix), _) => Some(format!("{prefix}.{}", spec.name)),
            // Local classes have no qualified name.
            (None, _) => None,
        }
    }

    fn node(&self, id: HostId) -> &HostNode {
        &self.nodes[id.index()]
    }
}

impl HostReflection for HostTree {
    fn kind(&self, id: HostId) -> HostKind {
        self.node(id).spec.kind
    }

    fn simple_name(&self, id: HostId) -> &str {
        &self.node(id).spec.name
    }

    fn qualified_name(&self, id: HostId) -> Option<&str> {
        self.node(id).qualified_name.as_deref()
    }

    fn modifiers(&self, id: HostId) -> Modifiers {
        self.node(id).spec.modifiers
    }

    fn origin(&self, id: HostId) -> HostOrigin {
        self.node(id).spec.origin
    }

    fn enclosing(&self, id: HostId) -> Option<HostId> {
        self.node(id).enclosing
    }

    fn enclosed(&self, id: HostId) -> &[HostId] {
        &self.node(id).enclosed
    }

    fn parameters(&self, id: HostId) -> &[HostId] {
        &self.node(id).parameters
    }

    fn type_parameters(&self, id: HostId) -> &[HostId] {
        &self.node(id).type_parameters
    }

    fn return_type(&self, id: HostId) -> Option<&HostType> {
        self.node(id).spec.return_type.as_ref()
    }

    fn declared_type(&self, id: HostId) -> Option<&HostType> {
        self.node(id).spec.declared_type.as_ref()
    }

    fn superclass(&self, id: HostId) -> Option<&HostType> {
        self.node(id).spec.superclass.as_ref()
    }

    fn interfaces(&self, id: HostId) -> &[HostType] {
        &self.node(id).spec.interfaces
    }

    fn bounds(&self, id: HostId) -> &[HostType] {
        &self.node(id).spec.bounds
    }

    fn annotations(&self, id: HostId) -> &[Annotation] {
        &self.node(id).spec.annotations
    }

    fn metadata(&self, id: HostId) -> Option<&MetadataBlob> {
        self.node(id).spec.metadata.as_ref()
    }
}
