//! One processing round.
//!
//! A [`Round`] owns every cache for one pass over a set of compiled units:
//! the identity cache from [`ElementKey`] to node, the alias index mapping
//! merged host constructs (accessors, backing fields, annotation holders)
//! to the node that absorbed them, and the failure log. Nothing outlives
//! the round; two rounds over the same input build distinct graphs.
//!
//! Nodes are built on first request. A node is inserted into the identity
//! cache before anything below it is resolved, and each composite node's
//! enclosed set is computed at most once.

mod build;
mod members;

use std::cell::RefCell;
use std::rc::Rc;

use meld_descriptor::MetadataDecoder;
use meld_host::{HostId, HostKind, HostReflection};
use rustc_hash::FxHashMap;

use crate::element::{Enclosed, EnclosedState};
use crate::{Element, ElementKey, ElementKind, ModelError, RoundConfig, UnitFailure};

/// Deepest host nesting walked when checking transitive enclosure.
const MAX_NESTING_DEPTH: usize = 1024;

pub struct Round<'a> {
    host: &'a dyn HostReflection,
    decoder: &'a dyn MetadataDecoder,
    config: RoundConfig,
    nodes: RefCell<FxHashMap<ElementKey, Rc<Element>>>,
    aliases: RefCell<FxHashMap<HostId, ElementKey>>,
    failures: RefCell<Vec<UnitFailure>>,
}

impl<'a> Round<'a> {
    pub fn new(
        host: &'a dyn HostReflection,
        decoder: &'a dyn MetadataDecoder,
        config: RoundConfig,
    ) -> Self {
        Round {
            host,
            decoder,
            config,
            nodes: RefCell::new(FxHashMap::default()),
            aliases: RefCell::new(FxHashMap::default()),
            failures: RefCell::new(Vec::new()),
        }
    }

    #[inline]
    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    #[inline]
    pub fn host(&self) -> &'a dyn HostReflection {
        self.host
    }

    /// Build the root node of each unit.
    ///
    /// A unit that fails is recorded in [`Self::failures`] and left out;
    /// the others are unaffected.
    #[tracing::instrument(level = "debug", skip_all, fields(units = units.len()))]
    pub fn build(&self, units: &[HostId]) -> Vec<Rc<Element>> {
        let mut roots = Vec::with_capacity(units.len());
        for &unit in units {
            match self.element(unit) {
                Ok(root) => roots.push(root),
                Err(error) => self.record_failure(unit, error),
            }
        }
        tracing::debug!(
            roots = roots.len(),
            failures = self.failures.borrow().len(),
            "round built"
        );
        roots
    }

    /// The node for a host construct.
    ///
    /// Members resolve through their enclosing node, so the same construct
    /// always yields the same node however it is reached.
    pub fn element(&self, id: HostId) -> Result<Rc<Element>, ModelError> {
        if let Some(node) = self.cached(id) {
            return Ok(node);
        }
        let kind = self.host.kind(id);
        match kind {
            HostKind::Module => Ok(self.module_node(id)),
            HostKind::Package => Ok(self.package_node(id)),
            HostKind::Class
            | HostKind::Interface
            | HostKind::Enum
            | HostKind::AnnotationType
            | HostKind::Record => self.class_node(id),
            HostKind::Method
            | HostKind::Constructor
            | HostKind::Field
            | HostKind::EnumConstant
            | HostKind::TypeParameter => {
                let parent = self
                    .host
                    .enclosing(id)
                    .ok_or(ModelError::UnsupportedConstruct { construct: id, kind })?;
                let parent = self.element(parent)?;
                self.lookup(&parent, id)
            }
            HostKind::StaticInit | HostKind::Parameter => {
                Err(ModelError::UnsupportedConstruct { construct: id, kind })
            }
        }
    }

    /// Child nodes of a class, package or module; empty for other nodes.
    pub fn enclosed_elements(&self, node: &Element) -> Result<Vec<Rc<Element>>, ModelError> {
        Ok(self.enclosed(node)?.elements.clone())
    }

    /// The node `parent` holds for `id`.
    ///
    /// `id` may be enclosed directly or through nested classes. Merged
    /// constructs resolve to the node that absorbed them.
    pub fn lookup(&self, parent: &Element, id: HostId) -> Result<Rc<Element>, ModelError> {
        if let Some(tp) = parent
            .as_type_parameters()
            .and_then(|owner| owner.type_parameter_for(id))
        {
            return Ok(Rc::clone(tp));
        }
        if parent.is_composite() {
            let enclosed = self.enclosed(parent)?;
            if let Some(&index) = enclosed.by_host.get(&id) {
                return Ok(Rc::clone(&enclosed.elements[index]));
            }
            if self.encloses_transitively(parent, id) {
                return self.element(id);
            }
        }
        Err(ModelError::UnknownEnclosedConstruct {
            parent: parent.key(),
            construct: id,
        })
    }

    /// The node enclosing `node`, found through the host tree.
    pub fn enclosing_element(&self, node: &Element) -> Result<Option<Rc<Element>>, ModelError> {
        let parent = match node.key() {
            ElementKey::Host(id) => self.host.enclosing(id),
            ElementKey::Descriptor { owner, .. } => Some(owner),
        };
        parent.map(|parent| self.element(parent)).transpose()
    }

    /// Units that failed so far, in failure order.
    pub fn failures(&self) -> Vec<UnitFailure> {
        self.failures.borrow().clone()
    }

    /// Number of distinct nodes built so far.
    pub fn node_count(&self) -> usize {
        self.nodes.borrow().len()
    }

    fn cached(&self, id: HostId) -> Option<Rc<Element>> {
        let nodes = self.nodes.borrow();
        if let Some(node) = nodes.get(&ElementKey::Host(id)) {
            return Some(Rc::clone(node));
        }
        let key = *self.aliases.borrow().get(&id)?;
        nodes.get(&key).cloned()
    }

    /// Insert `element` unless a node with its key exists; return the
    /// cached node either way.
    fn intern(&self, element: Element) -> Rc<Element> {
        let mut nodes = self.nodes.borrow_mut();
        Rc::clone(
            nodes
                .entry(element.key())
                .or_insert_with(|| Rc::new(element)),
        )
    }

    fn alias(&self, host: HostId, key: ElementKey) {
        if key != ElementKey::Host(host) {
            self.aliases.borrow_mut().entry(host).or_insert(key);
        }
    }

    fn record_failure(&self, unit: HostId, error: ModelError) {
        let mut failures = self.failures.borrow_mut();
        if failures.iter().any(|failure| failure.unit == unit) {
            return;
        }
        tracing::warn!(unit = %unit, %error, "unit failed");
        failures.push(UnitFailure { unit, error });
    }

    /// Keep unit-local failures out of the caller's way: record them and
    /// yield `None`. Misuse errors propagate.
    fn isolate(
        &self,
        unit: HostId,
        result: Result<Rc<Element>, ModelError>,
    ) -> Result<Option<Rc<Element>>, ModelError> {
        match result {
            Ok(node) => Ok(Some(node)),
            Err(error) if error.is_unit_local() => {
                self.record_failure(unit, error);
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }

    fn encloses_transitively(&self, parent: &Element, id: HostId) -> bool {
        let Some(parent) = parent.host() else {
            return false;
        };
        let direct = self.host.enclosing(id);
        // Direct children missing from the enclosed set are not elements.
        if direct == Some(parent) {
            return false;
        }
        let mut cursor = direct;
        for _ in 0..MAX_NESTING_DEPTH {
            match cursor {
                Some(ancestor) if ancestor == parent => return true,
                Some(ancestor) => cursor = self.host.enclosing(ancestor),
                None => return false,
            }
        }
        false
    }

    /// The memoized enclosed set of `node`, computing it on first use.
    fn enclosed(&self, node: &Element) -> Result<Rc<Enclosed>, ModelError> {
        match &*node.enclosed.borrow() {
            EnclosedState::Ready(enclosed) => return Ok(Rc::clone(enclosed)),
            EnclosedState::InProgress => {
                return Err(ModelError::ReentrantEnclosedAccess { node: node.key() })
            }
            EnclosedState::Pending => {}
        }
        if !node.is_composite() {
            return Ok(Rc::new(Enclosed::default()));
        }

        *node.enclosed.borrow_mut() = EnclosedState::InProgress;
        let result = match node.kind() {
            ElementKind::Class(class) => self.class_members(node, class),
            ElementKind::Package(_) => self.package_members(node),
            ElementKind::Module(_) => self.module_members(node),
            ElementKind::Function(_) | ElementKind::Property(_) | ElementKind::TypeParameter(_) => {
                Ok(Enclosed::default())
            }
        };
        match result {
            Ok(enclosed) => {
                let enclosed = Rc::new(enclosed);
                *node.enclosed.borrow_mut() = EnclosedState::Ready(Rc::clone(&enclosed));
                Ok(enclosed)
            }
            Err(error) => {
                *node.enclosed.borrow_mut() = EnclosedState::Pending;
                Err(error)
            }
        }
    }
}
