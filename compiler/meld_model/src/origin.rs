//! Origin classification.
//!
//! Every node records where it came from: straight from the host model,
//! from a unit's descriptor, or inferred by the model itself.

use meld_host::HostOrigin;

use crate::SyntheticClassPattern;

/// Provenance of a node whose owning unit carries a descriptor.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum DescriptorOrigin {
    /// Declared in source and present in the descriptor.
    Declared,
    /// Visible to the host but without a descriptor counterpart.
    Interop,
    /// Member of a compiler-generated container class.
    Synthetic,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Origin {
    /// The owning unit has no descriptor; the host's tag applies.
    Host(HostOrigin),
    Descriptor(DescriptorOrigin),
    /// Recognized by bean-property inference.
    Inferred,
}

/// What the classifier knows about the unit declaring a construct.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum SourceView {
    Host,
    Descriptor { synthetic_owner: bool },
}

pub fn classify(view: SourceView, host_origin: HostOrigin, has_counterpart: bool) -> Origin {
    match view {
        SourceView::Host => Origin::Host(host_origin),
        SourceView::Descriptor {
            synthetic_owner: true,
        } => Origin::Descriptor(DescriptorOrigin::Synthetic),
        SourceView::Descriptor { .. } if has_counterpart => {
            Origin::Descriptor(DescriptorOrigin::Declared)
        }
        SourceView::Descriptor { .. } => Origin::Descriptor(DescriptorOrigin::Interop),
    }
}

/// Whether a class is a compiler-generated container.
pub fn is_synthetic_class(
    patterns: &[SyntheticClassPattern],
    simple_name: &str,
    full_name: &str,
) -> bool {
    patterns
        .iter()
        .any(|pattern| pattern.matches(simple_name, full_name))
}
