//! Host reflection interface.
//!
//! The host compiler exposes a lowest-common-denominator view of compiled
//! program structure: classes, methods, fields, parameters and type
//! parameters with erased generics and coarse modifiers. This crate defines
//! the shape of that view as consumed by the element model:
//!
//! - [`HostId`]: opaque, copyable handle to one host construct
//! - [`HostKind`], [`Modifiers`], [`HostOrigin`]: per-construct tags
//! - [`HostType`]: raw type references
//! - [`MetadataBlob`]: the compact metadata annotation attached to a unit
//! - [`HostReflection`]: the navigation trait
//!
//! [`HostTree`] is an arena-backed implementation used by drivers that
//! already hold the host view in memory, and by tests.

mod blob;
mod id;
mod kind;
mod reflection;
mod tree;
mod types;

pub use blob::MetadataBlob;
pub use id::HostId;
pub use kind::{HostKind, HostOrigin, Modifiers};
pub use reflection::HostReflection;
pub use tree::{ConstructSpec, HostTree};
pub use types::{Annotation, HostType, PrimitiveKind};
