//! Element model for compiled units carrying compact metadata.
//!
//! The host compiler's reflection view erases much of what the source
//! language declared: properties become fields plus accessor methods,
//! internal members get mangled names, nullability and variance are lost.
//! Each compiled unit carries a metadata blob recording those facts. This
//! crate reconciles the two views into one element graph:
//!
//! - [`matching`]: pairs host members with descriptor declarations
//! - [`origin`]: tags each node with where it came from
//! - [`Element`]: identity-stable nodes with capability views
//! - [`Round`]: owns the caches for one processing round and resolves
//!   nodes and enclosed sets lazily
//!
//! # Tracing
//!
//! Set `RUST_LOG=meld_model=debug` (or `trace`) and call [`init_tracing`]
//! to see unit decoding, member matching and failures.

pub mod capability;
mod config;
mod element;
mod error;
pub mod matching;
pub mod origin;
mod round;

pub use config::{RoundConfig, SyntheticClassPattern};
pub use element::{
    Accessor, ClassElement, DescriptorSlot, Element, ElementKey, ElementKind, ElementTag,
    FunctionElement, FunctionFlags, ModuleElement, Nesting, PackageElement, Parameter,
    PropertyElement, PropertyFlags, TypeParameterElement, TypeParameterScope,
};
pub use error::{ErrorCategory, ModelError, UnitFailure};
pub use origin::{DescriptorOrigin, Origin};
pub use round::Round;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times; only the first call has an effect, and
/// only when `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
