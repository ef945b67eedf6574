//! Initialization orchestration and the canonical publication registry.

mod canonical;
mod initializer;

pub use canonical::CanonicalNamespaces;
pub use initializer::{ExtraSymbols, InitOptions, NamespaceInitializer};
