//! Foundation types for the lazyns engine.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`ModuleId`] - Compact backing-module identifiers
//!
//! This module has NO dependencies on other lazyns modules.

mod module_id;

pub use module_id::ModuleId;
