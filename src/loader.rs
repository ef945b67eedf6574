//! The backing-module load seam.
//!
//! Loading a native module is an opaque, possibly failing operation owned
//! by a collaborator; this crate only sees the [`ModuleLoader`] trait and
//! the [`ModuleHandle`] a successful load produces. Symbol values are
//! likewise opaque — shared [`SymbolValue`] handles the caller downcasts
//! on their side of the boundary.

use std::any::Any;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

/// An opaque resolved symbol, shared between the cache and callers.
pub type SymbolValue = Arc<dyn Any + Send + Sync>;

/// A loaded backing module: its name and every symbol it provides.
#[derive(Clone, Default)]
pub struct ModuleHandle {
    name: SmolStr,
    symbols: FxHashMap<SmolStr, SymbolValue>,
}

impl std::fmt::Debug for ModuleHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleHandle")
            .field("name", &self.name)
            .field("symbols", &self.symbols.len())
            .finish()
    }
}

impl ModuleHandle {
    /// Create an empty handle for a module.
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            symbols: FxHashMap::default(),
        }
    }

    /// The module's name.
    pub fn name(&self) -> &SmolStr {
        &self.name
    }

    /// Add a provided symbol.
    pub fn insert(&mut self, symbol: impl Into<SmolStr>, value: SymbolValue) {
        self.symbols.insert(symbol.into(), value);
    }

    /// Builder-style: add a provided symbol.
    pub fn with_symbol(mut self, symbol: impl Into<SmolStr>, value: SymbolValue) -> Self {
        self.insert(symbol, value);
        self
    }

    /// Get a provided symbol's value.
    pub fn get(&self, symbol: &str) -> Option<&SymbolValue> {
        self.symbols.get(symbol)
    }

    /// Check whether the module provides a symbol.
    pub fn provides(&self, symbol: &str) -> bool {
        self.symbols.contains_key(symbol)
    }

    /// Iterate over (symbol, value) pairs.
    pub fn symbols(&self) -> impl Iterator<Item = (&SmolStr, &SymbolValue)> {
        self.symbols.iter()
    }

    /// Number of provided symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Check if the module provides no symbols.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Failure to load a backing module.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LoadError {
    /// The loader knows no module by this name.
    #[error("backing module '{module}' not found")]
    NotFound { module: SmolStr },
    /// The module exists but could not be brought up.
    #[error("backing module '{module}' failed to load: {reason}")]
    Failed { module: SmolStr, reason: SmolStr },
}

impl LoadError {
    /// The module the load was attempted for.
    pub fn module(&self) -> &SmolStr {
        match self {
            LoadError::NotFound { module } => module,
            LoadError::Failed { module, .. } => module,
        }
    }
}

/// The load collaborator.
///
/// Implementations own the actual transport (dynamic linking, embedded
/// tables, test stubs). Loads may be expensive and may have global side
/// effects; the namespace guarantees it calls `load` at most once per
/// module for concurrent first accesses.
pub trait ModuleLoader: Send + Sync {
    /// Load a backing module by name.
    fn load(&self, module: &str) -> Result<Arc<ModuleHandle>, LoadError>;
}
