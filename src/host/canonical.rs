//! The process-wide canonical namespace registry.
//!
//! Publication target for finished namespaces: other code looks a package
//! up here by its well-known name and always gets the same object,
//! whether it asked before or after initialization finished. Kept as an
//! explicit singleton with an `install` operation rather than ad hoc
//! global mutation.

use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::namespace::Namespace;

static GLOBAL: LazyLock<CanonicalNamespaces> = LazyLock::new(CanonicalNamespaces::new);

/// Process-wide map from canonical package name to its namespace.
pub struct CanonicalNamespaces {
    inner: RwLock<FxHashMap<SmolStr, Arc<Namespace>>>,
}

impl CanonicalNamespaces {
    fn new() -> Self {
        Self {
            inner: RwLock::new(FxHashMap::default()),
        }
    }

    /// The process-wide registry.
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Install a namespace under its canonical name.
    ///
    /// Called exactly once per initialization or reload, as the final
    /// step; replaces whatever placeholder was present. Returns the
    /// replaced entry, if any.
    pub fn install(&self, name: impl Into<SmolStr>, namespace: Arc<Namespace>) -> Option<Arc<Namespace>> {
        self.inner.write().insert(name.into(), namespace)
    }

    /// Look up the namespace installed under a canonical name.
    pub fn get(&self, name: &str) -> Option<Arc<Namespace>> {
        self.inner.read().get(name).cloned()
    }

    /// Check whether a name has a namespace installed.
    pub fn contains(&self, name: &str) -> bool {
        self.inner.read().contains_key(name)
    }
}
