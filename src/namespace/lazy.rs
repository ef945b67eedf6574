//! The lazy namespace object.
//!
//! A [`Namespace`] owns a symbol index and resolves names on demand:
//! candidates are tried in index order, backing modules are loaded at most
//! once, and every symbol a loaded module provides enters the cache so the
//! module is never re-walked for its other symbols. The same type also
//! serves eagerly-populated namespaces (prefilled cache, empty index) and
//! the per-module sub-namespaces attached to the root.
//!
//! # Locking
//!
//! All mutable state sits behind one `RwLock`: cache hits take the read
//! lock only; a miss upgrades to the write lock, re-checks the cache, and
//! performs any loads while holding it. Holding the write lock across the
//! candidate walk is what makes a real load happen at most once under
//! concurrent first access. Rebinding replaces the whole state in a single
//! write-lock critical section, so readers never observe a half-cleared
//! namespace.

use indexmap::IndexMap;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use std::sync::Arc;
use tracing::{debug, trace};

use super::error::{AttemptFailure, CandidateAttempt, SymbolNotFound};
use crate::base::ModuleId;
use crate::loader::{ModuleHandle, ModuleLoader, SymbolValue};
use crate::registry::SymbolIndex;

/// A flat symbol table, as produced by eager loading.
pub type SymbolTable = FxHashMap<SmolStr, SymbolValue>;

// ============================================================================
// STATE
// ============================================================================

struct NamespaceState {
    index: SymbolIndex,
    cache: SymbolTable,
    imported: FxHashMap<ModuleId, Arc<ModuleHandle>>,
}

impl NamespaceState {
    fn lazy(index: SymbolIndex) -> Self {
        Self {
            index,
            cache: SymbolTable::default(),
            imported: FxHashMap::default(),
        }
    }

    fn eager(table: SymbolTable) -> Self {
        Self {
            index: SymbolIndex::empty(),
            cache: table,
            imported: FxHashMap::default(),
        }
    }
}

// ============================================================================
// NAMESPACE
// ============================================================================

/// A namespace resolving symbols against backing modules.
///
/// Shared via `Arc`; reload refreshes the object in place, so holders of
/// a reference obtained before a reload observe the refreshed state.
pub struct Namespace {
    name: SmolStr,
    version: RwLock<SmolStr>,
    loader: Arc<dyn ModuleLoader>,
    state: RwLock<NamespaceState>,
    submodules: RwLock<IndexMap<SmolStr, Arc<Namespace>>>,
}

impl std::fmt::Debug for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("Namespace")
            .field("name", &self.name)
            .field("symbols", &state.index.len())
            .field("cached", &state.cache.len())
            .field("imported", &state.imported.len())
            .finish()
    }
}

impl Namespace {
    /// Create a lazy namespace over an index.
    pub fn lazy(name: impl Into<SmolStr>, index: SymbolIndex, loader: Arc<dyn ModuleLoader>) -> Self {
        Self {
            name: name.into(),
            version: RwLock::new(SmolStr::default()),
            loader,
            state: RwLock::new(NamespaceState::lazy(index)),
            submodules: RwLock::new(IndexMap::new()),
        }
    }

    /// Create an eagerly-populated namespace from a prefilled table.
    ///
    /// The index is empty, so resolution never attempts a load: a name is
    /// either in the table or unknown.
    pub fn eager(name: impl Into<SmolStr>, table: SymbolTable, loader: Arc<dyn ModuleLoader>) -> Self {
        Self {
            name: name.into(),
            version: RwLock::new(SmolStr::default()),
            loader,
            state: RwLock::new(NamespaceState::eager(table)),
            submodules: RwLock::new(IndexMap::new()),
        }
    }

    /// The namespace's name.
    pub fn name(&self) -> &SmolStr {
        &self.name
    }

    /// The package version stamped at initialization (empty if unset).
    pub fn version(&self) -> SmolStr {
        self.version.read().clone()
    }

    pub(crate) fn set_version(&self, version: impl Into<SmolStr>) {
        *self.version.write() = version.into();
    }

    // ------------------------------------------------------------------------
    // Resolution
    // ------------------------------------------------------------------------

    /// Resolve a symbol by name.
    ///
    /// Cache hits return immediately. Otherwise candidates are tried in
    /// index order: a candidate whose load fails, or which turns out not
    /// to provide the symbol, is skipped; the first working candidate's
    /// value is cached and returned. Fails with [`SymbolNotFound`]
    /// carrying the attempted candidates and their failure reasons.
    pub fn resolve(&self, symbol: &str) -> Result<SymbolValue, SymbolNotFound> {
        // Fast path: already resolved.
        {
            let state = self.state.read();
            if let Some(value) = state.cache.get(symbol) {
                return Ok(value.clone());
            }
            if !state.index.contains(symbol) {
                return Err(SymbolNotFound::unknown(symbol));
            }
        }

        let mut state = self.state.write();

        // Another caller may have resolved the symbol while we waited.
        if let Some(value) = state.cache.get(symbol) {
            return Ok(value.clone());
        }

        let candidates: Vec<ModuleId> = state.index.candidates(symbol).to_vec();
        let mut attempts = Vec::with_capacity(candidates.len());

        for id in candidates {
            let module = state.index.module_name(id).clone();

            if !state.imported.contains_key(&id) {
                trace!(module = %module, symbol, "loading backing module");
                match self.loader.load(&module) {
                    Ok(handle) => {
                        // Cache every symbol the module provides, not just
                        // the requested one; first writer keeps the slot.
                        for (name, value) in handle.symbols() {
                            state
                                .cache
                                .entry(name.clone())
                                .or_insert_with(|| value.clone());
                        }
                        state.imported.insert(id, handle);
                    }
                    Err(err) => {
                        debug!(module = %module, symbol, error = %err, "candidate load failed");
                        attempts.push(CandidateAttempt {
                            module,
                            failure: err.into(),
                        });
                        continue;
                    }
                }
            }

            // An imported module's symbols are all in the cache, so a miss
            // here means this candidate does not provide the symbol.
            if let Some(value) = state.cache.get(symbol) {
                return Ok(value.clone());
            }
            attempts.push(CandidateAttempt {
                module,
                failure: AttemptFailure::Missing,
            });
        }

        if attempts.is_empty() {
            // The index entry disappeared between the read and write locks
            // (a concurrent rebind); report it as unknown.
            return Err(SymbolNotFound::unknown(symbol));
        }
        debug!(symbol, attempts = attempts.len(), "symbol resolution exhausted all candidates");
        Err(SymbolNotFound::exhausted(symbol, attempts))
    }

    /// Place a pre-resolved symbol directly in the cache.
    ///
    /// Used for the always-eager extras and for eager population;
    /// overwrites any cached value of the same name.
    pub fn insert_eager(&self, symbol: impl Into<SmolStr>, value: SymbolValue) {
        self.state.write().cache.insert(symbol.into(), value);
    }

    /// Get a symbol's cached value without triggering any load.
    pub fn cached(&self, symbol: &str) -> Option<SymbolValue> {
        self.state.read().cache.get(symbol).cloned()
    }

    // ------------------------------------------------------------------------
    // Reload
    // ------------------------------------------------------------------------

    /// Re-initialize in place with a new index.
    ///
    /// Clears the cache and the imported-module set together with the
    /// index swap; the whole replacement is one write-lock critical
    /// section, so concurrent readers see either the old state or the new
    /// one, never a mixture.
    pub fn rebind(&self, index: SymbolIndex) {
        let mut state = self.state.write();
        *state = NamespaceState::lazy(index);
    }

    /// Re-initialize in place with an eagerly-populated table.
    pub fn rebind_eager(&self, table: SymbolTable) {
        let mut state = self.state.write();
        *state = NamespaceState::eager(table);
    }

    // ------------------------------------------------------------------------
    // Submodules
    // ------------------------------------------------------------------------

    /// The per-module sub-namespace attached under a module's name.
    pub fn submodule(&self, module: &str) -> Option<Arc<Namespace>> {
        self.submodules.read().get(module).cloned()
    }

    /// Names of the attached sub-namespaces, in registry order.
    pub fn submodule_names(&self) -> Vec<SmolStr> {
        self.submodules.read().keys().cloned().collect()
    }

    pub(crate) fn set_submodules(&self, submodules: IndexMap<SmolStr, Arc<Namespace>>) {
        *self.submodules.write() = submodules;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::LoadError;
    use crate::registry::{DescriptorRegistry, ModuleDescriptor, TemplateEntry};
    use parking_lot::Mutex;

    /// Loader stub serving prebuilt handles; unknown modules fail to load.
    struct StubLoader {
        handles: FxHashMap<SmolStr, Arc<ModuleHandle>>,
        calls: Mutex<Vec<SmolStr>>,
    }

    impl StubLoader {
        fn new(handles: Vec<ModuleHandle>) -> Arc<Self> {
            Arc::new(Self {
                handles: handles
                    .into_iter()
                    .map(|h| (h.name().clone(), Arc::new(h)))
                    .collect(),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<SmolStr> {
            self.calls.lock().clone()
        }
    }

    impl ModuleLoader for StubLoader {
        fn load(&self, module: &str) -> Result<Arc<ModuleHandle>, LoadError> {
            self.calls.lock().push(module.into());
            self.handles
                .get(module)
                .cloned()
                .ok_or_else(|| LoadError::NotFound { module: module.into() })
        }
    }

    fn value(n: u32) -> SymbolValue {
        Arc::new(n) as SymbolValue
    }

    fn as_u32(v: &SymbolValue) -> u32 {
        *v.downcast_ref::<u32>().expect("test values are u32")
    }

    fn index_of(entries: &[(&str, ModuleDescriptor)]) -> SymbolIndex {
        let mut registry = DescriptorRegistry::new();
        for (name, descriptor) in entries {
            registry.insert(*name, descriptor.clone());
        }
        SymbolIndex::build(&registry)
    }

    #[test]
    fn test_resolve_caches_and_loads_once() {
        let loader = StubLoader::new(vec![
            ModuleHandle::new("ModA").with_symbol("Foo", value(1)),
        ]);
        let index = index_of(&[(
            "ModA",
            ModuleDescriptor::new().with_template(TemplateEntry::new("Foo")),
        )]);
        let ns = Namespace::lazy("pkg", index, loader.clone());

        assert_eq!(as_u32(&ns.resolve("Foo").unwrap()), 1);
        assert_eq!(as_u32(&ns.resolve("Foo").unwrap()), 1);
        assert_eq!(loader.calls().len(), 1);
    }

    #[test]
    fn test_load_failure_falls_through_to_next_candidate() {
        // "Broken" is indexed but the loader has no handle for it.
        let loader = StubLoader::new(vec![
            ModuleHandle::new("Backup").with_symbol("Foo", value(7)),
        ]);
        let index = index_of(&[
            ("Broken", ModuleDescriptor::new().with_template(TemplateEntry::library("Foo"))),
            ("Backup", ModuleDescriptor::new().with_template(TemplateEntry::new("Foo"))),
        ]);
        let ns = Namespace::lazy("pkg", index, loader.clone());

        assert_eq!(as_u32(&ns.resolve("Foo").unwrap()), 7);
        assert_eq!(loader.calls(), ["Broken", "Backup"]);
    }

    #[test]
    fn test_module_without_symbol_is_skipped() {
        // ModA's descriptor claims Foo but the loaded handle lacks it.
        let loader = StubLoader::new(vec![
            ModuleHandle::new("ModA").with_symbol("Other", value(0)),
            ModuleHandle::new("ModB").with_symbol("Foo", value(2)),
        ]);
        let index = index_of(&[
            ("ModA", ModuleDescriptor::new().with_template(TemplateEntry::new("Foo"))),
            ("ModB", ModuleDescriptor::new().with_template(TemplateEntry::new("Foo"))),
        ]);
        let ns = Namespace::lazy("pkg", index, loader.clone());

        assert_eq!(as_u32(&ns.resolve("Foo").unwrap()), 2);
    }

    #[test]
    fn test_unknown_symbol_loads_nothing() {
        let loader = StubLoader::new(vec![
            ModuleHandle::new("ModA").with_symbol("Foo", value(1)),
        ]);
        let index = index_of(&[(
            "ModA",
            ModuleDescriptor::new().with_template(TemplateEntry::new("Foo")),
        )]);
        let ns = Namespace::lazy("pkg", index, loader.clone());

        let err = ns.resolve("Bar").unwrap_err();
        assert!(err.attempts().is_empty());
        assert!(loader.calls().is_empty());
    }

    #[test]
    fn test_exhausted_reports_each_candidate() {
        let loader = StubLoader::new(vec![
            ModuleHandle::new("ModB").with_symbol("Other", value(0)),
        ]);
        let index = index_of(&[
            ("ModA", ModuleDescriptor::new().with_template(TemplateEntry::new("Foo"))),
            ("ModB", ModuleDescriptor::new().with_template(TemplateEntry::new("Foo"))),
        ]);
        let ns = Namespace::lazy("pkg", index, loader);

        let err = ns.resolve("Foo").unwrap_err();
        assert_eq!(err.attempts().len(), 2);
        assert!(matches!(err.attempts()[0].failure, AttemptFailure::Load(_)));
        assert!(matches!(err.attempts()[1].failure, AttemptFailure::Missing));
    }

    #[test]
    fn test_whole_module_enters_cache() {
        let loader = StubLoader::new(vec![
            ModuleHandle::new("ModA")
                .with_symbol("Foo", value(1))
                .with_symbol("Bar", value(2)),
        ]);
        let index = index_of(&[(
            "ModA",
            ModuleDescriptor::new()
                .with_template(TemplateEntry::new("Foo"))
                .with_template(TemplateEntry::new("Bar")),
        )]);
        let ns = Namespace::lazy("pkg", index, loader.clone());

        ns.resolve("Foo").unwrap();
        assert!(ns.cached("Bar").is_some());
        assert_eq!(as_u32(&ns.resolve("Bar").unwrap()), 2);
        assert_eq!(loader.calls().len(), 1);
    }

    #[test]
    fn test_rebind_clears_cache_and_imports() {
        let loader = StubLoader::new(vec![
            ModuleHandle::new("ModA").with_symbol("Foo", value(1)),
        ]);
        let index = index_of(&[(
            "ModA",
            ModuleDescriptor::new().with_template(TemplateEntry::new("Foo")),
        )]);
        let ns = Namespace::lazy("pkg", index, loader);

        ns.resolve("Foo").unwrap();

        // New registry no longer declares Foo.
        ns.rebind(index_of(&[("ModA", ModuleDescriptor::new())]));

        let err = ns.resolve("Foo").unwrap_err();
        assert!(err.attempts().is_empty());
        assert!(ns.cached("Foo").is_none());
    }

    #[test]
    fn test_insert_eager_bypasses_index() {
        let loader = StubLoader::new(vec![]);
        let ns = Namespace::lazy("pkg", SymbolIndex::empty(), loader.clone());

        ns.insert_eager("helper", value(9));
        assert_eq!(as_u32(&ns.resolve("helper").unwrap()), 9);
        assert!(loader.calls().is_empty());
    }

    #[test]
    fn test_eager_namespace_never_loads() {
        let loader = StubLoader::new(vec![
            ModuleHandle::new("ModA").with_symbol("Foo", value(1)),
        ]);
        let mut table = SymbolTable::default();
        table.insert("Foo".into(), value(5));
        let ns = Namespace::eager("pkg", table, loader.clone());

        assert_eq!(as_u32(&ns.resolve("Foo").unwrap()), 5);
        assert!(ns.resolve("Bar").unwrap_err().attempts().is_empty());
        assert!(loader.calls().is_empty());
    }
}
