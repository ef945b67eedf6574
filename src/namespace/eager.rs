//! Eager initialization — load everything up front.

use rayon::prelude::*;
use smol_str::SmolStr;
use tracing::warn;

use super::lazy::SymbolTable;
use crate::loader::{LoadError, ModuleLoader};
use crate::registry::DescriptorRegistry;

/// Loads every registry module immediately and flattens their symbols
/// into one table.
///
/// Loads run in parallel; the merge into the table is sequential in
/// registry order, first-writer-wins: when two modules provide the same
/// symbol, the module earlier in the registry keeps the slot. There is no
/// candidate fallback — a module that fails to load simply contributes
/// nothing, and the failure is reported alongside the table.
pub struct EagerLoader<'a> {
    loader: &'a dyn ModuleLoader,
}

impl<'a> EagerLoader<'a> {
    /// Create an eager loader over a load collaborator.
    pub fn new(loader: &'a dyn ModuleLoader) -> Self {
        Self { loader }
    }

    /// Load the whole registry and produce the flat symbol table.
    pub fn load_registry(&self, registry: &DescriptorRegistry) -> (SymbolTable, Vec<LoadError>) {
        let names: Vec<&SmolStr> = registry.module_names().collect();

        // Parallel loads; collect preserves registry order for the merge.
        let results: Vec<_> = names
            .par_iter()
            .map(|name| self.loader.load(name))
            .collect();

        let mut table = SymbolTable::default();
        let mut failures = Vec::new();

        for result in results {
            match result {
                Ok(handle) => {
                    for (symbol, value) in handle.symbols() {
                        table.entry(symbol.clone()).or_insert_with(|| value.clone());
                    }
                }
                Err(err) => {
                    warn!(module = %err.module(), error = %err, "eager load failed; symbols absent");
                    failures.push(err);
                }
            }
        }

        (table, failures)
    }
}
