//! Declarative descriptors for backing modules.
//!
//! A descriptor lists the symbols a backing module can provide without
//! loading it. Descriptors are produced externally (typically generated
//! alongside the modules themselves) and handed to this crate as an
//! ordered registry; registry order is the priority tie-break everywhere
//! downstream, so it is preserved exactly as given.

use indexmap::IndexMap;
use smol_str::SmolStr;

/// One symbol declared by a backing module.
///
/// Source records are variable-arity: only the symbol name (first field)
/// and the library-member flag (fourth field) carry meaning, and the flag
/// may be absent. Records missing the flag default to `in_library = false`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemplateEntry {
    /// The symbol this entry declares.
    pub symbol: SmolStr,
    /// Whether the symbol ships in the core library binary.
    ///
    /// Library members are preferred over non-member providers of the
    /// same name, so they are front-inserted during index construction.
    pub in_library: bool,
}

impl TemplateEntry {
    /// Create a non-library entry (the default for records without a flag).
    pub fn new(symbol: impl Into<SmolStr>) -> Self {
        Self {
            symbol: symbol.into(),
            in_library: false,
        }
    }

    /// Create a library-member entry.
    pub fn library(symbol: impl Into<SmolStr>) -> Self {
        Self {
            symbol: symbol.into(),
            in_library: true,
        }
    }
}

/// Everything a backing module declares about itself.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModuleDescriptor {
    /// Template instantiation entries, in declaration order.
    pub templates: Vec<TemplateEntry>,
    /// Snake-case function names, in declaration order.
    ///
    /// These never carry a library-member flag; they are always appended
    /// to the candidate list.
    pub snake_case_functions: Vec<SmolStr>,
}

impl ModuleDescriptor {
    /// Create an empty descriptor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a template entry.
    pub fn push_template(&mut self, entry: TemplateEntry) {
        self.templates.push(entry);
    }

    /// Append a snake-case function name.
    pub fn push_function(&mut self, name: impl Into<SmolStr>) {
        self.snake_case_functions.push(name.into());
    }

    /// Builder-style: add a template entry.
    pub fn with_template(mut self, entry: TemplateEntry) -> Self {
        self.templates.push(entry);
        self
    }

    /// Builder-style: add a snake-case function name.
    pub fn with_function(mut self, name: impl Into<SmolStr>) -> Self {
        self.snake_case_functions.push(name.into());
        self
    }

    /// Iterate over every symbol name this descriptor declares,
    /// templates first, in declaration order.
    pub fn declared_symbols(&self) -> impl Iterator<Item = &SmolStr> {
        self.templates
            .iter()
            .map(|t| &t.symbol)
            .chain(self.snake_case_functions.iter())
    }
}

/// The ordered collection of module descriptors for one package.
///
/// Iteration order is insertion order and is significant: index
/// construction and eager loading both walk the registry in this order.
#[derive(Clone, Debug, Default)]
pub struct DescriptorRegistry {
    modules: IndexMap<SmolStr, ModuleDescriptor>,
}

impl DescriptorRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a module's descriptor. Re-inserting an existing module
    /// replaces its descriptor but keeps its original position.
    pub fn insert(&mut self, module: impl Into<SmolStr>, descriptor: ModuleDescriptor) {
        self.modules.insert(module.into(), descriptor);
    }

    /// Get the descriptor for a module.
    pub fn get(&self, module: &str) -> Option<&ModuleDescriptor> {
        self.modules.get(module)
    }

    /// Check if a module is registered.
    pub fn contains(&self, module: &str) -> bool {
        self.modules.contains_key(module)
    }

    /// Iterate over (module name, descriptor) pairs in registry order.
    pub fn iter(&self) -> impl Iterator<Item = (&SmolStr, &ModuleDescriptor)> {
        self.modules.iter()
    }

    /// Iterate over module names in registry order.
    pub fn module_names(&self) -> impl Iterator<Item = &SmolStr> {
        self.modules.keys()
    }

    /// Get the number of registered modules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
