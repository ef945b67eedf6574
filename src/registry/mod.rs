//! Module descriptors and the symbol → candidate-modules index.

mod descriptor;
mod index;

pub use descriptor::{DescriptorRegistry, ModuleDescriptor, TemplateEntry};
pub use index::{IndexBuilder, SymbolIndex};
