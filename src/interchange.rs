//! JSON interchange for externally produced descriptor registries.
//!
//! The registry arrives in its raw generated form: an ordered object of
//! module name → descriptor, where each template record is a
//! variable-arity positional array. Only the first field (symbol name)
//! and the optional fourth field (library-member flag) are meaningful;
//! everything else is generation metadata and is ignored. Records missing
//! the flag default to non-library.

use indexmap::IndexMap;
use serde::de::{self, IgnoredAny, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;

use crate::registry::{DescriptorRegistry, ModuleDescriptor, TemplateEntry};

impl<'de> Deserialize<'de> for TemplateEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntryVisitor;

        impl<'de> Visitor<'de> for EntryVisitor {
            type Value = TemplateEntry;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a template record: [symbol, ..., in_library?]")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<TemplateEntry, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let symbol: String = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;

                // Fields two and three are ignored; the fourth, if
                // present, is the library-member flag.
                let mut in_library = false;
                if seq.next_element::<IgnoredAny>()?.is_some()
                    && seq.next_element::<IgnoredAny>()?.is_some()
                {
                    if let Some(flag) = seq.next_element::<bool>()? {
                        in_library = flag;
                        // Tolerate trailing fields.
                        while seq.next_element::<IgnoredAny>()?.is_some() {}
                    }
                }

                Ok(TemplateEntry {
                    symbol: symbol.into(),
                    in_library,
                })
            }
        }

        deserializer.deserialize_seq(EntryVisitor)
    }
}

#[derive(Deserialize)]
struct RawDescriptor {
    #[serde(default)]
    templates: Vec<TemplateEntry>,
    #[serde(default)]
    snake_case_functions: Vec<String>,
}

impl From<RawDescriptor> for ModuleDescriptor {
    fn from(raw: RawDescriptor) -> Self {
        let mut descriptor = ModuleDescriptor::new();
        descriptor.templates = raw.templates;
        descriptor.snake_case_functions = raw
            .snake_case_functions
            .into_iter()
            .map(Into::into)
            .collect();
        descriptor
    }
}

/// Parse a descriptor registry from its JSON form.
///
/// Module order in the document becomes registry order.
pub fn registry_from_json(json: &str) -> Result<DescriptorRegistry, serde_json::Error> {
    let raw: IndexMap<String, RawDescriptor> = serde_json::from_str(json)?;
    let mut registry = DescriptorRegistry::new();
    for (module, descriptor) in raw {
        registry.insert(module, descriptor.into());
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SymbolIndex;

    #[test]
    fn test_variable_arity_records() {
        let registry = registry_from_json(
            r#"{
                "ModA": {
                    "templates": [
                        ["Short"],
                        ["Partial", "meta"],
                        ["NonMember", "meta", "meta2", false],
                        ["Member", "meta", "meta2", true],
                        ["Trailing", "meta", "meta2", true, "ignored"]
                    ]
                }
            }"#,
        )
        .unwrap();

        let descriptor = registry.get("ModA").unwrap();
        let flags: Vec<_> = descriptor
            .templates
            .iter()
            .map(|t| (t.symbol.as_str(), t.in_library))
            .collect();
        assert_eq!(
            flags,
            [
                ("Short", false),
                ("Partial", false),
                ("NonMember", false),
                ("Member", true),
                ("Trailing", true),
            ]
        );
    }

    #[test]
    fn test_document_order_becomes_registry_order() {
        let registry = registry_from_json(
            r#"{
                "Zeta": {"templates": [["Foo"]]},
                "Alpha": {"snake_case_functions": ["foo_fn"]},
                "Mid": {}
            }"#,
        )
        .unwrap();

        let names: Vec<_> = registry.module_names().map(|n| n.as_str()).collect();
        assert_eq!(names, ["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn test_unknown_descriptor_keys_tolerated() {
        let registry = registry_from_json(
            r#"{"ModA": {"templates": [["Foo"]], "generator": "swig", "depends": ["ModB"]}}"#,
        )
        .unwrap();

        assert_eq!(registry.get("ModA").unwrap().templates.len(), 1);
    }

    #[test]
    fn test_parsed_registry_feeds_index() {
        let registry = registry_from_json(
            r#"{
                "ModA": {"templates": [["Foo", "m", "m", false]]},
                "ModB": {"templates": [["Foo", "m", "m", true]]}
            }"#,
        )
        .unwrap();

        let index = SymbolIndex::build(&registry);
        let candidates: Vec<_> = index.candidate_names("Foo").map(|n| n.as_str()).collect();
        assert_eq!(candidates, ["ModB", "ModA"]);
    }

    #[test]
    fn test_empty_record_is_an_error() {
        assert!(registry_from_json(r#"{"ModA": {"templates": [[]]}}"#).is_err());
    }

    #[test]
    fn test_non_string_symbol_is_an_error() {
        assert!(registry_from_json(r#"{"ModA": {"templates": [[42]]}}"#).is_err());
    }
}
