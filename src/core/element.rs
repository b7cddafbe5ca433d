//! Element-type registry interface.
//!
//! Component registration carries custom methods for native element types
//! (`{ "type": "video", "methods": ["play", "pause"] }`). Those are handed to
//! an [`ElementRegistry`] owned by the host before registration fans out to
//! the frameworks.

use std::collections::BTreeMap;
use std::sync::RwLock;

use serde_json::Value;

/// Host-side registry of element types and their callable methods.
pub trait ElementRegistry: Send + Sync {
    /// Register `methods` as callable on elements of `type_name`.
    fn register_element(&self, type_name: &str, methods: &[String]);
}

/// In-memory element registry.
///
/// Repeated registrations for a type accumulate methods without duplicates.
#[derive(Debug, Default)]
pub struct ElementTypeRegistry {
    types: RwLock<BTreeMap<String, Vec<String>>>,
}

impl ElementTypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Methods registered for an element type.
    pub fn methods(&self, type_name: &str) -> Option<Vec<String>> {
        let types = self.types.read().unwrap_or_else(|e| e.into_inner());
        types.get(type_name).cloned()
    }

    /// All registered element type names, sorted.
    pub fn types(&self) -> Vec<String> {
        let types = self.types.read().unwrap_or_else(|e| e.into_inner());
        types.keys().cloned().collect()
    }

    /// Number of registered element types.
    pub fn len(&self) -> usize {
        self.types.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Check if no element type is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ElementRegistry for ElementTypeRegistry {
    fn register_element(&self, type_name: &str, methods: &[String]) {
        let mut types = self.types.write().unwrap_or_else(|e| e.into_inner());
        let known = types.entry(type_name.to_string()).or_default();
        for method in methods {
            if !known.contains(method) {
                known.push(method.clone());
            }
        }
    }
}

/// Extract `(type, methods)` pairs from a component registration argument.
///
/// Only objects carrying a non-empty string `type` and an array `methods`
/// qualify; non-string method names are dropped. Anything else is ignored.
pub fn component_methods(components: &Value) -> Vec<(String, Vec<String>)> {
    let Some(components) = components.as_array() else {
        return Vec::new();
    };

    components
        .iter()
        .filter_map(|component| {
            let type_name = component.get("type")?.as_str()?;
            let methods = component.get("methods")?.as_array()?;
            if type_name.is_empty() {
                return None;
            }
            let methods = methods
                .iter()
                .filter_map(|m| m.as_str().map(str::to_string))
                .collect();
            Some((type_name.to_string(), methods))
        })
        .collect()
}
