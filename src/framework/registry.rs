//! Framework registry - the set of frameworks a runtime dispatches to.
//!
//! Registration order is preserved: broadcasts and initialization visit
//! frameworks in the order they were registered. Once a runtime starts, its
//! registry is frozen.

use std::collections::HashMap;

use crate::framework::trait_def::Framework;

/// Registry of available frameworks, keyed by name.
#[derive(Default)]
pub struct FrameworkRegistry {
    frameworks: Vec<Box<dyn Framework>>,
    index: HashMap<String, usize>,
}

impl FrameworkRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a framework.
    ///
    /// Re-registering a name replaces the earlier framework in place.
    pub fn register(&mut self, framework: Box<dyn Framework>) {
        let name = framework.name().to_string();
        match self.index.get(&name) {
            Some(&slot) => self.frameworks[slot] = framework,
            None => {
                self.index.insert(name, self.frameworks.len());
                self.frameworks.push(framework);
            }
        }
    }

    /// Builder-style registration.
    pub fn with(mut self, framework: Box<dyn Framework>) -> Self {
        self.register(framework);
        self
    }

    /// Get a framework by name.
    pub fn get(&self, name: &str) -> Option<&dyn Framework> {
        self.index
            .get(name)
            .map(|&slot| self.frameworks[slot].as_ref())
    }

    /// All frameworks in registration order.
    pub fn all(&self) -> impl Iterator<Item = &dyn Framework> + '_ {
        self.frameworks.iter().map(|f| f.as_ref())
    }

    /// Framework names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.frameworks.iter().map(|f| f.name())
    }

    /// Check if a framework is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Get the number of registered frameworks.
    pub fn len(&self) -> usize {
        self.frameworks.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.frameworks.is_empty()
    }
}

impl std::fmt::Debug for FrameworkRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Summary of a framework for display purposes.
#[derive(Debug, Clone)]
pub struct FrameworkSummary {
    /// Framework name
    pub name: String,

    /// Routed methods it implements
    pub instance_methods: Vec<&'static str>,

    /// Broadcast methods it implements
    pub global_methods: Vec<&'static str>,
}

impl FrameworkSummary {
    /// Create a summary from a framework.
    pub fn from_framework(framework: &dyn Framework) -> Self {
        let caps = framework.capabilities();
        FrameworkSummary {
            name: framework.name().to_string(),
            instance_methods: caps.instance_methods().map(|m| m.as_str()).collect(),
            global_methods: caps.global_methods().map(|m| m.as_str()).collect(),
        }
    }
}

/// Get all framework summaries, in registration order.
pub fn get_framework_summaries(registry: &FrameworkRegistry) -> Vec<FrameworkSummary> {
    registry.all().map(FrameworkSummary::from_framework).collect()
}
