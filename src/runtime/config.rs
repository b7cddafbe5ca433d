//! Runtime configuration.
//!
//! [`HostConfig`] is what the host shares with every framework (at `init`)
//! and every service (through the hook context): the bridge back to native,
//! the element registry and the process-wide environment. [`RuntimeConfig`]
//! bundles it with the framework and service sets a runtime starts from.

use std::sync::{Arc, RwLock};

use serde_json::{Map, Value};

use crate::core::element::{ElementRegistry, ElementTypeRegistry};
use crate::framework::registry::FrameworkRegistry;
use crate::framework::trait_def::Framework;
use crate::service::ServiceRegistry;
use crate::util::config::{Config, DEFAULT_FRAMEWORK};

/// Bridge callback delivering tasks from an instance to the native side.
pub trait TaskSender: Send + Sync {
    fn send_tasks(&self, id: &str, tasks: Value) -> Value;
}

impl<F> TaskSender for F
where
    F: Fn(&str, Value) -> Value + Send + Sync,
{
    fn send_tasks(&self, id: &str, tasks: Value) -> Value {
        self(id, tasks)
    }
}

/// Task sender used when the host did not provide one.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTaskSender;

impl TaskSender for NullTaskSender {
    fn send_tasks(&self, id: &str, _tasks: Value) -> Value {
        tracing::debug!("dropping tasks for instance `{}`: no task sender", id);
        Value::Null
    }
}

/// Host configuration shared with frameworks and services.
pub struct HostConfig {
    default_framework: String,
    legacy_aliases: bool,
    environment: RwLock<Map<String, Value>>,
    task_sender: Arc<dyn TaskSender>,
    elements: Arc<dyn ElementRegistry>,
}

impl HostConfig {
    /// Create a host configuration with default settings, an empty
    /// environment, an in-memory element registry and no task sender.
    pub fn new() -> Self {
        HostConfig {
            default_framework: DEFAULT_FRAMEWORK.to_string(),
            legacy_aliases: true,
            environment: RwLock::new(Map::new()),
            task_sender: Arc::new(NullTaskSender),
            elements: Arc::new(ElementTypeRegistry::new()),
        }
    }

    /// Create a host configuration from loaded settings.
    pub fn from_config(config: &Config) -> Self {
        HostConfig::new()
            .with_default_framework(config.default_framework())
            .with_legacy_aliases(config.legacy_aliases())
            .with_environment(config.environment.clone())
    }

    /// Set the framework bundles fall back to.
    pub fn with_default_framework(mut self, name: impl Into<String>) -> Self {
        self.default_framework = name.into();
        self
    }

    /// Enable or disable deprecated method names.
    pub fn with_legacy_aliases(mut self, enabled: bool) -> Self {
        self.legacy_aliases = enabled;
        self
    }

    /// Set the initial environment.
    pub fn with_environment(self, environment: Map<String, Value>) -> Self {
        self.set_environment(environment);
        self
    }

    /// Set the bridge task sender.
    pub fn with_task_sender(mut self, sender: impl TaskSender + 'static) -> Self {
        self.task_sender = Arc::new(sender);
        self
    }

    /// Set the element registry.
    pub fn with_element_registry(mut self, elements: Arc<dyn ElementRegistry>) -> Self {
        self.elements = elements;
        self
    }

    /// Framework bundles fall back to.
    pub fn default_framework(&self) -> &str {
        &self.default_framework
    }

    /// Whether deprecated method names are exposed.
    pub fn legacy_aliases(&self) -> bool {
        self.legacy_aliases
    }

    /// Copy of the current environment.
    pub fn environment(&self) -> Map<String, Value> {
        self.environment
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Replace the environment. Existing instances keep their snapshot.
    pub fn set_environment(&self, environment: Map<String, Value>) {
        *self.environment.write().unwrap_or_else(|e| e.into_inner()) = environment;
    }

    /// Set one environment key.
    pub fn update_environment(&self, key: impl Into<String>, value: Value) {
        self.environment
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.into(), value);
    }

    /// The bridge task sender.
    pub fn task_sender(&self) -> Arc<dyn TaskSender> {
        Arc::clone(&self.task_sender)
    }

    /// Send tasks to the native side.
    pub fn send_tasks(&self, id: &str, tasks: Value) -> Value {
        self.task_sender.send_tasks(id, tasks)
    }

    /// The element registry.
    pub fn element_registry(&self) -> &dyn ElementRegistry {
        self.elements.as_ref()
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HostConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostConfig")
            .field("default_framework", &self.default_framework)
            .field("legacy_aliases", &self.legacy_aliases)
            .field("environment", &self.environment())
            .finish_non_exhaustive()
    }
}

/// Everything a runtime starts from.
#[derive(Debug, Default)]
pub struct RuntimeConfig {
    /// Frameworks to dispatch to
    pub frameworks: FrameworkRegistry,

    /// Lifecycle services; the host may keep a handle to register more later
    pub services: Arc<ServiceRegistry>,

    /// Host configuration
    pub host: HostConfig,
}

impl RuntimeConfig {
    /// Create a runtime configuration with no frameworks or services.
    pub fn new(host: HostConfig) -> Self {
        RuntimeConfig {
            frameworks: FrameworkRegistry::new(),
            services: Arc::new(ServiceRegistry::new()),
            host,
        }
    }

    /// Add a framework.
    pub fn with_framework(mut self, framework: Box<dyn Framework>) -> Self {
        self.frameworks.register(framework);
        self
    }

    /// Use a shared service registry.
    pub fn with_services(mut self, services: Arc<ServiceRegistry>) -> Self {
        self.services = services;
        self
    }
}
