//! Ordered set of registered services and the hook runners.

use std::sync::{Arc, RwLock};

use thiserror::Error;

use crate::core::instance::{InstanceConfig, ServiceObjects};
use crate::service::{Service, ServiceContext};

/// Error during service registration.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("service `{0}` is already registered")]
    AlreadyRegistered(String),
}

/// Registered services, in registration order.
///
/// Hooks run against a snapshot of the list, so a hook may register or
/// unregister services without deadlocking; the change applies to the next
/// lifecycle event.
#[derive(Default)]
pub struct ServiceRegistry {
    services: RwLock<Vec<(String, Arc<dyn Service>)>>,
}

impl ServiceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a service under a unique name.
    pub fn register(&self, name: impl Into<String>, service: Arc<dyn Service>) -> Result<(), ServiceError> {
        let name = name.into();
        let mut services = self.services.write().unwrap_or_else(|e| e.into_inner());
        if services.iter().any(|(existing, _)| *existing == name) {
            return Err(ServiceError::AlreadyRegistered(name));
        }
        tracing::debug!("registered service `{}`", name);
        services.push((name, service));
        Ok(())
    }

    /// Remove a service. Returns `false` if no service had that name.
    pub fn unregister(&self, name: &str) -> bool {
        let mut services = self.services.write().unwrap_or_else(|e| e.into_inner());
        let before = services.len();
        services.retain(|(existing, _)| existing != name);
        services.len() != before
    }

    /// Registered service names, in registration order.
    pub fn names(&self) -> Vec<String> {
        let services = self.services.read().unwrap_or_else(|e| e.into_inner());
        services.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Check if a service is registered.
    pub fn contains(&self, name: &str) -> bool {
        let services = self.services.read().unwrap_or_else(|e| e.into_inner());
        services.iter().any(|(existing, _)| existing == name)
    }

    /// Number of registered services.
    pub fn len(&self) -> usize {
        self.services.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Check if no service is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn snapshot(&self) -> Vec<(String, Arc<dyn Service>)> {
        self.services.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Run every create hook and merge the objects they return.
    ///
    /// Later services overwrite earlier keys. A failing hook contributes
    /// nothing and does not stop the others.
    pub fn create_all(
        &self,
        id: &str,
        ctx: &ServiceContext<'_>,
        config: &InstanceConfig,
    ) -> ServiceObjects {
        let mut objects = ServiceObjects::new();
        for (name, service) in self.snapshot() {
            match service.create(id, ctx, config) {
                Ok(Some(contributed)) => objects.extend(contributed),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!("service `{}` failed to create instance `{}`: {:#}", name, id, e);
                }
            }
        }
        objects
    }

    /// Run every refresh hook, in registration order.
    pub fn refresh_all(&self, id: &str, ctx: &ServiceContext<'_>) {
        for (name, service) in self.snapshot() {
            if let Err(e) = service.refresh(id, ctx) {
                tracing::warn!("service `{}` failed to refresh instance `{}`: {:#}", name, id, e);
            }
        }
    }

    /// Run every destroy hook, in registration order.
    pub fn destroy_all(&self, id: &str, ctx: &ServiceContext<'_>) {
        for (name, service) in self.snapshot() {
            if let Err(e) = service.destroy(id, ctx) {
                tracing::warn!("service `{}` failed to destroy instance `{}`: {:#}", name, id, e);
            }
        }
    }
}

impl std::fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::instance::InstanceRecord;
    use crate::runtime::config::HostConfig;
    use crate::test_support::{call_log, entries, RecordingService};
    use serde_json::json;

    #[test]
    fn test_register_and_unregister() {
        let registry = ServiceRegistry::new();
        let log = call_log();

        registry
            .register("broadcast", Arc::new(RecordingService::new("broadcast", &log)))
            .unwrap();
        let err = registry
            .register("broadcast", Arc::new(RecordingService::new("broadcast", &log)))
            .unwrap_err();
        assert!(err.to_string().contains("already registered"));

        registry
            .register("timer", Arc::new(RecordingService::new("timer", &log)))
            .unwrap();
        assert_eq!(registry.names(), vec!["broadcast", "timer"]);

        assert!(registry.unregister("broadcast"));
        assert!(!registry.unregister("broadcast"));
        assert!(!registry.contains("broadcast"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_create_all_merges_last_writer_wins() {
        let registry = ServiceRegistry::new();
        let log = call_log();

        let first = RecordingService::new("first", &log)
            .with_objects(json!({ "shared": 1, "first": true }));
        let failing = RecordingService::new("failing", &log).failing();
        let second = RecordingService::new("second", &log).with_objects(json!({ "shared": 2 }));

        registry.register("first", Arc::new(first)).unwrap();
        registry.register("failing", Arc::new(failing)).unwrap();
        registry.register("second", Arc::new(second)).unwrap();

        let host = HostConfig::new();
        let record = InstanceRecord::new("Weex", None);
        let ctx = ServiceContext {
            info: &record,
            runtime: &host,
        };
        let objects = registry.create_all("1", &ctx, &InstanceConfig::default());

        assert_eq!(objects.get("shared"), Some(&json!(2)));
        assert_eq!(objects.get("first"), Some(&json!(true)));
        assert_eq!(
            entries(&log),
            vec!["first.create(1)", "failing.create(1)", "second.create(1)"]
        );
    }

    #[test]
    fn test_hooks_continue_after_failure() {
        let registry = ServiceRegistry::new();
        let log = call_log();
        registry
            .register("a", Arc::new(RecordingService::new("a", &log).failing()))
            .unwrap();
        registry
            .register("b", Arc::new(RecordingService::new("b", &log)))
            .unwrap();

        let host = HostConfig::new();
        let record = InstanceRecord::new("Weex", None);
        let ctx = ServiceContext {
            info: &record,
            runtime: &host,
        };
        registry.refresh_all("1", &ctx);
        registry.destroy_all("1", &ctx);

        assert_eq!(
            entries(&log),
            vec!["a.refresh(1)", "b.refresh(1)", "a.destroy(1)", "b.destroy(1)"]
        );
    }
}
