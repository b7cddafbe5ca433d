//! Instance dispatch runtime.
//!
//! A [`Runtime`] owns a frozen framework set, the instance registry, the
//! service registry and the host configuration. [`start`] initializes the
//! frameworks and returns the public [`MethodTable`] the bridge calls into.
//!
//! # Call flow
//!
//! ```text
//!  createInstance(id, code, ..)
//!        │
//!        ├─ bundle header ──► framework name (or the default)
//!        ├─ registry insert ─► InstanceRecord
//!        ├─ service create hooks ─► service objects
//!        └─ framework.create_instance
//!
//!  destroyInstance / refreshInstance / receiveTasks / getRoot (id, ..)
//!        │
//!        ├─ registry lookup ─► owning framework
//!        ├─ framework.call_instance
//!        └─ refresh/destroy: service hooks, destroy: registry removal
//! ```
//!
//! Registry locks are never held across framework or service calls, so both
//! may call back into the runtime.

pub mod config;
pub mod errors;
pub mod fan_out;
pub mod router;
pub mod table;

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};

use crate::core::bundle;
use crate::core::instance::{InstanceConfig, InstanceEntry, InstanceRecord, InstanceRegistry};
use crate::framework::registry::FrameworkRegistry;
use crate::framework::trait_def::CreateRequest;
use crate::service::{ServiceContext, ServiceRegistry};

pub use config::{HostConfig, NullTaskSender, RuntimeConfig, TaskSender};
pub use errors::{DispatchError, DispatchResult};
pub use fan_out::FanOutReport;
pub use table::{LegacyAlias, MethodTable, CREATE_INSTANCE, LEGACY_ALIASES};

/// Initialize every framework and build the public method table.
pub fn start(config: RuntimeConfig) -> Result<MethodTable> {
    let runtime = Runtime::init(config)?;
    Ok(MethodTable::new(Arc::new(runtime)))
}

/// Dispatch state of one host.
#[derive(Debug)]
pub struct Runtime {
    frameworks: FrameworkRegistry,
    instances: InstanceRegistry,
    services: Arc<ServiceRegistry>,
    host: HostConfig,
}

impl Runtime {
    /// Freeze the framework set and initialize every framework.
    ///
    /// Fails if the default framework is not registered or a framework's
    /// `init` fails.
    pub fn init(config: RuntimeConfig) -> Result<Self> {
        let RuntimeConfig {
            frameworks,
            services,
            host,
        } = config;

        if !frameworks.contains(host.default_framework()) {
            bail!(
                "default framework `{}` is not registered (registered: {})",
                host.default_framework(),
                frameworks.names().collect::<Vec<_>>().join(", ")
            );
        }

        for framework in frameworks.all() {
            framework
                .init(&host)
                .with_context(|| format!("failed to initialize framework `{}`", framework.name()))?;
        }

        tracing::debug!(
            "runtime started with frameworks [{}], default `{}`",
            frameworks.names().collect::<Vec<_>>().join(", "),
            host.default_framework()
        );

        Ok(Runtime {
            frameworks,
            instances: InstanceRegistry::new(),
            services,
            host,
        })
    }

    /// Create an instance from bundle source.
    ///
    /// Each id can be created once until it is destroyed; a second creation
    /// returns [`DispatchError::InvalidInstanceId`] and leaves the first
    /// instance untouched. If a service destroys the id from its create hook,
    /// the framework is never asked to create it and the call fails with
    /// [`DispatchError::InvalidInstanceId`]. Otherwise the framework's own
    /// result or failure is returned as is.
    pub fn create_instance(
        &self,
        id: &str,
        code: &str,
        config: &Map<String, Value>,
        data: &Value,
    ) -> DispatchResult {
        if self.instances.contains(id) {
            return Err(DispatchError::InvalidInstanceId(id.to_string()));
        }

        let descriptor = bundle::detect(code);
        let name = bundle::resolve_framework(
            descriptor.as_ref(),
            |candidate| self.frameworks.contains(candidate),
            self.host.default_framework(),
        )
        .to_string();
        if let Some(declared) = descriptor.as_ref().and_then(|d| d.framework.as_deref()) {
            if declared != name {
                tracing::warn!(
                    "bundle for instance `{}` declares unregistered framework `{}`, using `{}`",
                    id,
                    declared,
                    name
                );
            }
        }

        let framework = self
            .frameworks
            .get(&name)
            .ok_or_else(|| DispatchError::FrameworkUnavailable(name.clone()))?;
        let bundle_version = descriptor.and_then(|d| d.version);

        let record = InstanceRecord::new(name.as_str(), bundle_version.clone());
        let Some(reservation) = self.instances.reserve(id, record.clone()) else {
            return Err(DispatchError::InvalidInstanceId(id.to_string()));
        };

        tracing::debug!(
            "create {}@{} instance `{}`",
            name,
            bundle_version.as_deref().unwrap_or("unknown"),
            id
        );

        let snapshot = InstanceConfig::snapshot(config, bundle_version, self.host.environment());
        let ctx = ServiceContext {
            info: &record,
            runtime: &self.host,
        };
        let service_objects = self.services.create_all(id, &ctx, &snapshot);
        if !self
            .instances
            .complete(id, reservation, snapshot.clone(), service_objects.clone())
        {
            tracing::warn!("instance `{}` was destroyed during its creation", id);
            return Err(DispatchError::InvalidInstanceId(id.to_string()));
        }

        framework
            .create_instance(CreateRequest {
                id,
                code,
                config: &snapshot,
                data,
                service_objects: &service_objects,
            })
            .map_err(DispatchError::Framework)
    }

    /// Record of a live instance.
    pub fn instance(&self, id: &str) -> Option<InstanceRecord> {
        self.instances.record(id)
    }

    /// Everything stored for a live instance.
    pub fn instance_entry(&self, id: &str) -> Option<InstanceEntry> {
        self.instances.entry(id)
    }

    /// The instance registry.
    pub fn instances(&self) -> &InstanceRegistry {
        &self.instances
    }

    /// The frozen framework set.
    pub fn frameworks(&self) -> &FrameworkRegistry {
        &self.frameworks
    }

    /// The service registry; services may be added or removed at any time.
    pub fn services(&self) -> &Arc<ServiceRegistry> {
        &self.services
    }

    /// The host configuration.
    pub fn host(&self) -> &HostConfig {
        &self.host
    }
}
