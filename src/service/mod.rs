//! Instance lifecycle services.
//!
//! Services are cross-cutting observers registered independently of the
//! frameworks. They are told when instances are created, refreshed and
//! destroyed, and can hand per-instance objects to the framework at creation.
//! Frameworks never see the services themselves, only the objects they
//! contributed.

pub mod registry;

use anyhow::Result;

use crate::core::instance::{InstanceConfig, InstanceRecord, ServiceObjects};
use crate::runtime::config::HostConfig;

pub use registry::{ServiceError, ServiceRegistry};

/// What a service hook learns about the instance it is called for.
#[derive(Clone, Copy)]
pub struct ServiceContext<'a> {
    /// The instance's framework binding
    pub info: &'a InstanceRecord,

    /// Host configuration of the runtime
    pub runtime: &'a HostConfig,
}

/// Lifecycle observer. Every hook is optional.
pub trait Service: Send + Sync {
    /// Called after an instance is registered, before its framework creates
    /// it. Returned objects are handed to the framework.
    fn create(
        &self,
        _id: &str,
        _ctx: &ServiceContext<'_>,
        _config: &InstanceConfig,
    ) -> Result<Option<ServiceObjects>> {
        Ok(None)
    }

    /// Called after the framework refreshed an instance.
    fn refresh(&self, _id: &str, _ctx: &ServiceContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Called after the framework destroyed an instance, while its record is
    /// still registered.
    fn destroy(&self, _id: &str, _ctx: &ServiceContext<'_>) -> Result<()> {
        Ok(())
    }
}
