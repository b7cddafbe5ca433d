//! Framework trait definition.
//!
//! A framework is a pluggable rendering backend. The runtime only decides
//! *which* framework handles a call; what the call does is entirely up to the
//! framework.

use anyhow::{bail, Result};
use serde_json::Value;

use crate::core::instance::{InstanceConfig, ServiceObjects};
use crate::framework::capabilities::{FrameworkCapabilities, GlobalMethod, InstanceMethod};
use crate::runtime::config::HostConfig;

/// Arguments of a framework's instance creation.
#[derive(Debug, Clone, Copy)]
pub struct CreateRequest<'a> {
    /// Instance id chosen by the caller
    pub id: &'a str,

    /// Bundle source text
    pub code: &'a str,

    /// Configuration snapshot for the instance
    pub config: &'a InstanceConfig,

    /// Initial data
    pub data: &'a Value,

    /// Objects contributed by services
    pub service_objects: &'a ServiceObjects,
}

/// Framework trait - interface for rendering backends.
///
/// Only `init` and `create_instance` are mandatory. Every other method is
/// called only when `capabilities()` declares it; the default bodies fail.
pub trait Framework: Send + Sync {
    /// Name bundles use to select this framework (e.g., "Vue").
    fn name(&self) -> &str;

    /// Optional methods this framework implements.
    fn capabilities(&self) -> &FrameworkCapabilities;

    /// One-time setup, called at runtime startup before any instance exists.
    fn init(&self, host: &HostConfig) -> Result<()>;

    /// Create an instance.
    fn create_instance(&self, request: CreateRequest<'_>) -> Result<Value>;

    /// Handle a routed call for one of this framework's instances.
    ///
    /// `args` excludes the instance id.
    fn call_instance(&self, method: InstanceMethod, _id: &str, _args: &[Value]) -> Result<Value> {
        bail!("framework `{}` does not implement `{}`", self.name(), method)
    }

    /// Handle a broadcast registration call.
    fn call_global(&self, method: GlobalMethod, _args: &[Value]) -> Result<Value> {
        bail!("framework `{}` does not implement `{}`", self.name(), method)
    }
}
