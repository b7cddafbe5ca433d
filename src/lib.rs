//! Switchyard - multi-framework instance dispatch for JS bundle runtimes
//!
//! A native host renders UI instances through one of several registered
//! frameworks. Switchyard reads the bundle header to pick a framework,
//! keeps the instance-to-framework binding, routes later calls to the owning
//! framework, broadcasts global registrations to every framework, and runs
//! lifecycle services around instance creation, refresh and destruction.
//!
//! ```ignore
//! use serde_json::json;
//! use switchyard::{start, HostConfig, LoopbackFramework, RuntimeConfig};
//!
//! let table = start(
//!     RuntimeConfig::new(HostConfig::new())
//!         .with_framework(Box::new(LoopbackFramework::new("Weex")))
//!         .with_framework(Box::new(LoopbackFramework::new("Vue"))),
//! )?;
//!
//! table.call("createInstance", &[json!("1"), json!("// {\"framework\":\"Vue\"}\n")])?;
//! table.call("receiveTasks", &[json!("1"), json!([])])?;
//! ```

pub mod core;
pub mod framework;
pub mod runtime;
pub mod service;
pub mod util;

/// Test doubles for switchyard unit tests.
///
/// This module is only available when compiling with `--cfg test`. It
/// provides recording frameworks, services and element registries.
#[cfg(test)]
pub mod test_support;

pub use core::{BundleDescriptor, ElementRegistry, InstanceConfig, InstanceRecord};
pub use framework::{Framework, FrameworkCapabilities, GlobalMethod, InstanceMethod, LoopbackFramework};
pub use runtime::{
    start, DispatchError, DispatchResult, HostConfig, MethodTable, Runtime, RuntimeConfig,
    TaskSender,
};
pub use service::{Service, ServiceContext, ServiceRegistry};
pub use util::config::Config;
