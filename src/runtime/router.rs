//! Instance method routing.
//!
//! Routed calls go to the one framework that owns the instance. Refresh and
//! destroy additionally notify services after the framework has been called,
//! and destroy always frees the instance slot.

use serde_json::Value;

use crate::core::instance::InstanceRecord;
use crate::framework::capabilities::InstanceMethod;
use crate::runtime::errors::{DispatchError, DispatchResult};
use crate::runtime::Runtime;
use crate::service::ServiceContext;

impl Runtime {
    /// Route a call to the framework owning `id`, running lifecycle hooks for
    /// refresh and destroy.
    ///
    /// The framework's result is returned even though hooks run after it.
    /// Unknown ids fail with [`DispatchError::InvalidInstanceId`] before any
    /// framework or service is touched. Destroy claims the instance first, so
    /// of several concurrent destroys only one reaches the framework and the
    /// services; the others see an unknown id.
    pub fn invoke_instance(&self, method: InstanceMethod, id: &str, args: &[Value]) -> DispatchResult {
        let record = match method {
            InstanceMethod::DestroyInstance => self.instances.begin_destroy(id),
            _ => self.instances.record(id),
        }
        .ok_or_else(|| DispatchError::InvalidInstanceId(id.to_string()))?;

        let result = self.delegate(method, id, &record, args);
        if let Err(ref e) = result {
            tracing::debug!("{} on instance `{}` failed: {}", method, id, e);
        }

        let ctx = ServiceContext {
            info: &record,
            runtime: &self.host,
        };
        match method {
            InstanceMethod::RefreshInstance => self.services.refresh_all(id, &ctx),
            InstanceMethod::DestroyInstance => {
                self.services.destroy_all(id, &ctx);
                self.instances.remove(id);
                tracing::debug!("destroyed {} instance `{}`", record.framework, id);
            }
            InstanceMethod::ReceiveTasks | InstanceMethod::GetRoot => {}
        }

        result
    }

    /// Route a call without lifecycle hooks.
    ///
    /// This is what deprecated aliases resolve to.
    pub fn route(&self, method: InstanceMethod, id: &str, args: &[Value]) -> DispatchResult {
        let record = self
            .instances
            .record(id)
            .ok_or_else(|| DispatchError::InvalidInstanceId(id.to_string()))?;
        self.delegate(method, id, &record, args)
    }

    fn delegate(
        &self,
        method: InstanceMethod,
        id: &str,
        record: &InstanceRecord,
        args: &[Value],
    ) -> DispatchResult {
        let framework = self
            .frameworks
            .get(&record.framework)
            .ok_or_else(|| DispatchError::FrameworkUnavailable(record.framework.clone()))?;

        if !framework.capabilities().supports_instance(method) {
            return Err(DispatchError::MethodNotSupported {
                framework: record.framework.clone(),
                method: method.as_str(),
            });
        }

        framework
            .call_instance(method, id, args)
            .map_err(DispatchError::Framework)
    }

    /// Destroy an instance.
    pub fn destroy_instance(&self, id: &str) -> DispatchResult {
        self.invoke_instance(InstanceMethod::DestroyInstance, id, &[])
    }

    /// Refresh an instance with new data.
    pub fn refresh_instance(&self, id: &str, data: Value) -> DispatchResult {
        self.invoke_instance(InstanceMethod::RefreshInstance, id, &[data])
    }

    /// Deliver a batch of tasks to an instance.
    pub fn receive_tasks(&self, id: &str, tasks: Value) -> DispatchResult {
        self.invoke_instance(InstanceMethod::ReceiveTasks, id, &[tasks])
    }

    /// Fetch an instance's root element.
    pub fn get_root(&self, id: &str) -> DispatchResult {
        self.invoke_instance(InstanceMethod::GetRoot, id, &[])
    }
}
