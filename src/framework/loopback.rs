//! Loopback framework.
//!
//! A framework that renders nothing: it tracks its live instances and answers
//! every call with a JSON description of what it received. `receiveTasks`
//! batches are bounced back to the host through the task sender. Used by
//! `switchyard replay` to exercise routing without a real rendering backend.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, OnceLock};

use anyhow::{bail, Result};
use serde_json::{json, Value};

use crate::framework::capabilities::{FrameworkCapabilities, GlobalMethod, InstanceMethod};
use crate::framework::trait_def::{CreateRequest, Framework};
use crate::runtime::config::{HostConfig, TaskSender};

/// Framework that echoes calls back to the caller.
pub struct LoopbackFramework {
    name: String,
    capabilities: FrameworkCapabilities,
    sender: OnceLock<Arc<dyn TaskSender>>,
    instances: Mutex<BTreeMap<String, Value>>,
}

impl LoopbackFramework {
    /// Create a loopback framework implementing every optional method.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_capabilities(name, FrameworkCapabilities::all())
    }

    /// Create a loopback framework with a restricted method set.
    pub fn with_capabilities(name: impl Into<String>, capabilities: FrameworkCapabilities) -> Self {
        LoopbackFramework {
            name: name.into(),
            capabilities,
            sender: OnceLock::new(),
            instances: Mutex::new(BTreeMap::new()),
        }
    }

    /// Ids of instances this framework currently holds.
    pub fn instance_ids(&self) -> Vec<String> {
        let instances = self.instances.lock().unwrap_or_else(|e| e.into_inner());
        instances.keys().cloned().collect()
    }

    fn data_of(&self, id: &str) -> Result<Value> {
        let instances = self.instances.lock().unwrap_or_else(|e| e.into_inner());
        match instances.get(id) {
            Some(data) => Ok(data.clone()),
            None => bail!("{} has no instance `{}`", self.name, id),
        }
    }
}

impl Framework for LoopbackFramework {
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> &FrameworkCapabilities {
        &self.capabilities
    }

    fn init(&self, host: &HostConfig) -> Result<()> {
        // Re-initialization keeps the first sender.
        let _ = self.sender.set(host.task_sender());
        Ok(())
    }

    fn create_instance(&self, request: CreateRequest<'_>) -> Result<Value> {
        let mut instances = self.instances.lock().unwrap_or_else(|e| e.into_inner());
        instances.insert(request.id.to_string(), request.data.clone());

        Ok(json!({
            "framework": self.name,
            "instance": request.id,
            "bundleVersion": request.config.bundle_version,
            "services": request.service_objects.keys().collect::<Vec<_>>(),
        }))
    }

    fn call_instance(&self, method: InstanceMethod, id: &str, args: &[Value]) -> Result<Value> {
        match method {
            InstanceMethod::DestroyInstance => {
                let mut instances = self.instances.lock().unwrap_or_else(|e| e.into_inner());
                if instances.remove(id).is_none() {
                    bail!("{} has no instance `{}`", self.name, id);
                }
                Ok(json!({ "destroyed": id }))
            }
            InstanceMethod::RefreshInstance => {
                let data = args.first().cloned().unwrap_or(Value::Null);
                let mut instances = self.instances.lock().unwrap_or_else(|e| e.into_inner());
                match instances.get_mut(id) {
                    Some(slot) => *slot = data.clone(),
                    None => bail!("{} has no instance `{}`", self.name, id),
                }
                Ok(json!({ "refreshed": id, "data": data }))
            }
            InstanceMethod::ReceiveTasks => {
                let tasks = args.first().cloned().unwrap_or(Value::Null);
                self.data_of(id)?;
                match self.sender.get() {
                    Some(sender) => Ok(sender.send_tasks(id, tasks)),
                    None => Ok(json!({ "received": tasks })),
                }
            }
            InstanceMethod::GetRoot => {
                let data = self.data_of(id)?;
                Ok(json!({ "ref": "_root", "instance": id, "data": data }))
            }
        }
    }

    fn call_global(&self, method: GlobalMethod, args: &[Value]) -> Result<Value> {
        let count = args
            .first()
            .and_then(Value::as_array)
            .map(Vec::len)
            .unwrap_or(0);
        tracing::debug!("{} accepted {} ({} entries)", self.name, method, count);
        Ok(json!({ "framework": self.name, "method": method.as_str(), "count": count }))
    }
}
