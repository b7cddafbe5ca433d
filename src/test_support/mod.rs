//! Test utilities and mocks for switchyard unit tests.
//!
//! Recording doubles for the runtime's extension points: frameworks,
//! services and the element registry. Doubles that share a [`CallLog`]
//! append to it in call order, so tests can assert the interleaving of
//! framework calls and service hooks.
//!
//! # Example
//!
//! ```rust,ignore
//! use switchyard::test_support::{call_log, entries, runtime, RecordingFramework};
//!
//! #[test]
//! fn test_example() {
//!     let log = call_log();
//!     let weex = RecordingFramework::new("Weex").logging_to(&log);
//!     let runtime = runtime(&[&weex]);
//!
//!     runtime.create_instance("1", "", &Default::default(), &Value::Null).unwrap();
//!     assert_eq!(entries(&log), vec!["Weex.createInstance(1)"]);
//! }
//! ```

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use anyhow::{bail, Result};
use serde_json::{json, Map, Value};

use crate::core::element::ElementRegistry;
use crate::core::instance::{InstanceConfig, ServiceObjects};
use crate::framework::capabilities::{FrameworkCapabilities, GlobalMethod, InstanceMethod};
use crate::framework::trait_def::{CreateRequest, Framework};
use crate::runtime::config::{HostConfig, RuntimeConfig};
use crate::runtime::errors::DispatchError;
use crate::runtime::Runtime;
use crate::service::{Service, ServiceContext};

/// Shared, ordered log of calls across test doubles.
pub type CallLog = Arc<Mutex<Vec<String>>>;

/// Create an empty call log.
pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Copy of the log's entries.
pub fn entries(log: &CallLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// Start a runtime over clones of the given frameworks, with default host
/// settings (default framework `Weex`).
pub fn runtime(frameworks: &[&RecordingFramework]) -> Runtime {
    let config = frameworks
        .iter()
        .fold(RuntimeConfig::new(HostConfig::new()), |config, framework| {
            config.with_framework(Box::new((*framework).clone()))
        });
    Runtime::init(config).expect("test runtime should start")
}

/// What a framework was handed at instance creation.
#[derive(Debug, Clone)]
pub struct CreatedInstance {
    pub id: String,
    pub config: InstanceConfig,
    pub data: Value,
    pub service_objects: ServiceObjects,
}

#[derive(Debug, Default)]
struct FrameworkState {
    init_count: usize,
    created: Vec<CreatedInstance>,
    calls: Vec<String>,
    call_args: Vec<Vec<Value>>,
}

/// Framework double that records every call.
///
/// Clones share their recorded state, so a test can keep one handle while
/// the runtime owns another.
#[derive(Debug, Clone)]
pub struct RecordingFramework {
    name: String,
    capabilities: FrameworkCapabilities,
    failing: BTreeSet<String>,
    delay: Option<Duration>,
    log: Option<CallLog>,
    state: Arc<Mutex<FrameworkState>>,
}

impl RecordingFramework {
    /// A framework implementing every optional method.
    pub fn new(name: &str) -> Self {
        Self::with_capabilities(name, FrameworkCapabilities::all())
    }

    /// A framework implementing only the given optional methods.
    pub fn with_capabilities(name: &str, capabilities: FrameworkCapabilities) -> Self {
        RecordingFramework {
            name: name.to_string(),
            capabilities,
            failing: BTreeSet::new(),
            delay: None,
            log: None,
            state: Arc::new(Mutex::new(FrameworkState::default())),
        }
    }

    /// Make `init`, `createInstance` or the named method fail.
    pub fn failing(mut self, method: &str) -> Self {
        self.failing.insert(method.to_string());
        self
    }

    /// Sleep inside every routed call, widening race windows.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Also append every creation and call to a shared log.
    pub fn logging_to(mut self, log: &CallLog) -> Self {
        self.log = Some(Arc::clone(log));
        self
    }

    /// How many times `init` ran.
    pub fn init_count(&self) -> usize {
        self.state.lock().unwrap().init_count
    }

    /// Instances created so far.
    pub fn created(&self) -> Vec<CreatedInstance> {
        self.state.lock().unwrap().created.clone()
    }

    /// Routed and global calls, e.g. `"Weex.getRoot(1)"`.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Arguments of each routed or global call, in call order.
    pub fn call_args(&self) -> Vec<Vec<Value>> {
        self.state.lock().unwrap().call_args.clone()
    }

    fn log(&self, entry: &str) {
        if let Some(log) = &self.log {
            log.lock().unwrap().push(entry.to_string());
        }
    }

    fn check(&self, method: &str) -> Result<()> {
        if self.failing.contains(method) {
            bail!("{} failed in {}", method, self.name);
        }
        Ok(())
    }

    fn record_call(&self, entry: String, args: &[Value]) {
        self.log(&entry);
        let mut state = self.state.lock().unwrap();
        state.calls.push(entry);
        state.call_args.push(args.to_vec());
    }
}

impl Framework for RecordingFramework {
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> &FrameworkCapabilities {
        &self.capabilities
    }

    fn init(&self, _host: &HostConfig) -> Result<()> {
        self.check("init")?;
        self.state.lock().unwrap().init_count += 1;
        Ok(())
    }

    fn create_instance(&self, request: CreateRequest<'_>) -> Result<Value> {
        self.log(&format!("{}.createInstance({})", self.name, request.id));
        self.check("createInstance")?;
        self.state.lock().unwrap().created.push(CreatedInstance {
            id: request.id.to_string(),
            config: request.config.clone(),
            data: request.data.clone(),
            service_objects: request.service_objects.clone(),
        });
        Ok(json!({ "created": request.id, "framework": self.name }))
    }

    fn call_instance(&self, method: InstanceMethod, id: &str, args: &[Value]) -> Result<Value> {
        self.record_call(format!("{}.{}({})", self.name, method, id), args);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        self.check(method.as_str())?;
        Ok(json!({ "framework": self.name, "method": method.as_str(), "instance": id }))
    }

    fn call_global(&self, method: GlobalMethod, args: &[Value]) -> Result<Value> {
        self.record_call(format!("{}.{}", self.name, method), args);
        self.check(method.as_str())?;
        Ok(Value::Null)
    }
}

/// Service double that logs its hooks as `"<name>.<hook>(<id>)"`.
#[derive(Debug, Clone)]
pub struct RecordingService {
    name: String,
    log: CallLog,
    objects: Option<ServiceObjects>,
    failing: bool,
    seen: Arc<Mutex<Vec<String>>>,
}

impl RecordingService {
    pub fn new(name: &str, log: &CallLog) -> Self {
        RecordingService {
            name: name.to_string(),
            log: Arc::clone(log),
            objects: None,
            failing: false,
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Contribute these objects at creation. `objects` must be a JSON object.
    pub fn with_objects(mut self, objects: Value) -> Self {
        self.objects = objects.as_object().cloned();
        self
    }

    /// Fail every hook (after logging it).
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Framework names seen in hook contexts, in hook order.
    pub fn seen_frameworks(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }

    fn hook(&self, hook: &str, id: &str, ctx: &ServiceContext<'_>) -> Result<()> {
        self.log
            .lock()
            .unwrap()
            .push(format!("{}.{}({})", self.name, hook, id));
        self.seen.lock().unwrap().push(ctx.info.framework.clone());
        if self.failing {
            bail!("{} hook of {} failed", hook, self.name);
        }
        Ok(())
    }
}

impl Service for RecordingService {
    fn create(
        &self,
        id: &str,
        ctx: &ServiceContext<'_>,
        _config: &InstanceConfig,
    ) -> Result<Option<ServiceObjects>> {
        self.hook("create", id, ctx)?;
        Ok(self.objects.clone())
    }

    fn refresh(&self, id: &str, ctx: &ServiceContext<'_>) -> Result<()> {
        self.hook("refresh", id, ctx)
    }

    fn destroy(&self, id: &str, ctx: &ServiceContext<'_>) -> Result<()> {
        self.hook("destroy", id, ctx)
    }
}

/// What [`ReentrantService`] does from inside its create hook.
#[derive(Debug, Clone, Copy)]
enum Reentry {
    Recreate,
    Destroy,
}

/// Service that calls back into its runtime from the create hook.
#[derive(Debug, Clone)]
pub struct ReentrantService {
    runtime: Weak<Runtime>,
    reentry: Reentry,
    observations: Arc<Mutex<Vec<String>>>,
}

impl ReentrantService {
    /// Try to create the same id again.
    pub fn recreating(runtime: &Arc<Runtime>) -> Self {
        Self::with_reentry(runtime, Reentry::Recreate)
    }

    /// Destroy the id being created.
    pub fn destroying(runtime: &Arc<Runtime>) -> Self {
        Self::with_reentry(runtime, Reentry::Destroy)
    }

    fn with_reentry(runtime: &Arc<Runtime>, reentry: Reentry) -> Self {
        ReentrantService {
            runtime: Arc::downgrade(runtime),
            reentry,
            observations: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn observations(&self) -> Vec<String> {
        self.observations.lock().unwrap().clone()
    }
}

impl Service for ReentrantService {
    fn create(
        &self,
        id: &str,
        _ctx: &ServiceContext<'_>,
        _config: &InstanceConfig,
    ) -> Result<Option<ServiceObjects>> {
        let Some(runtime) = self.runtime.upgrade() else {
            bail!("runtime dropped");
        };

        let live = if runtime.instances().contains(id) { "live" } else { "missing" };
        let outcome = match self.reentry {
            Reentry::Recreate => {
                let duplicate = runtime.create_instance(id, "", &Map::new(), &Value::Null);
                if matches!(duplicate, Err(DispatchError::InvalidInstanceId(_))) {
                    "duplicate rejected"
                } else {
                    "duplicate accepted"
                }
            }
            Reentry::Destroy => match runtime.destroy_instance(id) {
                Ok(_) => "destroyed",
                Err(_) => "destroy failed",
            },
        };

        self.observations
            .lock()
            .unwrap()
            .push(format!("create({}): {}, {}", id, live, outcome));
        Ok(None)
    }
}

/// Element registry double that keeps every registration call.
#[derive(Debug, Default)]
pub struct RecordingElements {
    registered: Mutex<Vec<(String, Vec<String>)>>,
}

impl RecordingElements {
    pub fn registered(&self) -> Vec<(String, Vec<String>)> {
        self.registered.lock().unwrap().clone()
    }
}

impl ElementRegistry for RecordingElements {
    fn register_element(&self, type_name: &str, methods: &[String]) {
        self.registered
            .lock()
            .unwrap()
            .push((type_name.to_string(), methods.to_vec()));
    }
}
