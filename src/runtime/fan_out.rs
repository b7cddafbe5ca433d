//! Broadcast of global registration calls to every framework.

use serde_json::Value;

use crate::core::element;
use crate::framework::capabilities::GlobalMethod;
use crate::runtime::Runtime;

/// Outcome of one fan-out.
#[derive(Debug, Default)]
pub struct FanOutReport {
    /// Frameworks that accepted the call
    pub delivered: Vec<String>,

    /// Frameworks that do not declare the method
    pub skipped: Vec<String>,

    /// Frameworks whose call failed
    pub failed: Vec<(String, anyhow::Error)>,
}

impl FanOutReport {
    /// Check if every framework that declares the method accepted the call.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

impl Runtime {
    /// Deliver a global call to every framework that declares it, in
    /// registration order.
    ///
    /// Component registrations are recorded in the element registry once,
    /// before any framework sees them. A failing framework is logged and the
    /// remaining frameworks still receive the call.
    pub fn fan_out(&self, method: GlobalMethod, args: &[Value]) -> FanOutReport {
        if method == GlobalMethod::RegisterComponents {
            let components = args.first().unwrap_or(&Value::Null);
            let elements = self.host.element_registry();
            for (type_name, methods) in element::component_methods(components) {
                elements.register_element(&type_name, &methods);
            }
        }

        let mut report = FanOutReport::default();
        for framework in self.frameworks.all() {
            let name = framework.name().to_string();
            if !framework.capabilities().supports_global(method) {
                report.skipped.push(name);
                continue;
            }

            match framework.call_global(method, args) {
                Ok(_) => report.delivered.push(name),
                Err(e) => {
                    tracing::warn!("framework `{}` failed to handle `{}`: {:#}", name, method, e);
                    report.failed.push((name, e));
                }
            }
        }

        tracing::debug!(
            "{}: delivered to {}, skipped {}, failed {}",
            method,
            report.delivered.len(),
            report.skipped.len(),
            report.failed.len()
        );
        report
    }

    /// Register component types with every framework.
    pub fn register_components(&self, components: Value) -> FanOutReport {
        self.fan_out(GlobalMethod::RegisterComponents, &[components])
    }

    /// Register native modules with every framework.
    pub fn register_modules(&self, modules: Value) -> FanOutReport {
        self.fan_out(GlobalMethod::RegisterModules, &[modules])
    }

    /// Register component methods with every framework.
    pub fn register_methods(&self, methods: Value) -> FanOutReport {
        self.fan_out(GlobalMethod::RegisterMethods, &[methods])
    }
}
