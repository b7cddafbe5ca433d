//! `switchyard replay` command
//!
//! Runs a recorded sequence of bridge calls against loopback frameworks and
//! prints what each call returned.

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::cli::ReplayArgs;
use switchyard::core::element::ElementTypeRegistry;
use switchyard::core::{InstanceConfig, ServiceObjects};
use switchyard::framework::{get_framework_summaries, LoopbackFramework};
use switchyard::service::{Service, ServiceContext};
use switchyard::util::diagnostic::{self, suggestions};
use switchyard::{start, HostConfig, RuntimeConfig};

use super::{framework_names, load_settings};

/// One recorded bridge call.
#[derive(Debug, Deserialize)]
struct ReplayCall {
    method: String,
    #[serde(default)]
    args: Vec<Value>,
}

/// Logs instance lifecycle events.
struct LifecycleTrace;

impl Service for LifecycleTrace {
    fn create(
        &self,
        id: &str,
        ctx: &ServiceContext<'_>,
        _config: &InstanceConfig,
    ) -> Result<Option<ServiceObjects>> {
        tracing::debug!("instance `{}` created on {}", id, ctx.info.framework);
        Ok(None)
    }

    fn refresh(&self, id: &str, ctx: &ServiceContext<'_>) -> Result<()> {
        tracing::debug!("instance `{}` refreshed on {}", id, ctx.info.framework);
        Ok(())
    }

    fn destroy(&self, id: &str, ctx: &ServiceContext<'_>) -> Result<()> {
        tracing::debug!("instance `{}` destroyed on {}", id, ctx.info.framework);
        Ok(())
    }
}

pub fn execute(args: ReplayArgs, color: bool) -> Result<()> {
    let contents = std::fs::read_to_string(&args.script)
        .with_context(|| format!("failed to read replay script: {}", args.script.display()))?;
    let calls: Vec<ReplayCall> = serde_json::from_str(&contents).map_err(|e| {
        anyhow!(
            "failed to parse replay script {}: {}\n{}",
            args.script.display(),
            e,
            suggestions::REPLAY_FORMAT
        )
    })?;

    let config = load_settings()?;
    let elements = Arc::new(ElementTypeRegistry::new());
    let host = HostConfig::from_config(&config)
        .with_element_registry(elements.clone())
        .with_task_sender(|id: &str, tasks: Value| json!({ "sent": id, "tasks": tasks }));

    let mut runtime_config = RuntimeConfig::new(host);
    for name in framework_names(&config, &args.frameworks) {
        runtime_config = runtime_config.with_framework(Box::new(LoopbackFramework::new(name)));
    }
    runtime_config
        .services
        .register("trace", Arc::new(LifecycleTrace))?;

    let table = start(runtime_config)?;
    for summary in get_framework_summaries(table.runtime().frameworks()) {
        tracing::debug!(
            "framework {}: [{}] [{}]",
            summary.name,
            summary.instance_methods.join(", "),
            summary.global_methods.join(", ")
        );
    }

    let mut failed = 0;
    for (i, call) in calls.iter().enumerate() {
        match table.call(&call.method, &call.args) {
            Ok(value) => println!("[{}] {} -> {}", i, call.method, value),
            Err(e) => {
                failed += 1;
                println!("[{}] {} -> {} error", i, call.method, e.kind());
                diagnostic::emit(&e.to_diagnostic(), color);
            }
        }
    }

    if !elements.is_empty() {
        println!();
        println!("Element types:");
        for type_name in elements.types() {
            let methods = elements.methods(&type_name).unwrap_or_default();
            println!("  {}: {}", type_name, methods.join(", "));
        }
    }

    let live = table.runtime().instances().ids();
    println!();
    println!(
        "{} calls, {} failed, {} live instance(s){}",
        calls.len(),
        failed,
        live.len(),
        if live.is_empty() {
            String::new()
        } else {
            format!(": {}", live.join(", "))
        }
    );

    Ok(())
}
