//! Public method table.
//!
//! The table is the bridge-facing surface of a runtime: a fixed set of
//! method names, each taking positional JSON arguments.
//!
//! Instance ids are strings. Native hosts sometimes pass them as numbers, so
//! a numeric id names the same instance as its decimal string (`1` and `"1"`).

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::framework::capabilities::{GlobalMethod, InstanceMethod};
use crate::runtime::errors::{DispatchError, DispatchResult};
use crate::runtime::Runtime;

/// Name of the creation entry point.
pub const CREATE_INSTANCE: &str = "createInstance";

/// Deprecated name kept for older native hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegacyAlias {
    pub name: &'static str,
    pub target: InstanceMethod,
}

/// Deprecated names and the routed method each one renames.
pub const LEGACY_ALIASES: &[LegacyAlias] = &[LegacyAlias {
    name: "callJS",
    target: InstanceMethod::ReceiveTasks,
}];

#[derive(Debug, Clone, Copy)]
enum Entry {
    Create,
    Global(GlobalMethod),
    Instance(InstanceMethod),
    Legacy(InstanceMethod),
}

/// Name-to-entry-point map closing over a started runtime.
#[derive(Debug)]
pub struct MethodTable {
    runtime: Arc<Runtime>,
    entries: BTreeMap<&'static str, Entry>,
}

impl MethodTable {
    /// Build the table for a started runtime.
    pub fn new(runtime: Arc<Runtime>) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(CREATE_INSTANCE, Entry::Create);
        for method in GlobalMethod::ALL {
            entries.insert(method.as_str(), Entry::Global(method));
        }
        for method in InstanceMethod::ALL {
            entries.insert(method.as_str(), Entry::Instance(method));
        }
        if runtime.host().legacy_aliases() {
            for alias in LEGACY_ALIASES {
                entries.insert(alias.name, Entry::Legacy(alias.target));
            }
        }

        MethodTable { runtime, entries }
    }

    /// Call an entry point by name with positional arguments.
    pub fn call(&self, name: &str, args: &[Value]) -> DispatchResult {
        let entry = self
            .entries
            .get(name)
            .copied()
            .ok_or_else(|| DispatchError::UnknownMethod(name.to_string()))?;

        match entry {
            Entry::Create => self.create_instance(args),
            Entry::Global(method) => {
                self.runtime.fan_out(method, args);
                Ok(Value::Null)
            }
            Entry::Instance(method) => {
                let id = instance_id(args)?;
                self.runtime.invoke_instance(method, &id, &args[1..])
            }
            Entry::Legacy(method) => {
                let id = instance_id(args)?;
                self.runtime.route(method, &id, &args[1..])
            }
        }
    }

    fn create_instance(&self, args: &[Value]) -> DispatchResult {
        let id = match args.first() {
            Some(value) => id_key(value).ok_or_else(|| DispatchError::InvalidArguments {
                method: CREATE_INSTANCE,
                reason: format!("id must be a string or a number, got {}", value),
            })?,
            None => {
                return Err(DispatchError::InvalidArguments {
                    method: CREATE_INSTANCE,
                    reason: "missing id".to_string(),
                })
            }
        };
        let code = string_arg(args, 1, "code")?;

        let empty = Map::new();
        let config = match args.get(2) {
            None | Some(Value::Null) => &empty,
            Some(Value::Object(config)) => config,
            Some(other) => {
                return Err(DispatchError::InvalidArguments {
                    method: CREATE_INSTANCE,
                    reason: format!("config must be an object, got {}", other),
                })
            }
        };
        let data = args.get(3).unwrap_or(&Value::Null);

        self.runtime.create_instance(&id, code, config, data)
    }

    /// Check if a name is in the table.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Names in the table, sorted.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    /// Number of entry points.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table has no entry points.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The runtime behind the table.
    pub fn runtime(&self) -> &Arc<Runtime> {
        &self.runtime
    }
}

/// Registry key for an id argument: strings as is, numbers in decimal.
fn id_key(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(id) => Some(Cow::Borrowed(id)),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        _ => None,
    }
}

fn instance_id(args: &[Value]) -> Result<Cow<'_, str>, DispatchError> {
    let value = args.first().unwrap_or(&Value::Null);
    id_key(value).ok_or_else(|| DispatchError::InvalidInstanceId(value.to_string()))
}

fn string_arg<'a>(args: &'a [Value], index: usize, what: &str) -> Result<&'a str, DispatchError> {
    match args.get(index) {
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(DispatchError::InvalidArguments {
            method: CREATE_INSTANCE,
            reason: format!("{} must be a string, got {}", what, other),
        }),
        None => Err(DispatchError::InvalidArguments {
            method: CREATE_INSTANCE,
            reason: format!("missing {}", what),
        }),
    }
}
