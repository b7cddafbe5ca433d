//! Instance records and the instance registry.
//!
//! The registry is the only shared mutable state of a runtime. It is written
//! by exactly two operations: instance creation inserts, instance destruction
//! removes. Everything else reads by id.
//!
//! Each reservation carries a ticket. Creation only completes an entry whose
//! ticket still matches, and destruction claims an entry once before tearing
//! it down, so concurrent or re-entrant callers never act on the same
//! instance twice.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::SystemTime;

use serde_json::{Map, Value};

/// Objects contributed by services when an instance is created.
pub type ServiceObjects = Map<String, Value>;

/// Framework binding of a live instance.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceRecord {
    /// Name of the framework that owns the instance
    pub framework: String,

    /// Version declared by the bundle header, if any
    pub bundle_version: Option<String>,

    /// When the instance was created
    pub created_at: SystemTime,
}

impl InstanceRecord {
    /// Create a record stamped with the current time.
    pub fn new(framework: impl Into<String>, bundle_version: Option<String>) -> Self {
        InstanceRecord {
            framework: framework.into(),
            bundle_version,
            created_at: SystemTime::now(),
        }
    }
}

/// Configuration snapshot taken when an instance is created.
///
/// `options` is an owned copy of the caller's configuration object, so later
/// changes on either side never leak across.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstanceConfig {
    /// Caller-supplied configuration
    pub options: Map<String, Value>,

    /// Version declared by the bundle header
    pub bundle_version: Option<String>,

    /// Host environment at creation time
    pub env: Map<String, Value>,
}

impl InstanceConfig {
    /// Snapshot a caller configuration together with the injected fields.
    pub fn snapshot(
        options: &Map<String, Value>,
        bundle_version: Option<String>,
        env: Map<String, Value>,
    ) -> Self {
        InstanceConfig {
            options: options.clone(),
            bundle_version,
            env,
        }
    }

    /// Look up a caller-supplied option.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// Flatten into the single object frameworks historically receive:
    /// the caller's keys plus `bundleVersion` and `env`.
    pub fn to_value(&self) -> Value {
        let mut object = self.options.clone();
        object.insert(
            "bundleVersion".to_string(),
            self.bundle_version
                .clone()
                .map(Value::String)
                .unwrap_or(Value::Null),
        );
        object.insert("env".to_string(), Value::Object(self.env.clone()));
        Value::Object(object)
    }
}

/// Everything the registry keeps for one live instance.
#[derive(Debug, Clone)]
pub struct InstanceEntry {
    /// Framework binding
    pub record: InstanceRecord,

    /// Configuration snapshot
    pub config: InstanceConfig,

    /// Objects contributed by services
    pub service_objects: ServiceObjects,

    ticket: u64,
    destroying: bool,
}

impl InstanceEntry {
    /// Check if a destroy call has claimed this instance.
    pub fn is_destroying(&self) -> bool {
        self.destroying
    }
}

/// Proof of a reservation made by [`InstanceRegistry::reserve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reservation(u64);

/// Map from instance id to live instance state.
#[derive(Debug, Default)]
pub struct InstanceRegistry {
    entries: Mutex<HashMap<String, InstanceEntry>>,
    next_ticket: AtomicU64,
}

impl InstanceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record for `id` unless one already exists.
    ///
    /// Returns `None` (leaving the existing entry untouched) when the id is
    /// taken. The check and the insert happen under one lock.
    pub fn reserve(&self, id: &str, record: InstanceRecord) -> Option<Reservation> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if entries.contains_key(id) {
            return None;
        }
        let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
        entries.insert(
            id.to_string(),
            InstanceEntry {
                record,
                config: InstanceConfig::default(),
                service_objects: ServiceObjects::new(),
                ticket,
                destroying: false,
            },
        );
        Some(Reservation(ticket))
    }

    /// Attach the configuration snapshot and service objects to a reserved id.
    ///
    /// Returns `false` when the reservation no longer holds: the id was
    /// destroyed (and possibly created again) since it was reserved.
    pub fn complete(
        &self,
        id: &str,
        reservation: Reservation,
        config: InstanceConfig,
        service_objects: ServiceObjects,
    ) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get_mut(id) {
            Some(entry) if entry.ticket == reservation.0 && !entry.destroying => {
                entry.config = config;
                entry.service_objects = service_objects;
                true
            }
            _ => false,
        }
    }

    /// Claim an instance for destruction.
    ///
    /// Only the first caller gets the record; later callers see `None` while
    /// the entry stays readable until [`remove`](Self::remove).
    pub fn begin_destroy(&self, id: &str) -> Option<InstanceRecord> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get_mut(id) {
            Some(entry) if !entry.destroying => {
                entry.destroying = true;
                Some(entry.record.clone())
            }
            _ => None,
        }
    }

    /// Record of a live instance.
    pub fn record(&self, id: &str) -> Option<InstanceRecord> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(id).map(|entry| entry.record.clone())
    }

    /// Full entry of a live instance.
    pub fn entry(&self, id: &str) -> Option<InstanceEntry> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(id).cloned()
    }

    /// Remove an instance, returning what was stored for it.
    pub fn remove(&self, id: &str) -> Option<InstanceEntry> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(id)
    }

    /// Check if an id denotes a live instance.
    pub fn contains(&self, id: &str) -> bool {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.contains_key(id)
    }

    /// Ids of all live instances, sorted.
    pub fn ids(&self) -> Vec<String> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let mut ids: Vec<String> = entries.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Number of live instances.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Check if there are no live instances.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
