//! Core data structures.
//!
//! - Bundle header detection
//! - Instance records and the instance registry
//! - The element-type registry interface

pub mod bundle;
pub mod element;
pub mod instance;

pub use bundle::{detect, scan_header, BundleDescriptor, HeaderScan, MalformedHeader};
pub use element::{ElementRegistry, ElementTypeRegistry};
pub use instance::{
    InstanceConfig, InstanceEntry, InstanceRecord, InstanceRegistry, Reservation, ServiceObjects,
};
