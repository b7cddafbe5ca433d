//! Pluggable rendering frameworks.
//!
//! A framework declares which optional methods it implements
//! ([`FrameworkCapabilities`]) and the runtime validates calls against that
//! declaration before delegating.
//!
//! # Key Concepts
//!
//! - **Capabilities** - Optional routed/broadcast methods (in `capabilities.rs`)
//! - **Framework** - Trait for backend implementations (in `trait_def.rs`)
//! - **Registry** - Ordered, name-keyed framework set (in `registry.rs`)
//! - **Loopback** - Echoing framework for dry runs (in `loopback.rs`)
//!
//! # Usage
//!
//! ```ignore
//! use switchyard::framework::{FrameworkRegistry, LoopbackFramework};
//!
//! let registry = FrameworkRegistry::new()
//!     .with(Box::new(LoopbackFramework::new("Weex")))
//!     .with(Box::new(LoopbackFramework::new("Vue")));
//! assert!(registry.contains("Vue"));
//! ```

pub mod capabilities;
pub mod loopback;
pub mod registry;
pub mod trait_def;

pub use capabilities::{FrameworkCapabilities, GlobalMethod, InstanceMethod, MethodParseError};
pub use loopback::LoopbackFramework;
pub use registry::{get_framework_summaries, FrameworkRegistry, FrameworkSummary};
pub use trait_def::{CreateRequest, Framework};
