//! Framework capability types.
//!
//! Beyond instance creation, every framework method is optional. A framework
//! declares which ones it implements up front; the runtime consults the
//! declaration instead of probing for methods at call time.

use std::collections::BTreeSet;

use thiserror::Error;

/// Methods routed to the one framework owning an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InstanceMethod {
    /// Tear the instance down
    DestroyInstance,
    /// Push fresh data into the instance
    RefreshInstance,
    /// Deliver a batch of tasks from the native side
    ReceiveTasks,
    /// Fetch the instance's root element
    GetRoot,
}

impl InstanceMethod {
    /// All routed methods.
    pub const ALL: [InstanceMethod; 4] = [
        InstanceMethod::DestroyInstance,
        InstanceMethod::RefreshInstance,
        InstanceMethod::ReceiveTasks,
        InstanceMethod::GetRoot,
    ];

    /// Bridge name of the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceMethod::DestroyInstance => "destroyInstance",
            InstanceMethod::RefreshInstance => "refreshInstance",
            InstanceMethod::ReceiveTasks => "receiveTasks",
            InstanceMethod::GetRoot => "getRoot",
        }
    }
}

impl std::fmt::Display for InstanceMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for InstanceMethod {
    type Err = MethodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InstanceMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| MethodParseError(s.to_string()))
    }
}

/// Registration methods broadcast to every framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GlobalMethod {
    /// Register native components
    RegisterComponents,
    /// Register native modules
    RegisterModules,
    /// Register custom methods
    RegisterMethods,
}

impl GlobalMethod {
    /// All broadcast methods.
    pub const ALL: [GlobalMethod; 3] = [
        GlobalMethod::RegisterComponents,
        GlobalMethod::RegisterModules,
        GlobalMethod::RegisterMethods,
    ];

    /// Bridge name of the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            GlobalMethod::RegisterComponents => "registerComponents",
            GlobalMethod::RegisterModules => "registerModules",
            GlobalMethod::RegisterMethods => "registerMethods",
        }
    }
}

impl std::fmt::Display for GlobalMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for GlobalMethod {
    type Err = MethodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GlobalMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| MethodParseError(s.to_string()))
    }
}

/// Error returned when parsing an unknown method name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown framework method '{0}'")]
pub struct MethodParseError(pub String);

/// Optional methods a framework implements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameworkCapabilities {
    instance: BTreeSet<InstanceMethod>,
    global: BTreeSet<GlobalMethod>,
}

impl FrameworkCapabilities {
    /// No optional methods: the framework can only create instances.
    pub fn none() -> Self {
        Self::default()
    }

    /// Every optional method.
    pub fn all() -> Self {
        FrameworkCapabilities {
            instance: InstanceMethod::ALL.into_iter().collect(),
            global: GlobalMethod::ALL.into_iter().collect(),
        }
    }

    /// Declare a routed method.
    pub fn with_instance_method(mut self, method: InstanceMethod) -> Self {
        self.instance.insert(method);
        self
    }

    /// Declare a broadcast method.
    pub fn with_global_method(mut self, method: GlobalMethod) -> Self {
        self.global.insert(method);
        self
    }

    /// Drop a routed method.
    pub fn without_instance_method(mut self, method: InstanceMethod) -> Self {
        self.instance.remove(&method);
        self
    }

    /// Drop a broadcast method.
    pub fn without_global_method(mut self, method: GlobalMethod) -> Self {
        self.global.remove(&method);
        self
    }

    pub fn supports_instance(&self, method: InstanceMethod) -> bool {
        self.instance.contains(&method)
    }

    pub fn supports_global(&self, method: GlobalMethod) -> bool {
        self.global.contains(&method)
    }

    /// Declared routed methods, sorted.
    pub fn instance_methods(&self) -> impl Iterator<Item = InstanceMethod> + '_ {
        self.instance.iter().copied()
    }

    /// Declared broadcast methods, sorted.
    pub fn global_methods(&self) -> impl Iterator<Item = GlobalMethod> + '_ {
        self.global.iter().copied()
    }
}
