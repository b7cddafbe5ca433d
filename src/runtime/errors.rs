//! Dispatch error types and diagnostics.
//!
//! Every bridge entry point returns these as values. Framework failures are
//! carried through untouched in [`DispatchError::Framework`].

use serde_json::Value;
use thiserror::Error;

use crate::util::diagnostic::Diagnostic;

/// Result of a bridge entry point.
pub type DispatchResult = Result<Value, DispatchError>;

/// Error returned by a bridge entry point.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("invalid instance id \"{0}\"")]
    InvalidInstanceId(String),

    #[error("framework `{framework}` does not support `{method}`")]
    MethodNotSupported {
        framework: String,
        method: &'static str,
    },

    #[error("framework `{0}` is not registered")]
    FrameworkUnavailable(String),

    #[error("unknown method `{0}`")]
    UnknownMethod(String),

    #[error("invalid arguments for `{method}`: {reason}")]
    InvalidArguments {
        method: &'static str,
        reason: String,
    },

    #[error(transparent)]
    Framework(#[from] anyhow::Error),
}

impl DispatchError {
    /// Stable machine-readable kind, for bridges that marshal errors by tag.
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::InvalidInstanceId(_) => "InvalidInstanceId",
            DispatchError::MethodNotSupported { .. } => "MethodNotSupported",
            DispatchError::FrameworkUnavailable(_) => "FrameworkUnavailable",
            DispatchError::UnknownMethod(_) => "UnknownMethod",
            DispatchError::InvalidArguments { .. } => "InvalidArguments",
            DispatchError::Framework(_) => "FrameworkError",
        }
    }

    /// Check if this is an invalid-instance-id error.
    pub fn is_invalid_instance_id(&self) -> bool {
        matches!(self, DispatchError::InvalidInstanceId(_))
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            DispatchError::InvalidInstanceId(id) => Diagnostic::error(self.to_string())
                .with_context(format!(
                    "instance `{}` was never created, was already destroyed, or already exists",
                    id
                ))
                .with_suggestion("Call `createInstance` before routing calls to an instance")
                .with_suggestion("Destroy an instance before creating its id again"),

            DispatchError::MethodNotSupported { framework, method } => {
                Diagnostic::error(self.to_string())
                    .with_context(format!(
                        "`{}` does not declare `{}` in its capabilities",
                        framework, method
                    ))
                    .with_suggestion(format!(
                        "Implement `{}` in `{}` and declare it in its capabilities",
                        method, framework
                    ))
            }

            DispatchError::FrameworkUnavailable(name) => Diagnostic::error(self.to_string())
                .with_suggestion(format!("Register a framework named `{}` at startup", name))
                .with_suggestion("Check `runtime.default_framework` in your settings"),

            DispatchError::UnknownMethod(name) => Diagnostic::error(self.to_string())
                .with_context(format!("`{}` is not part of the public method table", name))
                .with_suggestion("Check the method name against the bridge protocol"),

            DispatchError::InvalidArguments { method, reason } => {
                Diagnostic::error(format!("invalid arguments for `{}`", method))
                    .with_context(reason.clone())
            }

            DispatchError::Framework(e) => {
                let mut diag = Diagnostic::error(format!("framework error: {}", e));
                for cause in e.chain().skip(1) {
                    diag = diag.with_context(cause.to_string());
                }
                diag
            }
        }
    }
}
