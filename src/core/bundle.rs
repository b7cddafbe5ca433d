//! Bundle header detection.
//!
//! A bundle may declare the framework it targets with a comment on its very
//! first line:
//!
//! ```text
//! // { "framework": "Vue", "version": "2.6.14" }
//! ```
//!
//! Detection is best-effort: bundles are untrusted, so anything that is not a
//! well-formed header means "no descriptor" and never blocks instance creation.

use std::sync::LazyLock;

use miette::{Diagnostic as MietteDiagnostic, NamedSource, SourceSpan};
use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

/// A `//` comment holding one brace-delimited object, confined to line 1.
static HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*// *(\{[^}\r\n]*\}) *(?:\r?\n|$)").expect("header pattern is valid")
});

/// Framework descriptor declared by a bundle header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BundleDescriptor {
    /// Declared framework name (e.g., "Vue", "Rax")
    pub framework: Option<String>,

    /// Declared bundle version
    pub version: Option<String>,

    /// Any other keys present in the header object
    pub extra: Map<String, Value>,
}

impl BundleDescriptor {
    fn from_object(mut object: Map<String, Value>) -> Self {
        let framework = match object.remove("framework") {
            Some(Value::String(name)) => Some(name),
            _ => None,
        };
        let version = match object.remove("version") {
            Some(Value::String(version)) => Some(version),
            Some(Value::Number(version)) => Some(version.to_string()),
            _ => None,
        };

        BundleDescriptor {
            framework,
            version,
            extra: object,
        }
    }

    /// Interpret the declared version as semver, padding short forms.
    ///
    /// `"1"` and `"1.0"` become `1.0.0`; a leading `v` is accepted.
    pub fn semver(&self) -> Option<semver::Version> {
        let raw = self.version.as_deref()?.trim();
        let raw = raw.strip_prefix('v').unwrap_or(raw);

        if let Ok(version) = semver::Version::parse(raw) {
            return Some(version);
        }

        let parts: Vec<&str> = raw.split('.').collect();
        if parts.len() > 3 {
            return None;
        }
        let mut numbers = [0u64; 3];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            *slot = part.parse().ok()?;
        }
        Some(semver::Version::new(numbers[0], numbers[1], numbers[2]))
    }
}

/// A header line that looks like a descriptor but does not parse.
#[derive(Debug, Error, MietteDiagnostic)]
#[error("malformed bundle header: {reason}")]
#[diagnostic(
    code(switchyard::bundle::malformed_header),
    help("the first line must be a `//` comment holding one JSON object with `framework` and `version` keys")
)]
pub struct MalformedHeader {
    /// JSON parser message
    pub reason: String,
    #[source_code]
    pub src: NamedSource<String>,
    #[label("not a valid JSON object")]
    pub span: SourceSpan,
}

/// Outcome of scanning a bundle's first line.
#[derive(Debug)]
pub enum HeaderScan {
    /// No header comment on the first line
    Absent,
    /// A header comment whose payload is not valid JSON
    Malformed(MalformedHeader),
    /// A parsed descriptor
    Found(BundleDescriptor),
}

impl HeaderScan {
    /// The descriptor, if one was found.
    pub fn descriptor(&self) -> Option<&BundleDescriptor> {
        match self {
            HeaderScan::Found(descriptor) => Some(descriptor),
            _ => None,
        }
    }

    /// Short status label for display.
    pub fn status(&self) -> &'static str {
        match self {
            HeaderScan::Absent => "absent",
            HeaderScan::Malformed(_) => "malformed",
            HeaderScan::Found(_) => "found",
        }
    }
}

/// Scan the first line of `code`, keeping malformed payloads for reporting.
///
/// `name` labels the source in diagnostics (usually the bundle path).
pub fn scan_header(name: &str, code: &str) -> HeaderScan {
    let Some(payload) = HEADER.captures(code).and_then(|c| c.get(1)) else {
        return HeaderScan::Absent;
    };

    match serde_json::from_str::<Map<String, Value>>(payload.as_str()) {
        Ok(object) => HeaderScan::Found(BundleDescriptor::from_object(object)),
        Err(e) => {
            let first_line = code.lines().next().unwrap_or_default().to_string();
            HeaderScan::Malformed(MalformedHeader {
                reason: e.to_string(),
                src: NamedSource::new(name, first_line),
                span: (payload.start(), payload.len()).into(),
            })
        }
    }
}

/// Detect the descriptor declared by a bundle, if any.
///
/// Malformed headers are treated exactly like missing ones.
pub fn detect(code: &str) -> Option<BundleDescriptor> {
    let payload = HEADER.captures(code)?.get(1)?;
    serde_json::from_str::<Map<String, Value>>(payload.as_str())
        .ok()
        .map(BundleDescriptor::from_object)
}

/// Pick the framework an instance binds to.
///
/// The declared framework wins when it is registered; everything else falls
/// back to `default`.
pub fn resolve_framework<'a>(
    descriptor: Option<&'a BundleDescriptor>,
    is_registered: impl Fn(&str) -> bool,
    default: &'a str,
) -> &'a str {
    descriptor
        .and_then(|d| d.framework.as_deref())
        .filter(|name| is_registered(name))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_header() {
        let code = "// {\"framework\":\"Rax\",\"version\":\"1.0\"}\nvar a = 1;";
        let descriptor = detect(code).unwrap();
        assert_eq!(descriptor.framework.as_deref(), Some("Rax"));
        assert_eq!(descriptor.version.as_deref(), Some("1.0"));
        assert!(descriptor.extra.is_empty());
    }

    #[test]
    fn test_detect_spacing_and_crlf() {
        let code = "  //   { \"framework\": \"Vue\" }  \r\nnew Vue({})";
        let descriptor = detect(code).unwrap();
        assert_eq!(descriptor.framework.as_deref(), Some("Vue"));
        assert!(descriptor.version.is_none());
    }

    #[test]
    fn test_detect_header_only_bundle() {
        let descriptor = detect("// {\"framework\":\"Vue\"}").unwrap();
        assert_eq!(descriptor.framework.as_deref(), Some("Vue"));
    }

    #[test]
    fn test_detect_keeps_extra_keys() {
        let descriptor = detect("// {\"framework\":\"Rax\",\"version\":2,\"minify\":true}\n").unwrap();
        assert_eq!(descriptor.version.as_deref(), Some("2"));
        assert_eq!(descriptor.extra.get("minify"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_detect_none() {
        assert!(detect("").is_none());
        assert!(detect("var a = 1;\n").is_none());
        assert!(detect("/* {\"framework\":\"Rax\"} */\n").is_none());
        // Only the first line counts
        assert!(detect("\n// {\"framework\":\"Rax\"}\n").is_none());
        assert!(detect("var a;\n// {\"framework\":\"Rax\"}\n").is_none());
        // Nested objects are not a single flat object
        assert!(detect("// {\"framework\":{\"name\":\"Rax\"}}\n").is_none());
        // Trailing code on the header line
        assert!(detect("// {\"framework\":\"Rax\"} var a;\n").is_none());
    }

    #[test]
    fn test_detect_malformed_json_is_swallowed() {
        assert!(detect("// {framework: Rax}\nvar a;").is_none());
        assert!(detect("// {\"framework\":\"Rax\",}\n").is_none());
    }

    #[test]
    fn test_non_string_framework_is_ignored() {
        let descriptor = detect("// {\"framework\":42,\"version\":\"1.0\"}\n").unwrap();
        assert!(descriptor.framework.is_none());
        assert_eq!(descriptor.version.as_deref(), Some("1.0"));
    }

    #[test]
    fn test_scan_header() {
        assert!(matches!(scan_header("a.js", "var a;"), HeaderScan::Absent));

        let found = scan_header("a.js", "// {\"framework\":\"Vue\"}\n");
        assert_eq!(found.status(), "found");
        assert_eq!(
            found.descriptor().and_then(|d| d.framework.as_deref()),
            Some("Vue")
        );

        match scan_header("a.js", "// {framework: Vue}\nvar a;") {
            HeaderScan::Malformed(err) => {
                assert_eq!(err.span.offset(), 3);
                assert_eq!(err.span.len(), "{framework: Vue}".len());
                assert!(err.to_string().contains("malformed bundle header"));
            }
            other => panic!("expected malformed header, got {:?}", other),
        }
    }

    #[test]
    fn test_semver() {
        let mut descriptor = BundleDescriptor {
            version: Some("1.0".to_string()),
            ..Default::default()
        };
        assert_eq!(descriptor.semver(), Some(semver::Version::new(1, 0, 0)));

        descriptor.version = Some("v2.6.14".to_string());
        assert_eq!(descriptor.semver(), Some(semver::Version::new(2, 6, 14)));

        descriptor.version = Some("3".to_string());
        assert_eq!(descriptor.semver(), Some(semver::Version::new(3, 0, 0)));

        descriptor.version = Some("latest".to_string());
        assert!(descriptor.semver().is_none());

        descriptor.version = None;
        assert!(descriptor.semver().is_none());
    }

    #[test]
    fn test_resolve_framework() {
        let rax = detect("// {\"framework\":\"Rax\",\"version\":\"1.0\"}\n").unwrap();
        let registered = |name: &str| name == "Rax" || name == "Weex";

        assert_eq!(resolve_framework(Some(&rax), registered, "Weex"), "Rax");
        assert_eq!(resolve_framework(Some(&rax), |_| false, "Weex"), "Weex");
        assert_eq!(resolve_framework(None, registered, "Weex"), "Weex");

        let anonymous = BundleDescriptor::default();
        assert_eq!(resolve_framework(Some(&anonymous), registered, "Weex"), "Weex");
    }
}
