//! `switchyard detect` command
//!
//! Show the header each bundle declares and the framework it would bind to.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::DetectArgs;
use switchyard::core::bundle::{resolve_framework, scan_header, HeaderScan};
use switchyard::util::diagnostic::{self, render_report, suggestions, Diagnostic};

use super::{framework_names, load_settings};

/// Detection result for one bundle.
#[derive(Debug, Serialize)]
struct BundleReport {
    bundle: String,
    header: &'static str,
    declared_framework: Option<String>,
    version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    semver: Option<String>,
    framework: String,
    fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub fn execute(args: DetectArgs, color: bool) -> Result<()> {
    let config = load_settings()?;
    let registered = framework_names(&config, &args.frameworks);
    let default = config.default_framework();

    let mut reports = Vec::new();
    for path in &args.bundles {
        let code = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read bundle: {}", path.display()))?;
        let name = path.display().to_string();
        let scan = scan_header(&name, &code);

        if let HeaderScan::Malformed(ref malformed) = scan {
            eprint!("{}", render_report(malformed, color));
        }

        let descriptor = scan.descriptor();
        let framework = resolve_framework(
            descriptor,
            |candidate| registered.iter().any(|r| r == candidate),
            default,
        );
        let declared = descriptor.and_then(|d| d.framework.clone());

        reports.push(BundleReport {
            bundle: name,
            header: scan.status(),
            fallback: declared.as_deref() != Some(framework),
            framework: framework.to_string(),
            declared_framework: declared,
            version: descriptor.and_then(|d| d.version.clone()),
            semver: descriptor.and_then(|d| d.semver()).map(|v| v.to_string()),
            error: match scan {
                HeaderScan::Malformed(ref malformed) => Some(malformed.reason.clone()),
                _ => None,
            },
        });
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    for (report, path) in reports.iter().zip(&args.bundles) {
        print_report(report);
        let diag = match report.declared_framework {
            Some(ref declared) if report.fallback => Diagnostic::warning(format!(
                "`{}` is not registered, binding to `{}`",
                declared, report.framework
            ))
            .with_context(format!("registered frameworks: {}", registered.join(", ")))
            .with_suggestion(suggestions::REGISTER_FRAMEWORK),
            None if report.header == "absent" => Diagnostic::note(format!(
                "no framework declared, binding to `{}`",
                report.framework
            ))
            .with_suggestion(suggestions::DECLARE_FRAMEWORK),
            _ => continue,
        };
        diagnostic::emit(&diag.with_location(path), color);
    }

    Ok(())
}

fn print_report(report: &BundleReport) {
    println!("{}", report.bundle);
    println!("  Header:     {}", report.header);
    if let Some(ref declared) = report.declared_framework {
        println!("  Declared:   {}", declared);
    }
    match (&report.version, &report.semver) {
        (Some(version), Some(semver)) if version != semver => {
            println!("  Version:    {} ({})", version, semver)
        }
        (Some(version), _) => println!("  Version:    {}", version),
        (None, _) => {}
    }
    let how = if report.fallback { "default" } else { "declared" };
    println!("  Framework:  {} ({})", report.framework, how);
    println!();
}
