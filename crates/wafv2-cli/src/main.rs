//! wafv2 - synthesize, validate and diff WAFv2 CloudFormation templates

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use wafv2_stack::{Stack, StackConfig, StackManifest, ValidationReport, Validator};
use wafv2_template::{diff, ChangeImpact, Template};

#[derive(Parser)]
#[command(name = "wafv2")]
#[command(about = "WAFv2 CloudFormation templates: synthesize, validate, diff")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a template from a TOML or JSON manifest
    Synth {
        /// Manifest path (.toml or .json)
        manifest: PathBuf,

        /// Write the template here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check a manifest or a template without writing anything
    Validate {
        /// Manifest or template path
        file: PathBuf,

        /// Deployment region; defaults to the manifest's region
        #[arg(short, long)]
        region: Option<String>,

        /// Fail on warnings too
        #[arg(long)]
        deny_warnings: bool,
    },
    /// Show what deploying <new> over <old> would change
    Diff {
        old: PathBuf,
        new: PathBuf,

        /// Exit with status 1 if any resource would be replaced or removed
        #[arg(long)]
        fail_on_replacement: bool,
    },
    /// Print the SHA-256 fingerprint of a template's canonical form
    Fingerprint {
        /// Manifest or template path
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Synth { manifest, output } => synth(&manifest, output.as_deref()),
        Commands::Validate {
            file,
            region,
            deny_warnings,
        } => validate(&file, region, deny_warnings),
        Commands::Diff {
            old,
            new,
            fail_on_replacement,
        } => diff_files(&old, &new, fail_on_replacement),
        Commands::Fingerprint { file } => {
            let (template, _) = load(&file)?;
            println!("{}", template.fingerprint()?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// A template and, for manifests, the settings that came with it.
fn load(path: &Path) -> anyhow::Result<(Template, Option<StackConfig>)> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        let value: serde_json::Value =
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
        // Templates have a top-level `Resources` map; manifests use `resources`.
        if value.get("Resources").is_some() {
            debug!(path = %path.display(), "loading template");
            let template = Template::from_value(value)
                .with_context(|| format!("reading template {}", path.display()))?;
            return Ok((template, None));
        }
    }

    let manifest =
        StackManifest::load(path).with_context(|| format!("reading manifest {}", path.display()))?;
    let config = manifest.config.clone();
    let stack = Stack::from_manifest(manifest)?;
    Ok((stack.into_template(), Some(config)))
}

fn print_report(report: &ValidationReport) {
    for finding in &report.findings {
        eprintln!("{}", finding);
    }
}

fn synth(manifest: &Path, output: Option<&Path>) -> anyhow::Result<ExitCode> {
    let loaded = StackManifest::load(manifest)
        .with_context(|| format!("reading manifest {}", manifest.display()))?;
    let stack = Stack::from_manifest(loaded)?;

    let synthesized = match stack.synth() {
        Ok(synthesized) => synthesized,
        Err(wafv2_stack::StackError::Validation(report)) => {
            print_report(&report);
            eprintln!(
                "synthesis failed: {} error(s), {} warning(s)",
                report.error_count(),
                report.warning_count()
            );
            return Ok(ExitCode::FAILURE);
        }
        Err(err) => return Err(err.into()),
    };
    print_report(&synthesized.report);

    let text = stack.render(&synthesized)?;
    match output {
        Some(path) => {
            fs::write(path, format!("{}\n", text))
                .with_context(|| format!("writing {}", path.display()))?;
            eprintln!("wrote {} ({})", path.display(), synthesized.fingerprint.short());
        }
        None => println!("{}", text),
    }
    Ok(ExitCode::SUCCESS)
}

fn validate(path: &Path, region: Option<String>, deny_warnings: bool) -> anyhow::Result<ExitCode> {
    let (template, config) = load(path)?;
    template.check_references()?;

    let mut config = config.unwrap_or_default();
    if let Some(region) = region {
        config = config.with_region(region);
    }
    let deny_warnings = deny_warnings || config.validation.deny_warnings;

    let report = Validator::with_config(config.validation.clone())
        .validate(&template, &config.stack.region);
    print_report(&report);

    if report.is_ok(deny_warnings) {
        println!(
            "{}: ok ({} resource(s), {} warning(s))",
            path.display(),
            template.len(),
            report.warning_count()
        );
        Ok(ExitCode::SUCCESS)
    } else {
        println!(
            "{}: {} error(s), {} warning(s)",
            path.display(),
            report.error_count(),
            report.warning_count()
        );
        Ok(ExitCode::FAILURE)
    }
}

fn diff_files(old: &Path, new: &Path, fail_on_replacement: bool) -> anyhow::Result<ExitCode> {
    let (old_template, _) = load(old)?;
    let (new_template, _) = load(new)?;
    let changes = diff(&old_template, &new_template)?;
    if changes.is_empty() {
        println!("No changes ({})", changes.new_fingerprint.short());
        return Ok(ExitCode::SUCCESS);
    }
    print!("{}", changes.summary());

    let impact = changes.impact();
    println!("Impact: {}", impact);
    if fail_on_replacement && impact >= ChangeImpact::Replacement {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
