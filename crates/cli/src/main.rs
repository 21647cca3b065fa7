//! Specdocs CLI
//!
//! Command-line interface for filtering OpenAPI specifications against a
//! path whitelist and keeping generated documentation artifacts in sync.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use specdocs_common::{load_document, write_document, SpecDefaults};
use specdocs_convert::{convert_to_openapi3, is_swagger2};
use specdocs_docgen::{groups_from_spec, patch_manifest, PageStubGenerator};
use specdocs_filter::{filter_spec, FilterReport, WhitelistConfig};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "specdocs")]
#[command(version, about = "Filter OpenAPI specs and keep generated reference docs in sync", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter a spec against a whitelist and write the reduced spec
    #[command(after_help = "EXAMPLES:\n  \
        # Filter a spec and write the public subset\n  \
        specdocs filter --spec swagger.json --whitelist openapi-whitelist.yaml --output openapi.json\n\n  \
        # Filter, then also regenerate page stubs and the navigation manifest\n  \
        specdocs filter \\\n    \
        --spec swagger.json \\\n    \
        --whitelist openapi-whitelist.yaml \\\n    \
        --output docs/openapi.json \\\n    \
        --pages-dir docs \\\n    \
        --manifest docs/mint.json")]
    Filter {
        /// Path to the input spec (JSON or YAML)
        #[arg(short, long)]
        spec: PathBuf,

        /// Path to the whitelist config (JSON or YAML)
        #[arg(short, long)]
        whitelist: PathBuf,

        /// Path for the filtered spec (written as JSON)
        #[arg(short, long)]
        output: PathBuf,

        /// Also generate MDX page stubs under this directory
        #[arg(long)]
        pages_dir: Option<PathBuf>,

        /// Also update this navigation manifest
        #[arg(long)]
        manifest: Option<PathBuf>,
    },

    /// Convert a Swagger 2.0 spec to OpenAPI 3.0
    #[command(after_help = "EXAMPLES:\n  \
        specdocs convert --spec swagger.json --output openapi.json")]
    Convert {
        /// Path to the input spec (JSON or YAML)
        #[arg(short, long)]
        spec: PathBuf,

        /// Path for the converted spec (written as JSON)
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Generate MDX page stubs from an already-filtered spec
    #[command(after_help = "EXAMPLES:\n  \
        specdocs pages --spec docs/openapi.json --output docs")]
    Pages {
        /// Path to the spec (JSON or YAML)
        #[arg(short, long)]
        spec: PathBuf,

        /// Docs root the api-reference tree is written under
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Update a navigation manifest from a spec
    #[command(after_help = "EXAMPLES:\n  \
        specdocs nav --spec docs/openapi.json --manifest docs/mint.json")]
    Nav {
        /// Path to the spec (JSON or YAML)
        #[arg(short, long)]
        spec: PathBuf,

        /// Path to the navigation manifest
        #[arg(short, long)]
        manifest: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Filter {
            spec,
            whitelist,
            output,
            pages_dir,
            manifest,
        } => filter_command(
            &spec,
            &whitelist,
            &output,
            pages_dir.as_deref(),
            manifest.as_deref(),
            cli.verbose,
        ),
        Commands::Convert { spec, output } => convert_command(&spec, &output),
        Commands::Pages { spec, output } => pages_command(&spec, &output, cli.verbose),
        Commands::Nav { spec, manifest } => nav_command(&spec, &manifest),
    }
}

fn filter_command(
    spec_path: &Path,
    whitelist_path: &Path,
    output: &Path,
    pages_dir: Option<&Path>,
    manifest_path: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    println!("{} Filtering spec: {}", "→".cyan(), spec_path.display());

    let spec = load_document(spec_path).context("Failed to load input spec")?;
    let config = WhitelistConfig::load(whitelist_path).context("Failed to load whitelist")?;

    println!(
        "{} {} include patterns, {} exclude patterns",
        "→".cyan(),
        config.include_paths.len(),
        config.exclude_paths.len()
    );

    let defaults = SpecDefaults::default();
    let outcome = filter_spec(&spec, &config, &defaults).context("Failed to filter spec")?;
    report_filtering(&outcome.report, verbose);

    let mut filtered = outcome.spec;
    if is_swagger2(&filtered) {
        println!("{} Converting Swagger 2.0 to OpenAPI 3.0...", "→".cyan());
        filtered = convert_to_openapi3(&filtered, &defaults);
    }

    write_document(output, &filtered).context("Failed to write filtered spec")?;
    println!("{} Written to: {}", "✓".green(), output.display());

    if let Some(pages_dir) = pages_dir {
        generate_pages(&filtered, pages_dir, verbose)?;
    }
    if let Some(manifest_path) = manifest_path {
        update_manifest(&filtered, manifest_path)?;
    }

    Ok(())
}

fn convert_command(spec_path: &Path, output: &Path) -> Result<()> {
    println!("{} Converting spec: {}", "→".cyan(), spec_path.display());

    let spec = load_document(spec_path).context("Failed to load input spec")?;
    if !is_swagger2(&spec) {
        println!("{} Already OpenAPI 3.x, copying through", "→".cyan());
    }

    let converted = convert_to_openapi3(&spec, &SpecDefaults::default());
    write_document(output, &converted).context("Failed to write converted spec")?;

    println!("{} Written to: {}", "✓".green(), output.display());
    Ok(())
}

fn pages_command(spec_path: &Path, output: &Path, verbose: bool) -> Result<()> {
    let spec = load_document(spec_path).context("Failed to load spec")?;
    generate_pages(&spec, output, verbose)
}

fn nav_command(spec_path: &Path, manifest_path: &Path) -> Result<()> {
    let spec = load_document(spec_path).context("Failed to load spec")?;
    update_manifest(&spec, manifest_path)
}

fn report_filtering(report: &FilterReport, verbose: bool) {
    if verbose {
        for path in &report.retained_paths {
            println!("  Including: {}", path);
        }
    }

    println!(
        "{} {} paths considered: {} included, {} excluded",
        "✓".green(),
        report.considered,
        report.included,
        report.excluded
    );

    for name in &report.unresolved {
        eprintln!(
            "{} Unresolved schema reference: {} (omitted from output)",
            "⚠".yellow(),
            name
        );
    }
}

fn generate_pages(spec: &serde_json::Value, output: &Path, verbose: bool) -> Result<()> {
    println!("{} Generating page stubs...", "→".cyan());

    let generator = PageStubGenerator::new().context("Failed to create page generator")?;
    let pages = generator
        .generate(spec, output)
        .context("Failed to generate page stubs")?;

    if verbose {
        for page in &pages {
            println!("  Generated: {}", page.page);
        }
    }
    println!("{} Generated {} page stubs", "✓".green(), pages.len());
    Ok(())
}

fn update_manifest(spec: &serde_json::Value, manifest_path: &Path) -> Result<()> {
    println!(
        "{} Updating navigation manifest: {}",
        "→".cyan(),
        manifest_path.display()
    );

    let mut manifest = load_document(manifest_path).context("Failed to load manifest")?;
    let groups = groups_from_spec(spec);
    let report =
        patch_manifest(&mut manifest, &groups).context("Failed to patch manifest navigation")?;
    write_document(manifest_path, &manifest).context("Failed to write manifest")?;

    println!(
        "{} Navigation updated: {} updated, {} added, {} removed",
        "✓".green(),
        report.updated,
        report.added,
        report.removed
    );
    Ok(())
}
