//! regen: merge freshly generated declaration trees into existing artifacts.
//!
//! - **merge**: one artifact, `regen merge --generated Order.cs.gen.json --existing Order.cs`
//! - **batch**: many artifacts, `regen batch -o out/ gen/*.gen.json`

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use regen::render::{self, Renderer};
use regen::{DeclarationTree, Engine, ParsedArtifact, Regeneration, Severity, SidecarParser};
use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Suffix of generated tree files picked up by `batch`.
const GENERATED_SUFFIX: &str = ".gen.json";

/// Suffix of the parsed-tree sidecar written by the external parser.
const TREE_SUFFIX: &str = ".tree.json";

#[derive(Parser)]
#[command(
    name = "regen",
    about = "Merge generated declarations into hand-edited source artifacts"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Output format: json (default), outline
    #[arg(short = 'f', long, default_value = "json", global = true)]
    format: String,
}

#[derive(Subcommand)]
enum Command {
    /// Merge one generated tree into one existing artifact
    Merge {
        /// Generated declaration tree (JSON)
        #[arg(long)]
        generated: PathBuf,

        /// Existing artifact. If omitted or missing, the generated tree is emitted as is.
        #[arg(long)]
        existing: Option<PathBuf>,

        /// Parsed tree of the existing artifact (defaults to `<existing>.tree.json`)
        #[arg(long, requires = "existing")]
        existing_tree: Option<PathBuf>,

        /// Output file (defaults to stdout)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// Merge every `<artifact>.gen.json` matched by the patterns
    Batch {
        /// Generated trees: files, directories or glob patterns
        #[arg(required = true)]
        patterns: Vec<String>,

        /// Output directory
        #[arg(short = 'o', long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let renderer = render::create_renderer(&cli.format)?;

    match &cli.command {
        Command::Merge {
            generated,
            existing,
            existing_tree,
            output,
        } => merge_mode(
            generated,
            existing.as_deref(),
            existing_tree.as_deref(),
            output.as_deref(),
            renderer.as_ref(),
        ),
        Command::Batch { patterns, output } => batch_mode(patterns, output, renderer.as_ref()),
    }
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "regen=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .with_target(false),
        )
        .init();
}

/// merge mode: one artifact, output to a file or stdout.
fn merge_mode(
    generated: &Path,
    existing: Option<&Path>,
    existing_tree: Option<&Path>,
    output: Option<&Path>,
    renderer: &dyn Renderer,
) -> Result<()> {
    let result = regenerate(generated, existing, existing_tree)?;
    let rendered = renderer.render(&result.tree);

    match output {
        Some(path) => fs::write(path, rendered)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{}", rendered),
    }
    Ok(())
}

/// batch mode: every artifact independently; failures are reported, not fatal.
fn batch_mode(patterns: &[String], output_dir: &Path, renderer: &dyn Renderer) -> Result<()> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;

    let inputs = expand_globs(patterns)?;
    let ext = renderer.file_extension();
    let mut failed = 0;

    for generated in &inputs {
        let artifact = artifact_path(generated);
        let result = regenerate(generated, Some(&artifact), None).and_then(|result| {
            let out_path = output_dir.join(format!("{}.{}", derive_output_name(&artifact), ext));
            fs::write(&out_path, renderer.render(&result.tree))
                .with_context(|| format!("failed to write {}", out_path.display()))
        });

        if let Err(err) = result {
            tracing::error!(artifact = %artifact.display(), "skipped: {:#}", err);
            failed += 1;
        }
    }

    tracing::info!("{} of {} artifacts merged", inputs.len() - failed, inputs.len());
    if failed > 0 {
        anyhow::bail!("{} of {} artifacts failed", failed, inputs.len());
    }
    Ok(())
}

/// Load the inputs of one artifact and run the engine on them.
fn regenerate(
    generated: &Path,
    existing: Option<&Path>,
    existing_tree: Option<&Path>,
) -> Result<Regeneration> {
    let json = fs::read_to_string(generated)
        .with_context(|| format!("failed to read {}", generated.display()))?;
    let generated_tree: DeclarationTree = serde_json::from_str(&json)
        .with_context(|| format!("invalid generated tree: {}", generated.display()))?;

    let Some(existing) = existing.filter(|p| p.is_file()) else {
        if let Some(missing) = existing {
            tracing::info!(artifact = %missing.display(), "no existing artifact yet");
        }
        let engine = Engine::new(SidecarParser::new(ParsedArtifact::default()));
        return Ok(engine.regenerate(generated_tree, None)?);
    };

    let text = fs::read_to_string(existing)
        .with_context(|| format!("failed to read {}", existing.display()))?;
    let tree_path = existing_tree
        .map(Path::to_path_buf)
        .unwrap_or_else(|| sidecar_path(existing));
    let tree_json = fs::read_to_string(&tree_path)
        .with_context(|| format!("failed to read parsed tree {}", tree_path.display()))?;

    let engine = Engine::new(
        SidecarParser::from_json(&tree_json)
            .with_context(|| format!("failed to load {}", tree_path.display()))?,
    );
    let result = engine
        .regenerate(generated_tree, Some(&text))
        .with_context(|| format!("failed to merge {}", existing.display()))?;

    for diag in result.diagnostics.records() {
        match diag.severity {
            Severity::Error | Severity::Warning => {
                tracing::warn!(artifact = %existing.display(), "{}", diag)
            }
            Severity::Note => tracing::debug!(artifact = %existing.display(), "{}", diag),
        }
    }
    tracing::info!(artifact = %existing.display(), "{}", result.report.summary());
    Ok(result)
}

/// Expand glob patterns into a list of generated tree files.
/// Also handles bare directory paths by scanning for `*.gen.json`.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        // If it's a directory, scan for generated trees (non-recursive)
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            for entry in entries.flatten() {
                let p = entry.path();
                let is_generated = p
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.ends_with(GENERATED_SUFFIX));
                if p.is_file() && is_generated {
                    files.push(p);
                }
            }
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            tracing::warn!("no files matched: {}", pattern);
        }
        files.extend(matches);
    }
    // Sort for deterministic output
    files.sort();
    files.dedup();
    Ok(files)
}

/// The artifact a generated tree belongs to: "gen/Order.cs.gen.json" → "gen/Order.cs".
fn artifact_path(generated: &Path) -> PathBuf {
    let name = generated
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let stem = name.strip_suffix(GENERATED_SUFFIX).unwrap_or(name);
    generated.with_file_name(stem)
}

/// "src/Order.cs" → "src/Order.cs.tree.json"
fn sidecar_path(artifact: &Path) -> PathBuf {
    let mut name = artifact.as_os_str().to_os_string();
    name.push(TREE_SUFFIX);
    PathBuf::from(name)
}

/// Output file name (without extension) for an artifact: "src/Order.cs" → "Order.cs".
fn derive_output_name(artifact: &Path) -> String {
    artifact
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "artifact".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_from_generated_name() {
        assert_eq!(artifact_path(Path::new("gen/Order.cs.gen.json")), PathBuf::from("gen/Order.cs"));
        assert_eq!(artifact_path(Path::new("Order.cs.gen.json")), PathBuf::from("Order.cs"));
    }

    #[test]
    fn artifact_without_suffix_keeps_name() {
        assert_eq!(artifact_path(Path::new("gen/tree.json")), PathBuf::from("gen/tree.json"));
    }

    #[test]
    fn sidecar_sits_next_to_artifact() {
        assert_eq!(sidecar_path(Path::new("src/Order.cs")), PathBuf::from("src/Order.cs.tree.json"));
    }

    #[test]
    fn output_name_is_artifact_file_name() {
        assert_eq!(derive_output_name(Path::new("src/Order.cs")), "Order.cs");
    }
}
