//! shelf - manage a shared library of agent skills and rules
//!
//! Thin presentation layer over `shelf-core`: resolves the two roots,
//! renders listings, and supplies the interactive confirmation capability
//! the engines require.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;

use shelf_core::{
    Asset, AssetKind, AssetRepository, Config, DeploymentEngine, Direction, SyncEngine,
    SyncOutcome,
};

mod prompt;

use prompt::TerminalPrompt;

/// Manage a shared library of agent skills and rules
#[derive(Parser)]
#[command(name = "shelf")]
#[command(about = "Deploy and sync agent skills/rules between a shared library and a workspace", long_about = None)]
struct Cli {
    /// Library root (overrides the configured path)
    #[arg(long, global = true)]
    library: Option<PathBuf>,

    /// Workspace root (defaults to the current directory)
    #[arg(long, global = true)]
    workspace: Option<PathBuf>,

    /// Accept informational confirmations without prompting
    #[arg(short = 'y', long, global = true)]
    yes: bool,

    /// Accept all confirmations, including destructive ones
    #[arg(long, global = true)]
    force: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Skill,
    Rule,
}

impl From<KindArg> for AssetKind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::Skill => AssetKind::Skill,
            KindArg::Rule => AssetKind::Rule,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List library assets
    List {
        #[arg(value_enum)]
        kind: KindArg,
    },
    /// List assets deployed in the workspace
    Deployed {
        #[arg(value_enum)]
        kind: KindArg,
    },
    /// Show workspace assets with actionable drift
    Drift {
        #[arg(value_enum)]
        kind: KindArg,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Deploy a library asset into the workspace
    Deploy {
        #[arg(value_enum)]
        kind: KindArg,
        id: String,
    },
    /// Remove a deployed asset from the workspace
    Remove {
        #[arg(value_enum)]
        kind: KindArg,
        id: String,
    },
    /// Push a workspace asset's content to the library
    Push {
        #[arg(value_enum)]
        kind: KindArg,
        id: String,
    },
    /// Pull library content into the workspace copy
    Pull {
        #[arg(value_enum)]
        kind: KindArg,
        id: String,
    },
    /// Create a new skill skeleton in the library
    Scaffold {
        name: String,
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Persist the library root in ~/.shelf/config.toml
    SetLibrary { path: PathBuf },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Commands::SetLibrary { path } = &cli.command {
        let mut config = Config::load()?;
        config.library_path = Some(path.clone());
        config.save()?;
        println!("Library root set to {}", path.display());
        return Ok(());
    }

    let library_root = resolve_library_root(cli.library.clone())?;
    let workspace_root = match cli.workspace.clone() {
        Some(path) => path,
        None => std::env::current_dir().context("Failed to resolve current directory")?,
    };
    debug!(
        "Using library {:?}, workspace {:?}",
        library_root, workspace_root
    );

    let mut repo = AssetRepository::open(&library_root, &workspace_root);
    let prompt = TerminalPrompt {
        assume_yes: cli.yes,
        force: cli.force,
    };

    match cli.command {
        Commands::List { kind } => {
            render_assets(repo.list_library(kind.into()));
        }
        Commands::Deployed { kind } => {
            render_assets(&repo.list_deployed(kind.into()));
        }
        Commands::Drift { kind, json } => {
            let drifted = repo.list_working_only(kind.into());
            if json {
                println!("{}", serde_json::to_string_pretty(&drifted)?);
            } else if drifted.is_empty() {
                println!("No drift.");
            } else {
                for asset in &drifted {
                    let status = asset.status.map(|s| s.as_str()).unwrap_or("-");
                    let hint = asset.sync_hint.as_deref().unwrap_or("");
                    println!("{:<24} {:<12} {}", asset.id, status, hint);
                }
            }
        }
        Commands::Deploy { kind, id } => {
            let asset = find_library_asset(&repo, kind.into(), &id)?;
            DeploymentEngine::new(&mut repo, &prompt).deploy(&asset)?;
            println!("Deployed {} '{}'.", asset.kind.label(), asset.id);
        }
        Commands::Remove { kind, id } => {
            let kind: AssetKind = kind.into();
            match DeploymentEngine::new(&mut repo, &prompt).remove(kind, &id)? {
                SyncOutcome::Completed => println!("Removed {} '{}'.", kind.label(), id),
                SyncOutcome::Declined => println!("Aborted, nothing removed."),
            }
        }
        Commands::Push { kind, id } => {
            run_sync(&mut repo, &prompt, kind.into(), &id, Direction::Up)?;
        }
        Commands::Pull { kind, id } => {
            run_sync(&mut repo, &prompt, kind.into(), &id, Direction::Down)?;
        }
        Commands::Scaffold { name, description } => {
            let asset =
                DeploymentEngine::new(&mut repo, &prompt).scaffold_skill(&name, &description)?;
            println!("Scaffolded skill '{}' at {}", asset.id, asset.location.display());
        }
        Commands::SetLibrary { .. } => unreachable!("handled before root resolution"),
    }

    Ok(())
}

/// Explicit flag wins; otherwise the configured library path
fn resolve_library_root(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path);
    }
    let config = Config::load()?;
    let root = config.library_root()?;
    Ok(root.to_path_buf())
}

/// Resolve the asset an id refers to, preferring the workspace-side instance
/// (it carries the scanned location, including legacy rule dirs) and falling
/// back to the library listing
fn resolve_asset(repo: &AssetRepository, kind: AssetKind, id: &str) -> Option<Asset> {
    repo.list_deployed(kind)
        .into_iter()
        .find(|a| a.id == id)
        .or_else(|| repo.library_asset(kind, id).cloned())
}

fn find_library_asset(repo: &AssetRepository, kind: AssetKind, id: &str) -> Result<Asset> {
    repo.library_asset(kind, id)
        .cloned()
        .with_context(|| format!("no {} '{}' in the library", kind.label(), id))
}

fn run_sync(
    repo: &mut AssetRepository,
    prompt: &TerminalPrompt,
    kind: AssetKind,
    id: &str,
    direction: Direction,
) -> Result<()> {
    let asset = resolve_asset(repo, kind, id)
        .with_context(|| format!("unknown {} '{}'", kind.label(), id))?;
    match SyncEngine::new(repo, prompt).sync(&asset, direction)? {
        SyncOutcome::Completed => {
            let verb = match direction {
                Direction::Up => "Pushed",
                Direction::Down => "Pulled",
            };
            println!("{verb} {} '{}'.", kind.label(), id);
        }
        SyncOutcome::Declined => println!("Aborted, nothing changed."),
    }
    Ok(())
}

fn render_assets(assets: &[Asset]) {
    if assets.is_empty() {
        println!("(none)");
        return;
    }
    for asset in assets {
        if asset.description.is_empty() {
            println!("{:<24} {}", asset.id, asset.name);
        } else {
            println!("{:<24} {:<24} {}", asset.id, asset.name, asset.description);
        }
    }
}
