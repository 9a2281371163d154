//! rigging-run - Loads and validates experiment configuration files.
//!
//! Loads a `.rig` file (or a directory of them) against the built-in
//! experiment component registry, applies command-line overrides, and
//! reports diagnostics or the resolved configuration.

mod stack;

use clap::Parser;
use rigging_conf::{config_str, markdownify, ConfigStore};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "rigging-run")]
#[command(about = "Load and validate experiment configuration files")]
struct Cli {
    /// Path to a .rig file or a directory of them
    path: PathBuf,

    /// Override a binding, e.g. --bind "ac/Adam.learning_rate = 1e-5"
    /// (repeatable; overrides evaluate after all files)
    #[arg(long = "bind", value_name = "KEY=VALUE")]
    bind: Vec<String>,

    /// Print the resolved configuration text and exit
    #[arg(long)]
    print_config: bool,

    /// Render --print-config output as markdown
    #[arg(long, requires = "print_config")]
    markdown: bool,

    /// Validate only; no output besides diagnostics
    #[arg(long)]
    check: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rigging_run=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    info!("Loading configuration from: {}", cli.path.display());

    let registry = stack::registry();
    let store = match rigging_conf::load_path_with_overrides(&cli.path, &cli.bind, &registry) {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to load configuration:\n{}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Configuration loaded: {} bindings", store.len());

    if cli.check {
        return ExitCode::SUCCESS;
    }

    if cli.print_config {
        print_config(&store, cli.markdown);
        return ExitCode::SUCCESS;
    }

    summarize(&store, &registry);
    ExitCode::SUCCESS
}

fn print_config(store: &ConfigStore, markdown: bool) {
    let text = config_str(store);
    if markdown {
        println!("{}", markdownify(&text, "resolved configuration"));
    } else {
        print!("{}", text);
    }
}

/// Log which registered components the configuration touches.
fn summarize(store: &ConfigStore, registry: &rigging_conf::SymbolRegistry) {
    for descriptor in registry.descriptors() {
        let bound = store
            .binding_set()
            .iter()
            .filter(|(key, _)| match key {
                rigging_conf::BindingKey::Param(pk) => pk.target == descriptor.name,
                rigging_conf::BindingKey::Macro(_) => false,
            })
            .count();
        if bound > 0 {
            info!(
                "  {:<24} {:<12} {} binding(s)",
                descriptor.name, descriptor.category, bound
            );
        }
    }
}
