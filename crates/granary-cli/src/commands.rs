use anyhow::Context;
use colored::Colorize;
use serde::Serialize;
use tracing::debug;

use granary_store::{BoundedMultiContainerStore, ContainerStore, StoreConfig};
use granary_types::Cereal;

use crate::cli::*;
use crate::script::{Outcome, Script};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Demo => cmd_demo(cli.format),
        Command::Run(args) => cmd_run(args, cli.format),
    }
}

/// Machine-readable result of a run.
#[derive(Serialize)]
struct Report {
    config: StoreConfig,
    outcomes: Vec<Outcome>,
    contents: Vec<(Cereal, f32)>,
}

fn cmd_demo(format: OutputFormat) -> anyhow::Result<()> {
    execute(StoreConfig::default(), &Script::demo(), false, format)
}

fn cmd_run(args: RunArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = resolve_config(&args)?;
    let script = Script::load(&args.script)?;
    execute(config, &script, args.strict, format)
}

/// Flags override the config file, which overrides the defaults.
fn resolve_config(args: &RunArgs) -> anyhow::Result<StoreConfig> {
    let mut config = match &args.config {
        Some(path) => StoreConfig::load(path)?,
        None => StoreConfig::default(),
    };
    if let Some(capacity) = args.container_capacity {
        config.container_capacity = capacity;
    }
    if let Some(capacity) = args.storage_capacity {
        config.storage_capacity = capacity;
    }
    Ok(config)
}

fn execute(
    config: StoreConfig,
    script: &Script,
    strict: bool,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let mut store = BoundedMultiContainerStore::<Cereal>::from_config(&config)
        .context("creating store")?;
    debug!(?store, steps = script.ops.len(), "running script");
    let outcomes = script.run(&mut store, strict)?;

    match format {
        OutputFormat::Json => {
            let report = Report {
                config,
                outcomes,
                contents: store.snapshot(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => print_text(&store, &outcomes),
    }
    Ok(())
}

fn print_text(store: &BoundedMultiContainerStore<Cereal>, outcomes: &[Outcome]) {
    println!(
        "Store: {} per container, {} total ({} containers)",
        store.container_capacity().to_string().bold(),
        store.storage_capacity().to_string().bold(),
        store.max_containers(),
    );
    for outcome in outcomes {
        let line = format!("{:>3}. {}", outcome.step, outcome.op);
        match (&outcome.value, &outcome.error) {
            (Some(value), _) => println!("{} {line} → {}", "✓".green(), value.to_string().cyan()),
            (None, Some(error)) => println!("{} {line} → {}", "✗".red(), error.red()),
            (None, None) => println!("  {line}"),
        }
    }
    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
    if failed > 0 {
        println!("{} {failed} operation(s) failed", "!".yellow().bold());
    }
    println!("{store}");
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn run_args(config: Option<PathBuf>) -> RunArgs {
        RunArgs {
            script: PathBuf::from("ops.toml"),
            config,
            container_capacity: None,
            storage_capacity: None,
            strict: false,
        }
    }

    #[test]
    fn resolve_defaults() {
        let config = resolve_config(&run_args(None)).unwrap();
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn resolve_flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("granary.toml");
        std::fs::write(&path, "container_capacity = 4.0\nstorage_capacity = 12.0\n").unwrap();

        let mut args = run_args(Some(path));
        args.storage_capacity = Some(40.0);
        let config = resolve_config(&args).unwrap();
        assert_eq!(config, StoreConfig::new(4.0, 40.0));
    }

    #[test]
    fn execute_rejects_invalid_capacities() {
        let err = execute(StoreConfig::new(10.0, 1.0), &Script::default(), false, OutputFormat::Text)
            .unwrap_err();
        assert!(format!("{err:#}").contains("invalid configuration"));
    }

    #[test]
    fn execute_demo_in_both_formats() {
        execute(StoreConfig::default(), &Script::demo(), false, OutputFormat::Text).unwrap();
        execute(StoreConfig::default(), &Script::demo(), false, OutputFormat::Json).unwrap();
    }

    #[test]
    fn report_serializes_contents() {
        let report = Report {
            config: StoreConfig::default(),
            outcomes: Vec::new(),
            contents: vec![(Cereal::Rice, 1.0)],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["config"]["container_capacity"], 10.0);
        assert_eq!(json["contents"][0][0], "rice");
        assert_eq!(json["contents"][0][1], 1.0);
    }
}
