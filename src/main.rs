mod cli;
mod settings;
mod workflow;

use anyhow::Result;
use cli::{OutputFormat, parse_cli, print_json, print_plain};
use lazypick::logging;
use settings::ResolvedConfig;
use workflow::PickWorkflow;

fn main() -> Result<()> {
    let cli = parse_cli();
    let resolved = settings::load(&cli)?;

    if cli.print_config {
        resolved.print_summary();
    }

    if let Err(err) = logging::initialize(&resolved.log_level, &resolved.log_file) {
        eprintln!("lazypick: logging disabled: {err:#}");
    }

    run_pick(cli.output, resolved)
}

/// Run the picker and print the outcome in the chosen format.
fn run_pick(format: OutputFormat, settings: ResolvedConfig) -> Result<()> {
    let workflow = PickWorkflow::from_config(settings)?;
    let outcome = workflow.run()?;
    tracing::info!(accepted = outcome.accepted, "picker finished");

    match format {
        OutputFormat::Plain => print_plain(&outcome),
        OutputFormat::Json => print_json(&outcome)?,
    }

    Ok(())
}
