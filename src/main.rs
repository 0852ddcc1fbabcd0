use anyhow::Context;
use clap::Parser;
use pbs_synchro::{CliArgs, SynchroConfig, TracingEvents, init_logging, plan, run};

fn main() -> anyhow::Result<()> {
    let cli = CliArgs::parse();
    let config = SynchroConfig::from_args(&cli)?;
    let _guard = init_logging(&config.logging)?;

    let events = TracingEvents;
    if cli.plan {
        let groups = plan(&config, &events)?;
        println!(
            "{}",
            serde_json::to_string_pretty(&groups).context("failed to serialize plan")?
        );
        return Ok(());
    }

    let report = run(&config, &events)?;
    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("failed to serialize run report")?
        );
    } else {
        tracing::info!(
            output = %report.output_path,
            written = report.summary.sheets_written,
            skipped = report.summary.sheets_skipped,
            "run complete"
        );
    }
    Ok(())
}
