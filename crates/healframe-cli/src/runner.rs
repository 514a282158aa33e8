use std::path::Path;

use anyhow::{Context, Result};
use healframe_core::{pipeline, Validated, ValidationOutcome};
use healframe_reports::{JsonFormatter, Reporter, StdOutFormatter};
use tracing::info;

use crate::{
    parser::parse_config,
    writer::{resolve_file_path, write_table, DEFAULT_OUTPUT_NAME},
    OutputFormat, RunArgs,
};

/// How a successful run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    AllValid,
    Healed,
}

pub fn run(args: &RunArgs) -> Result<RunStatus> {
    let config = parse_config(&args.config)?;
    let loader = config.loader_config()?;
    let schema = config.schema()?;
    let input = config.input_path(args.input.as_deref())?;

    let version = env!("CARGO_PKG_VERSION").to_string();
    let run_pipeline = |reporter: &mut dyn Reporter| -> Result<Validated> {
        reporter.on_start();
        reporter.on_loading(&input);
        reporter.on_validation_start();
        let validated = pipeline::run(Path::new(&input), &loader, &config.normalize, &schema)
            .with_context(|| format!("Failed to process '{}'", input))?;
        reporter.on_result(&validated);
        reporter.on_complete();
        Ok(validated)
    };

    let validated = match args.format {
        OutputFormat::Stdout => run_pipeline(&mut StdOutFormatter::new(version))?,
        OutputFormat::Json => {
            let mut formatter = JsonFormatter::new(version).with_input(&input);
            let validated = run_pipeline(&mut formatter)?;
            println!("{}", formatter.to_json()?);
            validated
        }
    };

    let output = args.output.as_deref().or(config.output.path.as_deref());
    if let Some(output) = output {
        let path = resolve_file_path(output, DEFAULT_OUTPUT_NAME)?;
        write_table(&validated.table, &path)?;
        info!(path = %path.display(), rows = validated.table.num_rows(), "wrote clean table");
    }

    Ok(match validated.outcome {
        ValidationOutcome::AllValid => RunStatus::AllValid,
        ValidationOutcome::Healed { .. } => RunStatus::Healed,
    })
}
