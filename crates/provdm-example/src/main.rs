//! provdm example
//!
//! Builds the example provenance graph and writes it as a PROV-JSON
//! document to stdout or a file.

use anyhow::Context;
use clap::Parser;
use provdm::Serializer;
use provdm_example::{build_example_graph, RunConfig};
use provdm_observability::{spans, tracing_setup};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "provdm-example",
    about = "Build the example provenance graph and print it as PROV-JSON"
)]
struct Cli {
    /// Write the document to this file instead of stdout.
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// JSON file with `container` and `serializer` settings.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Emit compact JSON instead of indented output.
    #[arg(long)]
    compact: bool,

    /// Log filter directives (falls back to RUST_LOG, then info).
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,
}

impl Cli {
    fn run_config(&self) -> anyhow::Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::load(path)?,
            None => RunConfig::default(),
        };
        if self.compact {
            config.serializer.pretty = false;
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_setup::init_tracing_with(cli.log_level.as_deref());

    info!("provdm example starting");

    let config = cli.run_config().context("Failed to load configuration")?;

    let graph = {
        let span = spans::build_example_graph();
        let _guard = span.enter();
        build_example_graph(config.container.clone()).context("Failed to build example graph")?
    };

    let text = Serializer::new(config.serializer)
        .encode(&graph)
        .context("Failed to encode document")?;

    let span = spans::write_document(cli.output.as_deref());
    let _guard = span.enter();
    match &cli.output {
        Some(path) => {
            std::fs::write(path, format!("{}\n", text))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), elements = graph.len(), "document written");
        }
        None => println!("{}", text),
    }

    Ok(())
}
