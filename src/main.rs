use std::path::PathBuf;
use std::process;

use clap::Parser;

/// Generate Avro protocol definitions from parsed record declarations.
///
/// Reads JSON declaration units from the input directory and writes one
/// deterministic <EventTypeName>.avpr file per event type to the output
/// directory.
#[derive(Parser)]
#[command(name = "avro-event-gen", version, about)]
struct Cli {
    /// Directory containing parsed declaration units (.json files).
    #[arg(long)]
    input_dir: PathBuf,

    /// Only process declaration files whose name contains this substring.
    #[arg(long)]
    include: Option<String>,

    /// Skip declaration files whose name contains this substring.
    #[arg(long)]
    exclude: Option<String>,

    /// Output directory for generated .avpr files.
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Namespace for generated protocols.
    #[arg(long, env = "AVRO_EVENT_NAMESPACE")]
    namespace: String,

    /// Suppress non-error output.
    #[arg(long, short)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");

        // Print cause chain.
        let mut source = std::error::Error::source(&e);
        while let Some(cause) = source {
            eprintln!("  caused by: {cause}");
            source = std::error::Error::source(cause);
        }

        process::exit(1);
    }
}

fn run(cli: Cli) -> avro_event_gen::error::Result<()> {
    if !cli.quiet {
        eprintln!("Loading declarations from {}", cli.input_dir.display());
    }
    let sources = avro_event_gen::source::load_sources(
        &cli.input_dir,
        cli.include.as_deref(),
        cli.exclude.as_deref(),
    )?;
    if !cli.quiet {
        let records: usize = sources.iter().map(|u| u.records.len()).sum();
        eprintln!("Loaded {} declaration units, {} records", sources.len(), records);
    }

    let protocols = avro_event_gen::codegen::generate(&sources, &cli.namespace)?;
    let stats = avro_event_gen::codegen::write_protocols(&protocols, &cli.output_dir)?;

    if !cli.quiet {
        eprintln!(
            "Wrote {} protocols to {}",
            stats.protocols_written,
            cli.output_dir.display()
        );
        eprintln!("Done.");
    }

    Ok(())
}
