use clap::Parser;
use extract_validator::cli::{args::Args, commands};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    // Create async runtime and run the main command logic with signal handling
    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        // Discarding the in-flight run on CTRL+C is safe: the source files
        // are never mutated and the in-memory ledgers simply drop.
        let shutdown_signal = async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to install CTRL+C signal handler");
        };

        tokio::select! {
            result = commands::run(args) => result,
            _ = shutdown_signal => {
                eprintln!("\nReceived CTRL+C, shutting down...");
                Err(extract_validator::Error::processing_interrupted(
                    "Validation interrupted by user",
                ))
            }
        }
    });

    match result {
        Ok(stats) => {
            // Partial failure in process-all still signals a non-zero exit
            if stats.files_failed > 0 {
                process::exit(1);
            }
            process::exit(0);
        }
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Extract Validator - Legacy Database Extract Cleaner");
    println!("===================================================");
    println!();
    println!("Reconcile and type-validate legacy tab-delimited database extracts,");
    println!("producing pipe-delimited output ready for bulk loading.");
    println!();
    println!("USAGE:");
    println!("    extract_validator <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    process       Validate a single extract file");
    println!("    process-all   Validate every known extract in a directory");
    println!("    report        Produce a quality report without writing output");
    println!("    help          Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Validate one extract against the schema directory:");
    println!("    extract_validator process data/tbl_Case.csv --schema-dir schema");
    println!();
    println!("    # Validate a whole directory with four workers:");
    println!("    extract_validator process-all data/ --workers 4 --export-bad-rows");
    println!();
    println!("    # Inspect quality without writing output:");
    println!("    extract_validator report data/tbl_Case.csv --output-format json");
    println!();
    println!("For detailed help on any command, use:");
    println!("    extract_validator <COMMAND> --help");
}
