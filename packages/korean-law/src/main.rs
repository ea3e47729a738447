//! CLI entry point.

use korean_law::cli;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // WARN by default, respecting RUST_LOG
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli::run().await {
        Ok(output) if output.starts_with("Error:") => {
            eprintln!("{output}");
            std::process::exit(1);
        }
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
