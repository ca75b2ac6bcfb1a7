use clap::Parser;
use expense_tracker::cli::{Cli, report_error};
use expense_tracker::logging::init_tracing;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = cli.run().await {
        std::process::exit(report_error(&err));
    }
}
