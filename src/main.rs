use clap::Parser;
use tabdo::cli::commands::Cli;
use tabdo::cli::handlers;

fn main() {
    let cli = Cli::parse();
    tabdo::logging::init(cli.verbose);

    if let Err(e) = handlers::dispatch(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
