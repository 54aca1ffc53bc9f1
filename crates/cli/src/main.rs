//! tsgen command-line interface.

mod generate;

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(
    name = "tsgen",
    version,
    about = "Generate TypeScript types and io-ts validators from API specification documents"
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Generate code from a specification document
    Generate(generate::GenerateArgs),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("TSGEN_LOG")
                .unwrap_or_else(|_| "tsgen=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let code = match args.command {
        Command::Generate(generate_args) => generate::run(generate_args).await,
    };
    std::process::exit(code);
}
