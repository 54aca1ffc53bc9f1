//! The `tsgen generate` subcommand.

use std::path::PathBuf;

use clap::ValueEnum;
use tsgen_core::dialect::asyncapi_2::AsyncApi2Decoder;
use tsgen_core::dialect::openapi_3::OpenApi3Decoder;
use tsgen_core::dialect::swagger_2::Swagger2Decoder;
use tsgen_core::{
    AsyncApi2Backend, GenerateError, GenerateOptions, OpenApi3Backend, Reporter,
    TypeScriptBackend, generate,
};

/// Specification dialect of the root document. Never auto-detected; the
/// caller states what the root is supposed to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DialectArg {
    /// Swagger 2.0
    #[value(name = "swagger-2.0")]
    Swagger2,
    /// OpenAPI 3.0.x
    #[value(name = "openapi-3.0")]
    OpenApi3,
    /// AsyncAPI 2.0.0
    #[value(name = "asyncapi-2.0")]
    AsyncApi2,
    /// Sketch file format 121
    #[value(name = "sketch-121")]
    Sketch121,
}

#[derive(Debug, clap::Args)]
pub struct GenerateArgs {
    /// Path or URL of the root specification document, YAML or JSON
    #[arg(long)]
    pub spec: String,

    /// Output directory for generated code
    #[arg(long)]
    pub out: PathBuf,

    /// Base directory for relative paths; defaults to the current directory
    #[arg(long)]
    pub cwd: Option<PathBuf>,

    /// Specification dialect of the root document
    #[arg(long, value_enum)]
    pub dialect: DialectArg,
}

/// Prints pipeline progress to stdout.
#[derive(Debug, Default)]
struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn report(&self, message: &str) {
        println!("[tsgen]: {message}");
    }
}

pub async fn run(args: GenerateArgs) -> i32 {
    let reporter = ConsoleReporter;
    let result = match args.dialect {
        DialectArg::Swagger2 => {
            generate(GenerateOptions {
                cwd: args.cwd,
                out: args.out,
                spec: args.spec,
                decoder: Swagger2Decoder,
                backend: TypeScriptBackend,
                reporter: &reporter,
            })
            .await
        }
        DialectArg::OpenApi3 => {
            generate(GenerateOptions {
                cwd: args.cwd,
                out: args.out,
                spec: args.spec,
                decoder: OpenApi3Decoder,
                backend: OpenApi3Backend,
                reporter: &reporter,
            })
            .await
        }
        DialectArg::AsyncApi2 => {
            generate(GenerateOptions {
                cwd: args.cwd,
                out: args.out,
                spec: args.spec,
                decoder: AsyncApi2Decoder,
                backend: AsyncApi2Backend,
                reporter: &reporter,
            })
            .await
        }
        DialectArg::Sketch121 => {
            eprintln!(
                "Error: no bundled TypeScript backend for sketch-121; \
                 use the tsgen-core LanguageBackend API with Sketch121Decoder"
            );
            return 1;
        }
    };

    match result {
        Ok(()) => 0,
        Err(GenerateError::Decode { location, source }) => {
            eprintln!("Error in {location}:\n{}", source.report());
            1
        }
        Err(err) => {
            eprintln!("Error: {err}");
            1
        }
    }
}
