use std::{fs::read_to_string, path::PathBuf, process::ExitCode, rc::Rc, time::Instant};

use clap::Parser;
use hulk::{display_error, lexer::lexer::tokenize, parser::parser::parse, semantic_checker::semantic_checker::semantic_check};

#[derive(Parser, Debug)]
#[command(name = "hulk", about = "Check a HULK program for semantic errors")]
struct Cli {
    /// Source file to check
    file: PathBuf,

    /// Print the token stream before parsing
    #[arg(long = "tokens", default_value_t = false)]
    tokens: bool,

    /// Print the parsed program after semantic checking
    #[arg(long = "ast", default_value_t = false)]
    ast: bool,

    /// Print the type hierarchy
    #[arg(long = "hierarchy", default_value_t = false)]
    hierarchy: bool,
}

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    // Only initialize if RUST_LOG is set
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let file_name = cli
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| cli.file.display().to_string());

    let source = match read_to_string(&cli.file) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Error: failed to read {}: {}", cli.file.display(), error);
            return ExitCode::FAILURE;
        }
    };

    let start = Instant::now();

    let tokens = match tokenize(source.clone(), Some(file_name.clone())) {
        Ok(tokens) => tokens,
        Err(error) => {
            display_error(&error, &source);
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(elapsed = ?start.elapsed(), count = tokens.len(), "tokenized");

    if cli.tokens {
        for token in &tokens {
            println!("{}", token);
        }
    }

    let parse_start = Instant::now();
    let mut program = match parse(tokens, Rc::new(file_name)) {
        Ok(program) => program,
        Err(error) => {
            display_error(&error, &source);
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(elapsed = ?parse_start.elapsed(), "parsed");

    let check_start = Instant::now();
    let report = semantic_check(&mut program);
    tracing::info!(elapsed = ?check_start.elapsed(), total = ?start.elapsed(), "semantic check finished");

    if cli.ast {
        println!("{:#?}", program);
    }
    if cli.hierarchy {
        print!("{}", report.hierarchy.render());
    }

    println!("{}", report.render());

    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
