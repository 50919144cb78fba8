use clap::{ArgAction, Parser};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use thiserror::Error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use igor_compiler::{Compiler, IgorError, TsOptions};

#[derive(Parser, Debug)]
#[command(name = "igorc")]
#[command(about = "Compile IGOR schemas to TypeScript and JSON IR", long_about = None)]
struct Cli {
    /// Input schema files or glob patterns, expanded in order
    #[arg(short, long = "input", value_name = "PATTERN", required = true)]
    inputs: Vec<String>,

    /// Output directory for the generated TypeScript modules
    #[arg(short = 't', long, value_name = "DIR")]
    typescript: Option<PathBuf>,

    /// Output path for the JSON IR
    #[arg(short, long, value_name = "FILE")]
    schema: Option<PathBuf>,

    /// Write the JSON IR without indentation
    #[arg(short = 'c', long)]
    json_compact: bool,

    /// Name of the generated abstract service class
    #[arg(long, value_name = "NAME", default_value = "ProtocolService")]
    service_class: String,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("Invalid input pattern \"{pattern}\": {source}")]
    Pattern {
        pattern: String,
        source:  glob::PatternError,
    },

    #[error("Cannot read input: {0}")]
    Glob(#[from] glob::GlobError),

    #[error("Input pattern \"{0}\" matches no files")]
    NoMatches(String),

    #[error("{}: {source}", path.display())]
    Schema {
        path:   PathBuf,
        source: IgorError,
    },

    #[error("Cannot write {}: {source}", path.display())]
    Write {
        path:   PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Compile(#[from] IgorError),
}

fn init_tracing(verbose: u8) {
    // RUST_LOG wins over -v
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "warn,igor_compiler=info".to_string(),
            2 => "info,igor_compiler=debug".to_string(),
            _ => "debug,igor_compiler=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

/// Expand every pattern, in order. A pattern without matches is an error.
fn expand_inputs(patterns: &[String]) -> Result<Vec<PathBuf>, CliError> {
    let mut paths = Vec::new();
    for pattern in patterns {
        let entries = glob::glob(pattern).map_err(|source| CliError::Pattern {
            pattern: pattern.clone(),
            source,
        })?;
        let before = paths.len();
        for entry in entries {
            paths.push(entry?);
        }
        if paths.len() == before {
            return Err(CliError::NoMatches(pattern.clone()));
        }
    }
    Ok(paths)
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let paths = expand_inputs(&cli.inputs)?;

    let mut compiler = Compiler::new();
    for path in &paths {
        compiler
            .add_file(path)
            .map_err(|source| CliError::Schema { path: path.clone(), source })?;
        println!("Parsed {}", path.display());
    }

    // Render everything before touching the filesystem.
    let mut outputs: Vec<(PathBuf, String)> = Vec::new();
    if let Some(schema) = &cli.schema {
        outputs.push((schema.clone(), compiler.ir_json(cli.json_compact)?));
    }
    if let Some(dir) = &cli.typescript {
        let options = TsOptions {
            service_class: cli.service_class.clone(),
            ..TsOptions::default()
        };
        let generated = compiler.generate_typescript(&options)?;
        outputs.push((dir.join(&options.data_file), generated.data));
        outputs.push((dir.join(&options.service_file), generated.service));
    }

    for (path, text) in &outputs {
        write_output(path, text)?;
    }

    println!("Done");
    Ok(())
}

fn write_output(path: &Path, text: &str) -> Result<(), CliError> {
    let write = || -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, text)
    };
    write().map_err(|source| CliError::Write { path: path.to_path_buf(), source })?;
    tracing::info!(path = %path.display(), "wrote output");
    Ok(())
}

fn report(err: &CliError) {
    match err {
        CliError::Schema {
            path,
            source: IgorError::ParseError { msg, line, column, text },
        } => {
            eprintln!("Syntax error in {}", path.display());
            eprintln!("line: {}", line);
            eprintln!("position: {}", column);
            eprintln!("text: {}", text);
            eprintln!("error: {}", msg);
        }
        other => eprintln!("error: {}", other),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(&cli) {
        report(&err);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "igorc", "-i", "a/*.igor", "--input", "b.igor", "-t", "out", "-s", "ir.json", "-c", "-vv",
        ])
        .unwrap();
        assert_eq!(cli.inputs, vec!["a/*.igor", "b.igor"]);
        assert_eq!(cli.typescript, Some(PathBuf::from("out")));
        assert_eq!(cli.schema, Some(PathBuf::from("ir.json")));
        assert!(cli.json_compact);
        assert_eq!(cli.service_class, "ProtocolService");
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_input_is_required() {
        assert!(Cli::try_parse_from(["igorc", "-t", "out"]).is_err());
    }

    #[test]
    fn test_pattern_without_matches() {
        let err = expand_inputs(&["no/such/dir/*.igor".to_string()]).unwrap_err();
        assert!(matches!(err, CliError::NoMatches(ref p) if p == "no/such/dir/*.igor"));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = expand_inputs(&["a/[".to_string()]).unwrap_err();
        assert!(matches!(err, CliError::Pattern { .. }));
    }
}
