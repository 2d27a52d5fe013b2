//! pgshape CLI
//!
//! Parses, normalizes or tokenizes PostgreSQL-flavoured SQL from a file or
//! standard input.

mod diagnostic;
mod input;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use pgshape_core::{ParserOptions, QueryError};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Parse and normalize PostgreSQL queries.
#[derive(Parser, Debug)]
#[command(name = "pgshape")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Maximum nesting depth accepted by the parser.
    #[arg(long, env = "PGSHAPE_MAX_DEPTH", default_value_t = ParserOptions::DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Print the parse tree as JSON.
    Parse {
        /// Query file (stdin if omitted or `-`).
        file: Option<PathBuf>,

        /// Pretty-print the JSON.
        #[arg(short, long)]
        pretty: bool,
    },

    /// Replace literals with `$N` placeholders and print the query.
    Normalize {
        /// Query file (stdin if omitted or `-`).
        file: Option<PathBuf>,
    },

    /// Print the lexer's tokens, one per line.
    Tokens {
        /// Query file (stdin if omitted or `-`).
        file: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    pgshape_core::init();
    let options = ParserOptions::new().with_max_depth(cli.max_depth);

    match cli.command {
        Commands::Parse { file, pretty } => {
            let query = input::read_query(file.as_deref())?;
            let result = pgshape_core::parse_with_options(&query, options);
            eprint!("{}", result.stderr_buffer);
            match result.into_result() {
                Ok(tree) => {
                    debug!(statements = tree.statements.len(), "parsed");
                    let json = if pretty {
                        tree.to_json_pretty()?
                    } else {
                        tree.to_json()?
                    };
                    println!("{json}");
                    Ok(ExitCode::SUCCESS)
                }
                Err(err) => Ok(report(&query, &err)),
            }
        }

        Commands::Normalize { file } => {
            let query = input::read_query(file.as_deref())?;
            let result = pgshape_core::normalize_with_options(&query, options);
            match (result.normalized_query, result.error) {
                (_, Some(err)) => Ok(report(&query, &err)),
                (Some(normalized), None) => {
                    println!("{normalized}");
                    Ok(ExitCode::SUCCESS)
                }
                (None, None) => Ok(ExitCode::SUCCESS),
            }
        }

        Commands::Tokens { file } => {
            let query = input::read_query(file.as_deref())?;
            match pgshape_core::lexer::tokenize(&query) {
                Ok(tokens) => {
                    info!(count = tokens.len(), "tokenized");
                    for token in &tokens {
                        println!(
                            "{:>5}  {}",
                            token.span.cursor_position(&query),
                            token.kind
                        );
                    }
                    Ok(ExitCode::SUCCESS)
                }
                Err(err) => Ok(report(&query, &QueryError::from_lex_error(err, &query))),
            }
        }
    }
}

/// Prints a rendered diagnostic and picks the failure exit code.
fn report(query: &str, err: &QueryError) -> ExitCode {
    debug!(kind = err.kind.as_str(), cursorpos = err.cursorpos, "query rejected");
    eprint!("{}", diagnostic::render(query, err));
    ExitCode::FAILURE
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_command_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_subcommand() {
        let cli = Cli::try_parse_from(["pgshape", "parse", "--pretty", "q.sql"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::Parse {
                file: Some(PathBuf::from("q.sql")),
                pretty: true,
            }
        );
        assert!(!cli.verbose);
    }

    #[test]
    fn test_stdin_when_no_file() {
        let cli = Cli::try_parse_from(["pgshape", "-v", "normalize"]).unwrap();
        assert_eq!(cli.command, Commands::Normalize { file: None });
        assert!(cli.verbose);
    }

    #[test]
    fn test_max_depth_flag() {
        let cli = Cli::try_parse_from(["pgshape", "--max-depth", "16", "tokens", "-"]).unwrap();
        assert_eq!(cli.max_depth, 16);
        assert_eq!(
            cli.command,
            Commands::Tokens {
                file: Some(PathBuf::from("-")),
            }
        );
    }

    #[test]
    fn test_rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["pgshape", "fingerprint"]).is_err());
        assert!(Cli::try_parse_from(["pgshape", "--max-depth", "deep", "parse"]).is_err());
    }
}
