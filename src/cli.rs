use std::fs;
use std::io::{self, Read, Write};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use tracing::{debug, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

use crate::{OutputOptions, Statement, format_with_options, parse_statement};

#[derive(Parser)]
#[command(name = "dsc-expression")]
#[command(about = "A CLI for parsing and formatting bracketed configuration expressions")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        enable_tracing(self.command.verbose());

        match &self.command {
            Commands::Parse { input, output, .. } | Commands::Validate { input, output, .. } => {
                let reader = get_reader(input)
                    .with_context(|| format!("Failed to open input file: {input}"))?;
                let writer = get_writer(output)
                    .with_context(|| format!("Failed to create output file: {output}"))?;
                self.run_with_io(reader, writer)
            }
        }
    }

    /// Run CLI with provided readers and writers for testing
    pub fn run_with_io<R: Read, W: Write>(&self, reader: R, writer: W) -> Result<()> {
        match &self.command {
            Commands::Parse {
                to,
                compact,
                verbose,
                ..
            } => self.run_parse_with_io(reader, writer, to, &output_options(*compact), *verbose),

            Commands::Validate {
                compact, verbose, ..
            } => self.run_validate_with_io(reader, writer, &output_options(*compact), *verbose),
        }
    }

    fn run_parse_with_io<R: Read, W: Write>(
        &self,
        reader: R,
        writer: W,
        to: &Format,
        options: &OutputOptions,
        verbose: bool,
    ) -> Result<()> {
        let input_text = read_text_input(reader)?;
        let statements = parse_lines(&input_text)?;

        to.write_statements(writer, &statements, options, verbose)
            .with_context(|| {
                format!(
                    "Failed to write output as {} format",
                    format!("{to:?}").to_lowercase()
                )
            })?;

        if verbose {
            eprintln!("Successfully parsed {} statement(s)", statements.len());
        }

        Ok(())
    }

    fn run_validate_with_io<R: Read, W: Write>(
        &self,
        reader: R,
        writer: W,
        options: &OutputOptions,
        verbose: bool,
    ) -> Result<()> {
        let input_text = read_text_input(reader)?;
        let statements = parse_lines(&input_text)?;

        // Format back to text
        let text = Format::Text.statements_to_text(&statements, options, verbose);
        write_text_output(writer, &text)?;

        if verbose {
            eprintln!("Successfully validated {} statement(s)", statements.len());
        }

        Ok(())
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse each non-blank input line and write the result
    ///
    /// Output formats:
    ///   text - Canonical expression syntax
    ///   json - JSON serialized tree
    ///   yaml - YAML serialized tree
    Parse {
        /// Input file (use - for stdin)
        #[arg(short, long, default_value = "-")]
        input: String,
        /// Output file (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: String,
        /// Output format: text, json, yaml
        #[arg(short = 't', long, default_value = "text")]
        to: Format,
        /// Omit spaces between arguments (text output only)
        #[arg(long)]
        compact: bool,
        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
    /// Validate expressions by parsing and formatting them (roundtrip test)
    Validate {
        /// Input file (use - for stdin)
        #[arg(short, long, default_value = "-")]
        input: String,
        /// Output file (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: String,
        /// Omit spaces between arguments
        #[arg(long)]
        compact: bool,
        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Commands::Parse { verbose, .. } | Commands::Validate { verbose, .. } => *verbose,
        }
    }
}

#[derive(Clone, Debug)]
pub enum Format {
    Text,
    Json,
    Yaml,
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Format::Text),
            "json" => Ok(Format::Json),
            "yaml" => Ok(Format::Yaml),
            _ => Err(format!(
                "Invalid format: '{s}'. Supported formats: text, json, yaml"
            )),
        }
    }
}

impl Format {
    pub fn write_statements<W: Write>(
        &self,
        writer: W,
        statements: &[Statement],
        options: &OutputOptions,
        verbose: bool,
    ) -> Result<()> {
        match self {
            Format::Text => {
                let text = self.statements_to_text(statements, options, verbose);
                write_text_output(writer, &text)?;
            }
            Format::Json => {
                let json = serde_json::to_string_pretty(statements)?;
                write_text_output(writer, &json)?;
            }
            Format::Yaml => {
                let yaml = serde_yaml::to_string(statements)?;
                write_text_output(writer, &yaml)?;
            }
        }
        Ok(())
    }

    fn statements_to_text(
        &self,
        statements: &[Statement],
        options: &OutputOptions,
        verbose: bool,
    ) -> String {
        let mut text = String::new();
        for statement in statements {
            match statement {
                Statement::Literal(s) => text.push_str(&literal_to_text(s)),
                Statement::Expression(expr) => {
                    let (formatted, errors) = format_with_options(expr, options);
                    if verbose && !errors.is_empty() {
                        eprintln!("Formatting warnings:");
                        for error in errors {
                            eprintln!("  {error}");
                        }
                    }
                    text.push_str(&formatted);
                }
            }
            text.push('\n');
        }
        text
    }
}

/// Write a literal so that it reads back as the same literal, re-escaping a
/// leading bracket.
fn literal_to_text(s: &str) -> String {
    if s.starts_with('[') && (s.ends_with(']') || s.starts_with("[[")) {
        format!("[{s}")
    } else {
        s.to_string()
    }
}

fn output_options(compact: bool) -> OutputOptions {
    if compact {
        OutputOptions::compact()
    } else {
        OutputOptions::default()
    }
}

/// Parse each non-blank line as a statement, stopping at the first error.
/// Lines are classified as they are, so surrounding whitespace makes a line
/// a literal, just as it does for [`parse_statement`].
fn parse_lines(input: &str) -> Result<Vec<Statement>> {
    let mut statements = Vec::new();
    for (i, line) in input.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        debug!("Line {}: {line}", i + 1);
        let statement = parse_statement(line)
            .map_err(|e| anyhow!("{}", e.diagnostic(line)))
            .with_context(|| format!("Failed to parse line {}", i + 1))?;
        statements.push(statement);
    }
    Ok(statements)
}

/// Install a stderr subscriber, filtered by `RUST_LOG` and defaulting to
/// warnings, or debug output when verbose.
pub fn enable_tracing(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .try_init();
    if result.is_err() {
        eprintln!("Unable to set global default tracing subscriber. Tracing is disabled.");
    }
}

/// Read text input from reader
fn read_text_input<R: Read>(mut reader: R) -> Result<String> {
    let mut buffer = String::new();
    reader.read_to_string(&mut buffer)?;
    Ok(buffer)
}

/// Write text output to writer
fn write_text_output<W: Write>(mut writer: W, content: &str) -> Result<()> {
    writer.write_all(content.as_bytes())?;
    Ok(())
}

/// Helper function to get reader from file path (or stdin if "-")
fn get_reader(path: &str) -> Result<Box<dyn Read>> {
    if path == "-" {
        Ok(Box::new(io::stdin()))
    } else {
        Ok(Box::new(fs::File::open(path)?))
    }
}

/// Helper function to get writer from file path (or stdout if "-")
fn get_writer(path: &str) -> Result<Box<dyn Write>> {
    if path == "-" {
        Ok(Box::new(io::stdout()))
    } else {
        Ok(Box::new(fs::File::create(path)?))
    }
}
