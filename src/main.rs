use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use termcolor::{ColorChoice, StandardStream};
use tracing_subscriber::EnvFilter;

use sqlseg::error::SqlsegError;
use sqlseg::mode::{Mode, OutputFormat};
use sqlseg::report::{FileResult, Report};

/// sqlseg - Split SQL into statements and find the one under a cursor.
#[derive(Parser, Debug)]
#[command(name = "sqlseg", version, about)]
struct Cli {
    /// Files or directories to segment. Use "-" to read from stdin.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Print only the statement on this zero-indexed cursor line.
    #[arg(long, allow_negative_numbers = true)]
    line: Option<i64>,

    /// Cursor column, accepted alongside --line.
    #[arg(long, requires = "line", allow_negative_numbers = true)]
    column: Option<i64>,

    /// Print only the statement at this zero-indexed character offset.
    #[arg(long, conflicts_with = "line")]
    offset: Option<usize>,

    /// Print statement counts instead of statements.
    #[arg(long)]
    count: bool,

    /// Output format.
    #[arg(short = 'o', long, value_enum)]
    output: Option<OutputFormat>,

    /// Glob patterns to exclude.
    #[arg(long)]
    exclude: Vec<String>,

    /// Verbose output.
    #[arg(short, long)]
    verbose: bool,

    /// Quiet output (errors only).
    #[arg(short, long)]
    quiet: bool,

    /// Force color output.
    #[arg(long)]
    force_color: bool,

    /// Disable color output.
    #[arg(long)]
    no_color: bool,

    /// Path to config file (sqlseg.toml or pyproject.toml).
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "sqlseg=debug"
    } else {
        "sqlseg=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let base_mode = match sqlseg::load_config(&cli.files, cli.config.as_deref()) {
        Ok(mode) => mode,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(2);
        }
    };

    let mode = Mode {
        output: cli.output.unwrap_or(base_mode.output),
        exclude: if cli.exclude.is_empty() {
            base_mode.exclude
        } else {
            cli.exclude.clone()
        },
        verbose: cli.verbose,
        quiet: cli.quiet,
        no_color: cli.no_color || base_mode.no_color,
        force_color: cli.force_color,
    };

    match execute(&cli, &mode) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(2);
        }
    }
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn stdout(mode: &Mode) -> StandardStream {
    let choice = if mode.force_color {
        ColorChoice::Always
    } else if mode.color() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    StandardStream::stdout(choice)
}

fn read_source(path: &Path) -> anyhow::Result<String> {
    if is_stdin(path) {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .context("Error reading stdin")?;
        Ok(source)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("Error reading {}", path.display()))
    }
}

/// Run the command, returning the process exit code.
fn execute(cli: &Cli, mode: &Mode) -> anyhow::Result<i32> {
    if cli.files.len() > 1 && cli.files.iter().any(|p| is_stdin(p)) {
        anyhow::bail!("\"-\" (stdin) cannot be combined with other inputs");
    }

    let mut out = stdout(mode);

    if cli.line.is_some() || cli.offset.is_some() {
        let [path] = cli.files.as_slice() else {
            return Err(SqlsegError::Cursor(
                "cursor resolution needs exactly one input".to_string(),
            )
            .into());
        };
        let source = read_source(path)?;
        let resolved = match (cli.line, cli.offset) {
            (Some(line), _) => sqlseg::resolve_at_cursor(&source, line, cli.column.unwrap_or(0)),
            (None, Some(offset)) => sqlseg::resolve_at_offset(&source, offset),
            (None, None) => None,
        };
        let label = path.display().to_string();
        sqlseg::output::write_resolved(&mut out, &label, resolved.as_ref(), mode.output)?;
        return Ok(if resolved.is_some() { 0 } else { 1 });
    }

    let stdin_only = cli.files.len() == 1 && is_stdin(&cli.files[0]);
    let report = if stdin_only {
        let source = read_source(&cli.files[0])?;
        let mut report = Report::new();
        report.add(FileResult::from_statements(
            cli.files[0].clone(),
            sqlseg::segment(&source),
        ));
        report
    } else {
        sqlseg::run(&cli.files, mode)
    };

    sqlseg::output::write_report(&mut out, &report, mode.output, cli.count)?;

    if !mode.quiet && !stdin_only {
        print_verbose_results(&report, mode);
        eprintln!("{}", report.summary());
    }
    report.print_errors();

    Ok(if report.has_errors() { 2 } else { 0 })
}

fn print_verbose_results(report: &Report, mode: &Mode) {
    if !mode.verbose {
        return;
    }
    for result in &report.results {
        if result.status == sqlseg::report::FileStatus::Empty {
            eprintln!("no statements in {}", result.path.display());
        }
    }
}
