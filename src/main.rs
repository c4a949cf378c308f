//! # qtmatrix CLI Entry Point
//!
//! Parses arguments with clap, loads the axis tables and prints the expanded
//! matrix. stdout only ever carries the matrix (or the requested document);
//! status and errors go to stderr.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use colored::*;
use std::io::{self, Write};
use std::path::PathBuf;

use qtmatrix::ci;
use qtmatrix::config::MatrixConfig;
use qtmatrix::matrix::Schema;
use qtmatrix::ui;

#[derive(Parser)]
#[command(name = "qtmatrix")]
#[command(about = "Expand Qt/platform/compiler axes into a CI build matrix", version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
struct Cli {
    /// Only include this platform (windows, macos, linux)
    platform: Option<String>,

    /// Axis tables to use instead of qtmatrix.toml / the built-in tables
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the schema declared by the tables
    #[arg(long, value_enum, global = true)]
    schema: Option<SchemaArg>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Print what was expanded to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the active axis tables as TOML
    Tables,
    /// Generate a GitHub Actions workflow that consumes the matrix
    Workflow {
        /// Project directory to write .github/workflows/build.yml into
        #[arg(long, default_value = ".")]
        dir: PathBuf,
        /// Overwrite an existing workflow
        #[arg(long)]
        force: bool,
    },
    /// Generate shell completion scripts
    Completion { shell: Shell },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// Single-line JSON
    Json,
    /// Indented JSON
    Pretty,
    /// Terminal table
    Table,
}

#[derive(Clone, Copy, ValueEnum)]
enum SchemaArg {
    Basic,
    Archives,
    Container,
}

impl From<SchemaArg> for Schema {
    fn from(arg: SchemaArg) -> Self {
        match arg {
            SchemaArg::Basic => Schema::Basic,
            SchemaArg::Archives => Schema::Archives,
            SchemaArg::Container => Schema::Container,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        // A reader that hung up early (e.g. `| head`) is not a failure
        if is_broken_pipe(&e) {
            return;
        }
        eprintln!("{} {:#}", "x".red(), e);
        std::process::exit(1);
    }
}

fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<io::Error>()
            .is_some_and(|e| e.kind() == io::ErrorKind::BrokenPipe)
    })
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let bin_name = cmd.get_name().to_string();
            let mut script = Vec::new();
            generate(*shell, &mut cmd, bin_name, &mut script);
            io::stdout().lock().write_all(&script)?;
            Ok(())
        }
        Some(Commands::Workflow { dir, force }) => {
            let config = load_config(cli)?;
            let path = ci::generate_workflow_in(dir, config.schema, *force)?;
            eprintln!(
                "{} Created GitHub Actions workflow at {}",
                "✓".green(),
                path.display()
            );
            Ok(())
        }
        Some(Commands::Tables) => {
            let config = load_config(cli)?;
            write!(io::stdout().lock(), "{}", config.to_toml()?)?;
            Ok(())
        }
        None => print_matrix(cli),
    }
}

fn load_config(cli: &Cli) -> Result<MatrixConfig> {
    let cwd = std::env::current_dir().context("Failed to resolve current directory")?;
    let (mut config, source) = MatrixConfig::discover(cli.config.as_deref(), &cwd)?;
    if let Some(schema) = cli.schema {
        config.schema = schema.into();
    }

    if cli.verbose {
        eprintln!("{} Tables: {}", "⚙️".cyan(), source);
        eprintln!("   Schema: {}", config.schema.as_str().yellow());
    }
    Ok(config)
}

fn print_matrix(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let filter = cli.platform.as_deref();
    let matrix = config.builder(filter).build()?;

    if cli.verbose {
        eprintln!(
            "{} {} configurations ({} Qt releases, platform filter: {})",
            "✓".green(),
            matrix.len().to_string().bold(),
            config.qt.len(),
            filter.unwrap_or("none")
        );
        if matrix.is_empty()
            && let Some(name) = filter
        {
            eprintln!("{} No platform named '{}' in the tables", "!".yellow(), name);
        }
    }

    let mut out = io::stdout().lock();
    match cli.format {
        Format::Json => writeln!(out, "{}", serde_json::to_string(&matrix)?)?,
        Format::Pretty => writeln!(out, "{}", serde_json::to_string_pretty(&matrix)?)?,
        Format::Table => ui::Table::from_matrix(&matrix, config.schema).print(&mut out)?,
    }
    out.flush()?;
    Ok(())
}
