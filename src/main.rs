use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use codelab_render::{Diagnostic, Flavor, Severity};
use colored::Colorize;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod config;
mod input;

use config::Format;

#[derive(Parser)]
#[command(
    name = "codelab",
    version,
    about = "Render codelab document trees to Markdown and HTML"
)]
struct Cli {
    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Enable debug logging (overrides RUST_LOG)
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum FlavorArg {
    Classic,
    StyleGuide,
}

impl From<FlavorArg> for Flavor {
    fn from(arg: FlavorArg) -> Self {
        match arg {
            FlavorArg::Classic => Flavor::Classic,
            FlavorArg::StyleGuide => Flavor::StyleGuide,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Render a node tree
    Render {
        /// Path to a .json, .yaml or .yml node array, or `-` for JSON on stdin
        file: String,

        /// Output format (default: from config, else markdown)
        #[arg(long, value_enum)]
        format: Option<Format>,

        /// Target environment; nodes gated to other environments are skipped
        #[arg(long)]
        env: Option<String>,

        /// Markdown convention
        #[arg(long, value_enum)]
        flavor: Option<FlavorArg>,

        /// Write to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,

        /// Config file (default: ./codelab-render.json if present)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate node tree file(s)
    Validate {
        /// Path to the node tree file(s)
        #[arg(required = true)]
        files: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // --verbose enables DEBUG, otherwise use RUST_LOG or default to WARN.
    // Logs go to stderr so they never mix with rendered output.
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Render {
            file,
            format,
            env,
            flavor,
            out,
            config,
        } => {
            let opts = RenderOpts {
                format,
                env,
                flavor: flavor.map(Flavor::from),
                out,
                config,
                quiet: cli.quiet,
            };
            handle_render(&file, &opts)?;
        }
        Commands::Validate { files } => {
            handle_validate(&files, cli.quiet)?;
        }
    }

    Ok(())
}

struct RenderOpts {
    format: Option<Format>,
    env: Option<String>,
    flavor: Option<Flavor>,
    out: Option<PathBuf>,
    config: Option<PathBuf>,
    quiet: bool,
}

fn handle_render(file: &str, opts: &RenderOpts) -> Result<()> {
    let config = config::load_config(opts.config.as_deref())?;
    let nodes = input::load_nodes(file)?;

    // Contract problems go to stderr; rendering proceeds regardless.
    if !opts.quiet {
        for diag in codelab_render::validate(&nodes) {
            if diag.severity != Severity::Info {
                eprintln!("{}", format_diagnostic(file, &diag));
            }
        }
    }

    let env = opts.env.as_deref().unwrap_or(&config.env);
    let format = opts.format.unwrap_or(config.format);

    match &opts.out {
        Some(path) => {
            let f = std::fs::File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut w = BufWriter::new(f);
            render_to(&mut w, &nodes, env, format, &config, opts)?;
            w.flush()
                .with_context(|| format!("Failed to write {}", path.display()))?;
            if !opts.quiet {
                eprintln!("{} {}", "Wrote".green(), path.display());
            }
        }
        None => {
            let mut w = BufWriter::new(std::io::stdout().lock());
            render_to(&mut w, &nodes, env, format, &config, opts)?;
            w.flush().context("Failed to write to stdout")?;
        }
    }

    Ok(())
}

fn render_to<W: Write>(
    w: W,
    nodes: &[codelab_render::Node],
    env: &str,
    format: Format,
    config: &config::RenderConfig,
    opts: &RenderOpts,
) -> Result<()> {
    match format {
        Format::Markdown => {
            let options = config.markdown.options(opts.flavor);
            codelab_render::write_markdown(w, nodes, env, &options)
        }
        Format::Html => codelab_render::write_html(w, nodes, env),
    }
    .context("Failed to render")
}

fn handle_validate(files: &[String], quiet: bool) -> Result<()> {
    let mut has_errors = false;

    for file in files {
        let nodes = input::load_nodes(file)?;
        let diagnostics = codelab_render::validate(&nodes);

        if diagnostics.is_empty() {
            if !quiet {
                println!("{}: {}", file, "OK".green());
            }
            continue;
        }

        for diag in &diagnostics {
            if diag.severity == Severity::Error {
                has_errors = true;
            }
            println!("{}", format_diagnostic(file, diag));
        }
    }

    if has_errors {
        std::process::exit(1);
    }

    Ok(())
}

fn format_diagnostic(file: &str, diag: &Diagnostic) -> String {
    let severity_str = match diag.severity {
        Severity::Error => format!("{}", "error".red().bold()),
        Severity::Warning => format!("{}", "warning".yellow().bold()),
        Severity::Info => format!("{}", "info".cyan().bold()),
    };

    let location = if diag.path.is_empty() {
        file.to_string()
    } else {
        format!("{file}:{}", diag.path)
    };

    let code_str = match &diag.code {
        Some(c) => format!("[{}] ", c),
        None => String::new(),
    };

    format!("{location}: {severity_str}: {code_str}{}", diag.message)
}
