use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "kconfig-graph",
    version,
    about = "Kconfig dependency graph explorer",
    long_about = "Scan a tree of Kconfig files into a dependency graph of configuration symbols, then render the edges whose endpoints are both set in a .config file as DOT. Only identifier tokens are extracted from directives; expressions are never evaluated."
)]
pub struct Cli {
    /// Suppress non-essential output
    #[arg(short, long, global = true, default_value_t = false)]
    pub quiet: bool,
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Commands,
}

/// Where the graph comes from: a scanned Kconfig tree or a saved graph JSON.
#[derive(Debug, Clone, Args)]
pub struct SourceArgs {
    /// Root of the Kconfig tree (e.g. a kernel checkout)
    #[arg(short = 'd', long = "dir", default_value = ".")]
    pub dir: PathBuf,
    /// Path to a TOML settings file (default: <dir>/kconfig-graph.toml)
    #[arg(long)]
    pub settings: Option<PathBuf>,
    /// Load a graph saved with `build --save` instead of scanning
    #[arg(long)]
    pub graph: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render the dependency edges relevant to an assignment file as DOT
    Render {
        #[command(flatten)]
        source: SourceArgs,
        /// Assignment file (.config); relative paths are also tried under --dir
        #[arg(short = 'c', long = "config", required_unless_present = "all")]
        config: Option<PathBuf>,
        /// Key prefix in the assignment file [default: CONFIG_]
        #[arg(long)]
        prefix: Option<String>,
        /// Render every reachable edge, ignoring the assignment filter
        #[arg(long, default_value_t = false)]
        all: bool,
        /// Write DOT to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Serve the viewer page and the rendered DOT over HTTP
    Serve {
        #[command(flatten)]
        source: SourceArgs,
        /// Assignment file (.config); relative paths are also tried under --dir
        #[arg(short = 'c', long = "config")]
        config: PathBuf,
        /// Key prefix in the assignment file [default: CONFIG_]
        #[arg(long)]
        prefix: Option<String>,
        /// Listen address [default: 127.0.0.1:8080]
        #[arg(long)]
        addr: Option<String>,
    },
    /// Scan the Kconfig tree and print a summary
    Build {
        #[command(flatten)]
        source: SourceArgs,
        /// Save the built graph as JSON
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Show what the scan recorded about one symbol
    Symbol {
        #[command(flatten)]
        source: SourceArgs,
        /// Symbol name without prefix (e.g. NET)
        #[arg(long)]
        name: String,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// List symbols that no dependency edge points at
    Roots {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn render_requires_config_unless_all() {
        assert!(Cli::try_parse_from(["kconfig-graph", "render", "-d", "."]).is_err());
        let cli = Cli::try_parse_from(["kconfig-graph", "render", "--all"]).unwrap();
        assert!(matches!(cli.command, Commands::Render { all: true, config: None, .. }));
    }
}
