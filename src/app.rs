use crate::assigned::{AssignedConfig, DEFAULT_PREFIX};
use crate::cli::{Cli, Commands, OutputFormat, SourceArgs};
use crate::errors::KconfigGraphError;
use crate::graph::SymbolGraph;
use crate::query::{Query, RootsQuery, SymbolInfoQuery};
use crate::server::{self, AppState};
use crate::utils::config::{self, Config};
use crate::utils::{project_root, table};
use crate::visualization::{DotGenerator, EdgeFilter};
use clap::CommandFactory;
use clap_complete::generate;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Install the stderr logger. `RUST_LOG` takes precedence over the flags.
pub fn init_logging(quiet: bool, verbose: u8) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stderr)
        .try_init();
}

/// Run the CLI logic in-process.
///
/// Returns an exit code (0 = success).
#[must_use]
pub fn run_cli(cli: Cli) -> i32 {
    let quiet = cli.quiet;
    let result = match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let mut out = io::stdout();
            generate(shell, &mut cmd, "kconfig-graph", &mut out);
            Ok(())
        }
        Commands::Render { source, config, prefix, all, out } => {
            run_render(&source, config.as_deref(), prefix.as_deref(), all, out.as_deref(), quiet)
        }
        Commands::Serve { source, config, prefix, addr } => {
            run_serve(&source, &config, prefix.as_deref(), addr.as_deref(), quiet)
        }
        Commands::Build { source, save } => run_build(&source, save.as_deref(), quiet),
        Commands::Symbol { source, name, format } => run_symbol(&source, &name, format),
        Commands::Roots { source, format } => run_roots(&source, format),
    };
    match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    }
}

fn load_settings(source: &SourceArgs) -> Result<Config, KconfigGraphError> {
    match &source.settings {
        Some(path) => config::load_config_at(path).ok_or_else(|| {
            KconfigGraphError::Io(io::Error::other(format!(
                "failed to load settings file {}",
                path.display()
            )))
        }),
        None => Ok(config::load_config_near(&source.dir).unwrap_or_default()),
    }
}

fn load_graph(source: &SourceArgs, settings: &Config) -> Result<SymbolGraph, KconfigGraphError> {
    if let Some(path) = &source.graph {
        return SymbolGraph::load_json(path);
    }
    project_root::validate(&source.dir, settings.marker_file())?;
    Ok(SymbolGraph::build_from_directory(&source.dir))
}

/// Assignment files are usually named relative to the tree they describe;
/// fall back to `<dir>/<path>` when a relative path does not exist as given.
fn resolve_assignment_path(dir: &Path, path: &Path) -> PathBuf {
    if path.is_relative() && !path.exists() {
        let under_dir = dir.join(path);
        if under_dir.exists() {
            return under_dir;
        }
    }
    path.to_path_buf()
}

fn load_assigned(
    source: &SourceArgs,
    path: &Path,
    prefix: Option<&str>,
    settings: &Config,
) -> Result<AssignedConfig, KconfigGraphError> {
    let prefix = prefix.or(settings.prefix()).unwrap_or(DEFAULT_PREFIX);
    AssignedConfig::load_with_prefix(&resolve_assignment_path(&source.dir, path), prefix)
}

fn run_render(
    source: &SourceArgs,
    config: Option<&Path>,
    prefix: Option<&str>,
    all: bool,
    out: Option<&Path>,
    quiet: bool,
) -> Result<(), KconfigGraphError> {
    let settings = load_settings(source)?;
    // Load the assignment first: a bad path should fail before a long scan
    let assigned = match config {
        Some(path) if !all => Some(load_assigned(source, path, prefix, &settings)?),
        _ => None,
    };
    let graph = load_graph(source, &settings)?;
    let filter = match &assigned {
        Some(cfg) => EdgeFilter::Assigned(cfg),
        None => EdgeFilter::All,
    };
    let dot = DotGenerator::new().generate_dot_with_filter(&graph, filter);
    match out {
        Some(path) => {
            fs::write(path, dot)?;
            if !quiet {
                eprintln!("DOT written to {}", path.display());
            }
        }
        None => print!("{dot}"),
    }
    Ok(())
}

fn run_serve(
    source: &SourceArgs,
    config: &Path,
    prefix: Option<&str>,
    addr: Option<&str>,
    quiet: bool,
) -> Result<(), KconfigGraphError> {
    let settings = load_settings(source)?;
    let assigned = load_assigned(source, config, prefix, &settings)?;
    let graph = load_graph(source, &settings)?;
    let addr = addr.or(settings.addr()).unwrap_or(server::DEFAULT_ADDR);
    server::run_blocking(addr, AppState::new(graph, assigned), |bound| {
        if !quiet {
            println!("Server is running on http://{bound}");
        }
    })
}

fn run_build(source: &SourceArgs, save: Option<&Path>, quiet: bool) -> Result<(), KconfigGraphError> {
    let settings = load_settings(source)?;
    project_root::validate(&source.dir, settings.marker_file())?;
    let (graph, report) = SymbolGraph::build_from_directory_with_report(&source.dir);

    if let Some(path) = save {
        graph.save_json(path)?;
    }
    if !quiet {
        let rows = vec![
            vec!["Files parsed".to_string(), report.files_parsed.to_string()],
            vec!["Files skipped".to_string(), report.skipped.len().to_string()],
            vec!["Symbols".to_string(), graph.len().to_string()],
            vec!["Edges".to_string(), graph.edge_count().to_string()],
            vec!["Roots".to_string(), graph.root_count().to_string()],
            vec!["Unrecognized lines".to_string(), report.diagnostics.len().to_string()],
        ];
        println!("{}", table::render(&["Metric", "Count"], &rows));
        println!("Build completed for path: {}", source.dir.display());
    }
    Ok(())
}

fn run_symbol(source: &SourceArgs, name: &str, format: OutputFormat) -> Result<(), KconfigGraphError> {
    let settings = load_settings(source)?;
    let graph = load_graph(source, &settings)?;
    let info = SymbolInfoQuery::new(name).run(&graph);

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }
    let Some(info) = info else {
        println!("<symbol not found>");
        return Ok(());
    };
    println!("Symbol: {}", info.name);
    println!("Type: {}", info.symbol_type);
    println!("Prompt: {}", info.prompt);
    println!("Default: {}", info.default);
    println!("Root: {}", if info.is_root { "yes" } else { "no" });
    println!("Dependencies: {}", join_or_none(&info.dependencies));
    println!("Dependents: {}", join_or_none(&info.dependents));
    if !info.description.is_empty() {
        println!("\nHelp:");
        for line in info.description.lines() {
            println!("  {line}");
        }
    }
    Ok(())
}

fn join_or_none(names: &[String]) -> String {
    if names.is_empty() {
        "<none>".to_string()
    } else {
        names.join(", ")
    }
}

fn run_roots(source: &SourceArgs, format: OutputFormat) -> Result<(), KconfigGraphError> {
    let settings = load_settings(source)?;
    let graph = load_graph(source, &settings)?;
    let roots = RootsQuery::new().run(&graph);

    if format == OutputFormat::Json {
        #[derive(serde::Serialize)]
        struct Row {
            name: String,
            dependencies: usize,
        }
        let out: Vec<Row> =
            roots.into_iter().map(|(name, dependencies)| Row { name, dependencies }).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        let rows: Vec<Vec<String>> = roots
            .into_iter()
            .enumerate()
            .map(|(i, (name, deps))| vec![(i + 1).to_string(), name, deps.to_string()])
            .collect();
        println!("{}", table::render(&["#", "Symbol", "Deps"], &rows));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn assignment_path_falls_back_to_dir() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("my.config"), "CONFIG_A=y\n").unwrap();
        let resolved = resolve_assignment_path(dir.path(), Path::new("my.config"));
        assert_eq!(resolved, dir.path().join("my.config"));

        let absolute = dir.path().join("other.config");
        assert_eq!(resolve_assignment_path(dir.path(), &absolute), absolute);
    }
}
