//! kconfig-graph: Kconfig dependency graph explorer
//!
//! Scan a tree of Kconfig files into a graph of configuration symbols and
//! render the dependency edges relevant to one `.config` as DOT.
//!
//! # Features
//! - Line scanner for `config`/`menuconfig`, `depends on`, `select`, `imply`,
//!   `if`/`endif`, type, prompt, default and help directives
//! - Identifier extraction only: Kconfig expressions are never evaluated
//! - Deterministic DOT output filtered by an assignment file
//! - Symbol and root queries, graph JSON export, HTTP viewer
//!
//! # Quickstart (Library)
//! ```no_run
//! use kconfig_graph::assigned::AssignedConfig;
//! use kconfig_graph::graph::SymbolGraph;
//! use kconfig_graph::visualization::render;
//!
//! let graph = SymbolGraph::build_from_directory(std::path::Path::new("linux"));
//! let assigned = AssignedConfig::load(std::path::Path::new("linux/.config")).expect("read .config");
//! println!("{}", render(&graph, &assigned));
//! ```
//!
//! # Quickstart (CLI)
//! ```text
//! kconfig-graph render -d linux -c .config --out deps.dot
//! kconfig-graph serve -d linux -c .config --addr 127.0.0.1:8080
//! kconfig-graph symbol -d linux --name NET
//! ```
pub mod app;
pub mod assigned;
pub mod cli;
pub mod errors;
pub mod graph;
pub mod parser;
pub mod query;
pub mod server;
pub mod utils;
pub mod visualization;
