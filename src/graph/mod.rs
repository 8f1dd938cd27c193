//! Symbol graph model and builder for the crate.
//!
//! This module defines the core data structures (`SymbolGraph`, `Symbol`,
//! `SymbolId`) and the directory scan that populates them from Kconfig files.
//!
//! The graph owns every symbol in an arena; dependency edges are stored as
//! `SymbolId` indices into that arena. A symbol is a *root* until the first
//! edge targets it, and it never becomes a root again.
//!
//! You typically construct a graph via `SymbolGraph::build_from_directory`
//! and then pass it to `crate::visualization` or the queries in `crate::query`.
use crate::errors::{KconfigGraphError, ParseError};
use crate::parser::{self, Diagnostic, KconfigParser};
use crate::utils::file_walker;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

/// Index of a symbol inside the graph that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolId(usize);

impl SymbolId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// One named configuration option.
///
/// All text attributes are stored raw, exactly as they appeared after the
/// directive keyword; nothing is evaluated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    /// Full type directive line, e.g. `bool "Enable foo"`.
    pub symbol_type: String,
    pub default: String,
    pub prompt: String,
    /// Help text, one `\n`-terminated line per source line.
    pub description: String,
    pub dependencies: Vec<SymbolId>,
}

impl Symbol {
    fn new(name: &str) -> Self {
        Self { name: name.to_string(), ..Self::default() }
    }

    /// True when no attribute was ever recorded for this symbol, i.e. it was
    /// only seen as a reference.
    #[must_use]
    pub fn is_bare(&self) -> bool {
        self.symbol_type.is_empty()
            && self.default.is_empty()
            && self.prompt.is_empty()
            && self.description.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SymbolGraph {
    symbols: Vec<Symbol>,
    by_name: HashMap<String, SymbolId>,
    // Ordered by id, i.e. by creation order, so traversal order is stable
    roots: BTreeSet<SymbolId>,
}

impl SymbolGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id for `name`, creating the symbol (and marking it as a
    /// root) on first mention.
    pub fn add_symbol(&mut self, name: &str) -> SymbolId {
        if let Some(&id) = self.by_name.get(name) {
            return id;
        }
        let id = SymbolId(self.symbols.len());
        self.symbols.push(Symbol::new(name));
        self.by_name.insert(name.to_string(), id);
        self.roots.insert(id);
        id
    }

    /// Record the edge `parent -> child`, creating either endpoint if needed.
    pub fn add_dependency(&mut self, parent: &str, child: &str) {
        let parent = self.add_symbol(parent);
        let child = self.add_symbol(child);
        self.add_edge(parent, child);
    }

    /// Same as `add_dependency` for endpoints that already exist.
    ///
    /// Duplicate edges are kept; `child` stops being a root.
    pub fn add_edge(&mut self, parent: SymbolId, child: SymbolId) {
        self.symbols[parent.0].dependencies.push(child);
        self.roots.remove(&child);
    }

    #[must_use]
    pub fn id_of(&self, name: &str) -> Option<SymbolId> {
        self.by_name.get(name).copied()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.id_of(name).map(|id| &self.symbols[id.0])
    }

    /// # Panics
    /// Panics if `id` was not produced by this graph.
    #[must_use]
    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.0]
    }

    pub(crate) fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.0]
    }

    /// All symbols in creation order.
    pub fn symbols(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols.iter().enumerate().map(|(i, s)| (SymbolId(i), s))
    }

    /// Current roots in creation order.
    pub fn roots(&self) -> impl Iterator<Item = SymbolId> + '_ {
        self.roots.iter().copied()
    }

    #[must_use]
    pub fn is_root(&self, name: &str) -> bool {
        self.id_of(name).is_some_and(|id| self.roots.contains(&id))
    }

    #[must_use]
    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Number of recorded edges, duplicates included.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.symbols.iter().map(|s| s.dependencies.len()).sum()
    }

    /// Symbols that list `id` among their dependencies, each reported once,
    /// in creation order.
    #[must_use]
    pub fn dependents(&self, id: SymbolId) -> Vec<SymbolId> {
        self.symbols()
            .filter(|(_, s)| s.dependencies.contains(&id))
            .map(|(sid, _)| sid)
            .collect()
    }
}

/// Outcome of a directory scan besides the graph itself.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    pub files_parsed: usize,
    /// Files that could not be read, with the error text.
    pub skipped: Vec<(PathBuf, String)>,
    pub diagnostics: Vec<Diagnostic>,
}

impl SymbolGraph {
    /// Build a graph from every `Kconfig*` file under `root`.
    ///
    /// Unreadable files are logged and skipped; see
    /// `build_from_directory_with_report` to inspect them.
    #[must_use]
    pub fn build_from_directory(root: &Path) -> Self {
        Self::build_from_directory_with_report(root).0
    }

    /// Build a graph from every `Kconfig*` file under `root` and report what
    /// the scan skipped or did not understand.
    ///
    /// Files are read in parallel but parsed one after another in lexical
    /// path order, so repeated builds produce identical graphs.
    #[must_use]
    pub fn build_from_directory_with_report(root: &Path) -> (Self, ScanReport) {
        let files = file_walker::kconfig_files(root);
        log::debug!("found {} Kconfig files under {}", files.len(), root.display());

        let sources: Vec<(PathBuf, Result<String, ParseError>)> = files
            .into_par_iter()
            .map(|path| {
                let content = parser::read_source(&path);
                (path, content)
            })
            .collect();

        let parser = KconfigParser::new();
        let mut graph = Self::new();
        let mut report = ScanReport::default();
        for (path, content) in sources {
            match content {
                Ok(text) => {
                    let file_report = parser.parse_str(&text, &path, &mut graph);
                    report.files_parsed += 1;
                    report.diagnostics.extend(file_report.diagnostics);
                }
                Err(e) => {
                    log::warn!("Error opening file {}: {e}", path.display());
                    report.skipped.push((path, e.to_string()));
                }
            }
        }

        log::info!(
            "parsed {} files: {} symbols, {} edges, {} roots",
            report.files_parsed,
            graph.len(),
            graph.edge_count(),
            graph.root_count()
        );
        (graph, report)
    }

    /// Save the graph as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns `KconfigGraphError` if serialization or writing the file fails.
    pub fn save_json(&self, path: &Path) -> Result<(), KconfigGraphError> {
        let data = serde_json::to_string_pretty(&self.to_document())?;
        std::fs::write(path, data)?;
        Ok(())
    }

    /// Load a graph previously written by `save_json`.
    ///
    /// # Errors
    /// Returns `KconfigGraphError` if reading the file fails or the JSON is invalid.
    pub fn load_json(path: &Path) -> Result<Self, KconfigGraphError> {
        let data = std::fs::read_to_string(path)?;
        let doc: GraphDocument = serde_json::from_str(&data)?;
        Ok(Self::from_document(&doc))
    }

    #[must_use]
    pub fn to_document(&self) -> GraphDocument {
        let name = |id: &SymbolId| self.symbols[id.0].name.clone();
        GraphDocument {
            symbols: self
                .symbols
                .iter()
                .map(|s| SymbolRecord {
                    name: s.name.clone(),
                    symbol_type: s.symbol_type.clone(),
                    default: s.default.clone(),
                    prompt: s.prompt.clone(),
                    description: s.description.clone(),
                    dependencies: s.dependencies.iter().map(name).collect(),
                })
                .collect(),
            roots: self.roots.iter().map(name).collect(),
        }
    }

    /// Rebuild a graph by replaying symbol creation, then edges.
    ///
    /// The stored `roots` list is informational; roots are recomputed from
    /// the edges.
    #[must_use]
    pub fn from_document(doc: &GraphDocument) -> Self {
        let mut graph = Self::new();
        for rec in &doc.symbols {
            let id = graph.add_symbol(&rec.name);
            let sym = graph.symbol_mut(id);
            sym.symbol_type.clone_from(&rec.symbol_type);
            sym.default.clone_from(&rec.default);
            sym.prompt.clone_from(&rec.prompt);
            sym.description.clone_from(&rec.description);
        }
        for rec in &doc.symbols {
            for dep in &rec.dependencies {
                graph.add_dependency(&rec.name, dep);
            }
        }
        graph
    }
}

/// Serialized form of a `SymbolGraph`, with edges written as names.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GraphDocument {
    pub symbols: Vec<SymbolRecord>,
    #[serde(default)]
    pub roots: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SymbolRecord {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub symbol_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub default: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub prompt: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
}
