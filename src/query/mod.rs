use serde::Serialize;

use crate::graph::SymbolGraph;

/// Query trait implemented by all query types.
///
/// Given an immutable reference to a `SymbolGraph`, returns a result of type `R`.
pub trait Query<R> {
    fn run(&self, graph: &SymbolGraph) -> R;
}

/// Everything the scan recorded about one symbol.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SymbolInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub symbol_type: String,
    pub default: String,
    pub prompt: String,
    pub description: String,
    /// Outgoing edges in parse order, duplicates included.
    pub dependencies: Vec<String>,
    /// Symbols with an edge into this one, each listed once.
    pub dependents: Vec<String>,
    pub is_root: bool,
}

/// Look up a symbol by exact name.
pub struct SymbolInfoQuery {
    pub name: String,
}

impl SymbolInfoQuery {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string() }
    }
}

impl Query<Option<SymbolInfo>> for SymbolInfoQuery {
    fn run(&self, graph: &SymbolGraph) -> Option<SymbolInfo> {
        let id = graph.id_of(&self.name)?;
        let sym = graph.symbol(id);
        let name_of = |d: &crate::graph::SymbolId| graph.symbol(*d).name.clone();
        Some(SymbolInfo {
            name: sym.name.clone(),
            symbol_type: sym.symbol_type.clone(),
            default: sym.default.clone(),
            prompt: sym.prompt.clone(),
            description: sym.description.clone(),
            dependencies: sym.dependencies.iter().map(name_of).collect(),
            dependents: graph.dependents(id).iter().map(name_of).collect(),
            is_root: graph.is_root(&self.name),
        })
    }
}

/// Root symbols as `(name, outgoing edge count)`, in creation order.
#[derive(Debug, Default)]
pub struct RootsQuery;

impl RootsQuery {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Query<Vec<(String, usize)>> for RootsQuery {
    fn run(&self, graph: &SymbolGraph) -> Vec<(String, usize)> {
        graph
            .roots()
            .map(|id| {
                let sym = graph.symbol(id);
                (sym.name.clone(), sym.dependencies.len())
            })
            .collect()
    }
}
