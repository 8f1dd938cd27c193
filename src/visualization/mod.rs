use crate::assigned::AssignedConfig;
use crate::graph::{SymbolGraph, SymbolId};
use std::collections::HashSet;

/// Which edges make it into the output.
#[derive(Debug, Clone, Copy)]
pub enum EdgeFilter<'a> {
    /// Both endpoints must be assigned.
    Assigned(&'a AssignedConfig),
    /// Every edge reachable from a root.
    All,
}

impl EdgeFilter<'_> {
    fn keeps(&self, parent: &str, child: &str) -> bool {
        match self {
            EdgeFilter::Assigned(cfg) => cfg.contains(parent) && cfg.contains(child),
            EdgeFilter::All => true,
        }
    }
}

#[derive(Debug, Default)]
pub struct DotGenerator;

impl DotGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self {}
    }

    /// Render the edges whose endpoints are both assigned in `assigned`.
    #[must_use]
    pub fn generate_dot(&self, graph: &SymbolGraph, assigned: &AssignedConfig) -> String {
        self.generate_dot_with_filter(graph, EdgeFilter::Assigned(assigned))
    }

    /// Walk the graph depth-first from every root and emit the kept edges.
    ///
    /// The visited set is shared across all roots. An edge is considered
    /// before its target's visited check, so an edge closing a cycle is still
    /// emitted once even though the walk does not re-enter the target.
    /// Identical edge lines are emitted once, in first-seen order.
    #[must_use]
    pub fn generate_dot_with_filter(&self, graph: &SymbolGraph, filter: EdgeFilter<'_>) -> String {
        let mut edges = EdgeLines::default();
        let mut visited = vec![false; graph.len()];
        // (symbol, index of the next dependency to look at)
        let mut stack: Vec<(SymbolId, usize)> = Vec::new();

        for root in graph.roots() {
            if visited[root.index()] {
                continue;
            }
            visited[root.index()] = true;
            stack.push((root, 0));

            while let Some(frame) = stack.last_mut() {
                let (id, next) = *frame;
                let symbol = graph.symbol(id);
                let Some(&dep) = symbol.dependencies.get(next) else {
                    stack.pop();
                    continue;
                };
                frame.1 += 1;

                let target = graph.symbol(dep);
                if filter.keeps(&symbol.name, &target.name) {
                    edges.push(format!(
                        "  \"{}\" -> \"{}\";\n",
                        escape_label(&symbol.name),
                        escape_label(&target.name)
                    ));
                }
                if !visited[dep.index()] {
                    visited[dep.index()] = true;
                    stack.push((dep, 0));
                }
            }
        }

        let mut s = String::from("digraph G {\n");
        for line in edges.lines {
            s.push_str(&line);
        }
        s.push_str("}\n");
        s
    }
}

/// Render the assignment-filtered dependency graph as DOT text.
#[must_use]
pub fn render(graph: &SymbolGraph, assigned: &AssignedConfig) -> String {
    DotGenerator::new().generate_dot(graph, assigned)
}

#[derive(Debug, Default)]
struct EdgeLines {
    seen: HashSet<String>,
    lines: Vec<String>,
}

impl EdgeLines {
    fn push(&mut self, line: String) {
        if self.seen.insert(line.clone()) {
            self.lines.push(line);
        }
    }
}

fn escape_label(s: &str) -> String {
    s.replace('"', "\\\"")
}
