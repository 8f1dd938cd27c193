use crate::errors::ParseError;
use crate::graph::{SymbolGraph, SymbolId};
use regex::Regex;
use std::path::{Path, PathBuf};

const TYPE_KEYWORDS: [&str; 5] = ["bool", "tristate", "int", "hex", "string"];
const INERT_KEYWORDS: [&str; 4] = ["endmenu", "endchoice", "choice", "source"];

/// A line the scanner did not recognize. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub file: PathBuf,
    /// 1-based physical line number
    pub line: usize,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct FileReport {
    pub lines: usize,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug)]
pub struct KconfigParser {
    patterns: RegexPatterns,
}

#[derive(Debug)]
pub struct RegexPatterns {
    pub identifier: Regex,
}

impl RegexPatterns {
    /// # Panics
    /// Never in practice: the patterns are constant and known to compile.
    pub fn compile() -> Self {
        let identifier = Regex::new(r"[A-Za-z_][A-Za-z0-9_]*").unwrap();
        Self { identifier }
    }
}

impl Default for RegexPatterns {
    fn default() -> Self {
        Self::compile()
    }
}

impl Default for KconfigParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-file scanner state. Nothing carries over between files.
#[derive(Debug, Default)]
struct ScanState {
    current: Option<SymbolId>,
    parents: Vec<SymbolId>,
    in_help: bool,
    help_indent: String,
}

impl KconfigParser {
    #[must_use]
    pub fn new() -> Self {
        Self { patterns: RegexPatterns::compile() }
    }

    /// Read `path` and parse it into `graph`.
    ///
    /// # Errors
    /// Returns `ParseError` if the file cannot be read.
    pub fn parse_file(&self, path: &Path, graph: &mut SymbolGraph) -> Result<FileReport, ParseError> {
        let content = read_source(path)?;
        Ok(self.parse_str(&content, path, graph))
    }

    /// Scan Kconfig text line by line, adding symbols and edges to `graph`.
    ///
    /// `path` is only used to label diagnostics.
    pub fn parse_str(&self, content: &str, path: &Path, graph: &mut SymbolGraph) -> FileReport {
        let mut state = ScanState::default();
        let mut report = FileReport::default();
        let mut lines = content.lines().enumerate();

        while let Some((idx, raw)) = lines.next() {
            report.lines = idx + 1;

            if state.in_help {
                if raw.trim().is_empty() || raw.starts_with(state.help_indent.as_str()) {
                    if let Some(id) = state.current {
                        let desc = &mut graph.symbol_mut(id).description;
                        desc.push_str(raw.trim());
                        desc.push('\n');
                    }
                    continue;
                }
                state.in_help = false;
            }

            let mut line = strip_comment(raw).trim().to_string();
            if line.is_empty() {
                continue;
            }

            if let Some(expr) = line.strip_prefix("if") {
                for ident in self.identifiers(expr) {
                    state.parents.push(graph.add_symbol(ident));
                }
            } else if line.starts_with("endif") {
                // Drops every enclosing condition, not just the innermost one
                state.parents.clear();
            }

            if line.starts_with("config") || line.starts_with("menuconfig") {
                if let Some(name) = line.split_whitespace().nth(1) {
                    let id = graph.add_symbol(name);
                    state.current = Some(id);
                    for &parent in &state.parents {
                        graph.add_edge(parent, id);
                    }
                }
            }

            if line.starts_with("depends on") {
                line = join_continuations(line, &mut lines, &mut report.lines);
                if let (Some(current), Some(expr)) = (state.current, line.strip_prefix("depends on")) {
                    for ident in self.identifiers(expr).filter(|i| *i != "if") {
                        let dep = graph.add_symbol(ident);
                        graph.add_edge(dep, current);
                    }
                }
            }

            if line.starts_with("select") {
                line = join_continuations(line, &mut lines, &mut report.lines);
                if let (Some(current), Some(expr)) = (state.current, line.strip_prefix("select")) {
                    for ident in self.identifiers(expr).filter(|i| *i != "if") {
                        let target = graph.add_symbol(ident);
                        graph.add_edge(current, target);
                    }
                }
            }

            if let Some(current) = state.current {
                if let Some(expr) = line.strip_prefix("imply") {
                    for operand in expr.split("&&").map(str::trim).filter(|o| !o.is_empty()) {
                        let source = graph.add_symbol(operand);
                        graph.add_edge(source, current);
                    }
                }
                if let Some(expr) = line.strip_prefix("default") {
                    graph.symbol_mut(current).default = expr.trim().to_string();
                }
                if let Some(text) = line.strip_prefix("prompt") {
                    graph.symbol_mut(current).prompt = text.trim().to_string();
                }
                if TYPE_KEYWORDS.iter().any(|k| line.starts_with(k)) {
                    graph.symbol_mut(current).symbol_type.clone_from(&line);
                }
                if line.starts_with("help") {
                    state.in_help = true;
                    state.help_indent = leading_whitespace(raw).to_string();
                    graph.symbol_mut(current).description.clear();
                }
            }

            if !is_recognized(&line) {
                log::debug!("Warning: Unrecognized token in {}:{}: {}", path.display(), idx + 1, line);
                report.diagnostics.push(Diagnostic {
                    file: path.to_path_buf(),
                    line: idx + 1,
                    text: line,
                });
            }
        }

        report
    }

    fn identifiers<'a>(&'a self, expr: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.patterns.identifier.find_iter(expr).map(|m| m.as_str())
    }
}

/// Read a Kconfig file. Bytes that are not UTF-8 become U+FFFD.
///
/// # Errors
/// Returns `ParseError::Io` if the file cannot be read.
pub fn read_source(path: &Path) -> Result<String, ParseError> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    }
}

fn leading_whitespace(line: &str) -> &str {
    let end = line.find(|c: char| c != ' ' && c != '\t').unwrap_or(line.len());
    &line[..end]
}

/// Append physical lines while `line` ends with a `\` marker.
///
/// The marker is replaced by a single space so tokens on either side stay
/// separate. Stops at end of input. `consumed` tracks the 1-based number of
/// the last physical line read.
fn join_continuations<'a, I>(mut line: String, lines: &mut I, consumed: &mut usize) -> String
where
    I: Iterator<Item = (usize, &'a str)>,
{
    while line.ends_with('\\') {
        line.pop();
        let Some((idx, next)) = lines.next() else {
            break;
        };
        *consumed = idx + 1;
        line.truncate(line.trim_end().len());
        line.push(' ');
        line.push_str(strip_comment(next).trim());
    }
    line
}

fn is_recognized(line: &str) -> bool {
    const DIRECTIVES: [&str; 10] = [
        "config", "menuconfig", "depends on", "select", "default", "imply", "prompt", "help", "if",
        "endif",
    ];
    DIRECTIVES
        .iter()
        .chain(TYPE_KEYWORDS.iter())
        .chain(INERT_KEYWORDS.iter())
        .any(|k| line.starts_with(k))
}
