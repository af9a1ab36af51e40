//! Tree-sitter based complexity engine.
//!
//! Cyclomatic complexity is counted with a query built from the
//! configured options:
//! - Start at 1
//! - Add 1 for each: if, for, while, do, ?:
//! - Optionally add 1 for each: &&, ||, ?? / case / for-in / catch
//!
//! Halstead tokens and logical lines come from a walk over the tree.

use streaming_iterator::StreamingIterator;
use tree_sitter::{Language, Node, Parser as TsParser, Query, QueryCursor, Tree};

use super::halstead::TokenCounts;
use super::languages::{
    complexity_query, language_for_path, FUNCTION_KINDS, OPERAND_KINDS, OPERATORS,
    STATEMENT_KINDS,
};
use super::{maintainability_index, AnalyzeError, ComplexityEngine, ComplexityReport, FunctionComplexity, Sloc};
use crate::config::ComplexityOptions;
use crate::source::{physical_lines, SourceFile};

const ANONYMOUS: &str = "<anonymous>";

/// Built-in engine for JavaScript and TypeScript sources.
pub struct TreeSitterEngine {
    options: ComplexityOptions,
    query_source: String,
}

impl TreeSitterEngine {
    /// Create an engine with the given options.
    pub fn new(options: ComplexityOptions) -> Self {
        let query_source = complexity_query(&options);
        Self {
            options,
            query_source,
        }
    }

    /// Parse source code and return the tree.
    fn parse(&self, language: &Language, source: &[u8]) -> Result<Tree, AnalyzeError> {
        let mut parser = TsParser::new();
        parser
            .set_language(language)
            .map_err(|e| AnalyzeError::Language(e.to_string()))?;
        parser
            .parse(source, None)
            .ok_or_else(|| AnalyzeError::Language("parser returned no tree".to_string()))
    }
}

impl Default for TreeSitterEngine {
    fn default() -> Self {
        Self::new(ComplexityOptions::default())
    }
}

impl ComplexityEngine for TreeSitterEngine {
    fn analyze(&self, source: &SourceFile) -> Result<ComplexityReport, AnalyzeError> {
        let language = language_for_path(&source.path)
            .ok_or_else(|| AnalyzeError::UnsupportedLanguage(source.path.clone()))?;
        let grammar = language.grammar();
        let bytes = source.text.as_bytes();

        let tree = self.parse(&grammar, bytes)?;
        let root = tree.root_node();
        if root.has_error() {
            return Err(AnalyzeError::Parse(source.path.clone()));
        }

        let query = Query::new(&grammar, &self.query_source)
            .map_err(|e| AnalyzeError::Query(e.to_string()))?;

        let cyclomatic = 1 + count_branches(&query, root, bytes);

        let mut tokens = TokenCounts::default();
        collect_tokens(root, bytes, &mut tokens);
        let halstead = tokens.metrics();

        let sloc = Sloc {
            physical: physical_lines(&source.text),
            logical: count_statements(root),
        };

        let mut functions = Vec::new();
        collect_functions(root, bytes, &query, &mut functions);

        let maintainability = maintainability_index(
            halstead.effort,
            cyclomatic as f64,
            sloc.logical as f64,
            self.options.newmi,
        );

        log::debug!(
            "{}: {} sloc, cyclomatic {}, mi {:.2} ({})",
            source.path.display(),
            sloc.physical,
            cyclomatic,
            maintainability,
            language.as_str()
        );

        Ok(ComplexityReport {
            sloc,
            cyclomatic,
            halstead,
            maintainability,
            functions,
            ecma_features: self.options.ecma_features.clone(),
            error: None,
        })
    }

    fn name(&self) -> &str {
        "tree-sitter"
    }
}

/// Count complexity branch points within a node.
fn count_branches(query: &Query, node: Node, source: &[u8]) -> u32 {
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(query, node, source);
    let mut branches = 0;
    while matches.next().is_some() {
        branches += 1;
    }
    branches
}

/// Count branch points that belong to `function` itself, leaving out those
/// inside nested functions.
fn count_own_branches(query: &Query, function: Node, source: &[u8]) -> u32 {
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(query, function, source);
    let mut branches = 0;
    while let Some(m) = matches.next() {
        let owned = m
            .captures
            .first()
            .is_some_and(|c| enclosing_function(c.node).map(|f| f.id()) == Some(function.id()));
        if owned {
            branches += 1;
        }
    }
    branches
}

/// Nearest function node strictly above `node`.
fn enclosing_function(node: Node) -> Option<Node> {
    let mut current = node.parent();
    while let Some(parent) = current {
        if FUNCTION_KINDS.contains(&parent.kind()) {
            return Some(parent);
        }
        current = parent.parent();
    }
    None
}

/// Count statements below a node, excluding the node itself.
fn count_statements(node: Node) -> usize {
    let mut count = 0;
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if STATEMENT_KINDS.contains(&child.kind()) {
            count += 1;
        }
        count += count_statements(child);
    }
    count
}

fn collect_tokens(node: Node, source: &[u8], tokens: &mut TokenCounts) {
    let kind = node.kind();
    if kind == "comment" {
        return;
    }
    if node.is_named() && OPERAND_KINDS.contains(&kind) {
        tokens.operand(node.utf8_text(source).unwrap_or(kind));
        return;
    }
    if node.child_count() == 0 {
        if !node.is_named() && OPERATORS.contains(&kind) {
            tokens.operator(kind);
        }
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_tokens(child, source, tokens);
    }
}

fn collect_functions(
    node: Node,
    source: &[u8],
    query: &Query,
    functions: &mut Vec<FunctionComplexity>,
) {
    if FUNCTION_KINDS.contains(&node.kind()) {
        functions.push(FunctionComplexity {
            name: function_name(node, source),
            line: node.start_position().row + 1,
            params: param_count(node),
            cyclomatic: 1 + count_own_branches(query, node, source),
            sloc: Sloc {
                physical: node.end_position().row - node.start_position().row + 1,
                logical: count_statements(node),
            },
        });
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_functions(child, source, query, functions);
    }
}

/// Name from the node itself, or from what it is assigned to.
fn function_name(node: Node, source: &[u8]) -> String {
    let text = |n: Node| n.utf8_text(source).unwrap_or(ANONYMOUS).to_string();

    if let Some(name) = node.child_by_field_name("name") {
        return text(name);
    }

    if let Some(parent) = node.parent() {
        let target = match parent.kind() {
            "variable_declarator" => parent.child_by_field_name("name"),
            "pair" => parent.child_by_field_name("key"),
            "assignment_expression" => parent.child_by_field_name("left"),
            _ => None,
        };
        if let Some(target) = target {
            return text(target);
        }
    }

    ANONYMOUS.to_string()
}

fn param_count(node: Node) -> usize {
    if node.child_by_field_name("parameter").is_some() {
        return 1;
    }
    match node.child_by_field_name("parameters") {
        Some(params) => {
            let mut cursor = params.walk();
            params
                .named_children(&mut cursor)
                .filter(|p| p.kind() != "comment")
                .count()
        }
        None => 0,
    }
}
