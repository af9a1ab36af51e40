//! Tree-sitter grammars and queries per source language.

use std::path::Path;
use tree_sitter::Language;

use crate::config::ComplexityOptions;

/// Languages the built-in engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLanguage {
    JavaScript,
    TypeScript,
    Tsx,
}

impl SourceLanguage {
    pub fn grammar(&self) -> Language {
        match self {
            SourceLanguage::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            SourceLanguage::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            SourceLanguage::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceLanguage::JavaScript => "javascript",
            SourceLanguage::TypeScript => "typescript",
            SourceLanguage::Tsx => "tsx",
        }
    }
}

/// Pick a language from the file extension.
pub fn language_for_path(path: &Path) -> Option<SourceLanguage> {
    match path.extension().and_then(|e| e.to_str())? {
        "js" | "jsx" | "mjs" | "cjs" => Some(SourceLanguage::JavaScript),
        "ts" | "mts" | "cts" => Some(SourceLanguage::TypeScript),
        "tsx" => Some(SourceLanguage::Tsx),
        _ => None,
    }
}

/// Decision points always counted.
const BRANCH_QUERY: &str = r#"
(if_statement) @branch
(for_statement) @branch
(while_statement) @branch
(do_statement) @branch
(ternary_expression) @branch
"#;

/// `&&`, `||`, `??`
const LOGICAL_QUERY: &str = r#"
(binary_expression operator: "&&") @branch
(binary_expression operator: "||") @branch
(binary_expression operator: "??") @branch
"#;

const SWITCH_CASE_QUERY: &str = "(switch_case) @branch\n";

/// Covers both `for..in` and `for..of`.
const FOR_IN_QUERY: &str = "(for_in_statement) @branch\n";

const CATCH_QUERY: &str = "(catch_clause) @branch\n";

/// Build the cyclomatic complexity query for the given options.
pub fn complexity_query(options: &ComplexityOptions) -> String {
    let mut query = String::from(BRANCH_QUERY);
    if options.logicalor {
        query.push_str(LOGICAL_QUERY);
    }
    if options.switchcase {
        query.push_str(SWITCH_CASE_QUERY);
    }
    if options.forin {
        query.push_str(FOR_IN_QUERY);
    }
    if options.trycatch {
        query.push_str(CATCH_QUERY);
    }
    query
}

/// Node kinds that start a function body.
pub const FUNCTION_KINDS: &[&str] = &[
    "function_declaration",
    "function_expression",
    "function",
    "generator_function_declaration",
    "generator_function",
    "method_definition",
    "arrow_function",
];

/// Node kinds counted as one logical line.
pub const STATEMENT_KINDS: &[&str] = &[
    "expression_statement",
    "variable_declaration",
    "lexical_declaration",
    "return_statement",
    "if_statement",
    "for_statement",
    "for_in_statement",
    "while_statement",
    "do_statement",
    "switch_statement",
    "switch_case",
    "switch_default",
    "try_statement",
    "throw_statement",
    "break_statement",
    "continue_statement",
    "debugger_statement",
    "labeled_statement",
    "function_declaration",
    "generator_function_declaration",
    "class_declaration",
    "method_definition",
    "field_definition",
    "public_field_definition",
    "import_statement",
    "export_statement",
];

/// Leaf kinds counted as Halstead operands.
pub const OPERAND_KINDS: &[&str] = &[
    "identifier",
    "property_identifier",
    "shorthand_property_identifier",
    "shorthand_property_identifier_pattern",
    "private_property_identifier",
    "statement_identifier",
    "type_identifier",
    "number",
    "string",
    "template_string",
    "regex",
    "true",
    "false",
    "null",
    "undefined",
    "this",
    "super",
];

/// Tokens counted as Halstead operators.
pub const OPERATORS: &[&str] = &[
    "function", "var", "let", "const", "if", "else", "switch", "case", "default", "while",
    "for", "do", "return", "break", "continue", "class", "extends", "new", "import", "export",
    "try", "catch", "finally", "throw", "async", "await", "yield", "typeof", "instanceof", "in",
    "of", "delete", "void", "get", "set", "static", "=>", "=", "==", "===", "!=", "!==", "<",
    ">", "<=", ">=", "+", "-", "*", "/", "%", "&", "|", "^", "!", "&&", "||", "~", "<<", ">>",
    ">>>", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<=", ">>=", ">>>=", "**", "**=",
    "?.", "??", "??=", "&&=", "||=", "++", "--", "...", ".", "?", "(", "[",
];
