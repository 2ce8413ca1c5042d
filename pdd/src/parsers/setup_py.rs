use super::requirements::parse_requirements;
use super::{DeclaredDependency, DependencyParser};
use crate::error::FormatError;
use std::collections::VecDeque;
use std::path::Path;
use tree_sitter::{Node, Parser, Tree};

const SETUP_FUNCTION: &str = "setup";

/// Statements the grammar still accepts but Python 3 rejects
const PYTHON2_STATEMENTS: [&str; 2] = ["print_statement", "exec_statement"];

/// Parser for setup.py scripts.
///
/// The script is never executed. It is parsed with tree-sitter and the first
/// bare `setup(...)` expression statement found in a breadth-first walk is
/// inspected for literal dependency lists:
/// - `install_requires=[...]`
/// - `extras_require={...: [...]}`
///
/// Anything computed at runtime (variables, comprehensions, `open().read()`)
/// is skipped, so dynamic declarations are under-reported.
pub struct SetupPyParser;

impl SetupPyParser {
    fn parse_tree(text: &str) -> Result<Tree, FormatError> {
        let mut parser = Parser::new();
        let language = tree_sitter_python::LANGUAGE;
        parser
            .set_language(&language.into())
            .map_err(|e| FormatError::TreeSitter(e.to_string()))?;

        let tree = parser
            .parse(text, None)
            .ok_or_else(|| FormatError::TreeSitter("failed to parse Python source".into()))?;

        if let Some(bad) = Self::first_error(tree.root_node()) {
            let position = bad.start_position();
            return Err(FormatError::Syntax {
                line: position.row + 1,
                column: position.column + 1,
            });
        }

        Ok(tree)
    }

    /// Leftmost ERROR or MISSING node, or Python 2 only statement, if any
    fn first_error(node: Node<'_>) -> Option<Node<'_>> {
        if node.is_error() || node.is_missing() || PYTHON2_STATEMENTS.contains(&node.kind()) {
            return Some(node);
        }

        let mut cursor = node.walk();
        let children: Vec<Node> = node.children(&mut cursor).collect();
        children
            .into_iter()
            .find_map(Self::first_error)
            .or_else(|| node.has_error().then_some(node))
    }

    /// Level-order walk, so module-level statements win over nested ones
    fn find_setup_call<'t>(root: Node<'t>, source: &[u8]) -> Option<Node<'t>> {
        let mut queue = VecDeque::from([root]);

        while let Some(node) = queue.pop_front() {
            if let Some(call) = Self::as_setup_call(node, source) {
                return Some(call);
            }
            let mut cursor = node.walk();
            queue.extend(node.named_children(&mut cursor));
        }

        None
    }

    /// `setup(...)` used as a statement on its own; attribute calls such as
    /// `setuptools.setup(...)` and assignments don't count
    fn as_setup_call<'t>(node: Node<'t>, source: &[u8]) -> Option<Node<'t>> {
        if node.kind() != "expression_statement" {
            return None;
        }

        let mut cursor = node.walk();
        let exprs: Vec<Node> = node
            .named_children(&mut cursor)
            .filter(|n| n.kind() != "comment")
            .collect();
        let [call] = exprs.as_slice() else {
            return None;
        };
        if call.kind() != "call" {
            return None;
        }

        let function = call.child_by_field_name("function")?;
        let is_setup =
            function.kind() == "identifier" && function.utf8_text(source).ok()? == SETUP_FUNCTION;

        is_setup.then_some(*call)
    }

    fn extract_dependencies(
        call: Node<'_>,
        source: &[u8],
        path: &Path,
    ) -> Result<Vec<DeclaredDependency>, FormatError> {
        let mut dependencies = Vec::new();

        let Some(arguments) = call.child_by_field_name("arguments") else {
            return Ok(dependencies);
        };

        let mut cursor = arguments.walk();
        for argument in arguments.named_children(&mut cursor) {
            if argument.kind() != "keyword_argument" {
                continue;
            }
            let (Some(name), Some(value)) = (
                argument.child_by_field_name("name"),
                argument.child_by_field_name("value"),
            ) else {
                continue;
            };
            let value = unparenthesize(value);

            match name.utf8_text(source).unwrap_or_default() {
                "install_requires" if value.kind() == "list" => {
                    dependencies.extend(Self::list_dependencies(value, source, path)?);
                }
                "extras_require" if value.kind() == "dictionary" => {
                    // Extra names (the keys) are not dependencies
                    let mut pair_cursor = value.walk();
                    for pair in value.named_children(&mut pair_cursor) {
                        if pair.kind() != "pair" {
                            continue;
                        }
                        let Some(extra) = pair.child_by_field_name("value").map(unparenthesize)
                        else {
                            continue;
                        };
                        if extra.kind() == "list" {
                            dependencies.extend(Self::list_dependencies(extra, source, path)?);
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(dependencies)
    }

    /// Each literal string element is read as one requirements line
    fn list_dependencies(
        list: Node<'_>,
        source: &[u8],
        path: &Path,
    ) -> Result<Vec<DeclaredDependency>, FormatError> {
        let mut dependencies = Vec::new();

        let mut cursor = list.walk();
        for element in list.named_children(&mut cursor) {
            if let Some(requirement) = string_literal(element, source) {
                dependencies.extend(parse_requirements(&requirement, path)?);
            }
        }

        Ok(dependencies)
    }
}

fn unparenthesize(mut node: Node<'_>) -> Node<'_> {
    while node.kind() == "parenthesized_expression" {
        let mut cursor = node.walk();
        let inner = node
            .named_children(&mut cursor)
            .find(|n| n.kind() != "comment");
        match inner {
            Some(inner) => node = inner,
            None => break,
        }
    }
    node
}

/// Value of a statically known `str` literal, joining implicit
/// concatenation (`"pan" "das"`). f-strings and bytes are not literals here.
fn string_literal(node: Node<'_>, source: &[u8]) -> Option<String> {
    let node = unparenthesize(node);
    match node.kind() {
        "string" => string_value(node, source),
        "concatenated_string" => {
            let mut cursor = node.walk();
            node.named_children(&mut cursor)
                .filter(|part| part.kind() != "comment")
                .map(|part| string_value(part, source))
                .collect()
        }
        _ => None,
    }
}

fn string_value(node: Node<'_>, source: &[u8]) -> Option<String> {
    if node.kind() != "string" {
        return None;
    }

    let text = node.utf8_text(source).ok()?;
    let prefix_len = text.find(['"', '\''])?;
    let prefix = text[..prefix_len].to_ascii_lowercase();
    if prefix.contains('b') || prefix.contains('f') {
        return None;
    }

    let body = &text[prefix_len..];
    let quote = ["\"\"\"", "'''", "\"", "'"]
        .into_iter()
        .find(|q| body.starts_with(q))?;
    let inner = body.strip_prefix(quote)?.strip_suffix(quote)?;

    if prefix.contains('r') {
        Some(inner.to_string())
    } else {
        unescape(inner)
    }
}

/// Decode Python escape sequences
///
/// `None` for `\N{...}` (needs the Unicode name table) and for escapes that
/// don't form a valid character.
fn unescape(body: &str) -> Option<String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('a') => out.push('\u{7}'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('v') => out.push('\u{b}'),
            // Escaped newline joins the lines
            Some('\n') => {}
            Some(other @ ('\\' | '\'' | '"')) => out.push(other),
            Some('x') => out.push(hex_char(&mut chars, 2)?),
            Some('u') => out.push(hex_char(&mut chars, 4)?),
            Some('U') => out.push(hex_char(&mut chars, 8)?),
            Some('N') => return None,
            Some(first @ '0'..='7') => {
                let mut code = first.to_digit(8)?;
                for _ in 0..2 {
                    match chars.peek().and_then(|c| c.to_digit(8)) {
                        Some(digit) => {
                            code = code * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.push(char::from_u32(code)?);
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    Some(out)
}

/// Exactly `digits` hex digits naming one code point
fn hex_char(chars: &mut impl Iterator<Item = char>, digits: usize) -> Option<char> {
    let hex: String = chars.by_ref().take(digits).collect();
    if hex.len() != digits {
        return None;
    }
    char::from_u32(u32::from_str_radix(&hex, 16).ok()?)
}

impl DependencyParser for SetupPyParser {
    fn parse(&self, text: &str, path: &Path) -> Result<Vec<DeclaredDependency>, FormatError> {
        let tree = Self::parse_tree(text)?;
        let source = text.as_bytes();

        match Self::find_setup_call(tree.root_node(), source) {
            Some(call) => Self::extract_dependencies(call, source, path),
            None => Ok(Vec::new()),
        }
    }

    fn can_parse(&self, file_name: &str) -> bool {
        file_name == "setup.py"
    }
}
