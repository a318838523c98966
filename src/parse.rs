//! Parse Module
//!
//! Glue around the two external parsers: html5ever/rcdom for markup and oxc for
//! JavaScript. Nothing in here decides what gets renamed; it only turns text
//! into mutable trees and back.

use html5ever::parse_document;
use html5ever::serialize::{serialize, SerializeOpts, TraversalScope};
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};
use oxc_allocator::Allocator;
use oxc_ast::ast::{Program, TemplateLiteral};
use oxc_ast_visit::{walk, Visit};
use oxc_codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc_parser::{ParseOptions, Parser};
use oxc_span::SourceType;
use serde::{Deserialize, Serialize};
use std::io;
use std::rc::Rc;

use crate::error::{ParseError, SyntaxIssue};
use crate::options::OutputOptions;

/// Name used for the parsed text in diagnostics.
pub const SOURCE_NAME: &str = "input";

// ═══════════════════════════════════════════════════════════════════════════════
// JAVASCRIPT
// ═══════════════════════════════════════════════════════════════════════════════

/// Renamed JavaScript as printed, plus the source map when one was requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintedJs {
    pub code: String,
    pub source_map: Option<String>,
}

/// Parse a script (not a module) into an oxc program.
///
/// Parentheses are not kept as nodes so that `(expr)` prints back as `expr`.
pub fn parse_program<'a>(
    allocator: &'a Allocator,
    source: &'a str,
) -> Result<Program<'a>, ParseError> {
    let source_type = SourceType::default().with_module(false);
    let ret = Parser::new(allocator, source, source_type)
        .with_options(ParseOptions {
            preserve_parens: false,
            ..ParseOptions::default()
        })
        .parse();

    if ret.panicked || !ret.errors.is_empty() {
        let issues: Vec<SyntaxIssue> = ret
            .errors
            .iter()
            .map(|error| {
                let offset = error
                    .labels
                    .as_ref()
                    .and_then(|labels| labels.first())
                    .map(|label| label.offset())
                    .unwrap_or(0);
                SyntaxIssue::at_offset(source, offset, error.to_string())
            })
            .collect();
        return Err(ParseError::from_issues(SOURCE_NAME, &issues));
    }

    Ok(ret.program)
}

/// Print a program. Directives such as `"use strict"` stay directives.
///
/// Compact output is the normal printer's output with comments dropped and
/// the statements joined onto one line. Strings keep ordinary quotes: double
/// unless single quotes are preferred.
pub fn print_program(program: &Program<'_>, options: &OutputOptions) -> PrintedJs {
    let compact = !options.pretty_print;
    let ret = Codegen::new()
        .with_options(CodegenOptions {
            single_quote: options.prefer_single_quotes,
            source_map_path: options.source_map_path.clone(),
            comments: if compact {
                CommentOptions::disabled()
            } else {
                CommentOptions::default()
            },
            ..CodegenOptions::default()
        })
        .build(program);

    // Joining lines would invalidate the map's line numbers.
    let joinable =
        compact && options.source_map_path.is_none() && !has_multiline_template(program);
    let code = if joinable {
        join_lines(&ret.code, program.hashbang.is_some())
    } else {
        ret.code
    };

    PrintedJs {
        code,
        source_map: ret.map.map(|map| map.to_json_string()),
    }
}

/// Drops line breaks and indentation. The printer escapes line terminators
/// inside string literals, so every break it emits is layout, except after a
/// hashbang.
fn join_lines(code: &str, keep_first_line: bool) -> String {
    let mut lines = code.lines();
    let mut joined = String::with_capacity(code.len());
    if keep_first_line {
        if let Some(first) = lines.next() {
            joined.push_str(first);
            joined.push('\n');
        }
    }
    for line in lines {
        joined.push_str(line.trim_start());
    }
    joined
}

#[derive(Default)]
struct MultilineTemplateFinder {
    found: bool,
}

impl<'a> Visit<'a> for MultilineTemplateFinder {
    fn visit_template_literal(&mut self, template: &TemplateLiteral<'a>) {
        let line_break = ['\n', '\r', '\u{2028}', '\u{2029}'];
        if template
            .quasis
            .iter()
            .any(|quasi| quasi.value.raw.as_str().contains(line_break))
        {
            self.found = true;
            return;
        }
        walk::walk_template_literal(self, template);
    }
}

/// Template literals print their raw text, line breaks included.
fn has_multiline_template(program: &Program<'_>) -> bool {
    let mut finder = MultilineTemplateFinder::default();
    finder.visit_program(program);
    finder.found
}

// ═══════════════════════════════════════════════════════════════════════════════
// HTML
// ═══════════════════════════════════════════════════════════════════════════════

/// Parse an HTML document with html5ever.
///
/// `<template>` contents are moved back under their `<template>` element so the
/// rename pass and the serializer see one ordinary tree.
pub fn parse_html(html: &str) -> io::Result<RcDom> {
    let dom = parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut html.as_bytes())?;
    adopt_template_contents(&dom.document);
    Ok(dom)
}

fn adopt_template_contents(handle: &Handle) {
    if let NodeData::Element {
        template_contents, ..
    } = &handle.data
    {
        if let Some(fragment) = template_contents.borrow().as_ref() {
            let adopted: Vec<Handle> = fragment.children.borrow_mut().drain(..).collect();
            for child in &adopted {
                child.parent.set(Some(Rc::downgrade(handle)));
            }
            handle.children.borrow_mut().extend(adopted);
        }
    }

    for child in handle.children.borrow().iter() {
        adopt_template_contents(child);
    }
}

/// True when the source spells out a whole document rather than an HTML
/// import fragment.
fn is_full_document(html: &str) -> bool {
    let lower = html.to_lowercase();
    lower.contains("<html") || lower.contains("<!doctype")
}

/// Serialize the tree. Fragments skip the `<html>`, `<head>` and `<body>`
/// wrappers html5ever synthesizes.
pub fn serialize_html(dom: &RcDom, source: &str) -> io::Result<String> {
    let mut bytes = Vec::new();

    if is_full_document(source) {
        let document: SerializableHandle = dom.document.clone().into();
        serialize(&mut bytes, &document, SerializeOpts::default())?;
    } else {
        let (preamble, comments) = leading_trivia(source);
        bytes.extend_from_slice(preamble.as_bytes());
        for node in fragment_nodes(&dom.document, comments) {
            let node: SerializableHandle = node.into();
            serialize(
                &mut bytes,
                &node,
                SerializeOpts {
                    traversal_scope: TraversalScope::IncludeNode,
                    ..SerializeOpts::default()
                },
            )?;
        }
    }

    String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Whitespace and comments ahead of the first tag, with the number of comments
/// in it. The parser keeps those comments but drops the whitespace around them,
/// so fragments copy this prefix verbatim.
fn leading_trivia(html: &str) -> (&str, usize) {
    let mut end = 0;
    let mut comments = 0;
    loop {
        let rest = &html[end..];
        let trimmed = rest.trim_start_matches(|c: char| c.is_ascii_whitespace());
        let Some(body) = trimmed.strip_prefix("<!--") else {
            end += rest.len() - trimmed.len();
            break;
        };
        // `<!-->` and `<!--->` close immediately.
        let close = if body.starts_with('>') {
            Some(1)
        } else if body.starts_with("->") {
            Some(2)
        } else {
            body.find("-->").map(|index| index + 3)
        };
        let Some(close) = close else {
            break;
        };
        end += rest.len() - trimmed.len() + "<!--".len() + close;
        comments += 1;
    }
    (&html[..end], comments)
}

/// Top-level nodes of a fragment, minus the first `skip_comments` document
/// comments.
fn fragment_nodes(document: &Handle, skip_comments: usize) -> Vec<Handle> {
    let mut nodes = Vec::new();
    let mut skipped = 0;
    for child in document.children.borrow().iter() {
        match &child.data {
            NodeData::Element { name, .. } if &*name.local == "html" => {
                for section in child.children.borrow().iter() {
                    match tag_name(section) {
                        Some("head") | Some("body") => {
                            nodes.extend(section.children.borrow().iter().cloned())
                        }
                        _ => nodes.push(section.clone()),
                    }
                }
            }
            NodeData::Doctype { .. } => {}
            NodeData::Comment { .. } if skipped < skip_comments => skipped += 1,
            _ => nodes.push(child.clone()),
        }
    }
    nodes
}

/// Local tag name of an element node.
pub fn tag_name(handle: &Handle) -> Option<&str> {
    match &handle.data {
        NodeData::Element { name, .. } => Some(&*name.local),
        _ => None,
    }
}

/// Value of an attribute on an element node.
pub fn attribute_value(handle: &Handle, key: &str) -> Option<String> {
    match &handle.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == key)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_carries_position() {
        let allocator = Allocator::default();
        let error = parse_program(&allocator, "var a = ;").unwrap_err();
        assert!(error.message.starts_with("input:1:"), "{}", error.message);
        assert!(error.message.contains("ERROR - "));
        assert!(error.message.ends_with("1 error"));
    }

    #[test]
    fn test_print_keeps_use_strict_directive() {
        let allocator = Allocator::default();
        let program = parse_program(&allocator, "'use strict';\nfoo.bar();\n").unwrap();
        assert_eq!(program.directives.len(), 1);
        let printed = print_program(&program, &OutputOptions::default());
        assert!(printed.code.contains("use strict"));
        assert!(printed.code.contains("foo.bar()"));
        assert_eq!(printed.source_map, None);
    }

    fn print(source: &str, options: &OutputOptions) -> String {
        let allocator = Allocator::default();
        let program = parse_program(&allocator, source).unwrap();
        print_program(&program, options).code
    }

    #[test]
    fn test_compact_print_keeps_quotes() {
        let source = "var s = 'x';\nfoo({a: \"y\"}, 'it\\'s');\nfunction f() {\n  return 1;\n}";
        assert_eq!(
            print(source, &OutputOptions::default()),
            "var s = \"x\";foo({ a: \"y\" }, \"it's\");function f() {return 1;}"
        );
        let single = OutputOptions {
            prefer_single_quotes: true,
            ..OutputOptions::default()
        };
        assert_eq!(
            print(source, &single),
            "var s = 'x';foo({ a: 'y' }, 'it\\'s');function f() {return 1;}"
        );
    }

    #[test]
    fn test_compact_print_keeps_needed_line_breaks() {
        assert_eq!(
            print("#!/usr/bin/env node\nfoo();\nbar();", &OutputOptions::default()),
            "#!/usr/bin/env node\nfoo();bar();"
        );
        // A template literal spanning lines keeps the printer's layout.
        let printed = print("var t = `a\nb`;\nfoo();", &OutputOptions::default());
        assert!(printed.contains("`a\nb`"), "{}", printed);
        assert!(printed.contains("foo();"), "{}", printed);
    }

    #[test]
    fn test_pretty_print_is_line_per_statement() {
        let pretty = OutputOptions {
            pretty_print: true,
            ..OutputOptions::default()
        };
        assert_eq!(
            print("var s = 'x'; foo(s);", &pretty),
            "var s = \"x\";\nfoo(s);\n"
        );
    }

    #[test]
    fn test_print_source_map_on_request() {
        let allocator = Allocator::default();
        let program = parse_program(&allocator, "foo.bar();").unwrap();
        let options = OutputOptions {
            source_map_path: Some("out.js".into()),
            ..OutputOptions::default()
        };
        let printed = print_program(&program, &options);
        let map = printed.source_map.expect("source map requested");
        assert!(map.contains("\"mappings\""));
    }

    #[test]
    fn test_template_contents_are_children() {
        let source = "<template><span>hi</span></template>";
        let dom = parse_html(source).unwrap();
        assert_eq!(serialize_html(&dom, source).unwrap(), source);
    }

    #[test]
    fn test_fragment_serialization_skips_wrappers() {
        let source = "<link rel=\"import\" href=\"a.html\"><dom-module id=\"x\"></dom-module>";
        let dom = parse_html(source).unwrap();
        assert!(!is_full_document(source));
        assert_eq!(serialize_html(&dom, source).unwrap(), source);
    }

    #[test]
    fn test_fragment_keeps_leading_comments_and_whitespace() {
        let source = "<!--\n@license\n-->\n<link rel=\"import\" href=\"a.html\">\n<!-- b -->\n<dom-module id=\"x\"></dom-module>\n";
        let dom = parse_html(source).unwrap();
        assert_eq!(serialize_html(&dom, source).unwrap(), source);

        for source in ["\n  <p>x</p>", "<!-- a --> <!----><!--> <p>x</p>"] {
            let dom = parse_html(source).unwrap();
            assert_eq!(serialize_html(&dom, source).unwrap(), source);
        }
    }

    #[test]
    fn test_leading_trivia() {
        assert_eq!(leading_trivia("<p>"), ("", 0));
        assert_eq!(leading_trivia(" <!-- a -->\n<p>"), (" <!-- a -->\n", 1));
        assert_eq!(leading_trivia("<!--a--><!-->x"), ("<!--a--><!-->", 2));
        assert_eq!(leading_trivia("<!-- open"), ("", 0));
    }

    #[test]
    fn test_full_document_serialization() {
        let source = "<!DOCTYPE html><html><head></head><body><p>x</p></body></html>";
        assert!(is_full_document(source));
        let dom = parse_html(source).unwrap();
        assert_eq!(serialize_html(&dom, source).unwrap(), source);
    }

    #[test]
    fn test_attribute_helpers() {
        let dom = parse_html("<dom-module name=\"x-foo\"></dom-module>").unwrap();
        let html = dom.document.children.borrow()[0].clone();
        let body = html.children.borrow()[1].clone();
        let module = body.children.borrow()[0].clone();
        assert_eq!(tag_name(&module), Some("dom-module"));
        assert_eq!(attribute_value(&module, "name").as_deref(), Some("x-foo"));
        assert_eq!(attribute_value(&module, "id"), None);
    }
}
