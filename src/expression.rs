//! Databinding expressions.
//!
//! A directive body such as `compute(first, user.name)` is renamed by parsing it
//! as a parenthesized script, renaming both properties and variables, and
//! printing it back. Text the parser rejects gets one permissive retry that
//! understands `callee(arg, ...)` and dotted paths only.

use lazy_static::lazy_static;
use oxc_allocator::Allocator;
use regex::Regex;

use crate::error::{Diagnostics, ParseError};
use crate::options::{OutputOptions, RenameMode};
use crate::parse::{parse_program, print_program};
use crate::rename_map::RenameMap;
use crate::renamer::rename_program;

lazy_static! {
    // leading ws, callee, ws, (arguments), trailing ws
    static ref CALL_SHAPE_RE: Regex =
        Regex::new(r"(?s)^(\s*)([^()]+?)(\s*)\((.*)\)(\s*)$").unwrap();
}

/// Renames a databinding expression. Nested descriptor failures go to
/// `diagnostics`; a failure of `text` itself is returned. Text with nothing to
/// rename comes back exactly as written.
pub fn reformat(
    renames: &RenameMap,
    text: &str,
    diagnostics: &mut Diagnostics,
) -> Result<String, ParseError> {
    let source = format!("({})", text);
    let allocator = Allocator::default();

    let mut program = match parse_program(&allocator, &source) {
        Ok(program) => program,
        Err(error) => return rename_loosely(renames, text).ok_or(error),
    };

    let changed = rename_program(
        &allocator,
        &mut program,
        renames,
        RenameMode::PROPERTIES | RenameMode::VARIABLES,
        diagnostics,
    );
    if !changed {
        return Ok(text.to_string());
    }
    let printed = print_program(&program, &OutputOptions::template_expression());
    Ok(strip_terminator(&printed.code).to_string())
}

fn strip_terminator(code: &str) -> &str {
    let code = code.trim();
    code.strip_suffix(';').unwrap_or(code)
}

/// The fallback for text that is not valid JavaScript. Commas inside nested
/// parentheses or string arguments are not understood.
fn rename_loosely(renames: &RenameMap, text: &str) -> Option<String> {
    if let Some(caps) = CALL_SHAPE_RE.captures(text) {
        let arguments = caps[4]
            .split(',')
            .map(|argument| rename_padded(renames, argument))
            .collect::<Vec<_>>()
            .join(",");
        return Some(format!(
            "{}{}{}({}){}",
            &caps[1],
            renames.rename_path(&caps[2]),
            &caps[3],
            arguments,
            &caps[5]
        ));
    }

    if text.contains('.') {
        return Some(renames.rename_path(text));
    }

    None
}

/// Path-renames `piece` while keeping the whitespace around it.
fn rename_padded(renames: &RenameMap, piece: &str) -> String {
    let trimmed = piece.trim();
    if trimmed.is_empty() {
        return piece.to_string();
    }
    let leading = piece.len() - piece.trim_start().len();
    let trailing = piece.len() - piece.trim_end().len();
    format!(
        "{}{}{}",
        &piece[..leading],
        renames.rename_path(trimmed),
        &piece[piece.len() - trailing..]
    )
}
