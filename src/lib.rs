//! # polymer-rename
//!
//! Keeps Polymer markup and databinding expressions in step with a property
//! minifier. Given the rename map the minifier produced, it rewrites:
//!
//! 1. **Databinding directives** in `{{ }}` (and, for `<dom-module>` documents,
//!    `[[ ]]`): the expression is parsed, its variables and properties renamed,
//!    and printed back. `{{value::input}}` renames `value` only.
//! 2. **Event handler attributes** (`on-tap="handleTap"`): whole-string lookup.
//! 3. **Element descriptors** in JavaScript: `properties[*].computed`,
//!    `properties[*].observer`, `observers`, `listeners` and `keyBindings`.
//! 4. **Handler strings** passed to `this.listen`, `this.unlisten` and
//!    `this.addOwnKeyBinding`.
//! 5. **Property attributes** on uses of elements the document defines
//!    (`<x-foo first-name="...">`).
//!
//! Identifier names follow one rule everywhere: an exact map entry wins,
//! otherwise `fooChanged` follows the mapping of `foo`.
//!
//! Renaming is convention based. No scopes are resolved.

#[cfg(feature = "napi")]
mod bindings;
mod descriptor;
mod error;
mod expression;
mod html;
mod lexer;
mod options;
mod parse;
mod rename_map;
mod renamer;
mod visitor;

#[cfg(test)]
mod html_tests;

use oxc_allocator::Allocator;

pub use error::{Diagnostic, Diagnostics, ParseError, RenameError};
pub use html::rename_html;
pub use lexer::{lex, BindingLexer, Bracket, Delimiters, Token};
pub use options::{OutputOptions, RenameMode};
pub use parse::PrintedJs;
pub use rename_map::{RenameMap, CHANGED_SUFFIX};

#[cfg(feature = "napi")]
pub use bindings::{rename_html_native, rename_js_native, rename_template_expression_native};

/// Renames a JavaScript file.
///
/// Property accesses are renamed only when the file registers an element the
/// 0.5 way; otherwise just descriptors and handler strings are touched.
pub fn rename_js(
    renames: &RenameMap,
    js: &str,
    options: &OutputOptions,
    diagnostics: &mut Diagnostics,
) -> Result<PrintedJs, ParseError> {
    let allocator = Allocator::default();
    let mut program = parse::parse_program(&allocator, js)?;
    let mode = if renamer::uses_legacy_registration(&program) {
        RenameMode::PROPERTIES
    } else {
        RenameMode::empty()
    };
    renamer::rename_program(&allocator, &mut program, renames, mode, diagnostics);
    Ok(parse::print_program(&program, options))
}

/// Renames JavaScript with property renaming on, compact output. Used for
/// scripts inside element definitions; a script with nothing to rename is
/// returned as written.
pub fn rename_js_properties(
    renames: &RenameMap,
    js: &str,
    diagnostics: &mut Diagnostics,
) -> Result<String, ParseError> {
    let allocator = Allocator::default();
    let mut program = parse::parse_program(&allocator, js)?;
    let changed = renamer::rename_program(
        &allocator,
        &mut program,
        renames,
        RenameMode::PROPERTIES,
        diagnostics,
    );
    if !changed {
        return Ok(js.to_string());
    }
    Ok(parse::print_program(&program, &OutputOptions::default()).code)
}

/// Renames a single databinding expression such as `compute(a, b.c)`.
///
/// Problems with descriptor strings nested in the expression are dropped; use
/// [`rename_html`] for a full report.
pub fn rename_template_expression(renames: &RenameMap, text: &str) -> Result<String, ParseError> {
    let mut nested = Diagnostics::new();
    expression::reformat(renames, text, &mut nested)
}
