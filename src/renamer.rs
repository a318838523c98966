//! Renamer Module
//!
//! The in-place JavaScript rename pass. `SymbolRenamer` walks an oxc program and
//! rewrites identifier names and string literals according to the rename map and
//! the active `RenameMode`. Object literals are handed to the descriptor
//! classifier before their children are walked.

use oxc_allocator::Allocator;
use oxc_ast::ast::{
    Argument, BindingIdentifier, CallExpression, Expression, IdentifierReference,
    ObjectExpression, ObjectProperty, Program, PropertyKey, PropertyKind, StaticMemberExpression,
    StringLiteral,
};
use oxc_ast_visit::{walk, walk_mut, Visit, VisitMut};
use oxc_span::Atom;

use crate::descriptor;
use crate::error::Diagnostics;
use crate::expression;
use crate::options::RenameMode;
use crate::rename_map::RenameMap;

/// Callee name of the element registration function.
pub const REGISTRATION_FUNCTION: &str = "Polymer";

// ═══════════════════════════════════════════════════════════════════════════════
// STRING REWRITER
// ═══════════════════════════════════════════════════════════════════════════════

/// Rewrites string literal values in place.
///
/// Shared by the symbol renamer and the descriptor classifier. Holds the
/// diagnostics sink that template expression failures are reported to.
pub struct StringRewriter<'a, 'r> {
    allocator: &'a Allocator,
    pub renames: &'r RenameMap,
    diagnostics: &'r mut Diagnostics,
    /// Set once any name or literal has been rewritten.
    changed: bool,
}

impl<'a, 'r> StringRewriter<'a, 'r> {
    pub fn new(
        allocator: &'a Allocator,
        renames: &'r RenameMap,
        diagnostics: &'r mut Diagnostics,
    ) -> Self {
        Self {
            allocator,
            renames,
            diagnostics,
            changed: false,
        }
    }

    /// Whole-string lookup of the literal's value.
    pub fn rename_whole(&mut self, literal: &mut StringLiteral<'a>) {
        if let Some(renamed) = self.renames.get(literal.value.as_str()) {
            self.set(literal, renamed);
        }
    }

    /// Treats the literal's value as databinding expression text. On failure the
    /// literal is left alone and a diagnostic is recorded.
    pub fn rename_expression(&mut self, literal: &mut StringLiteral<'a>) {
        let source = literal.value.to_string();
        match expression::reformat(self.renames, &source, self.diagnostics) {
            Ok(renamed) => {
                if renamed != source {
                    self.set(literal, &renamed);
                }
            }
            Err(error) => self.diagnostics.push(&source, &error),
        }
    }

    /// Applies the identifier rule (exact entry, then `Changed` suffix) to an
    /// atom. Returns whether it changed.
    pub fn rename_symbol(&mut self, name: &mut Atom<'a>) -> bool {
        match self.renames.rename_symbol(name.as_str()) {
            Some(renamed) => {
                *name = self.allocator.alloc_str(&renamed).into();
                self.changed = true;
                true
            }
            None => false,
        }
    }

    fn set(&mut self, literal: &mut StringLiteral<'a>, value: &str) {
        literal.value = self.allocator.alloc_str(value).into();
        // The printer would otherwise reuse the original source text.
        literal.raw = None;
        self.changed = true;
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SYMBOL RENAMER
// ═══════════════════════════════════════════════════════════════════════════════

pub struct SymbolRenamer<'a, 'r> {
    strings: StringRewriter<'a, 'r>,
    mode: RenameMode,
    /// Number of enclosing `Polymer(...)` calls.
    registration_depth: usize,
}

impl<'a, 'r> SymbolRenamer<'a, 'r> {
    pub fn new(strings: StringRewriter<'a, 'r>, mode: RenameMode) -> Self {
        Self {
            strings,
            mode,
            registration_depth: 0,
        }
    }

    fn is_method(&self, name: &str, method: &str) -> bool {
        name == method || self.strings.renames.get(method) == Some(name)
    }

    /// Handler names passed as strings to `this.listen`, `this.unlisten` and
    /// `this.addOwnKeyBinding`.
    fn rename_handler_argument(&mut self, call: &mut CallExpression<'a>) {
        let handler_index = {
            let Expression::StaticMemberExpression(callee) = &call.callee else {
                return;
            };
            if !matches!(callee.object, Expression::ThisExpression(_)) {
                return;
            }
            let method = callee.property.name.as_str();
            if self.is_method(method, "listen") || self.is_method(method, "unlisten") {
                // (target, eventName, handler)
                if call.arguments.len() != 3
                    || !matches!(call.arguments[1], Argument::StringLiteral(_))
                {
                    return;
                }
                2
            } else if self.is_method(method, "addOwnKeyBinding") {
                // (keyCombo, handler)
                if call.arguments.len() != 2 {
                    return;
                }
                1
            } else {
                return;
            }
        };

        if let Argument::StringLiteral(handler) = &mut call.arguments[handler_index] {
            self.strings.rename_whole(handler);
        }
    }
}

impl<'a, 'r> VisitMut<'a> for SymbolRenamer<'a, 'r> {
    fn visit_call_expression(&mut self, call: &mut CallExpression<'a>) {
        self.rename_handler_argument(call);

        let registration = is_registration_call(call);
        if registration {
            self.registration_depth += 1;
        }
        walk_mut::walk_call_expression(self, call);
        if registration {
            self.registration_depth -= 1;
        }
    }

    fn visit_static_member_expression(&mut self, expr: &mut StaticMemberExpression<'a>) {
        if self.mode.contains(RenameMode::PROPERTIES) {
            self.strings.rename_symbol(&mut expr.property.name);
        }
        walk_mut::walk_static_member_expression(self, expr);
    }

    fn visit_identifier_reference(&mut self, ident: &mut IdentifierReference<'a>) {
        if self.mode.contains(RenameMode::VARIABLES) {
            self.strings.rename_symbol(&mut ident.name);
        }
    }

    fn visit_binding_identifier(&mut self, ident: &mut BindingIdentifier<'a>) {
        if self.mode.contains(RenameMode::VARIABLES) {
            self.strings.rename_symbol(&mut ident.name);
        }
    }

    fn visit_object_expression(&mut self, object: &mut ObjectExpression<'a>) {
        descriptor::rename_descriptor(&mut self.strings, object, self.registration_depth > 0);
        walk_mut::walk_object_expression(self, object);
    }

    fn visit_object_property(&mut self, property: &mut ObjectProperty<'a>) {
        if self.mode.contains(RenameMode::PROPERTIES)
            && property.kind == PropertyKind::Init
            && !property.computed
            && !property.method
        {
            let renamed = match &mut property.key {
                PropertyKey::StaticIdentifier(key) => self.strings.rename_symbol(&mut key.name),
                PropertyKey::StringLiteral(key) => {
                    let renamed = self.strings.rename_symbol(&mut key.value);
                    if renamed {
                        key.raw = None;
                    }
                    renamed
                }
                _ => false,
            };
            if renamed {
                property.shorthand = false;
            }
        }
        walk_mut::walk_object_property(self, property);
    }
}

/// `Polymer(...)` with at least one argument.
pub fn is_registration_call(call: &CallExpression<'_>) -> bool {
    !call.arguments.is_empty()
        && matches!(&call.callee, Expression::Identifier(ident) if ident.name.as_str() == REGISTRATION_FUNCTION)
}

/// Runs the rename pass over a parsed program. Returns whether anything was
/// renamed.
pub fn rename_program<'a>(
    allocator: &'a Allocator,
    program: &mut Program<'a>,
    renames: &RenameMap,
    mode: RenameMode,
    diagnostics: &mut Diagnostics,
) -> bool {
    let strings = StringRewriter::new(allocator, renames, diagnostics);
    let mut renamer = SymbolRenamer::new(strings, mode);
    renamer.visit_program(program);
    renamer.strings.changed
}

// ═══════════════════════════════════════════════════════════════════════════════
// LEGACY DETECTION
// ═══════════════════════════════════════════════════════════════════════════════

/// Finds a registration call in the 0.5 style: `Polymer('x-el', {...})` or
/// `Polymer({...})` without an `is` key.
#[derive(Default)]
struct LegacyRegistrationFinder {
    found: bool,
}

impl<'a> Visit<'a> for LegacyRegistrationFinder {
    fn visit_call_expression(&mut self, call: &CallExpression<'a>) {
        if is_registration_call(call) {
            match call.arguments.first() {
                Some(Argument::StringLiteral(_)) => self.found = true,
                Some(Argument::ObjectExpression(object)) => {
                    if !descriptor::has_key(object, descriptor::IS_KEY) {
                        self.found = true;
                    }
                }
                _ => {}
            }
        }
        if !self.found {
            walk::walk_call_expression(self, call);
        }
    }
}

/// Whether a script predates the `is`-style element registration. Such scripts
/// get their property accesses renamed too.
pub fn uses_legacy_registration(program: &Program<'_>) -> bool {
    let mut finder = LegacyRegistrationFinder::default();
    finder.visit_program(program);
    finder.found
}
