//! Element descriptor handling.
//!
//! A descriptor is the object literal that defines an element (or a behavior
//! mixed into one). Its `properties`, `observers`, `listeners` and `keyBindings`
//! sections name methods and properties inside strings, which the identifier
//! pass cannot see.

use oxc_ast::ast::{
    ArrayExpressionElement, Expression, ObjectExpression, ObjectProperty, ObjectPropertyKind,
    PropertyKey, PropertyKind,
};

use crate::renamer::StringRewriter;

pub const IS_KEY: &str = "is";
pub const PROPERTIES_KEY: &str = "properties";
pub const OBSERVERS_KEY: &str = "observers";
pub const LISTENERS_KEY: &str = "listeners";
pub const KEY_BINDINGS_KEY: &str = "keyBindings";

/// `key: value` entries of one object literal, in source order.
///
/// Only plain entries are projected: methods, accessors, spreads and computed
/// keys are skipped. A repeated key keeps its last value.
pub struct DescriptorMap<'m, 'a> {
    entries: Vec<(&'m str, &'m mut Expression<'a>)>,
}

impl<'m, 'a> DescriptorMap<'m, 'a> {
    pub fn from_object(object: &'m mut ObjectExpression<'a>) -> Self {
        let mut map = Self {
            entries: Vec::new(),
        };
        for property in object.properties.iter_mut() {
            let ObjectPropertyKind::ObjectProperty(property) = property else {
                continue;
            };
            if !is_plain_entry(property) {
                continue;
            }
            let ObjectProperty { key, value, .. } = &mut **property;
            let key: &'m PropertyKey<'a> = key;
            if let Some(name) = key_name(key) {
                map.insert(name, value);
            }
        }
        map
    }

    fn insert(&mut self, key: &'m str, value: &'m mut Expression<'a>) {
        match self.entries.iter_mut().find(|(name, _)| *name == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(name, _)| *name == key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Expression<'a>> {
        self.entries
            .iter_mut()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| &mut **value)
    }

    pub fn into_values(self) -> impl Iterator<Item = &'m mut Expression<'a>> {
        self.entries.into_iter().map(|(_, value)| value)
    }
}

fn is_plain_entry(property: &ObjectProperty<'_>) -> bool {
    property.kind == PropertyKind::Init && !property.computed && !property.method
}

/// Name of an identifier or string key.
pub fn key_name<'k>(key: &'k PropertyKey<'_>) -> Option<&'k str> {
    match key {
        PropertyKey::StaticIdentifier(ident) => Some(ident.name.as_str()),
        PropertyKey::StringLiteral(literal) => Some(literal.value.as_str()),
        _ => None,
    }
}

/// Whether the literal has a plain `key: value` entry named `key`.
pub fn has_key(object: &ObjectExpression<'_>, key: &str) -> bool {
    object.properties.iter().any(|property| match property {
        ObjectPropertyKind::ObjectProperty(property) => {
            is_plain_entry(property) && key_name(&property.key) == Some(key)
        }
        ObjectPropertyKind::SpreadProperty(_) => false,
    })
}

/// Renames the string-valued sections of `object` if it is a descriptor.
///
/// Inside a registration call only literals carrying `is` count; elsewhere
/// every literal might be a behavior and is treated as a descriptor.
pub fn rename_descriptor<'a>(
    strings: &mut StringRewriter<'a, '_>,
    object: &mut ObjectExpression<'a>,
    in_registration: bool,
) {
    let mut descriptor = DescriptorMap::from_object(object);
    if in_registration && !descriptor.contains(IS_KEY) {
        return;
    }

    if let Some(Expression::ObjectExpression(properties)) = descriptor.get_mut(PROPERTIES_KEY) {
        for declaration in DescriptorMap::from_object(properties).into_values() {
            if let Expression::ObjectExpression(declaration) = declaration {
                let mut declaration = DescriptorMap::from_object(declaration);
                for key in ["computed", "observer"] {
                    if let Some(Expression::StringLiteral(literal)) = declaration.get_mut(key) {
                        strings.rename_expression(literal);
                    }
                }
            }
        }
    }

    if let Some(Expression::ArrayExpression(observers)) = descriptor.get_mut(OBSERVERS_KEY) {
        for element in observers.elements.iter_mut() {
            if let ArrayExpressionElement::StringLiteral(literal) = element {
                strings.rename_expression(literal);
            }
        }
    }

    if let Some(Expression::ObjectExpression(listeners)) = descriptor.get_mut(LISTENERS_KEY) {
        for handler in DescriptorMap::from_object(listeners).into_values() {
            if let Expression::StringLiteral(literal) = handler {
                strings.rename_expression(literal);
            }
        }
    }

    // The table may already carry its minified name.
    let renames = strings.renames;
    let mut tables = vec![KEY_BINDINGS_KEY];
    if let Some(renamed) = renames.get(KEY_BINDINGS_KEY) {
        if renamed != KEY_BINDINGS_KEY {
            tables.push(renamed);
        }
    }
    for table in tables {
        if let Some(Expression::ObjectExpression(bindings)) = descriptor.get_mut(table) {
            for handler in DescriptorMap::from_object(bindings).into_values() {
                if let Expression::StringLiteral(literal) = handler {
                    strings.rename_whole(literal);
                }
            }
        }
    }
}
