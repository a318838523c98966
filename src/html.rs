//! Markup renaming.
//!
//! Only the subtrees of element containers are touched: `<dom-module>` for the
//! 1.x generation, `<polymer-element>` for 0.5 documents. Inside a container,
//! attribute values and text go through the databinding lexer, `on-*` handlers
//! get a whole-string lookup and inline scripts get property renaming. A second
//! pass renames attribute keys on every use of an element the document defines.

use html5ever::{Attribute, LocalName};
use lazy_static::lazy_static;
use markup5ever_rcdom::{Handle, NodeData};
use regex::{Captures, Regex};
use std::cell::RefCell;
use tendril::StrTendril;

use crate::error::{Diagnostics, ParseError, RenameError};
use crate::expression;
use crate::lexer::{BindingLexer, Delimiters, Token};
use crate::parse::{attribute_value, parse_html, serialize_html};
use crate::rename_map::RenameMap;
use crate::rename_js_properties;
use crate::visitor::{find_elements, walk_element, MarkupVisitor};

pub const DOM_MODULE_TAG: &str = "dom-module";
pub const POLYMER_ELEMENT_TAG: &str = "polymer-element";
pub const EVENT_ATTRIBUTE_PREFIX: &str = "on-";
pub const TWO_WAY_SEPARATOR: &str = "::";

lazy_static! {
    static ref DASH_LETTER_RE: Regex = Regex::new(r"-([a-z])").unwrap();
    static ref UPPER_LETTER_RE: Regex = Regex::new(r"([A-Z])").unwrap();
}

/// Element definition syntax of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generation {
    /// `<polymer-element>`; only `{{ }}` directives.
    Legacy,
    /// `<dom-module>`; `{{ }}` and `[[ ]]` directives.
    Modern,
}

impl Generation {
    pub fn container_tag(self) -> &'static str {
        match self {
            Generation::Legacy => POLYMER_ELEMENT_TAG,
            Generation::Modern => DOM_MODULE_TAG,
        }
    }

    pub fn delimiters(self) -> Delimiters {
        match self {
            Generation::Legacy => Delimiters::CurlyOnly,
            Generation::Modern => Delimiters::CurlyAndSquare,
        }
    }
}

/// What the text below the current element is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Content {
    Markup,
    Script,
    RawText,
}

// ═══════════════════════════════════════════════════════════════════════════════
// DATABINDING RENAMER
// ═══════════════════════════════════════════════════════════════════════════════

struct DatabindingRenamer<'r> {
    renames: &'r RenameMap,
    delimiters: Delimiters,
    content: Content,
    diagnostics: &'r mut Diagnostics,
}

impl<'r> DatabindingRenamer<'r> {
    fn new(renames: &'r RenameMap, generation: Generation, diagnostics: &'r mut Diagnostics) -> Self {
        Self {
            renames,
            delimiters: generation.delimiters(),
            content: Content::Markup,
            diagnostics,
        }
    }

    /// `<polymer-element attributes="a b c">` publishes properties by name.
    fn rename_published_attributes(&self, attrs: &RefCell<Vec<Attribute>>) {
        for attr in attrs.borrow_mut().iter_mut() {
            if &*attr.name.local != "attributes" {
                continue;
            }
            let mut modified = false;
            let properties: Vec<&str> = attr
                .value
                .split(' ')
                .map(|property| match self.renames.get(property) {
                    Some(renamed) => {
                        modified = true;
                        renamed
                    }
                    None => property,
                })
                .collect();
            if modified {
                let joined = properties.join(" ");
                attr.value = StrTendril::from_slice(&joined);
            }
        }
    }

    fn rename_attribute_values(&mut self, attrs: &RefCell<Vec<Attribute>>) {
        for attr in attrs.borrow_mut().iter_mut() {
            let value = attr.value.to_string();
            let renamed = if attr.name.local.starts_with(EVENT_ATTRIBUTE_PREFIX) {
                match self.renames.get(&value) {
                    Some(renamed) => renamed.to_string(),
                    None => continue,
                }
            } else {
                self.rename_directives(&value)
            };
            if renamed != value {
                attr.value = StrTendril::from_slice(&renamed);
            }
        }
    }

    /// Renames the text inside each directive of `input`.
    fn rename_directives(&mut self, input: &str) -> String {
        let mut output = String::with_capacity(input.len());
        let mut inside = false;
        for token in BindingLexer::new(input, self.delimiters) {
            match token {
                Token::Open(..) => inside = true,
                Token::Close(..) => inside = false,
                Token::Text(text) if inside => {
                    output.push_str(&self.rename_binding(text));
                    continue;
                }
                Token::Text(_) => {}
            }
            output.push_str(token.as_str());
        }
        output
    }

    /// `expression::eventName` binds natively; the event name is left alone.
    fn rename_binding(&mut self, binding: &str) -> String {
        let (expression_text, event) = match binding.split_once(TWO_WAY_SEPARATOR) {
            Some((expression_text, event)) => (expression_text, Some(event)),
            None => (binding, None),
        };

        let renamed = match expression::reformat(self.renames, expression_text, self.diagnostics) {
            Ok(renamed) => renamed,
            Err(error) => {
                self.diagnostics.push(expression_text, &error);
                expression_text.to_string()
            }
        };

        match event {
            Some(event) => format!("{}{}{}", renamed, TWO_WAY_SEPARATOR, event),
            None => renamed,
        }
    }
}

impl<'r> MarkupVisitor for DatabindingRenamer<'r> {
    type Error = ParseError;

    fn visit_element(&mut self, element: &Handle) -> Result<(), ParseError> {
        let NodeData::Element { name, attrs, .. } = &element.data else {
            return walk_element(self, element);
        };

        let saved = self.content;
        match &*name.local {
            POLYMER_ELEMENT_TAG => self.rename_published_attributes(attrs),
            "script" => self.content = Content::Script,
            "style" => {
                self.content = Content::RawText;
                self.rename_attribute_values(attrs);
            }
            _ => self.rename_attribute_values(attrs),
        }

        let result = walk_element(self, element);
        self.content = saved;
        result
    }

    fn visit_text(&mut self, contents: &RefCell<StrTendril>) -> Result<(), ParseError> {
        let text = contents.borrow().to_string();
        let renamed = match self.content {
            Content::Markup => self.rename_directives(&text),
            Content::Script => rename_js_properties(self.renames, &text, self.diagnostics)?,
            Content::RawText => return Ok(()),
        };
        if renamed != text {
            *contents.borrow_mut() = StrTendril::from_slice(&renamed);
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ATTRIBUTE KEYS
// ═══════════════════════════════════════════════════════════════════════════════

/// `first-name` to `firstName`.
pub fn dash_to_camel(key: &str) -> String {
    DASH_LETTER_RE
        .replace_all(key, |caps: &Captures| caps[1].to_uppercase())
        .into_owned()
}

/// `firstName` to `first-name`.
pub fn camel_to_dash(name: &str) -> String {
    UPPER_LETTER_RE
        .replace_all(name, |caps: &Captures| format!("-{}", caps[1].to_lowercase()))
        .into_owned()
}

/// Renames property attributes on a use of a defined element.
fn rename_attribute_keys(renames: &RenameMap, element: &Handle) {
    let NodeData::Element { attrs, .. } = &element.data else {
        return;
    };
    for attr in attrs.borrow_mut().iter_mut() {
        if attr.name.local.starts_with(EVENT_ATTRIBUTE_PREFIX) {
            continue;
        }
        if let Some(renamed) = renames.get(&dash_to_camel(&attr.name.local)) {
            attr.name.local = LocalName::from(camel_to_dash(renamed));
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ENTRY POINT
// ═══════════════════════════════════════════════════════════════════════════════

/// Renames an HTML document or HTML import fragment.
///
/// A script that fails to parse aborts the document. Broken databinding
/// expressions are reported to `diagnostics` and left as written.
pub fn rename_html(
    renames: &RenameMap,
    html: &str,
    diagnostics: &mut Diagnostics,
) -> Result<String, RenameError> {
    let dom = parse_html(html)?;

    let containers_of = |generation: Generation| {
        find_elements(&dom.document, true, |tag| tag == generation.container_tag())
    };
    let mut generation = Generation::Modern;
    let mut containers = containers_of(generation);
    if containers.is_empty() {
        generation = Generation::Legacy;
        containers = containers_of(generation);
    }

    let mut custom_elements: Vec<String> = Vec::new();
    let mut renamer = DatabindingRenamer::new(renames, generation, diagnostics);
    for container in &containers {
        if generation == Generation::Modern {
            if let Some(name) = attribute_value(container, "name") {
                if !name.is_empty() {
                    custom_elements.push(name.to_lowercase());
                }
            }
        }
        renamer.visit_node(container)?;
    }

    if !custom_elements.is_empty() {
        let uses = find_elements(&dom.document, false, |tag| {
            custom_elements.iter().any(|name| name == tag)
        });
        for element in &uses {
            rename_attribute_keys(renames, element);
        }
    }

    Ok(serialize_html(&dom, html)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_conversion() {
        assert_eq!(dash_to_camel("first-name"), "firstName");
        assert_eq!(dash_to_camel("plain"), "plain");
        assert_eq!(camel_to_dash("firstName"), "first-name");
        assert_eq!(camel_to_dash("a"), "a");
        assert_eq!(camel_to_dash(&dash_to_camel("my-long-name")), "my-long-name");
    }

    #[test]
    fn test_generation_settings() {
        assert_eq!(Generation::Modern.container_tag(), "dom-module");
        assert_eq!(Generation::Legacy.delimiters(), Delimiters::CurlyOnly);
        assert_eq!(Generation::Modern.delimiters(), Delimiters::CurlyAndSquare);
    }

    #[test]
    fn test_binding_keeps_event_name() {
        let map = RenameMap::from_iter([("value", "v"), ("input", "i")]);
        let mut diagnostics = Diagnostics::new();
        let mut renamer = DatabindingRenamer::new(&map, Generation::Modern, &mut diagnostics);
        assert_eq!(renamer.rename_binding("value::input"), "v::input");
        assert_eq!(renamer.rename_binding("value"), "v");
        assert_eq!(
            renamer.rename_directives("a {{value::input}} [[value]] b"),
            "a {{v::input}} [[v]] b"
        );
    }
}
