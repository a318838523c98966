use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

bitflags! {
    /// Which identifier positions the JS renamer may touch.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RenameMode: u8 {
        /// `a.b` property names and object literal keys. Used for databinding
        /// expressions and legacy element scripts.
        const PROPERTIES = 1 << 0;
        /// Free-standing identifiers. Only safe for single-expression
        /// databinding text, never for whole scripts.
        const VARIABLES = 1 << 1;
    }
}

/// How renamed JavaScript is printed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutputOptions {
    pub pretty_print: bool,
    pub prefer_single_quotes: bool,
    /// When set, a source map is produced too, naming this path as its source.
    pub source_map_path: Option<PathBuf>,
}

impl OutputOptions {
    /// Printing used for databinding expressions: they usually sit inside
    /// double-quoted HTML attributes.
    pub fn template_expression() -> Self {
        Self {
            pretty_print: true,
            prefer_single_quotes: true,
            source_map_path: None,
        }
    }
}
