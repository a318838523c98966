//! The symbol rename map and the three lookup disciplines built on it:
//! whole-string lookup, the `Changed` suffix rule, and dotted path renaming.

use crate::error::RenameError;
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

/// Suffix Polymer appends to a property name to form its change notification.
pub const CHANGED_SUFFIX: &str = "Changed";

/// Immutable mapping from original symbol to renamed symbol.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameMap {
    renames: HashMap<String, String>,
}

impl RenameMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a map from pairs, rejecting a symbol listed twice.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, RenameError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut renames = HashMap::new();
        for (from, to) in pairs {
            let from = from.into();
            if renames.contains_key(&from) {
                return Err(RenameError::InvalidRenameMap {
                    reason: format!("symbol '{}' is mapped more than once", from),
                });
            }
            renames.insert(from, to.into());
        }
        Ok(Self { renames })
    }

    /// Parses the Closure Compiler property map format: one `original:renamed`
    /// pair per line. Lines that do not split into exactly two components are
    /// skipped.
    pub fn from_property_map(text: &str) -> Result<Self, RenameError> {
        let pairs = text.lines().filter_map(|line| {
            let line = line.strip_suffix('\r').unwrap_or(line);
            let components: Vec<&str> = line.split(':').collect();
            match components.as_slice() {
                [from, to] => Some((*from, *to)),
                _ => None,
            }
        });
        Self::from_pairs(pairs)
    }

    /// Parses a JSON object of string to string. A key repeated in the object
    /// is rejected like a repeated line in the property map format.
    pub fn from_json(text: &str) -> Result<Self, RenameError> {
        let JsonPairs(pairs) =
            serde_json::from_str(text).map_err(|e| RenameError::InvalidRenameMap {
                reason: format!("bad JSON rename map: {}", e),
            })?;
        Self::from_pairs(pairs)
    }

    /// Loads a rename map file. `.json` files are read as JSON, anything else
    /// as a Closure property map.
    pub fn load(path: &Path) -> Result<Self, RenameError> {
        let text = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if is_json {
            Self::from_json(&text)
        } else {
            Self::from_property_map(&text)
        }
    }

    pub fn len(&self) -> usize {
        self.renames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renames.is_empty()
    }

    /// Whole-string lookup.
    pub fn get(&self, symbol: &str) -> Option<&str> {
        self.renames.get(symbol).map(String::as_str)
    }

    /// Renames an identifier or property name: an exact entry wins, otherwise
    /// `<base>Changed` follows the mapping of `<base>`.
    pub fn rename_symbol(&self, name: &str) -> Option<String> {
        if let Some(renamed) = self.get(name) {
            return Some(renamed.to_string());
        }
        let base = name.strip_suffix(CHANGED_SUFFIX)?;
        self.get(base)
            .map(|renamed| format!("{}{}", renamed, CHANGED_SUFFIX))
    }

    /// Renames each `.`-separated segment of `path` by whole-string lookup.
    pub fn rename_path(&self, path: &str) -> String {
        path.split('.')
            .map(|segment| self.get(segment).unwrap_or(segment))
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// Object members in document order, duplicates included.
struct JsonPairs(Vec<(String, String)>);

impl<'de> Deserialize<'de> for JsonPairs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PairsVisitor;

        impl<'de> Visitor<'de> for PairsVisitor {
            type Value = JsonPairs;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object of string to string")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<JsonPairs, A::Error> {
                let mut pairs = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some(pair) = access.next_entry::<String, String>()? {
                    pairs.push(pair);
                }
                Ok(JsonPairs(pairs))
            }
        }

        deserializer.deserialize_map(PairsVisitor)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RenameMap {
    /// Collects pairs; a repeated symbol keeps its last mapping. Use
    /// [`RenameMap::from_pairs`] when repeats must be rejected.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            renames: iter
                .into_iter()
                .map(|(from, to)| (from.into(), to.into()))
                .collect(),
        }
    }
}
