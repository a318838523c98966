use napi_derive::napi;

use crate::error::Diagnostics;
use crate::options::OutputOptions;
use crate::rename_map::RenameMap;

// ═══════════════════════════════════════════════════════════════════════════════
// NAPI EXPORTS
// ═══════════════════════════════════════════════════════════════════════════════

fn load_rename_map(rename_map_json: &str) -> napi::Result<RenameMap> {
    RenameMap::from_json(rename_map_json).map_err(|e| napi::Error::from_reason(e.to_string()))
}

fn report(diagnostics: Diagnostics) {
    for diagnostic in diagnostics.iter() {
        eprintln!("[polymer-rename] warning: {}", diagnostic);
    }
}

#[napi]
pub fn rename_html_native(rename_map_json: String, html: String) -> napi::Result<String> {
    let renames = load_rename_map(&rename_map_json)?;
    let mut diagnostics = Diagnostics::new();
    let renamed = crate::rename_html(&renames, &html, &mut diagnostics)
        .map_err(|e| napi::Error::from_reason(e.to_string()))?;
    report(diagnostics);
    Ok(renamed)
}

#[napi]
pub fn rename_js_native(
    rename_map_json: String,
    js: String,
    options_json: Option<serde_json::Value>,
) -> napi::Result<serde_json::Value> {
    let renames = load_rename_map(&rename_map_json)?;
    let options: OutputOptions = match options_json {
        Some(value) => serde_json::from_value(value)
            .map_err(|e| napi::Error::from_reason(format!("Invalid options: {}", e)))?,
        None => OutputOptions::default(),
    };
    let mut diagnostics = Diagnostics::new();
    let printed = crate::rename_js(&renames, &js, &options, &mut diagnostics)
        .map_err(|e| napi::Error::from_reason(e.message))?;
    report(diagnostics);
    serde_json::to_value(printed).map_err(|e| napi::Error::from_reason(e.to_string()))
}

#[napi]
pub fn rename_template_expression_native(
    rename_map_json: String,
    expression: String,
) -> napi::Result<String> {
    let renames = load_rename_map(&rename_map_json)?;
    crate::rename_template_expression(&renames, &expression)
        .map_err(|e| napi::Error::from_reason(e.message))
}
