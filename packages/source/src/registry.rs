//! Source registry — loads source definitions from embedded TOML configs.
//!
//! Each `.toml` file in `packages/source/sources/` is baked into the binary
//! at compile time via [`include_str!`]. The default deployment uses the
//! two dedicated inventories (bridges before culverts); a single combined
//! inventory is available as an alternative mode.

use structure_map_source_models::SourceConfig;

const BRIDGES_TOML: &str = include_str!("../sources/bridges.toml");
const CULVERTS_TOML: &str = include_str!("../sources/culverts.toml");
const COMBINED_TOML: &str = include_str!("../sources/combined.toml");

/// Returns the default two-source deployment: the bridge inventory first,
/// then the culvert inventory. Concatenation order follows this order.
///
/// # Panics
///
/// Panics if an embedded TOML config is malformed (a compile-time
/// guarantee since the configs are embedded).
#[must_use]
pub fn default_sources() -> Vec<SourceConfig> {
    vec![
        parse_source_toml(BRIDGES_TOML).unwrap_or_else(|e| panic!("bad bridges.toml: {e}")),
        parse_source_toml(CULVERTS_TOML).unwrap_or_else(|e| panic!("bad culverts.toml: {e}")),
    ]
}

/// Returns the single-combined-source deployment, where structure kind is
/// resolved per feature by the classifier.
///
/// # Panics
///
/// Panics if the embedded TOML config is malformed.
#[must_use]
pub fn combined_source() -> Vec<SourceConfig> {
    vec![parse_source_toml(COMBINED_TOML).unwrap_or_else(|e| panic!("bad combined.toml: {e}"))]
}

/// Selects a deployment's source set from a mode string.
///
/// `"combined"` (case-insensitive) selects the single combined inventory;
/// anything else, including no mode at all, selects the default two-source
/// deployment.
///
/// # Panics
///
/// Panics if an embedded TOML config is malformed.
#[must_use]
pub fn sources_for_mode(mode: Option<&str>) -> Vec<SourceConfig> {
    match mode {
        Some(m) if m.trim().eq_ignore_ascii_case("combined") => combined_source(),
        _ => default_sources(),
    }
}

/// Parses a [`SourceConfig`] from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or missing required fields.
pub fn parse_source_toml(toml_str: &str) -> Result<SourceConfig, String> {
    toml::from_str(toml_str).map_err(|e| e.to_string())
}
