//! Filling gaps in a stored site configuration from the defaults.
//!
//! The merge has exactly two levels. The candidate replaces default keys at
//! the top level, then each section in [`SECTIONS`] that is absent or null is
//! copied whole from the defaults. A section the candidate does provide is
//! kept as-is, even when it lacks keys the default section has: it is not
//! merged recursively. Existing deployments depend on this.

use serde_json::{Map, Value};
use tracing::warn;

/// Sections guaranteed present after reconciliation, as JSON pointers.
/// Parents come before their children.
pub const SECTIONS: &[&str] = &[
    "/theme",
    "/hero",
    "/checkout",
    "/checkout/styles",
    "/checkout/paymentMethods",
    "/contact",
    "/contact/actionButton",
    "/footer",
    "/banners",
    "/branches",
    "/features",
    "/sectionBackgrounds",
];

/// Reconciles a parsed candidate. A candidate that is not a JSON object
/// yields a copy of the defaults.
pub fn reconcile(defaults: &Value, candidate: &Value) -> Value {
    let Some(candidate) = candidate.as_object() else { return defaults.clone() };

    let mut merged: Map<String, Value> = defaults.as_object().cloned().unwrap_or_default();
    for (key, value) in candidate {
        merged.insert(key.clone(), value.clone());
    }
    let mut merged = Value::Object(merged);

    for pointer in SECTIONS {
        fill_section(&mut merged, defaults, pointer);
    }
    merged
}

/// Reconciles a serialized candidate; anything that fails to parse yields a
/// copy of the defaults.
pub fn reconcile_serialized(defaults: &Value, raw: &str) -> Value {
    match serde_json::from_str::<Value>(raw) {
        Ok(candidate) => reconcile(defaults, &candidate),
        Err(e) => {
            warn!(error = %e, "stored site config is malformed, using defaults");
            defaults.clone()
        }
    }
}

fn fill_section(doc: &mut Value, defaults: &Value, pointer: &str) {
    let Some(default) = defaults.pointer(pointer) else { return };
    let Some((parent_ptr, key)) = pointer.rsplit_once('/') else { return };
    let parent = if parent_ptr.is_empty() { Some(doc) } else { doc.pointer_mut(parent_ptr) };
    // A parent the candidate replaced with a non-object is left alone.
    let Some(parent) = parent.and_then(Value::as_object_mut) else { return };
    if parent.get(key).map_or(true, Value::is_null) {
        parent.insert(key.to_string(), default.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_site_config;
    use serde_json::json;

    #[test]
    fn test_empty_candidate_yields_defaults() {
        let defaults = default_site_config();
        assert_eq!(reconcile(&defaults, &json!({})), defaults);
    }

    #[test]
    fn test_result_is_a_deep_copy() {
        let defaults = default_site_config();
        let mut out = reconcile(&defaults, &json!({}));
        out["theme"]["primaryColor"] = json!("#000000");
        out["checkout"]["paymentMethods"][0]["discount"] = json!(99);
        assert_eq!(defaults, default_site_config());
    }

    #[test]
    fn test_complete_document_unchanged() {
        let defaults = default_site_config();
        let mut stored = defaults.clone();
        stored["storeName"] = json!("Other Shop");
        stored["hero"] = json!({ "title": "Only a title" });
        stored["extraKey"] = json!({ "kept": true });
        let once = reconcile(&defaults, &stored);
        assert_eq!(once, stored);
        assert_eq!(reconcile(&defaults, &once), once);
    }

    // Two-level merge, not recursive: a provided section is not completed
    // from the default section, only its known children are.
    #[test]
    fn test_partial_checkout_is_not_deep_merged() {
        let defaults = default_site_config();
        let out = reconcile(&defaults, &json!({ "checkout": { "whatsappNumber": "123" } }));
        assert_eq!(out["checkout"]["whatsappNumber"], "123");
        assert_eq!(out["checkout"]["styles"], defaults["checkout"]["styles"]);
        assert_eq!(out["checkout"]["paymentMethods"], defaults["checkout"]["paymentMethods"]);
        // Not a deep merge: keys outside the known children stay absent.
        assert!(out["checkout"].get("title").is_none());
        assert!(out["checkout"].get("fields").is_none());
    }

    #[test]
    fn test_partial_nested_section_replaces_default_whole() {
        let defaults = default_site_config();
        let out = reconcile(&defaults, &json!({ "theme": { "primaryColor": "#ff0000" } }));
        assert_eq!(out["theme"], json!({ "primaryColor": "#ff0000" }));
        let out = reconcile(&defaults, &json!({ "checkout": { "styles": { "buttonColor": "red" } } }));
        assert_eq!(out["checkout"]["styles"], json!({ "buttonColor": "red" }));
    }

    #[test]
    fn test_null_sections_filled() {
        let defaults = default_site_config();
        let out = reconcile(&defaults, &json!({
            "footer": null,
            "banners": null,
            "contact": { "phone": "1", "actionButton": null },
        }));
        assert_eq!(out["footer"], defaults["footer"]);
        assert_eq!(out["banners"], json!([]));
        assert_eq!(out["contact"]["phone"], "1");
        assert_eq!(out["contact"]["actionButton"], defaults["contact"]["actionButton"]);
    }

    #[test]
    fn test_non_object_parent_left_alone() {
        let defaults = default_site_config();
        let out = reconcile(&defaults, &json!({ "checkout": "legacy" }));
        assert_eq!(out["checkout"], "legacy");
    }

    #[test]
    fn test_malformed_serialized_falls_back() {
        let defaults = default_site_config();
        assert_eq!(reconcile_serialized(&defaults, "{\"theme\": "), defaults);
        assert_eq!(reconcile_serialized(&defaults, "[1, 2]"), defaults);
        let out = reconcile_serialized(&defaults, r#"{"storeName":"X"}"#);
        assert_eq!(out["storeName"], "X");
    }
}
