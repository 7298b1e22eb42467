pub mod derive;
pub mod error;
pub mod index;
pub mod ir;
pub mod model;
pub mod naming;
pub mod options;
pub mod validate;

use wasm_bindgen::prelude::*;

pub use derive::Deriver;
pub use error::DeriveError;
pub use ir::{SchemaIR, TableIR};
pub use model::Model;
pub use options::Options;
pub use validate::validate;

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Derive the relational schema of a JSON-encoded ER model.
#[wasm_bindgen(js_name = "deriveSchema")]
pub fn derive_schema(
    model_json: &str,
    composite_keys: Option<bool>,
    backref_case: Option<String>,
) -> Result<String, String> {
    let model: Model = serde_json::from_str(model_json).map_err(|e| e.to_string())?;

    let mut options = Options::default();
    if let Some(composite_keys) = composite_keys {
        options.composite_keys = composite_keys;
    }
    if let Some(case) = backref_case {
        options.set("backref_case", &case).map_err(|e| e.to_string())?;
    }

    let schema = SchemaIR::derive(&model, &options).map_err(|e| e.to_string())?;
    serde_json::to_string(&schema).map_err(|e| e.to_string())
}

/// Check a JSON-encoded ER model without deriving it.
#[wasm_bindgen(js_name = "validateModel")]
pub fn validate_model(model_json: &str) -> Result<(), String> {
    let model: Model = serde_json::from_str(model_json).map_err(|e| e.to_string())?;
    validate(&model).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODEL: &str = r#"{
        "name": "test",
        "entities": [
            { "name": "First", "attributes": [
                { "name": "a", "type": { "entity": "Second" },
                  "constraints": [ { "kind": "dbcols", "params": ["trt", "vrt"] } ] }
            ] },
            { "name": "Second", "attributes": [
                { "name": "b", "type": { "entity": "Third" }, "id": true }
            ] },
            { "name": "Third", "attributes": [
                { "name": "c", "type": { "primitive": "int" }, "id": true },
                { "name": "d", "type": { "primitive": { "string": 10 } }, "id": true }
            ] }
        ]
    }"#;

    #[test]
    fn test_derive_schema() {
        let json = derive_schema(MODEL, None, None).unwrap();
        let schema: serde_json::Value = serde_json::from_str(&json).unwrap();

        let first = &schema["tables"][0];
        assert_eq!(first["elements"][0]["name"], "trt");
        assert_eq!(first["elements"][0]["fk_target"], "SECOND.C");
        assert_eq!(first["elements"][1]["name"], "vrt");
        assert_eq!(first["fk_constraints"][0]["name"], "FK_FIRST_A");
    }

    #[test]
    fn test_derive_schema_options() {
        let json = derive_schema(MODEL, Some(false), Some("snake".to_string())).unwrap();
        let schema: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(schema["tables"][0]["fk_constraints"], serde_json::json!([]));

        let err = derive_schema(MODEL, None, Some("camel".to_string())).unwrap_err();
        assert!(err.contains("backref_case"));
    }

    #[test]
    fn test_validate_model() {
        validate_model(MODEL).unwrap();

        let err = validate_model(r#"{ "name": "m", "entities": [
            { "name": "A", "attributes": [ { "name": "b", "type": { "entity": "B" } } ] }
        ] }"#)
        .unwrap_err();
        assert_eq!(err, "A.b: unknown entity `B`");

        assert!(validate_model("not json").is_err());
    }
}
