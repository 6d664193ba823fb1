//! JSON export and lenient import of shape documents.

use crate::shape::{Ellipse, ShapeId};
use crate::store::ShapeStore;
use serde_json::Value;
use thiserror::Error;

/// Whole-document import failures. Anything short of this is handled
/// per-record and never aborts an import.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("expected a JSON array of shape records")]
    NotAnArray,
}

/// Serialize the store in insertion order, pretty-printed, with the stable
/// field names `id`, `type`, `nx`, `ny`, `nrx`, `nry`, `option`, `note`.
pub fn export(store: &ShapeStore) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(store)
}

/// Parse a shape document.
///
/// The document must be a JSON array; anything else fails wholesale and the
/// caller leaves its store untouched. Each element then goes through
/// [`decode_record`], and unrecognized elements are dropped silently.
pub fn import(text: &str) -> Result<Vec<Ellipse>, ImportError> {
    let doc: Value = serde_json::from_str(text)?;
    let Value::Array(items) = doc else {
        return Err(ImportError::NotAnArray);
    };
    let total = items.len();
    let shapes: Vec<Ellipse> = items.iter().filter_map(decode_record).collect();
    let dropped = total - shapes.len();
    if dropped > 0 {
        log::warn!("import dropped {dropped} of {total} records");
    }
    log::debug!("imported {} shapes", shapes.len());
    Ok(shapes)
}

/// Decode one candidate record, or `None` to drop it.
///
/// Two record shapes are accepted:
/// - current format: `type` is `"ellipse"` and both `nx` and `ny` keys are
///   present; normalized fields are coerced by [`numeric`];
/// - legacy format: `canvasW`/`canvasH` plus absolute `cx`,`cy`,`rx`,`ry`,
///   normalized by dividing through the canvas dimensions (a zero or
///   invalid dimension is substituted by 1).
///
/// In both, `option`/`note` default to empty, radii end up non-negative,
/// and `id` is reused when it is a non-empty string, else freshly
/// generated.
pub fn decode_record(value: &Value) -> Option<Ellipse> {
    let obj = value.as_object()?;

    let id = obj
        .get("id")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(ShapeId::from)
        .unwrap_or_else(ShapeId::generate);
    let option = text(obj.get("option"));
    let note = text(obj.get("note"));

    if obj.get("type").and_then(Value::as_str) == Some("ellipse")
        && obj.contains_key("nx")
        && obj.contains_key("ny")
    {
        return Some(Ellipse::reconstruct(
            id,
            numeric(obj.get("nx")),
            numeric(obj.get("ny")),
            numeric(obj.get("nrx")),
            numeric(obj.get("nry")),
            option,
            note,
        ));
    }

    if obj.contains_key("canvasW") && obj.contains_key("canvasH") {
        let cw = nonzero_dimension(obj.get("canvasW"));
        let ch = nonzero_dimension(obj.get("canvasH"));
        return Some(Ellipse::reconstruct(
            id,
            numeric(obj.get("cx")) / cw,
            numeric(obj.get("cy")) / ch,
            numeric(obj.get("rx")) / cw,
            numeric(obj.get("ry")) / ch,
            option,
            note,
        ));
    }

    None
}

/// Numeric coercion table: finite numbers pass through; numeric strings
/// parse; booleans map to 0/1; everything else (null, missing, non-numeric
/// strings, nested values, non-finite results) coerces to 0 — never NaN.
fn numeric(value: Option<&Value>) -> f64 {
    let coerced = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        Some(Value::Bool(b)) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => 0.0,
    };
    if coerced.is_finite() { coerced } else { 0.0 }
}

/// Canvas dimension guard: zero or invalid dimensions become 1 so the
/// legacy division stays defined.
fn nonzero_dimension(value: Option<&Value>) -> f64 {
    let v = numeric(value);
    if v == 0.0 { 1.0 } else { v }
}

fn text(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store_of(shapes: Vec<Ellipse>) -> ShapeStore {
        let mut store = ShapeStore::new();
        store.replace_all(shapes);
        store
    }

    #[test]
    fn test_export_import_round_trip() {
        let mut a = Ellipse::new(0.3, 0.5, 0.25, 0.3);
        a.option = "mass".to_string();
        a.note = "biopsy site".to_string();
        let b = Ellipse::new(0.1, 0.2, 0.05, 0.05);
        let store = store_of(vec![a.clone(), b.clone()]);

        let exported = export(&store).unwrap();
        let imported = import(&exported).unwrap();

        assert_eq!(imported.len(), 2);
        for (before, after) in [a, b].iter().zip(&imported) {
            assert_eq!(before.id, after.id);
            assert_eq!(before.kind, after.kind);
            assert_eq!(before.option, after.option);
            assert_eq!(before.note, after.note);
            assert!((before.nx - after.nx).abs() < 1e-12);
            assert!((before.ny - after.ny).abs() < 1e-12);
            assert!((before.nrx - after.nrx).abs() < 1e-12);
            assert!((before.nry - after.nry).abs() < 1e-12);
        }
    }

    #[test]
    fn test_legacy_record_normalizes() {
        let records = json!([
            { "cx": 50, "cy": 50, "rx": 10, "ry": 5, "canvasW": 100, "canvasH": 100 }
        ]);
        let shapes = import(&records.to_string()).unwrap();
        assert_eq!(shapes.len(), 1);
        let s = &shapes[0];
        assert!((s.nx - 0.5).abs() < f64::EPSILON);
        assert!((s.ny - 0.5).abs() < f64::EPSILON);
        assert!((s.nrx - 0.1).abs() < f64::EPSILON);
        assert!((s.nry - 0.05).abs() < f64::EPSILON);
    }

    #[test]
    fn test_legacy_zero_dimension_substitutes_one() {
        let records = json!([
            { "cx": 3, "cy": 4, "rx": 1, "ry": 2, "canvasW": 0, "canvasH": "bogus" }
        ]);
        let shapes = import(&records.to_string()).unwrap();
        let s = &shapes[0];
        assert!((s.nx - 3.0).abs() < f64::EPSILON);
        assert!((s.ny - 4.0).abs() < f64::EPSILON);
        assert!((s.nrx - 1.0).abs() < f64::EPSILON);
        assert!((s.nry - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_malformed_text_errors() {
        assert!(matches!(import("{not json"), Err(ImportError::Parse(_))));
    }

    #[test]
    fn test_non_array_errors() {
        assert!(matches!(
            import(r#"{"type": "ellipse"}"#),
            Err(ImportError::NotAnArray)
        ));
    }

    #[test]
    fn test_unrecognized_records_dropped() {
        let records = json!([
            { "type": "ellipse", "nx": 0.5, "ny": 0.5 },
            { "type": "rectangle", "x": 1, "y": 2 },
            "just a string",
            42,
            { "cx": 10, "cy": 10 }
        ]);
        let shapes = import(&records.to_string()).unwrap();
        assert_eq!(shapes.len(), 1);
    }

    #[test]
    fn test_numeric_coercion_table() {
        let records = json!([{
            "type": "ellipse",
            "nx": "0.5",
            "ny": null,
            "nrx": true,
            "nry": "not a number"
        }]);
        let shapes = import(&records.to_string()).unwrap();
        let s = &shapes[0];
        assert!((s.nx - 0.5).abs() < f64::EPSILON);
        assert!(s.ny.abs() < f64::EPSILON);
        assert!((s.nrx - 1.0).abs() < f64::EPSILON);
        assert!(s.nry.abs() < f64::EPSILON);
        assert!(s.nx.is_finite() && s.ny.is_finite());
    }

    #[test]
    fn test_missing_radii_default_to_zero() {
        let records = json!([{ "type": "ellipse", "nx": 0.5, "ny": 0.5 }]);
        let shapes = import(&records.to_string()).unwrap();
        assert!(shapes[0].nrx.abs() < f64::EPSILON);
        assert!(shapes[0].nry.abs() < f64::EPSILON);
    }

    #[test]
    fn test_radii_forced_non_negative() {
        let records = json!([
            { "type": "ellipse", "nx": 0.5, "ny": 0.5, "nrx": -0.25, "nry": -0.1 },
            { "cx": 50, "cy": 50, "rx": -10, "ry": 5, "canvasW": 100, "canvasH": 100 }
        ]);
        let shapes = import(&records.to_string()).unwrap();
        assert!((shapes[0].nrx - 0.25).abs() < f64::EPSILON);
        assert!((shapes[0].nry - 0.1).abs() < f64::EPSILON);
        assert!((shapes[1].nrx - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_id_reused_when_present() {
        let records = json!([
            { "id": "keep-me", "type": "ellipse", "nx": 0.1, "ny": 0.2 },
            { "id": "", "type": "ellipse", "nx": 0.1, "ny": 0.2 },
            { "id": 42, "type": "ellipse", "nx": 0.1, "ny": 0.2 }
        ]);
        let shapes = import(&records.to_string()).unwrap();
        assert_eq!(shapes[0].id.as_str(), "keep-me");
        assert!(!shapes[1].id.as_str().is_empty());
        assert_ne!(shapes[1].id, shapes[2].id);
    }

    #[test]
    fn test_option_note_default_empty() {
        let records = json!([{ "type": "ellipse", "nx": 0.1, "ny": 0.2 }]);
        let shapes = import(&records.to_string()).unwrap();
        assert_eq!(shapes[0].option, "");
        assert_eq!(shapes[0].note, "");
    }

    #[test]
    fn test_infinite_values_coerce_to_zero() {
        let records = json!([{ "type": "ellipse", "nx": "Infinity", "ny": "-inf" }]);
        let shapes = import(&records.to_string()).unwrap();
        assert!(shapes[0].nx.abs() < f64::EPSILON);
        assert!(shapes[0].ny.abs() < f64::EPSILON);
    }
}
