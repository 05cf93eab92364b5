use chrono::NaiveDate;
use models::{FieldProblem, SourceError, SourceKind};
use serde_json::{Map, Number, Value};

use crate::dates::parse_date;

type FieldResult<T> = Result<T, SourceError>;

/// Extracts the record array from an export document.
///
/// With a records key the rows may sit under that key or be the document itself;
/// without one the document must be the array.
pub fn record_rows<'a>(
    doc: &'a Value,
    records_key: Option<&str>,
    kind: SourceKind,
) -> FieldResult<&'a [Value]> {
    if let Value::Array(rows) = doc {
        return Ok(rows.as_slice());
    }

    let Some(key) = records_key else {
        return Err(SourceError::InvalidDocument {
            kind,
            reason: "expected a JSON array of records".to_string(),
        });
    };

    match doc.get(key) {
        Some(Value::Array(rows)) => Ok(rows.as_slice()),
        Some(other) => Err(SourceError::InvalidDocument {
            kind,
            reason: format!("'{}' is {}, expected an array", key, type_name(other)),
        }),
        None => Err(SourceError::InvalidDocument {
            kind,
            reason: format!("missing '{}' array", key),
        }),
    }
}

/// Typed, validating view over one loosely-typed export row.
pub struct RecordView<'a> {
    kind: SourceKind,
    index: usize,
    fields: &'a Map<String, Value>,
}

impl<'a> RecordView<'a> {
    pub fn new(kind: SourceKind, index: usize, row: &'a Value) -> FieldResult<Self> {
        match row.as_object() {
            Some(fields) => Ok(Self {
                kind,
                index,
                fields,
            }),
            None => Err(SourceError::MalformedSource {
                kind,
                index,
                field: "<record>".to_string(),
                problem: FieldProblem::Mistyped {
                    found: type_name(row).to_string(),
                },
            }),
        }
    }

    fn malformed(&self, field: &str, problem: FieldProblem) -> SourceError {
        SourceError::MalformedSource {
            kind: self.kind,
            index: self.index,
            field: field.to_string(),
            problem,
        }
    }

    /// Present and non-null.
    fn value(&self, field: &str) -> Option<&'a Value> {
        self.fields.get(field).filter(|v| !v.is_null())
    }

    pub fn is_absent(&self, field: &str) -> bool {
        self.value(field).is_none()
    }

    pub fn required_str(&self, field: &str) -> FieldResult<String> {
        match self.optional_str(field)? {
            Some(s) => Ok(s),
            None => Err(self.malformed(field, FieldProblem::Missing)),
        }
    }

    /// Text field; numbers are accepted because folio numbers are sometimes numeric.
    /// Blank strings count as absent.
    pub fn optional_str(&self, field: &str) -> FieldResult<Option<String>> {
        match self.value(field) {
            None => Ok(None),
            Some(Value::String(s)) => {
                let s = s.trim();
                Ok((!s.is_empty()).then(|| s.to_string()))
            }
            Some(Value::Number(n)) => Ok(Some(number_text(n))),
            Some(other) => Err(self.malformed(
                field,
                FieldProblem::Mistyped {
                    found: other.to_string(),
                },
            )),
        }
    }

    pub fn str_or_empty(&self, field: &str) -> FieldResult<String> {
        Ok(self.optional_str(field)?.unwrap_or_default())
    }

    pub fn required_f64(&self, field: &str) -> FieldResult<f64> {
        match self.optional_f64(field)? {
            Some(v) => Ok(v),
            None => Err(self.malformed(field, FieldProblem::Missing)),
        }
    }

    /// Numeric field; numeric strings such as `"1,23,456.70"` are accepted.
    pub fn optional_f64(&self, field: &str) -> FieldResult<Option<f64>> {
        let Some(raw) = self.value(field) else {
            return Ok(None);
        };
        let parsed = match raw {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => {
                let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
                if cleaned.is_empty() {
                    return Ok(None);
                }
                cleaned.parse::<f64>().ok()
            }
            _ => None,
        };

        match parsed {
            Some(v) if v.is_finite() => Ok(Some(v)),
            _ => Err(self.malformed(
                field,
                FieldProblem::Mistyped {
                    found: raw.to_string(),
                },
            )),
        }
    }

    pub fn f64_or_zero(&self, field: &str) -> FieldResult<f64> {
        Ok(self.optional_f64(field)?.unwrap_or(0.0))
    }

    pub fn non_negative_f64(&self, field: &str) -> FieldResult<f64> {
        let v = self.required_f64(field)?;
        if v < 0.0 {
            return Err(self.malformed(field, FieldProblem::Negative { value: v }));
        }
        Ok(v)
    }

    pub fn required_date(&self, field: &str) -> FieldResult<NaiveDate> {
        match self.optional_date(field)? {
            Some(d) => Ok(d),
            None => Err(self.malformed(field, FieldProblem::Missing)),
        }
    }

    /// Absent dates are `None`; a present date that does not parse is an error.
    pub fn optional_date(&self, field: &str) -> FieldResult<Option<NaiveDate>> {
        match self.value(field) {
            None => Ok(None),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => parse_date(s).map(Some).ok_or_else(|| {
                self.malformed(
                    field,
                    FieldProblem::UnparseableDate {
                        value: s.to_string(),
                    },
                )
            }),
            Some(other) => Err(self.malformed(
                field,
                FieldProblem::Mistyped {
                    found: other.to_string(),
                },
            )),
        }
    }
}

/// Largest magnitude at which every integer is exactly representable as `f64`.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Integral floats render without a fraction so `91011.0` reads as folio `91011`.
fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() <= MAX_EXACT_INTEGER => {
            format!("{}", f as i64)
        }
        _ => n.to_string(),
    }
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const KIND: SourceKind = SourceKind::ConsolidatedHoldings;

    #[test]
    fn test_record_rows_under_key_or_bare_array() {
        let nested = json!({ "dtTrxnResult": [{ "a": 1 }, { "a": 2 }] });
        assert_eq!(record_rows(&nested, Some("dtTrxnResult"), KIND).unwrap().len(), 2);

        let bare = json!([{ "a": 1 }]);
        assert_eq!(record_rows(&bare, Some("dtTrxnResult"), KIND).unwrap().len(), 1);
        assert_eq!(record_rows(&bare, None, KIND).unwrap().len(), 1);
    }

    #[test]
    fn test_record_rows_rejects_other_shapes() {
        let missing = json!({ "rows": [] });
        let err = record_rows(&missing, Some("dtTrxnResult"), KIND).unwrap_err();
        assert!(matches!(err, SourceError::InvalidDocument { .. }));

        let wrong = json!({ "dtTrxnResult": "nope" });
        assert!(record_rows(&wrong, Some("dtTrxnResult"), KIND).is_err());

        assert!(record_rows(&json!({}), None, KIND).is_err());
    }

    #[test]
    fn test_record_view_rejects_non_object_row() {
        let row = json!("just text");
        let err = RecordView::new(KIND, 4, &row).err().unwrap();
        assert!(matches!(
            err,
            SourceError::MalformedSource { index: 4, ref field, .. } if field == "<record>"
        ));
    }

    #[test]
    fn test_numeric_coercion() {
        let row = json!({
            "plain": 12.5,
            "text": " 1,23,456.70 ",
            "blank": "",
            "null": null,
            "bad": "twelve",
            "nan": "NaN",
            "flag": true
        });
        let view = RecordView::new(KIND, 0, &row).unwrap();

        assert_eq!(view.required_f64("plain").unwrap(), 12.5);
        assert_eq!(view.required_f64("text").unwrap(), 123456.70);
        assert_eq!(view.optional_f64("blank").unwrap(), None);
        assert_eq!(view.f64_or_zero("null").unwrap(), 0.0);
        assert_eq!(view.f64_or_zero("absent").unwrap(), 0.0);
        assert!(view.required_f64("bad").is_err());
        assert!(view.required_f64("nan").is_err());
        assert!(view.required_f64("flag").is_err());

        let err = view.required_f64("absent").unwrap_err();
        assert!(matches!(
            err,
            SourceError::MalformedSource { problem: FieldProblem::Missing, .. }
        ));
    }

    #[test]
    fn test_negative_units_are_rejected() {
        let row = json!({ "Unit Balance": -3.0 });
        let view = RecordView::new(KIND, 0, &row).unwrap();
        let err = view.non_negative_f64("Unit Balance").unwrap_err();
        assert!(matches!(
            err,
            SourceError::MalformedSource { problem: FieldProblem::Negative { .. }, .. }
        ));
    }

    #[test]
    fn test_string_coercion() {
        let row = json!({ "Folio": 20920295, "Scheme": "  Axis Fund  ", "PAN": "   " });
        let view = RecordView::new(KIND, 0, &row).unwrap();

        assert_eq!(view.required_str("Folio").unwrap(), "20920295");
        assert_eq!(view.required_str("Scheme").unwrap(), "Axis Fund");
        assert_eq!(view.str_or_empty("PAN").unwrap(), "");
        assert!(view.required_str("PAN").is_err());
    }

    #[test]
    fn test_float_encoded_folio_drops_zero_fraction() {
        let row = json!({ "whole": 91011.0, "negative": -12.0, "fraction": 91011.5 });
        let view = RecordView::new(KIND, 0, &row).unwrap();

        assert_eq!(view.required_str("whole").unwrap(), "91011");
        assert_eq!(view.required_str("negative").unwrap(), "-12");
        assert_eq!(view.required_str("fraction").unwrap(), "91011.5");
    }

    #[test]
    fn test_date_fields() {
        let row = json!({
            "ok": "25-NOV-2025",
            "bad": "25/NOV",
            "blank": "",
            "num": 20251125
        });
        let view = RecordView::new(KIND, 0, &row).unwrap();

        assert_eq!(
            view.required_date("ok").unwrap(),
            NaiveDate::from_ymd_opt(2025, 11, 25).unwrap()
        );
        assert_eq!(view.optional_date("blank").unwrap(), None);
        assert_eq!(view.optional_date("absent").unwrap(), None);
        assert!(matches!(
            view.optional_date("bad").unwrap_err(),
            SourceError::MalformedSource { problem: FieldProblem::UnparseableDate { .. }, .. }
        ));
        assert!(view.optional_date("num").is_err());
        assert!(view.required_date("blank").is_err());
    }
}
