//! Conversion of JSON documents into explorable values
//!
//! The document is converted once into shared [`Value`] handles so that
//! exploring it never copies subtrees again.

use crate::object::Value;
use serde_json::Value as Json;

impl From<Json> for Value {
    fn from(json: Json) -> Self {
        match json {
            Json::Null => Value::None,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Json::String(s) => Value::Str(s),
            Json::Array(items) => Value::list(items.into_iter().map(Value::from)),
            Json::Object(entries) => {
                Value::map(entries.into_iter().map(|(k, v)| (k, Value::from(v))))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Explorable;
    use serde_json::json;

    #[test]
    fn test_json_document() {
        let doc = Value::from(json!({
            "name": "widget",
            "sizes": [1, 2.5],
            "extra": null
        }));

        assert_eq!(doc.type_name(), "dict");
        assert_eq!(
            doc.member_names(),
            vec!["[\"extra\"]", "[\"name\"]", "[\"sizes\"]"]
        );

        let sizes = doc.get_member("[\"sizes\"]").unwrap().value;
        assert_eq!(sizes.repr(), "[1, 2.5]");
        assert_eq!(sizes.length(), Some(2));

        let extra = doc.get_member("[\"extra\"]").unwrap().value;
        assert!(extra.is_scalar());
        assert_eq!(extra.repr(), "None");
    }

    #[test]
    fn test_large_unsigned_number_becomes_float() {
        let value = Value::from(json!(u64::MAX));
        assert_eq!(value.type_name(), "float");
    }
}
