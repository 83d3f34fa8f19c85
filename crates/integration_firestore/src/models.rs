//! Firestore REST wire types

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A typed Firestore field value
///
/// Serialized the way the REST API expects, e.g. `{"stringValue": "x"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Value {
    NullValue(()),
    BooleanValue(bool),
    /// 64-bit integers travel as decimal strings
    IntegerValue(String),
    DoubleValue(f64),
    /// RFC 3339 timestamp
    TimestampValue(String),
    StringValue(String),
    /// Base64-encoded bytes
    BytesValue(String),
    ReferenceValue(String),
    GeoPointValue(LatLng),
    ArrayValue(ArrayValue),
    MapValue(MapValue),
}

impl Value {
    pub fn string(value: impl Into<String>) -> Self {
        Self::StringValue(value.into())
    }

    /// An array of string values
    pub fn string_array<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::ArrayValue(ArrayValue {
            values: values.into_iter().map(Self::string).collect(),
        })
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::StringValue(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Self]> {
        match self {
            Self::ArrayValue(array) => Some(&array.values),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ArrayValue {
    /// Absent on the wire when the array is empty
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MapValue {
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub fields: HashMap<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

/// A Firestore document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Full resource name, `projects/{p}/databases/{d}/documents/{collection}/{id}`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default)]
    pub fields: HashMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
}

impl Document {
    /// A document body carrying only fields, as sent on writes
    pub fn with_fields(fields: HashMap<String, Value>) -> Self {
        Self {
            fields,
            ..Self::default()
        }
    }

    /// Last path segment of the resource name
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or_default()
    }

    pub fn string_field(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    /// String members of an array field; non-string members are skipped
    pub fn string_array_field(&self, field: &str) -> Option<Vec<&str>> {
        self.fields
            .get(field)
            .and_then(Value::as_array)
            .map(|values| values.iter().filter_map(Value::as_str).collect())
    }
}

/// Response of a collection list call
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListDocumentsResponse {
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Body of a `:runQuery` call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunQueryRequest {
    pub structured_query: StructuredQuery,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructuredQuery {
    pub from: Vec<CollectionSelector>,
    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
}

impl StructuredQuery {
    /// Query one collection with a single field filter
    pub fn field_filter(
        collection: impl Into<String>,
        field: impl Into<String>,
        op: FieldOperator,
        value: Value,
    ) -> Self {
        Self {
            from: vec![CollectionSelector {
                collection_id: collection.into(),
            }],
            filter: Some(Filter {
                field_filter: FieldFilter {
                    field: FieldReference {
                        field_path: field.into(),
                    },
                    op,
                    value,
                },
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSelector {
    pub collection_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    pub field_filter: FieldFilter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldFilter {
    pub field: FieldReference,
    pub op: FieldOperator,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldReference {
    pub field_path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldOperator {
    ArrayContains,
    /// Field equals one of at most 10 values
    In,
}

/// One element of the streamed `:runQuery` response
///
/// Elements without a document only carry progress metadata.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RunQueryResponseItem {
    #[serde(default)]
    pub document: Option<Document>,
}

/// Error payload returned with non-2xx responses
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: ErrorStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorStatus {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn value_uses_typed_keys() {
        assert_eq!(
            serde_json::to_value(Value::string("hi")).unwrap(),
            json!({"stringValue": "hi"})
        );
        assert_eq!(
            serde_json::to_value(Value::string_array(["a", "b"])).unwrap(),
            json!({"arrayValue": {"values": [{"stringValue": "a"}, {"stringValue": "b"}]}})
        );
        assert_eq!(
            serde_json::to_value(Value::NullValue(())).unwrap(),
            json!({"nullValue": null})
        );
    }

    #[test]
    fn empty_array_value_deserializes() {
        let value: Value = serde_json::from_value(json!({"arrayValue": {}})).unwrap();
        assert_eq!(value.as_array(), Some(&[][..]));
    }

    #[test]
    fn document_id_is_last_segment() {
        let doc = Document {
            name: "projects/p/databases/(default)/documents/tags/abc123".to_string(),
            ..Document::default()
        };
        assert_eq!(doc.id(), "abc123");
        assert_eq!(Document::default().id(), "");
    }

    #[test]
    fn document_field_accessors() {
        let doc: Document = serde_json::from_value(json!({
            "name": "projects/p/databases/(default)/documents/quotes/q1",
            "fields": {
                "author": {"stringValue": "Seneca"},
                "count": {"integerValue": "3"},
                "slugs": {"arrayValue": {"values": [
                    {"stringValue": "wisdom"},
                    {"integerValue": "7"},
                    {"stringValue": "life"}
                ]}}
            },
            "createTime": "2024-01-01T00:00:00Z",
            "updateTime": "2024-01-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(doc.string_field("author"), Some("Seneca"));
        assert_eq!(doc.string_field("count"), None);
        assert_eq!(doc.string_field("missing"), None);
        assert_eq!(doc.string_array_field("slugs"), Some(vec!["wisdom", "life"]));
    }

    #[test]
    fn structured_query_shape() {
        let request = RunQueryRequest {
            structured_query: StructuredQuery::field_filter(
                "tags",
                "slug",
                FieldOperator::In,
                Value::string_array(["a"]),
            ),
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "structuredQuery": {
                    "from": [{"collectionId": "tags"}],
                    "where": {"fieldFilter": {
                        "field": {"fieldPath": "slug"},
                        "op": "IN",
                        "value": {"arrayValue": {"values": [{"stringValue": "a"}]}}
                    }}
                }
            })
        );
    }

    #[test]
    fn operator_names() {
        assert_eq!(
            serde_json::to_value(FieldOperator::ArrayContains).unwrap(),
            json!("ARRAY_CONTAINS")
        );
        assert_eq!(serde_json::to_value(FieldOperator::In).unwrap(), json!("IN"));
    }

    #[test]
    fn write_body_omits_metadata() {
        let mut fields = HashMap::new();
        fields.insert("tag".to_string(), Value::string("Wisdom"));
        assert_eq!(
            serde_json::to_value(Document::with_fields(fields)).unwrap(),
            json!({"fields": {"tag": {"stringValue": "Wisdom"}}})
        );
    }
}
