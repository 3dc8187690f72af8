//! Avro protocol data model and JSON serialization.
//!
//! Models the subset of the Avro protocol format (`.avpr`) this generator
//! emits: protocols containing record types whose fields are primitives,
//! arrays, maps, two-alternative nullable unions, or references to other
//! records in the same protocol. Serialization matches the Avro JSON text
//! shapes exactly; empty/absent attributes are omitted rather than written
//! as empty strings or nulls.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Avro primitive type names this generator can emit.
pub const PRIMITIVE_NAMES: [&str; 7] = [
    "int", "long", "float", "double", "boolean", "bytes", "string",
];

/// An Avro type expression as it appears in a field's `type` attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum AvroType {
    /// A bare type name: either a primitive or a reference to a record
    /// defined elsewhere in the protocol. Serializes as a JSON string.
    Name(String),

    /// A union of alternatives. This generator only ever produces the
    /// two-alternative nullable form `["null", T]`.
    Union(Vec<AvroType>),

    /// `{"type": "array", "items": <inner>}`.
    Array { items: Box<AvroType> },

    /// `{"type": "map", "values": <inner>}`.
    Map { values: Box<AvroType> },
}

impl AvroType {
    /// A bare name type (primitive or record reference).
    pub fn name(name: impl Into<String>) -> Self {
        AvroType::Name(name.into())
    }

    /// Wrap a type in a `["null", T]` union.
    ///
    /// Idempotent: a type that is already a union is returned unchanged,
    /// so an optional pointer field does not become doubly nullable.
    pub fn nullable(self) -> Self {
        match self {
            AvroType::Union(_) => self,
            other => AvroType::Union(vec![AvroType::name("null"), other]),
        }
    }

    /// Whether this is one of the seven Avro primitive names.
    pub fn is_primitive(&self) -> bool {
        match self {
            AvroType::Name(name) => PRIMITIVE_NAMES.contains(&name.as_str()),
            _ => false,
        }
    }

    /// The record name this type refers to, if any.
    ///
    /// Unwraps nullable unions (second alternative), arrays, and maps down
    /// to the innermost bare name; returns `None` for primitives and for
    /// types that bottom out in a primitive.
    pub fn referenced_name(&self) -> Option<&str> {
        match self {
            AvroType::Name(name) => {
                if PRIMITIVE_NAMES.contains(&name.as_str()) {
                    None
                } else {
                    Some(name)
                }
            }
            AvroType::Union(alternatives) => alternatives.get(1)?.referenced_name(),
            AvroType::Array { items } => items.referenced_name(),
            AvroType::Map { values } => values.referenced_name(),
        }
    }
}

impl Serialize for AvroType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AvroType::Name(name) => serializer.serialize_str(name),
            AvroType::Union(alternatives) => alternatives.serialize(serializer),
            AvroType::Array { items } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "array")?;
                map.serialize_entry("items", items)?;
                map.end()
            }
            AvroType::Map { values } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "map")?;
                map.serialize_entry("values", values)?;
                map.end()
            }
        }
    }
}

/// One field of an Avro record.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Field {
    pub name: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub doc: String,

    #[serde(rename = "type")]
    pub field_type: AvroType,

    /// Default value slot. Kept for schema-level compatibility; this
    /// generator never populates it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: AvroType) -> Self {
        Field {
            name: name.into(),
            doc: String::new(),
            field_type,
            default: None,
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }
}

/// An Avro record type definition.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Record {
    #[serde(rename = "type")]
    kind: &'static str,

    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub doc: String,

    pub fields: Vec<Field>,
}

impl Record {
    pub fn new(name: impl Into<String>, doc: impl Into<String>, fields: Vec<Field>) -> Self {
        Record {
            kind: "record",
            name: name.into(),
            namespace: None,
            doc: doc.into(),
            fields,
        }
    }
}

/// A complete Avro protocol document for one event type.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Protocol {
    pub namespace: String,

    pub protocol: String,

    /// Record definitions in emission order: dependencies in discovery
    /// order, then the payload record, the envelope record, and `Auth`.
    pub types: Vec<Record>,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub doc: String,
}
