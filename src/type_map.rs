//! Maps declared type expressions to Avro type expressions.
//!
//! # Type Mapping Table
//!
//! | Declared | Avro | Notes |
//! |----------|------|-------|
//! | `int`, `int8`, `int16`, `int32`, `uint`, `uint8`, `uint16`, `uint32` | `int` | |
//! | `int64`, `uint64`, `uintptr` | `long` | |
//! | `float32` | `float` | |
//! | `float64` | `double` | |
//! | `bool` | `boolean` | |
//! | `[]byte` | `bytes` | |
//! | `string` | `string` | |
//! | pointer | `["null", <inner>]` | Nullable union |
//! | array | `{"type": "array", "items": <inner>}` | |
//! | map | `{"type": "map", "values": <value>}` | |
//! | custom `ID` | `string` | Identifier value type |
//! | custom `Time`, `Duration` | `long` | Millisecond timestamps/durations |
//! | custom other | record reference | Resolved via the dependency index |
//! | other primitive names | error | Fatal: aborts the generation run |

use crate::avro::AvroType;
use crate::error::{Error, Result};
use crate::source::TypeExpr;

/// Map a declared type expression to its Avro equivalent.
///
/// An unrecognized primitive name is a declaration error, not a runtime
/// condition: the whole generation run is expected to abort so the source
/// declaration can be fixed.
pub fn map_type(expr: &TypeExpr) -> Result<AvroType> {
    let avro = match expr {
        TypeExpr::Primitive { name } => map_primitive(name)?,

        TypeExpr::Pointer { inner } => map_type(inner)?.nullable(),

        TypeExpr::Array { inner } => AvroType::Array {
            items: Box::new(map_type(inner)?),
        },

        TypeExpr::Map { value } => AvroType::Map {
            values: Box::new(map_type(value)?),
        },

        TypeExpr::Custom { name } => match name.as_str() {
            // core.ID
            "ID" => AvroType::name("string"),
            // timeapi.Time, timeapi.Duration
            "Time" | "Duration" => AvroType::name("long"),
            // Anything else is a reference to another declared record.
            other => AvroType::name(other),
        },
    };
    Ok(avro)
}

fn map_primitive(name: &str) -> Result<AvroType> {
    let avro = match name {
        "int" | "int8" | "int16" | "int32" | "uint" | "uint8" | "uint16" | "uint32" => "int",
        "int64" | "uint64" | "uintptr" => "long",
        "float32" => "float",
        "float64" => "double",
        "bool" => "boolean",
        "[]byte" => "bytes",
        "string" => "string",
        other => return Err(Error::UnsupportedType(other.to_string())),
    };
    Ok(AvroType::name(avro))
}
