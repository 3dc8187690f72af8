//! Declared record model and declaration-unit loading.
//!
//! The generator does not parse host-language source itself. An external
//! parser walks the codebase and emits one JSON *declaration unit* per input
//! file: the records it declares (name, ordered fields, comments) and its
//! top-level string constants. This module defines that consumed interface
//! and loads units from a directory.
//!
//! ```json
//! {
//!     "records": [
//!         {
//!             "name": "OrderCreatedV1",
//!             "comments": ["Fired when an order is created."],
//!             "fields": [
//!                 {"name": "order_id", "type": {"kind": "custom", "name": "ID"}},
//!                 {"name": "total", "type": {"kind": "primitive", "name": "int64"}, "optional": true}
//!             ]
//!         }
//!     ],
//!     "constants": [
//!         {"name": "minorVersionOrderCreatedV1", "value": "3"}
//!     ]
//! }
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

/// The parsed declarations from one input source file.
#[derive(Debug, Default, Deserialize)]
pub struct SourceUnit {
    /// Record (struct) declarations in source order.
    #[serde(default)]
    pub records: Vec<DeclaredRecord>,

    /// Top-level string constants (used for `minorVersion*` annotations).
    #[serde(default)]
    pub constants: Vec<DeclaredConstant>,
}

/// One declared record type.
#[derive(Debug, Deserialize)]
pub struct DeclaredRecord {
    /// Declared type name (e.g., `"OrderCreatedV1"`, `"Address"`).
    pub name: String,

    /// Documentation comments attached to the declaration.
    #[serde(default)]
    pub comments: Vec<String>,

    /// Fields in declaration order. Order is significant and preserved
    /// through to the generated schema.
    #[serde(default)]
    pub fields: Vec<DeclaredField>,
}

/// One field of a declared record.
#[derive(Debug, Deserialize)]
pub struct DeclaredField {
    /// Serialization (wire) name of the field, not the source identifier.
    pub name: String,

    /// Documentation comments attached to the field.
    #[serde(default)]
    pub comments: Vec<String>,

    /// The field's declared type expression.
    #[serde(rename = "type")]
    pub type_expr: TypeExpr,

    /// Whether the field may be absent on the wire.
    #[serde(default)]
    pub optional: bool,
}

/// A top-level declared constant with a string value.
#[derive(Debug, Deserialize)]
pub struct DeclaredConstant {
    pub name: String,
    pub value: String,
}

/// A declared type expression.
///
/// Recursive; cycles are representable but not expected at the declaration
/// level.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeExpr {
    /// A built-in scalar type by its source name (e.g., `"int64"`, `"string"`).
    Primitive { name: String },

    /// A pointer/reference to an inner type; always nullable on the wire.
    Pointer { inner: Box<TypeExpr> },

    /// An ordered sequence of an inner type.
    Array { inner: Box<TypeExpr> },

    /// A string-keyed map with values of one type.
    Map { value: Box<TypeExpr> },

    /// A named non-primitive type: either a fixed value type (`ID`, `Time`,
    /// `Duration`) or a reference to another declared record.
    Custom { name: String },
}

/// Load all declaration units from a directory.
///
/// Reads every `.json` file directly under `input_dir`, optionally filtered
/// by substring matches on the file name (`include` keeps matching files,
/// `exclude` drops them; exclude wins when both match). Files are processed
/// in sorted name order so repeated runs see identical input ordering.
pub fn load_sources(
    input_dir: &Path,
    include: Option<&str>,
    exclude: Option<&str>,
) -> Result<Vec<SourceUnit>> {
    let entries = std::fs::read_dir(input_dir).map_err(|e| Error::Read {
        path: input_dir.to_path_buf(),
        source: e,
    })?;

    let mut paths: Vec<_> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("json")
        })
        .filter(|path| {
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default();
            if let Some(pattern) = exclude {
                if name.contains(pattern) {
                    return false;
                }
            }
            match include {
                Some(pattern) => name.contains(pattern),
                None => true,
            }
        })
        .collect();
    paths.sort();

    let mut units = Vec::with_capacity(paths.len());
    for path in paths {
        let content = std::fs::read_to_string(&path).map_err(|e| Error::Read {
            path: path.clone(),
            source: e,
        })?;
        let unit: SourceUnit =
            serde_json::from_str(&content).map_err(|e| Error::Parse { path, source: e })?;
        units.push(unit);
    }
    Ok(units)
}
