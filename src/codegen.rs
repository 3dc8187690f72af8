//! Avro protocol generation from declared records.
//!
//! Turns the declared records of a codebase into one Avro protocol document
//! per event type:
//!
//! - Classifies records into event types (name ends with `V<digits>`) and
//!   dependency types (everything else).
//! - Builds a dependency index over all non-event records before any event
//!   is assembled.
//! - Assembles each event into a self-contained protocol: dependency
//!   records in field discovery order, the payload record, the envelope
//!   record, and the shared `Auth` record.
//!
//! Generation is a pure, single-pass transform: identical input always
//! produces byte-identical protocol documents. Record order, field order,
//! and dependency order are fully specified.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

use crate::avro::{AvroType, Field, Protocol, Record};
use crate::error::{Error, Result};
use crate::source::{DeclaredRecord, SourceUnit};
use crate::type_map::map_type;

/// The shared auth record, identical across all generated protocols.
static AUTH_RECORD: LazyLock<Record> = LazyLock::new(|| {
    Record::new(
        "Auth",
        "",
        vec![
            Field::new("session_id", AvroType::name("string").nullable()),
            Field::new("user_id", AvroType::name("string").nullable()),
            Field::new("app_id", AvroType::name("string").nullable()),
            Field::new("app_version", AvroType::name("string").nullable()),
        ],
    )
});

/// Classification of a declared record, computed once at ingestion.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordKind {
    /// A top-level versioned event type, published as its own protocol.
    Event { minor_version: String },

    /// A value type referenced from event payloads or other dependencies.
    Dependency,
}

/// Classify a declared record by its name.
///
/// A record is an event iff its name ends with `V` followed by one or more
/// ASCII digits (`OrderCreatedV1`, `MetricsV12`). The minor version comes
/// from a `minorVersion<EventName>` constant; absent constants resolve to
/// the empty string.
pub fn classify(name: &str, minor_versions: &BTreeMap<String, String>) -> RecordKind {
    if is_event_name(name) {
        RecordKind::Event {
            minor_version: minor_versions.get(name).cloned().unwrap_or_default(),
        }
    } else {
        RecordKind::Dependency
    }
}

fn is_event_name(name: &str) -> bool {
    let stem = name.trim_end_matches(|c: char| c.is_ascii_digit());
    stem.len() < name.len() && stem.ends_with('V')
}

/// A dependency record plus the names of the non-primitive types its own
/// fields reference.
#[derive(Debug, Clone)]
pub struct DepEntry {
    pub record: Record,
    pub deps: Vec<String>,
}

/// Statistics from writing generated protocols, for CLI reporting.
#[derive(Debug, Default)]
pub struct GenerationStats {
    pub protocols_written: usize,
}

/// Generate one Avro protocol per event type declared in `sources`.
///
/// Two passes: the first collects `minorVersion*` constants and builds the
/// dependency index from every non-event record; the second assembles each
/// event record into a protocol. Any field with an unmappable declared type
/// aborts the whole run — there is no partial output.
pub fn generate(sources: &[SourceUnit], namespace: &str) -> Result<BTreeMap<String, Protocol>> {
    let minor_versions = collect_minor_versions(sources);
    let index = build_dependency_index(sources, &minor_versions)?;

    let mut protocols = BTreeMap::new();
    for unit in sources {
        for record in &unit.records {
            if let RecordKind::Event { minor_version } = classify(&record.name, &minor_versions) {
                let protocol = assemble_protocol(record, &index, namespace, &minor_version)?;
                protocols.insert(record.name.clone(), protocol);
            }
        }
    }
    Ok(protocols)
}

/// Serialize each protocol to `<output_dir>/<EventName>.avpr` as indented JSON.
pub fn write_protocols(
    protocols: &BTreeMap<String, Protocol>,
    output_dir: &Path,
) -> Result<GenerationStats> {
    std::fs::create_dir_all(output_dir).map_err(|e| Error::OutputDir {
        path: output_dir.to_path_buf(),
        source: e,
    })?;

    let mut stats = GenerationStats::default();
    for (name, protocol) in protocols {
        let json = serde_json::to_string_pretty(protocol).map_err(|e| Error::Serialize {
            protocol: name.clone(),
            source: e,
        })?;

        let path = output_dir.join(format!("{name}.avpr"));
        std::fs::write(&path, json + "\n").map_err(|e| Error::Write {
            protocol: name.clone(),
            path,
            source: e,
        })?;
        stats.protocols_written += 1;
    }
    Ok(stats)
}

// ── Dependency index ───────────────────────────────────────────────────

/// Collect `minorVersion<EventName>` constants from all units.
///
/// Constants whose name is exactly the prefix carry no event name and are
/// silently ignored.
fn collect_minor_versions(sources: &[SourceUnit]) -> BTreeMap<String, String> {
    let mut versions = BTreeMap::new();
    for unit in sources {
        for constant in &unit.constants {
            if let Some(event_name) = constant.name.strip_prefix("minorVersion") {
                if !event_name.is_empty() {
                    versions.insert(event_name.to_string(), constant.value.clone());
                }
            }
        }
    }
    versions
}

/// Build the dependency index over every non-event record in all units.
///
/// Event records are excluded: an event type cannot be a dependency of
/// another record.
fn build_dependency_index(
    sources: &[SourceUnit],
    minor_versions: &BTreeMap<String, String>,
) -> Result<BTreeMap<String, DepEntry>> {
    let mut index = BTreeMap::new();
    for unit in sources {
        for record in &unit.records {
            if classify(&record.name, minor_versions) != RecordKind::Dependency {
                continue;
            }
            let (avro_record, deps) = build_record(record)?;
            index.insert(
                record.name.clone(),
                DepEntry {
                    record: avro_record,
                    deps,
                },
            );
        }
    }
    Ok(index)
}

/// Build an Avro record from a declared record, returning the names of the
/// non-primitive types its fields reference, deduplicated in first-seen
/// field order.
fn build_record(record: &DeclaredRecord) -> Result<(Record, Vec<String>)> {
    let mut fields = Vec::with_capacity(record.fields.len());
    let mut referenced: Vec<String> = Vec::new();

    for declared in &record.fields {
        let mut field_type = map_type(&declared.type_expr).map_err(|e| match e {
            Error::UnsupportedType(type_name) => Error::UnmappableField {
                record: record.name.clone(),
                field: declared.name.clone(),
                type_name,
            },
            other => other,
        })?;
        if declared.optional {
            field_type = field_type.nullable();
        }

        if let Some(name) = field_type.referenced_name() {
            if !referenced.iter().any(|seen| seen == name) {
                referenced.push(name.to_string());
            }
        }

        fields.push(
            Field::new(&declared.name, field_type).with_doc(declared.comments.join(", ")),
        );
    }

    let avro_record = Record::new(&record.name, record.comments.join(", "), fields);
    Ok((avro_record, referenced))
}

// ── Event protocol assembly ────────────────────────────────────────────

/// Assemble the complete protocol document for one event record.
///
/// The record list is `[dependencies…, payload, envelope, Auth]` where
/// dependencies appear in the order their names are first encountered in
/// the event's own fields. Only the event's direct fields are inspected;
/// dependencies of dependencies are not pulled in transitively.
fn assemble_protocol(
    event: &DeclaredRecord,
    index: &BTreeMap<String, DepEntry>,
    namespace: &str,
    minor_version: &str,
) -> Result<Protocol> {
    let (mut payload, referenced) = build_record(event)?;
    payload.name = payload_name(&event.name);

    let mut types: Vec<Record> = referenced
        .iter()
        .filter_map(|name| index.get(name))
        .map(|entry| entry.record.clone())
        .collect();
    types.push(payload);
    types.push(envelope_record(&event.name, minor_version));
    types.push(AUTH_RECORD.clone());

    Ok(Protocol {
        namespace: namespace.to_string(),
        protocol: event.name.clone(),
        types,
        doc: event.comments.join(", "),
    })
}

/// The fixed event envelope: metadata fields plus a reference to the
/// payload record.
fn envelope_record(event_name: &str, minor_version: &str) -> Record {
    Record::new(
        event_name,
        "",
        vec![
            Field::new("event_id", AvroType::name("string")),
            Field::new("request_id", AvroType::name("string")),
            Field::new("event_ts", AvroType::name("long")),
            Field::new("type", AvroType::name("string")),
            Field::new("minor_version", AvroType::name("string"))
                .with_doc(format!("minorVersion={minor_version}")),
            Field::new("auth", AvroType::name("Auth").nullable()),
            Field::new("payload", AvroType::name(payload_name(event_name))),
        ],
    )
}

fn payload_name(event_name: &str) -> String {
    format!("Payload{event_name}")
}
