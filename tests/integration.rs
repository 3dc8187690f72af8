//! End-to-end integration tests for avro-event-gen.
//!
//! These tests drive the complete pipeline — declaration loading →
//! generation → .avpr writing — with small in-code and on-disk inputs.

use avro_event_gen::codegen;
use avro_event_gen::source::{
    load_sources, DeclaredConstant, DeclaredField, DeclaredRecord, SourceUnit, TypeExpr,
};
use serde_json::json;

fn field(name: &str, type_expr: TypeExpr) -> DeclaredField {
    DeclaredField {
        name: name.to_string(),
        comments: vec![],
        type_expr,
        optional: false,
    }
}

fn record(name: &str, fields: Vec<DeclaredField>) -> DeclaredRecord {
    DeclaredRecord {
        name: name.to_string(),
        comments: vec![],
        fields,
    }
}

fn primitive(name: &str) -> TypeExpr {
    TypeExpr::Primitive {
        name: name.to_string(),
    }
}

fn custom(name: &str) -> TypeExpr {
    TypeExpr::Custom {
        name: name.to_string(),
    }
}

/// The reference scenario: one dependency record, one event referencing it
/// plus an optional pointer to an undeclared type, and a minor-version
/// constant for the event.
fn reference_sources() -> Vec<SourceUnit> {
    vec![SourceUnit {
        records: vec![
            record("Dep", vec![field("str", primitive("string"))]),
            record(
                "OrderV1",
                vec![
                    field("dep", custom("Dep")),
                    field(
                        "optional",
                        TypeExpr::Pointer {
                            inner: Box::new(custom("Other")),
                        },
                    ),
                ],
            ),
        ],
        constants: vec![DeclaredConstant {
            name: "minorVersionOrderV1".to_string(),
            value: "1".to_string(),
        }],
    }]
}

#[test]
fn end_to_end_reference_scenario() {
    let protocols = codegen::generate(&reference_sources(), "events.test").unwrap();
    assert_eq!(protocols.len(), 1);

    let protocol = serde_json::to_value(&protocols["OrderV1"]).unwrap();
    assert_eq!(
        protocol,
        json!({
            "namespace": "events.test",
            "protocol": "OrderV1",
            "types": [
                {
                    "type": "record",
                    "name": "Dep",
                    "fields": [{"name": "str", "type": "string"}]
                },
                {
                    "type": "record",
                    "name": "PayloadOrderV1",
                    "fields": [
                        {"name": "dep", "type": "Dep"},
                        {"name": "optional", "type": ["null", "Other"]}
                    ]
                },
                {
                    "type": "record",
                    "name": "OrderV1",
                    "fields": [
                        {"name": "event_id", "type": "string"},
                        {"name": "request_id", "type": "string"},
                        {"name": "event_ts", "type": "long"},
                        {"name": "type", "type": "string"},
                        {"name": "minor_version", "doc": "minorVersion=1", "type": "string"},
                        {"name": "auth", "type": ["null", "Auth"]},
                        {"name": "payload", "type": "PayloadOrderV1"}
                    ]
                },
                {
                    "type": "record",
                    "name": "Auth",
                    "fields": [
                        {"name": "session_id", "type": ["null", "string"]},
                        {"name": "user_id", "type": ["null", "string"]},
                        {"name": "app_id", "type": ["null", "string"]},
                        {"name": "app_version", "type": ["null", "string"]}
                    ]
                }
            ]
        })
    );
}

#[test]
fn protocol_record_list_ends_with_payload_envelope_auth() {
    let sources = vec![SourceUnit {
        records: vec![
            record("Shared", vec![field("n", primitive("int"))]),
            record("FirstV1", vec![field("s", custom("Shared"))]),
            record("SecondV3", vec![field("n", primitive("int64"))]),
        ],
        constants: vec![],
    }];
    let protocols = codegen::generate(&sources, "events.test").unwrap();
    assert_eq!(protocols.len(), 2);

    for (name, protocol) in &protocols {
        let total = protocol.types.len();
        assert!(total >= 3, "protocol {name} too short");
        assert_eq!(protocol.types[total - 3].name, format!("Payload{name}"));
        assert_eq!(&protocol.types[total - 2].name, name);
        assert_eq!(protocol.types[total - 1].name, "Auth");
    }
}

#[test]
fn missing_minor_version_defaults_to_empty() {
    let sources = vec![SourceUnit {
        records: vec![record("PingV1", vec![field("n", primitive("int"))])],
        constants: vec![],
    }];
    let protocols = codegen::generate(&sources, "events.test").unwrap();
    let envelope = &protocols["PingV1"].types[1];
    assert_eq!(envelope.fields[4].doc, "minorVersion=");
}

#[test]
fn deterministic_generation_and_output() {
    let dir_a = tempdir();
    let dir_b = tempdir();

    for dir in [&dir_a, &dir_b] {
        let protocols = codegen::generate(&reference_sources(), "events.test").unwrap();
        let stats = codegen::write_protocols(&protocols, dir).unwrap();
        assert_eq!(stats.protocols_written, 1);
    }

    let file_a = std::fs::read_to_string(dir_a.join("OrderV1.avpr")).unwrap();
    let file_b = std::fs::read_to_string(dir_b.join("OrderV1.avpr")).unwrap();
    assert_eq!(file_a, file_b);
    assert!(file_a.ends_with('\n'));

    // The written document must parse back to the generated protocol.
    let parsed: serde_json::Value = serde_json::from_str(&file_a).unwrap();
    assert_eq!(parsed["protocol"], "OrderV1");
    assert_eq!(parsed["namespace"], "events.test");
}

#[test]
fn unmappable_type_fails_run_and_writes_nothing() {
    let out_dir = tempdir();
    let sources = vec![SourceUnit {
        records: vec![
            record("GoodV1", vec![field("n", primitive("int"))]),
            record("BadV1", vec![field("ch", primitive("chan"))]),
        ],
        constants: vec![],
    }];

    // The driver aborts before any protocol is written.
    let result =
        codegen::generate(&sources, "events.test").and_then(|p| codegen::write_protocols(&p, &out_dir));
    let err = result.unwrap_err();
    assert!(err.to_string().contains("BadV1"));
    assert!(err.to_string().contains("chan"));

    let written = std::fs::read_dir(&out_dir).unwrap().count();
    assert_eq!(written, 0);
}

#[test]
fn pipeline_from_declaration_files_on_disk() {
    let input_dir = tempdir();
    let output_dir = tempdir();

    std::fs::write(
        input_dir.join("events.json"),
        json!({
            "records": [
                {
                    "name": "SignupV1",
                    "comments": ["User signed up."],
                    "fields": [
                        {"name": "user_id", "type": {"kind": "custom", "name": "ID"}},
                        {"name": "created_at", "type": {"kind": "custom", "name": "Time"}},
                        {
                            "name": "referrer",
                            "type": {"kind": "primitive", "name": "string"},
                            "optional": true
                        }
                    ]
                }
            ],
            "constants": [{"name": "minorVersionSignupV1", "value": "2"}]
        })
        .to_string(),
    )
    .unwrap();

    let sources = load_sources(&input_dir, None, None).unwrap();
    let protocols = codegen::generate(&sources, "events.example.net").unwrap();
    codegen::write_protocols(&protocols, &output_dir).unwrap();

    let avpr = std::fs::read_to_string(output_dir.join("SignupV1.avpr")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&avpr).unwrap();

    assert_eq!(parsed["doc"], "User signed up.");
    let payload = &parsed["types"][0];
    assert_eq!(payload["name"], "PayloadSignupV1");
    assert_eq!(payload["fields"][0]["type"], "string"); // ID
    assert_eq!(payload["fields"][1]["type"], "long"); // Time
    assert_eq!(payload["fields"][2]["type"], json!(["null", "string"]));

    let envelope = &parsed["types"][1];
    assert_eq!(envelope["name"], "SignupV1");
    assert_eq!(envelope["fields"][4]["doc"], "minorVersion=2");
}

// ── Helpers ────────────────────────────────────────────────────────────

fn tempdir() -> std::path::PathBuf {
    use std::sync::atomic::{AtomicU64, Ordering};
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let id = COUNTER.fetch_add(1, Ordering::Relaxed);
    let dir = std::env::temp_dir().join(format!(
        "avro-event-gen-test-{}-{}",
        std::process::id(),
        id
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
