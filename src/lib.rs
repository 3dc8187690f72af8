//! Generate Avro protocol definitions from parsed record declarations.
//!
//! `avro-event-gen` reads declaration units produced by an external source
//! parser and generates one deterministic Avro protocol document (`.avpr`)
//! per event type, keeping an event schema registry synchronized with
//! source-level data types without hand-written schema files.
//!
//! # Features
//!
//! - Classifies records by naming convention: names ending in `V<digits>`
//!   are event types, everything else is a dependency type
//! - Wraps each event payload in a fixed envelope record with event
//!   metadata and a shared nullable `Auth` block
//! - Resolves the dependency records an event payload references, in
//!   stable first-seen field order
//! - Records per-event minor versions from `minorVersion*` constants
//! - Deterministic output: byte-identical across runs
//!
//! # Usage
//!
//! ```no_run
//! use std::path::Path;
//!
//! let sources = avro_event_gen::source::load_sources(Path::new("decls/"), None, None)?;
//! let protocols = avro_event_gen::codegen::generate(&sources, "events.example.net")?;
//! let stats = avro_event_gen::codegen::write_protocols(&protocols, Path::new("schemas/"))?;
//! eprintln!("Wrote {} protocols", stats.protocols_written);
//! # Ok::<(), avro_event_gen::error::Error>(())
//! ```

pub mod avro;
pub mod codegen;
pub mod error;
pub mod source;
pub mod type_map;
