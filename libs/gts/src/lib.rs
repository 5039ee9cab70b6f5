//! # gts-id
//!
//! GTS identifiers: parsing, pattern matching, deterministic UUIDs, and
//! extraction from JSON documents.
//!
//! ## Identifier Format
//!
//! An identifier is `gts.` followed by one or more
//! `vendor.package.namespace.type.vMAJOR[.MINOR]` segments joined by `~`:
//!
//! - Type: every segment ends in `~` (`gts.x.core.events.event.v1~`)
//! - Instance: no trailing `~` (`gts.x.core.events.event.v1~x.app.orders.created.v1.0`)
//! - Pattern: the last segment may stop early or end in `*` (`gts.x.core.*`)
//!
//! Name components match `[_a-z][_a-z0-9]*`; identifiers are at most
//! 1024 characters.
//!
//! ## Design Principles
//!
//! - The canonical string is exactly the parsed input; it is never re-rendered
//! - Parsing is all-or-nothing; matching and extraction never fail on bad input
//! - Every value is immutable and every operation is a pure function
//! - Defaults (property lists, the GTS namespace) are read-only process-wide values

mod error;
pub mod extract;
pub mod guid;
mod id;
pub mod parser;
mod segment;

pub use error::GtsError;
pub use extract::{
    extract_entity, extract_id, extract_id_from_str, extract_id_from_value, extract_references,
    is_valid_gts_id, ExtractOptions, ExtractResult, GtsJsonEntity, GtsReference,
};
pub use id::{GtsId, GtsIdKind};
pub use segment::GtsIdSegment;

/// Re-export uuid for consumers of [`GtsId::to_guid`].
pub use uuid::Uuid;
