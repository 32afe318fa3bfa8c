//! MIME codec for AS2 messages.
//!
//! Parses and emits multipart bodies, canonicalises content per RFC 1848, and — the part that
//! matters for interoperability — extracts the raw bytes of a signed part exactly as they
//! appeared on the wire rather than from a re-serialised parse tree.
#![forbid(unsafe_code)]

pub mod canon;
pub mod content_type;
pub mod header;
pub mod multipart;
pub mod part;

pub use content_type::ContentType;
pub use header::Headers;
pub use multipart::{
    extract_signed_and_signature, extract_signed_parts, parse_bytes, parse_part,
    serialise_multipart, serialise_raw_parts, split_multipart, RawPart,
};
pub use part::MimePart;
