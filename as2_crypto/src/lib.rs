//! CMS sign/verify, encrypt/decrypt, zlib compression and MIC hashing for AS2 messages.
//!
//! Certificates arrive pre-provisioned (no certificate issuance); this crate only
//! loads and uses them.
#![forbid(unsafe_code)]

pub mod compress;
pub mod envelope;
pub mod keys;
pub mod mic;
pub mod scheme;
pub mod sign;

pub use keys::Certificate;
pub use scheme::{DigestAlg, EncryptionAlg};
