//! The AS2 message engine: outbound build, inbound processing, MDN generation/parsing, and
//! retry/async coordination.
//!
//! Every entry point here takes `&context::EngineContext` rather than reaching for global state,
//! so the same functions run unmodified against an in-process [`as2_store::MemoryStore`]
//! in tests and a production store in a server binary.
#![forbid(unsafe_code)]

pub mod coordinator;
pub mod context;
pub mod error;
pub mod headers;
pub mod hooks;
pub mod inbound;
pub mod mdn;
pub mod notify;
pub mod outbound;
pub mod send;

pub use context::{EngineConfig, EngineContext};
pub use error::As2Fault;
pub use inbound::{process_inbound, InboundOutcome};
pub use outbound::{build, OutboundMessage};
pub use send::{submit, SendOutcome};
