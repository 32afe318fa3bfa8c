//! Persistent records for Messages, MDNs, Payloads and Logs, and file-system artifact storage.
//!
//! Records are content-addressed under a root directory (`crate::keys`) and every write lands
//! atomically (`crate::artifact`). `Store` is a plain trait a caller holds behind an `Arc`,
//! suitable for both the in-process reference implementation (`MemoryStore`) and a future
//! database-backed one.

#![forbid(unsafe_code)]

pub mod artifact;
pub mod keys;
pub mod memory;
pub mod model;

pub use artifact::{ArtifactStore, FileArtifactStore, MemoryArtifactStore};
pub use memory::MemoryStore;
pub use model::{Direction, LogEntry, LogStatus, Mdn, MdnMode, MdnStatus, Message, MessageStatus, Payload};

use as2_core::prelude::*;

/// The persistence seam for Messages, MDNs and Logs (a clean implementation threads a
/// `Context` carrying ... store handles ... through every entry point").
///
/// `create_*` is idempotent: calling it twice with the same key overwrites rather than erroring,
/// since the inbound pipeline and the outbound pipeline both persist a record before they know
/// for certain they will not need to revise it moments later (durability is guaranteed before
/// any network response mentions the Message as persisted").
pub trait Store: Send + Sync {
    fn create_message(&self, message: Message) -> Outcome<()>;
    fn update_message(&self, message: Message) -> Outcome<()>;

    /// Lookup by the inbound composite key (used for the duplicate check).
    fn find_by_composite_key(&self, composite_key: &str) -> Outcome<Option<Message>>;

    /// Lookup by the raw, on-wire Message-ID regardless of partner pair — used to resolve an
    /// asynchronous MDN arrival against the outbound Message it responds to (a matching
    /// Message not found -> 404").
    fn find_by_message_id(&self, message_id: &str) -> Outcome<Option<Message>>;

    /// Messages with `status=P, direction=OUT` (async timeout sweep).
    fn pending_outbound_async(&self) -> Outcome<Vec<Message>>;

    /// Messages with `status=R`.
    fn retryable_messages(&self) -> Outcome<Vec<Message>>;

    fn create_mdn(&self, mdn: Mdn) -> Outcome<()>;
    fn update_mdn(&self, mdn: Mdn) -> Outcome<()>;
    fn find_mdn(&self, message_id: &str) -> Outcome<Option<Mdn>>;

    /// MDNs with `status=P` (pending delivery).
    fn pending_mdns(&self) -> Outcome<Vec<Mdn>>;

    fn append_log(&self, entry: LogEntry) -> Outcome<()>;
    fn logs_for(&self, message_id: &str) -> Outcome<Vec<LogEntry>>;
}
