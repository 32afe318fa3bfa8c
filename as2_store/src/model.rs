//! Persisted entities: Organization and Partner live in `as2_profile`; this crate owns the
//! four record types whose lifecycle belongs to a single conversation — Payload, Message, Mdn
//! and Log.

use std::{fmt, time::SystemTime};

/// Which side of the conversation a Message represents.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Direction {
    In,
    Out,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", match self {
            Self::In => "IN",
            Self::Out => "OUT",
        })
    }
}

/// A Message's basic status code. `Ip` (in-process) is never externally visible as
/// completed; `S`/`E`/`W` are terminal, `P` and `R` are both transient and resolved only by the
/// retry/async coordinator.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MessageStatus {
    /// Success.
    Success,
    /// Error (terminal).
    Error,
    /// Warning (terminal; e.g. a MIC mismatch reported on an otherwise-accepted message).
    Warning,
    /// Awaiting an asynchronous MDN.
    PendingAsyncMdn,
    /// Awaiting a retried send.
    Retry,
    /// In process; a transient state a Message should never be observed in once a request
    /// handler returns.
    InProcess,
}

impl MessageStatus {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Success         => "S",
            Self::Error           => "E",
            Self::Warning         => "W",
            Self::PendingAsyncMdn => "P",
            Self::Retry           => "R",
            Self::InProcess       => "IP",
        }
    }

    /// A terminal status is one the coordinator and UI treat as resolved; `P`, `R` and `IP` all
    /// await further action.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Error | Self::Warning)
    }
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// An MDN record's status. Distinct from `MessageStatus`: an MDN tracks its own delivery
/// lifecycle independent of whether the underlying disposition was a success or failure.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MdnStatus {
    /// Sent (synchronously returned, or an async POST that succeeded).
    Sent,
    /// Received (an MDN this process received against its own outbound Message).
    Received,
    /// Waiting to be sent asynchronously.
    Pending,
    /// Delivery failed beyond `max_retries`.
    Error,
}

impl MdnStatus {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Sent     => "S",
            Self::Received => "R",
            Self::Pending  => "P",
            Self::Error    => "E",
        }
    }
}

impl fmt::Display for MdnStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Which delivery mode an MDN was requested under, as recorded against a Message at send/receive
/// time (mirrors Partner `mdn_mode`). Kept as a small local copy rather than borrowed from a partner
/// profile type, since a Message's record must survive a later change to the partner's live
/// profile unchanged.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MdnMode {
    Sync,
    Async,
}

impl fmt::Display for MdnMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", match self {
            Self::Sync  => "SYNC",
            Self::Async => "ASYNC",
        })
    }
}

/// A Log entry's severity.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LogStatus {
    Success,
    Warning,
    Error,
}

impl LogStatus {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Success => "S",
            Self::Warning => "W",
            Self::Error   => "E",
        }
    }
}

impl fmt::Display for LogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// The opaque business document attached to a Message. The bytes themselves live in the
/// artifact store (`crate::artifact`); this record is the pointer plus enough metadata to
/// re-serve or re-display it.
#[derive(Clone, Debug)]
pub struct Payload {
    pub name:           String,
    pub content_type:   String,
    pub file_path:      String,
}

impl Payload {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, file_path: impl Into<String>) -> Self {
        Self {
            name:           name.into(),
            content_type:   content_type.into(),
            file_path:      file_path.into(),
        }
    }
}

/// A single conversation record. `message_id` is the RFC 5322 Message-ID with angle
/// brackets already stripped. For an inbound Message the *storage* key additionally folds
/// in `as2_to`/`as2_from` (`crate::keys::composite_key`) so the same raw id can recur across
/// different partner pairs without collision, and so a genuine duplicate can be detected.
#[derive(Clone, Debug)]
pub struct Message {
    pub message_id:     String,
    pub direction:      Direction,
    pub status:         MessageStatus,
    /// A short machine-token summarising the outcome (`adv_status`, e.g.
    /// `unknown-trading-partner`), distinct from the human-readable `status_message`.
    pub adv_status:     Option<String>,
    pub status_message: Option<String>,
    pub timestamp:      SystemTime,
    /// The raw header block as received or sent, kept verbatim for diagnostics and MDN building.
    pub headers:        String,
    pub org:            String,
    pub partner:        String,
    pub payload:        Option<Payload>,
    pub compressed:     bool,
    pub encrypted:      bool,
    pub signed:          bool,
    /// `base64(digest) + ", " + alg`, populated iff `signed`.
    pub mic:            Option<String>,
    pub mdn_mode:       Option<MdnMode>,
    pub retries:        u32,
    pub as2_to:         String,
    pub as2_from:       String,
}

impl Message {
    pub fn new(
        message_id: impl Into<String>,
        direction:  Direction,
        org:        impl Into<String>,
        partner:    impl Into<String>,
        as2_to:     impl Into<String>,
        as2_from:   impl Into<String>,
        timestamp:  SystemTime,
    ) -> Self {
        Self {
            message_id:     message_id.into(),
            direction,
            status:         MessageStatus::InProcess,
            adv_status:     None,
            status_message: None,
            timestamp,
            headers:        String::new(),
            org:            org.into(),
            partner:        partner.into(),
            payload:        None,
            compressed:     false,
            encrypted:      false,
            signed:         false,
            mic:            None,
            mdn_mode:       None,
            retries:        0,
            as2_to:         as2_to.into(),
            as2_from:       as2_from.into(),
        }
    }

    /// The composite storage key an inbound Message is uniquely identified by (
    /// `__store/raw/received/<id>#<to>#<from>`).
    pub fn composite_key(&self) -> String {
        crate::keys::composite_key(&self.message_id, &self.as2_to, &self.as2_from)
    }

    pub fn fail(&mut self, adv_status: impl Into<String>, status_message: impl Into<String>) {
        self.status = MessageStatus::Error;
        self.adv_status = Some(adv_status.into());
        self.status_message = Some(status_message.into());
    }

    pub fn succeed(&mut self) {
        self.status = MessageStatus::Success;
    }
}

/// An MDN record; one-to-one with a Message, either as the MDN this process emitted for an
/// inbound Message, or the MDN received against this process's own outbound Message. The
/// relationship is a back-reference by `message_id` only (modelled as two tables: Message owns its MDN, MDN
/// holds a weak back-reference"), not a shared owned pointer, so the two records can be updated
/// independently without a borrow-checker tangle.
#[derive(Clone, Debug)]
pub struct Mdn {
    pub message_id:    String,
    pub file_path:     String,
    pub headers:       String,
    pub status:        MdnStatus,
    pub signed:        bool,
    pub return_url:    Option<String>,
    pub retries:       u32,
}

impl Mdn {
    pub fn new(message_id: impl Into<String>, file_path: impl Into<String>, headers: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
            file_path:  file_path.into(),
            headers:    headers.into(),
            status:     MdnStatus::Sent,
            signed:     false,
            return_url: None,
            retries:    0,
        }
    }
}

/// An append-only log entry attached to a Message.
#[derive(Clone, Debug)]
pub struct LogEntry {
    pub message_id: String,
    pub timestamp:  SystemTime,
    pub status:     LogStatus,
    pub text:       String,
}

impl LogEntry {
    pub fn new(message_id: impl Into<String>, timestamp: SystemTime, status: LogStatus, text: impl Into<String>) -> Self {
        Self { message_id: message_id.into(), timestamp, status, text: text.into() }
    }
}
