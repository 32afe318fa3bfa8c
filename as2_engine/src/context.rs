//! The engine's runtime handle: configuration, store handles and logging threaded explicitly
//! through every entry point rather than reached for as global state, constructed once at
//! startup.
//!
//! Every outbound/inbound/MDN/coordinator entry point takes `&EngineContext` rather than
//! reaching for global state, so the same functions run unmodified against a `MemoryStore` in
//! tests and a production store in `as2_server`.

use as2_profile::ProfileStore;
use as2_store::{ArtifactStore, Store};

use std::{sync::Arc, time::Duration};

/// Recognised settings: `ASYNCMDNWAIT`, `MAXRETRIES`, plus the advertised
/// receive endpoint used to build outbound headers and the async-MDN delivery option.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    pub as2_version:        String,
    /// Advertised in an outbound request's `recipient-address` header and as the async MDN
    /// `receipt-delivery-option` target.
    pub receive_url:        String,
    /// `MDNURL`: where this process asks partners to deliver asynchronous MDNs.
    pub mdn_url:            String,
    /// `ASYNCMDNWAIT`: wall-clock threshold after which a pending outbound Message
    /// awaiting an async MDN is failed.
    pub async_mdn_wait:     Duration,
    /// `MAXRETRIES`: bound on MDN delivery and Message-send retries.
    pub max_retries:        u32,
    pub user_agent:         String,
    /// Hostname used when minting an MDN's Message-ID.
    pub local_host:         String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            as2_version:    "1.1".to_string(),
            receive_url:    String::new(),
            mdn_url:        String::new(),
            async_mdn_wait: Duration::from_secs(60 * 60 * 24),
            max_retries:    5,
            user_agent:     "as2rs".to_string(),
            local_host:     "as2rs.local".to_string(),
        }
    }
}

/// The handle threaded through the Outbound Builder, Inbound Processor, MDN Engine and
/// Retry/Async Coordinator.
pub struct EngineContext {
    pub store:      Arc<dyn Store>,
    pub profiles:   Arc<dyn ProfileStore>,
    /// Payload/MDN/raw byte sinks; rooted already, so callers pass store-relative
    /// paths (`as2_store::keys::*_rel`) rather than repeating the root.
    pub artifacts:  Arc<dyn ArtifactStore>,
    pub config:     EngineConfig,
}

impl EngineContext {
    pub fn new(
        store:      Arc<dyn Store>,
        profiles:   Arc<dyn ProfileStore>,
        artifacts:  Arc<dyn ArtifactStore>,
        config:     EngineConfig,
    )
        -> Self
    {
        Self { store, profiles, artifacts, config }
    }
}
