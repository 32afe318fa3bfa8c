//! Coordinator coverage distinct from `coordinator.rs`'s own inline tests ("async timeout,
//! retry bound, MDN parse idempotence"): a single tick that must advance several unrelated
//! Messages/MDNs at once, and a retry whose response carries a real synchronous MDN body rather
//! than an empty one.

use as2_engine::{
    context::{EngineConfig, EngineContext},
    coordinator::tick,
    mdn::HttpSender,
};
use as2_mime::header::Headers;
use as2_profile::{MemoryProfileStore, Organization, Partner};
use as2_store::{
    keys,
    model::{Direction, Mdn, MdnStatus, Message, MessageStatus},
    MemoryArtifactStore, MemoryStore,
};

use as2_core::prelude::*;

use std::{sync::Arc, time::{Duration, SystemTime}};

struct AlwaysFails;
impl HttpSender for AlwaysFails {
    fn post(&self, _url: &str, _headers: &Headers, _body: &[u8]) -> Outcome<(Headers, Vec<u8>)> {
        Err(err!(errmsg!("connection refused"), IO, Network))
    }
}

/// Responds to every `post` with a pre-built synchronous MDN body, as a partner's AS2 server
/// would on the HTTP response to a retried POST.
struct RespondsWithMdn {
    headers: Headers,
    body:    Vec<u8>,
}
impl HttpSender for RespondsWithMdn {
    fn post(&self, _url: &str, _headers: &Headers, _body: &[u8]) -> Outcome<(Headers, Vec<u8>)> {
        Ok((self.headers.clone(), self.body.clone()))
    }
}

fn ctx_with_partner(config: EngineConfig) -> (EngineContext, Arc<MemoryProfileStore>) {
    let profile_store = Arc::new(MemoryProfileStore::new());
    profile_store.add_partner(Partner::new("BigCo", "https://bigco.example/as2"));
    let ctx = EngineContext::new(
        Arc::new(MemoryStore::new()),
        profile_store.clone(),
        Arc::new(MemoryArtifactStore::new()),
        config,
    );
    (ctx, profile_store)
}

#[test]
fn single_tick_advances_an_overdue_wait_a_pending_mdn_and_a_retry_together() {
    let mut config = EngineConfig::default();
    config.async_mdn_wait = Duration::from_secs(1);
    let (ctx, _profiles) = ctx_with_partner(config);

    let mut overdue = Message::new(
        "overdue-1", Direction::Out, "AcmeOrg", "BigCo", "AcmeOrg", "BigCo",
        SystemTime::now() - Duration::from_secs(10),
    );
    overdue.status = MessageStatus::PendingAsyncMdn;
    ctx.store.create_message(overdue).expect("create overdue");

    let mut pending_mdn = Mdn::new("mdn-pending-1", "ignored/path", "Content-Type: multipart/report");
    pending_mdn.status = MdnStatus::Pending;
    ctx.store.create_mdn(pending_mdn).expect("create mdn");
    // `send_one` will fail to read the artifact (none written) and count as `mdns_failed` rather
    // than panicking — exercising the failure branch of step 1 alongside the other two steps.

    let mut retry = Message::new("retry-1", Direction::Out, "AcmeOrg", "BigCo", "AcmeOrg", "BigCo", SystemTime::now());
    retry.status = MessageStatus::Retry;
    ctx.store.create_message(retry).expect("create retry");
    ctx.artifacts.write("", &keys::payload_store_rel("sent", "retry-1"), b"wire-bytes", true)
        .expect("write sent artifact");

    let report = tick(&ctx, &AlwaysFails).expect("tick");
    assert_eq!(report.messages_timed_out, 1);
    assert_eq!(report.mdns_failed, 1);
    assert_eq!(report.messages_retried, 1);

    let overdue_after = ctx.store.find_by_message_id("overdue-1").expect("lookup").expect("present");
    assert_eq!(overdue_after.status, MessageStatus::Error);
    let retry_after = ctx.store.find_by_message_id("retry-1").expect("lookup").expect("present");
    assert_eq!(retry_after.status, MessageStatus::Retry, "AlwaysFails keeps it retryable below max_retries");
}

#[test]
fn retry_whose_response_carries_a_synchronous_mdn_is_applied_via_parse() {
    let (ctx, _profiles) = ctx_with_partner(EngineConfig::default());

    let mdn_message_id = "retry-with-mdn-1";
    let mut outbound = Message::new(mdn_message_id, Direction::Out, "AcmeOrg", "BigCo", "AcmeOrg", "BigCo", SystemTime::now());
    outbound.status = MessageStatus::Retry;
    ctx.store.create_message(outbound).expect("create outbound");
    ctx.artifacts.write("", &keys::payload_store_rel("sent", mdn_message_id), b"wire-bytes", true)
        .expect("write sent artifact");

    let org = Organization::new("AcmeOrg");
    let mut original_req = Headers::new();
    original_req.push("disposition-notification-to", "no-reply@acme.example");
    let recipient_message = ctx.store.find_by_message_id(mdn_message_id).expect("lookup").expect("present");
    let built = as2_engine::mdn::build(&ctx, &org, &original_req, &recipient_message, None)
        .expect("build mdn").expect("sync mdn body");

    let sender = RespondsWithMdn { headers: built.headers, body: built.body };
    let report = tick(&ctx, &sender).expect("tick");
    assert_eq!(report.messages_retried, 1);

    let updated = ctx.store.find_by_message_id(mdn_message_id).expect("lookup").expect("present");
    assert_eq!(updated.status, MessageStatus::Success);
}
