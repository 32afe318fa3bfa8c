//! Retry/Async Coordinator: a periodic tick invoked by the server binary's interval timer.
//! Everything here is synchronous and blocking by design; the async wrapper lives in
//! `as2_server`, not here.

use crate::{context::EngineContext, mdn::{self, HttpSender}};

use as2_core::prelude::*;
use as2_mime::header::Headers;
use as2_store::{keys, model::MessageStatus};

use std::time::SystemTime;

/// Summary of one coordinator tick, logged by the caller.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TickReport {
    pub mdns_sent:          u32,
    pub mdns_failed:        u32,
    pub messages_timed_out: u32,
    pub messages_retried:   u32,
    pub messages_failed:    u32,
}

/// Step 1: attempt delivery of every MDN with `status=P`, bounded by `max_retries`.
fn drain_pending_mdns(ctx: &EngineContext, sender: &dyn HttpSender, report: &mut TickReport) -> Outcome<()> {
    for pending in res!(ctx.store.pending_mdns()) {
        match mdn::send_one(ctx, sender, pending) {
            Ok(()) => report.mdns_sent += 1,
            Err(_) => report.mdns_failed += 1,
        }
    }
    Ok(())
}

/// Step 2: age out outbound Messages that have waited longer than
/// `async_mdn_wait` for an asynchronous MDN that never arrived.
fn expire_overdue_async_waits(ctx: &EngineContext, report: &mut TickReport) -> Outcome<()> {
    let now = SystemTime::now();
    for mut message in res!(ctx.store.pending_outbound_async()) {
        let waited = match now.duration_since(message.timestamp) {
            Ok(d) => d,
            Err(_) => continue,
        };
        if waited > ctx.config.async_mdn_wait {
            message.fail(
                "async-mdn-timeout",
                "Failed to receive asynchronous MDN within the threshold limit.",
            );
            res!(ctx.store.update_message(message));
            report.messages_timed_out += 1;
        }
    }
    Ok(())
}

/// Re-attempt delivery of each outbound Message with `status=R`, using
/// the raw wire bytes this process sent the first time — stored under the `"sent"` artifact
/// namespace the same way the inbound pipeline stores received bytes under `"received"`.
fn retry_failed_sends(ctx: &EngineContext, sender: &dyn HttpSender, report: &mut TickReport) -> Outcome<()> {
    for mut message in res!(ctx.store.retryable_messages()) {
        let body_path = keys::payload_store_rel("sent", &message.message_id);
        let body = match ctx.artifacts.read("", &body_path) {
            Ok(b) => b,
            Err(_) => {
                message.fail("unexpected-processing-error", "No stored outbound artifact to retry.");
                res!(ctx.store.update_message(message));
                report.messages_failed += 1;
                continue;
            },
        };
        let wire_headers = match Headers::parse_block(&message.headers) {
            Ok(h) => h,
            Err(_) => Headers::new(),
        };
        let partner = res!(ctx.profiles.find_partner(&message.partner));
        let url = match partner.map(|p| p.url) {
            Some(u) => u,
            None => {
                message.fail("unknown-trading-partner", "Partner no longer resolves to a URL.");
                res!(ctx.store.update_message(message));
                report.messages_failed += 1;
                continue;
            },
        };

        match sender.post(&url, &wire_headers, &body) {
            Ok((response_headers, response_body)) => {
                message.retries += 1;
                if response_body.is_empty() {
                    message.status = if message.mdn_mode.is_some() {
                        MessageStatus::PendingAsyncMdn
                    } else {
                        MessageStatus::Success
                    };
                    res!(ctx.store.update_message(message));
                } else {
                    res!(ctx.store.update_message(message));
                    let _ = mdn::parse(ctx, &response_headers, &response_body);
                }
                report.messages_retried += 1;
            },
            Err(_) => {
                message.retries += 1;
                if message.retries > ctx.config.max_retries {
                    message.fail("unexpected-processing-error", "Exceeded max_retries attempting outbound delivery.");
                    report.messages_failed += 1;
                } else {
                    message.status = MessageStatus::Retry;
                }
                res!(ctx.store.update_message(message));
            },
        }
    }
    Ok(())
}

/// Run one coordinator tick: MDN delivery, async timeout sweep, and send retries, in that order
/// (MDN delivery and async timeout are one step pair; general retry is separate but
/// shares the tick so both run on the same interval).
pub fn tick(ctx: &EngineContext, sender: &dyn HttpSender) -> Outcome<TickReport> {
    let mut report = TickReport::default();
    res!(drain_pending_mdns(ctx, sender, &mut report));
    res!(expire_overdue_async_waits(ctx, &mut report));
    res!(retry_failed_sends(ctx, sender, &mut report));
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::EngineConfig;
    use as2_profile::{MemoryProfileStore, Organization, Partner};
    use as2_store::{model::{Direction, Message}, MemoryArtifactStore, MemoryStore};
    use std::{sync::Arc, time::Duration};

    struct AlwaysFails;
    impl HttpSender for AlwaysFails {
        fn post(&self, _url: &str, _headers: &Headers, _body: &[u8]) -> Outcome<(Headers, Vec<u8>)> {
            Err(err!(errmsg!("connection refused"), IO, Network))
        }
    }

    struct AlwaysSucceedsEmpty;
    impl HttpSender for AlwaysSucceedsEmpty {
        fn post(&self, _url: &str, _headers: &Headers, _body: &[u8]) -> Outcome<(Headers, Vec<u8>)> {
            Ok((Headers::new(), Vec::new()))
        }
    }

    fn ctx() -> EngineContext {
        EngineContext::new(
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryProfileStore::new()),
            Arc::new(MemoryArtifactStore::new()),
            EngineConfig::default(),
        )
    }

    #[test]
    fn async_wait_past_threshold_is_marked_failed() -> Outcome<()> {
        let ctx = ctx();
        let mut config = ctx.config.clone();
        config.async_mdn_wait = Duration::from_secs(1);
        let ctx = EngineContext::new(ctx.store, ctx.profiles, ctx.artifacts, config);

        let mut message = Message::new(
            "late-1", Direction::Out, "AcmeOrg", "BigCo", "AcmeOrg", "BigCo",
            SystemTime::now() - Duration::from_secs(10),
        );
        message.status = MessageStatus::PendingAsyncMdn;
        res!(ctx.store.create_message(message));

        let report = res!(tick(&ctx, &AlwaysFails));
        assert_eq!(report.messages_timed_out, 1);
        let updated = res!(ctx.store.find_by_message_id("late-1")).unwrap();
        assert_eq!(updated.status, MessageStatus::Error);
        Ok(())
    }

    #[test]
    fn retry_exceeding_max_retries_marks_error() -> Outcome<()> {
        let ctx = ctx();
        let mut config = ctx.config.clone();
        config.max_retries = 0;
        let profile_store = MemoryProfileStore::new();
        profile_store.add_partner(Partner::new("BigCo", "https://bigco.example/as2"));
        let ctx = EngineContext::new(ctx.store, Arc::new(profile_store), ctx.artifacts, config);

        let mut message = Message::new("retry-1", Direction::Out, "AcmeOrg", "BigCo", "AcmeOrg", "BigCo", SystemTime::now());
        message.status = MessageStatus::Retry;
        res!(ctx.store.create_message(message));
        res!(ctx.artifacts.write("", &keys::payload_store_rel("sent", "retry-1"), b"wire-bytes", true));

        let report = res!(tick(&ctx, &AlwaysFails));
        assert_eq!(report.messages_failed, 1);
        let updated = res!(ctx.store.find_by_message_id("retry-1")).unwrap();
        assert_eq!(updated.status, MessageStatus::Error);
        Ok(())
    }

    #[test]
    fn retry_succeeding_with_empty_response_and_no_mdn_marks_success() -> Outcome<()> {
        let ctx = ctx();
        let profile_store = MemoryProfileStore::new();
        profile_store.add_partner(Partner::new("BigCo", "https://bigco.example/as2"));
        let ctx = EngineContext::new(ctx.store, Arc::new(profile_store), ctx.artifacts, ctx.config);

        let mut message = Message::new("retry-ok-1", Direction::Out, "AcmeOrg", "BigCo", "AcmeOrg", "BigCo", SystemTime::now());
        message.status = MessageStatus::Retry;
        res!(ctx.store.create_message(message));
        res!(ctx.artifacts.write("", &keys::payload_store_rel("sent", "retry-ok-1"), b"wire-bytes", true));

        let report = res!(tick(&ctx, &AlwaysSucceedsEmpty));
        assert_eq!(report.messages_retried, 1);
        let updated = res!(ctx.store.find_by_message_id("retry-ok-1")).unwrap();
        assert_eq!(updated.status, MessageStatus::Success);
        Ok(())
    }
}
