//! Outbound submission: build a message, persist it, hand it to an `HttpSender`, and
//! reconcile the response — the orchestration step `outbound::build` alone leaves undone, and
//! the counterpart to `coordinator::retry_failed_sends` re-sending the same stored artifact
//! later.

use crate::{context::EngineContext, hooks, mdn::{self, HttpSender}, outbound};

use as2_core::prelude::*;
use as2_profile::{partner::MdnMode as ContractMdnMode, Organization, Partner};
use as2_store::{
    keys,
    model::{Direction, Message, MdnMode as StoreMdnMode, MessageStatus},
};

use std::time::SystemTime;

/// The result of submitting one outbound message.
pub struct SendOutcome {
    pub message: Message,
}

/// Build, persist, and transmit an outbound AS2 message to `partner` (synchronous HTTP send:
/// blocking HTTP POST"). On a transport failure the Message is left `status=R` for
/// `coordinator::retry_failed_sends` to pick up later, rather than erroring the caller — the
/// send was *attempted*, and retry is the documented recovery path (retries up to
/// `max_retries`").
pub fn submit(
    ctx:            &EngineContext,
    sender:         &dyn HttpSender,
    org:            &Organization,
    partner:        &Partner,
    payload_bytes:  &[u8],
    filename:       &str,
    message_id:     &str,
)
    -> Outcome<SendOutcome>
{
    let mut built = res!(outbound::build(ctx, org, partner, payload_bytes, filename, message_id));
    if let Some((user, pass)) = &partner.basic_auth {
        built.headers.push("Authorization", fmt!("Basic {}", base64::encode(fmt!("{}:{}", user, pass))));
    }

    let mut message = Message::new(
        message_id, Direction::Out, &org.as2_name, &partner.as2_name, &partner.as2_name, &org.as2_name,
        SystemTime::now(),
    );
    message.headers = built.headers.to_block("\n");
    message.compressed = partner.contract.compress;
    message.encrypted = partner.contract.is_encrypted();
    message.signed = partner.contract.is_signed();
    message.mic = built.mic.clone();
    message.mdn_mode = match partner.contract.mdn_mode {
        Some(ContractMdnMode::Async) => Some(StoreMdnMode::Async),
        Some(ContractMdnMode::Sync)  => Some(StoreMdnMode::Sync),
        None => None,
    };
    message.payload = Some(as2_store::model::Payload::new(
        filename, &partner.content_type, keys::payload_store_rel("sent", message_id),
    ));

    res!(ctx.artifacts.write("", &keys::payload_store_rel("sent", message_id), &built.body, true));
    res!(ctx.store.create_message(message.clone()));

    match sender.post(&partner.url, &built.headers, &built.body) {
        Ok((response_headers, response_body)) => {
            if response_body.is_empty() {
                message.status = if message.mdn_mode == Some(StoreMdnMode::Async) {
                    MessageStatus::PendingAsyncMdn
                } else {
                    MessageStatus::Success
                };
                res!(ctx.store.update_message(message.clone()));
            } else {
                res!(ctx.store.update_message(message.clone()));
                let _ = mdn::parse(ctx, &response_headers, &response_body);
                message = match res!(ctx.store.find_by_message_id(message_id)) {
                    Some(m) => m,
                    None => message,
                };
            }
        },
        Err(e) => {
            warn!("Outbound POST to '{}' for message '{}' failed: {}.", partner.url, message_id, e);
            message.status = MessageStatus::Retry;
            res!(ctx.store.update_message(message.clone()));
        },
    }

    hooks::run(partner.post_send_command.clone(), message.clone(), keys::payload_store_rel("sent", message_id));

    Ok(SendOutcome { message })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::EngineConfig;
    use as2_mime::header::Headers;
    use as2_profile::MemoryProfileStore;
    use as2_store::{MemoryArtifactStore, MemoryStore};
    use std::sync::Arc;

    struct Echo;
    impl HttpSender for Echo {
        fn post(&self, _url: &str, _headers: &Headers, _body: &[u8]) -> Outcome<(Headers, Vec<u8>)> {
            Ok((Headers::new(), Vec::new()))
        }
    }

    struct Refused;
    impl HttpSender for Refused {
        fn post(&self, _url: &str, _headers: &Headers, _body: &[u8]) -> Outcome<(Headers, Vec<u8>)> {
            Err(err!(errmsg!("connection refused"), IO, Network))
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
    fn successful_send_with_empty_response_and_no_mdn_is_marked_success() -> Outcome<()> {
        let ctx = ctx();
        let org = Organization::new("AcmeOrg");
        let partner = Partner::new("BigCo", "https://bigco.example/as2");
        let out = res!(submit(&ctx, &Echo, &org, &partner, b"ISA*payload*", "doc.edi", "send-1@acme"));
        assert_eq!(out.message.status, MessageStatus::Success);
        Ok(())
    }

    #[test]
    fn failed_transport_marks_message_retry() -> Outcome<()> {
        let ctx = ctx();
        let org = Organization::new("AcmeOrg");
        let partner = Partner::new("BigCo", "https://bigco.example/as2");
        let out = res!(submit(&ctx, &Refused, &org, &partner, b"ISA*payload*", "doc.edi", "send-2@acme"));
        assert_eq!(out.message.status, MessageStatus::Retry);
        Ok(())
    }

    #[test]
    fn async_mdn_requested_with_empty_response_is_pending() -> Outcome<()> {
        let ctx = ctx();
        let org = Organization::new("AcmeOrg");
        let mut partner = Partner::new("BigCo", "https://bigco.example/as2");
        partner.contract.mdn_requested = true;
        partner.contract.mdn_mode = Some(ContractMdnMode::Async);
        let out = res!(submit(&ctx, &Echo, &org, &partner, b"ISA*payload*", "doc.edi", "send-3@acme"));
        assert_eq!(out.message.status, MessageStatus::PendingAsyncMdn);
        Ok(())
    }
}
