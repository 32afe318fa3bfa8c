//! Inbound Processor.
//!
//! Reverses whatever transformations the partner's outbound builder applied: decrypt, verify,
//! decompress, in that order, each conditional on what the wire content actually is (not blindly
//! on what the partner profile claims — a profile that *requires* encryption is checked, but the
//! pipeline still only decrypts when the content-type says there is something to decrypt).
//! Every terminal failure is classified to one of the `As2Fault` kinds and still produces a
//! persisted Message record — "never discarded" — so the duplicate check and any
//! MDN built against the outcome have something to refer to.

use crate::{context::EngineContext, error::As2Fault, headers as hdr, hooks};

use as2_core::prelude::*;
use as2_crypto::{compress, envelope, mic as mic_mod, scheme::DigestAlg, sign};
use as2_mime::{self, header::Headers, multipart, part::MimePart};
use as2_profile::escape;
use as2_store::{
    keys,
    model::{Direction, LogEntry, LogStatus, Mdn, MdnMode as StoreMdnMode, Message, Payload},
};

use std::time::SystemTime;

/// The result of running a received wire message through the inbound pipeline.
pub struct InboundOutcome {
    /// The persisted Message record, already written to the store.
    pub message:        Message,
    /// `Some` iff the pipeline terminated with one of the classified fault kinds.
    pub fault:          Option<As2Fault>,
    /// The recovered business-document bytes, present only on full success.
    pub payload_bytes:  Option<Vec<u8>>,
    /// Whether the sender's headers asked for a disposition notification at all (
    /// "If no `disposition-notification-to` header ... no MDN").
    pub mdn_requested:  bool,
}

fn identity_headers(headers: &Headers) -> Outcome<(String, String, String)> {
    let as2_from_wire = match headers.get("AS2-From") {
        Some(v) => v,
        None => return Err(err!(errmsg!("Request is missing the AS2-From header."), Missing, Input)),
    };
    let as2_to_wire = match headers.get("AS2-To") {
        Some(v) => v,
        None => return Err(err!(errmsg!("Request is missing the AS2-To header."), Missing, Input)),
    };
    let message_id_wire = match headers.get("Message-ID") {
        Some(v) => v,
        None => return Err(err!(errmsg!("Request is missing the Message-ID header."), Missing, Input)),
    };
    Ok((
        escape::unescape(as2_from_wire),
        escape::unescape(as2_to_wire),
        hdr::unwrap_message_id(message_id_wire),
    ))
}

/// Process one received AS2 wire message: `headers` is the set of HTTP/AS2 headers the request
/// carried; `body` is the request body, i.e. the outermost MIME part's bytes (its own
/// `Content-Type` etc. travel as entries of `headers`, the same convention the outbound builder
/// uses when assembling the wire headers).
pub fn process_inbound(ctx: &EngineContext, headers: &Headers, body: &[u8]) -> Outcome<InboundOutcome> {
    let (as2_from, as2_to, message_id) = res!(identity_headers(headers));
    let now = SystemTime::now();
    let header_block = headers.to_block("\n");
    let mdn_requested = headers.contains("disposition-notification-to");

    let partner = res!(ctx.profiles.find_partner(&as2_from));
    let org = res!(ctx.profiles.find_organization(&as2_to));

    let (partner, org) = match (partner, org) {
        (Some(p), Some(o)) => (p, o),
        _ => {
            let fault = As2Fault::PartnerNotFound;
            let mut message = Message::new(message_id, Direction::In, &as2_to, &as2_from, &as2_to, &as2_from, now);
            message.headers = header_block;
            message.fail(fault.adv_status(), fault.status_message());
            res!(ctx.store.create_message(message.clone()));
            res!(log_outcome(ctx, &message, &fault.status_message()));
            return Ok(InboundOutcome { message, fault: Some(fault), payload_bytes: None, mdn_requested });
        },
    };

    let composite_key = keys::composite_key(&message_id, &as2_to, &as2_from);
    if res!(ctx.store.find_by_composite_key(&composite_key)).is_some() {
        let fault = As2Fault::DuplicateDocument;
        let date_suffix = headers.get("Date").unwrap_or("unknown-date");
        let suffixed_id = fmt!("{}.{}", message_id, date_suffix.chars().filter(|c| c.is_ascii_alphanumeric()).collect::<String>());
        let mut message = Message::new(
            suffixed_id, Direction::In, &org.as2_name, &partner.as2_name, &as2_to, &as2_from, now,
        );
        message.headers = header_block;
        message.fail(fault.adv_status(), fault.status_message());
        res!(ctx.store.create_message(message.clone()));
        res!(log_outcome(ctx, &message, &fault.status_message()));
        return Ok(InboundOutcome { message, fault: Some(fault), payload_bytes: None, mdn_requested });
    }

    let mut message = Message::new(
        &message_id, Direction::In, &org.as2_name, &partner.as2_name, &as2_to, &as2_from, now,
    );
    message.headers = header_block;
    message.mdn_mode = if headers.contains("receipt-delivery-option") {
        Some(StoreMdnMode::Async)
    } else if mdn_requested {
        Some(StoreMdnMode::Sync)
    } else {
        None
    };

    res!(ctx.artifacts.write(
        "", &keys::raw_received_rel(&message_id, &as2_to, &as2_from), body, true,
    ));

    match run_pipeline(ctx, &partner, &org, headers, body) {
        Ok(mut outcome) => {
            message.compressed = outcome.compressed;
            message.encrypted = outcome.encrypted;
            message.signed = outcome.signed;
            message.mic = outcome.mic.take();

            let filename = if partner.keep_filename {
                outcome.part.content_disposition_filename().unwrap_or_else(|| fmt!("{}.msg", message_id))
            } else {
                fmt!("{}.msg", message_id)
            };

            // Every step that ran the part through `canonicalise` (compress/sign/encrypt, each
            // keyed off the same `current_bytes` helper on the outbound side) leaves a trailing
            // CRLF that is not part of the original document; strip the one RFC 1848 added back
            // off before this reaches disk. A message that never touched canonicalisation carries
            // its original bytes untouched.
            let recovered = if outcome.compressed || outcome.encrypted || outcome.signed {
                strip_trailing_crlf(&outcome.part.body)
            } else {
                outcome.part.body.clone()
            };

            res!(ctx.artifacts.write(
                "", &keys::payload_store_rel("received", &message_id), &recovered, true,
            ));
            res!(ctx.artifacts.write(
                "", &keys::inbox_rel(&org.as2_name, &partner.as2_name, &filename), &recovered, true,
            ));
            message.payload = Some(Payload::new(
                filename,
                outcome.part.content_type().map(|ct| ct.full_type()).unwrap_or_default(),
                keys::payload_store_rel("received", &message_id),
            ));
            message.succeed();
            res!(ctx.store.create_message(message.clone()));
            res!(log_outcome(ctx, &message, "message received and processed"));
            hooks::run(
                partner.post_receive_command.clone(),
                message.clone(),
                keys::inbox_rel(&org.as2_name, &partner.as2_name, &filename),
            );
            Ok(InboundOutcome {
                message,
                fault: None,
                payload_bytes: Some(recovered),
                mdn_requested,
            })
        },
        Err((fault, status_message)) => {
            message.fail(fault.adv_status(), &status_message);
            res!(ctx.store.create_message(message.clone()));
            res!(log_outcome(ctx, &message, &status_message));
            Ok(InboundOutcome { message, fault: Some(fault), payload_bytes: None, mdn_requested })
        },
    }
}

/// Undo the single trailing CRLF `as2_mime::canon::canonicalise` appends; a no-op if the bytes
/// don't end in one (e.g. the original document already ended with its own blank line).
fn strip_trailing_crlf(bytes: &[u8]) -> Vec<u8> {
    match bytes.strip_suffix(b"\r\n") {
        Some(stripped) => stripped.to_vec(),
        None => bytes.to_vec(),
    }
}

fn log_outcome(ctx: &EngineContext, message: &Message, text: &str) -> Outcome<()> {
    let status = match message.status {
        as2_store::model::MessageStatus::Success => LogStatus::Success,
        as2_store::model::MessageStatus::Warning => LogStatus::Warning,
        _ => LogStatus::Error,
    };
    ctx.store.append_log(LogEntry::new(message.message_id.clone(), SystemTime::now(), status, text.to_string()))
}

struct PipelineOutcome {
    part:       MimePart,
    compressed: bool,
    encrypted:  bool,
    signed:     bool,
    mic:        Option<String>,
}

type PipelineFault = (As2Fault, String);

/// Decrypt, verify, decompress, extract. Returns a typed fault rather than
/// `Outcome` so callers never mistake an ordinary `UnsupportedAlgorithm`/I-O slip for one of the
/// seven classified kinds required on the persisted Message.
fn run_pipeline(
    ctx:        &EngineContext,
    partner:    &as2_profile::Partner,
    org:        &as2_profile::Organization,
    headers:    &Headers,
    body:       &[u8],
)
    -> std::result::Result<PipelineOutcome, PipelineFault>
{
    let _ = ctx;
    let mut part_headers = Headers::new();
    if let Some(ct) = headers.get("Content-Type") {
        part_headers.push("Content-Type", ct);
    }
    if let Some(cte) = headers.get("Content-Transfer-Encoding") {
        part_headers.push("Content-Transfer-Encoding", cte);
    }
    if let Some(cd) = headers.get("Content-Disposition") {
        part_headers.push("Content-Disposition", cd);
    }
    let mut current = MimePart::new(part_headers, body.to_vec());
    let mut compressed = false;
    let mut encrypted = false;
    let mut signed = false;
    let mut mic = None;

    let mut content_type = current.content_type().map_err(|e| (
        As2Fault::UnexpectedError, fmt!("Could not parse the message's Content-Type: {}", e),
    ))?;

    // Step 3-4: encryption.
    let is_enveloped = content_type.is("application", "pkcs7-mime")
        && content_type.smime_type() == Some("enveloped-data");
    if partner.contract.is_encrypted() && !is_enveloped {
        return Err((As2Fault::InsufficientSecurity,
            "The partner profile requires encryption but the message was not enveloped.".to_string()));
    }
    if is_enveloped {
        let recipient = match &org.decrypt_cert {
            Some(cert) => cert,
            None => return Err((As2Fault::DecryptionFailed,
                "This organization has no decryption certificate configured.".to_string())),
        };
        let der = mic_mod::normalise_der(&current.body).map_err(|e| (
            As2Fault::DecryptionFailed, fmt!("{}", e),
        ))?;
        let cleartext = envelope::decrypt(&der, recipient).map_err(|e| (
            As2Fault::DecryptionFailed, fmt!("{}", e),
        ))?;
        current = as2_mime::parse_bytes(&cleartext).map_err(|e| (
            As2Fault::DecryptionFailed, fmt!("Decrypted content was not a valid MIME part: {}", e),
        ))?;
        encrypted = true;
        content_type = current.content_type().map_err(|e| (
            As2Fault::UnexpectedError, fmt!("{}", e),
        ))?;
    }

    // Step 5-6: signature.
    let is_signed_mp = content_type.is("multipart", "signed");
    if partner.contract.is_signed() && !is_signed_mp {
        return Err((As2Fault::InsufficientSecurity,
            "The partner profile requires a signature but the message was not multipart/signed.".to_string()));
    }
    if is_signed_mp {
        let digest_alg = DigestAlg::normalise(content_type.micalg().unwrap_or(""));
        let boundary = match content_type.boundary() {
            Some(b) => b.to_string(),
            None => return Err((As2Fault::InvalidSignature,
                "multipart/signed Content-Type is missing a boundary parameter.".to_string())),
        };
        let (raw_bytes, canon_bytes, sig_bytes) = multipart::extract_signed_parts(&current.body, &boundary)
            .map_err(|e| (As2Fault::InvalidSignature, fmt!("{}", e)))?;
        let verifier = match &partner.contract.signature_cert {
            Some(cert) => cert,
            None => return Err((As2Fault::InvalidSignature,
                "No signature-verification certificate configured for this partner.".to_string())),
        };
        if sign::verify_either(&raw_bytes, &canon_bytes, &sig_bytes, verifier).is_err() {
            return Err((As2Fault::InvalidSignature,
                "Neither raw-bytes nor canonicalised signature verification succeeded.".to_string()));
        }
        mic = Some(mic_mod::mic_with_alg(&canon_bytes, digest_alg).map_err(|e| (
            As2Fault::UnexpectedError, fmt!("{}", e),
        ))?);
        current = as2_mime::parse_bytes(&canon_bytes).map_err(|e| (
            As2Fault::UnexpectedError, fmt!("Signed part was not a valid MIME part: {}", e),
        ))?;
        signed = true;
        content_type = current.content_type().map_err(|e| (
            As2Fault::UnexpectedError, fmt!("{}", e),
        ))?;
    }

    // Step 7: decompression.
    if content_type.is("application", "pkcs7-mime") && content_type.smime_type() == Some("compressed-data") {
        let der = mic_mod::normalise_der(&current.body).map_err(|e| (
            As2Fault::DecompressionFailed, fmt!("{}", e),
        ))?;
        let inflated = compress::decompress(&der).map_err(|e| (
            As2Fault::DecompressionFailed, fmt!("{}", e),
        ))?;
        current = as2_mime::parse_bytes(&inflated).map_err(|e| (
            As2Fault::DecompressionFailed, fmt!("Decompressed content was not a valid MIME part: {}", e),
        ))?;
        compressed = true;
    }

    Ok(PipelineOutcome { part: current, compressed, encrypted, signed, mic })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{context::EngineConfig, outbound};
    use as2_profile::{MemoryProfileStore, Organization, Partner};
    use as2_store::{MemoryArtifactStore, MemoryStore, Store};
    use std::sync::Arc;

    fn ctx() -> (EngineContext, Arc<MemoryProfileStore>) {
        let profiles = Arc::new(MemoryProfileStore::new());
        let ctx = EngineContext::new(
            Arc::new(MemoryStore::new()),
            profiles.clone(),
            Arc::new(MemoryArtifactStore::new()),
            EngineConfig::default(),
        );
        (ctx, profiles)
    }

    #[test]
    fn plain_round_trip_recovers_the_original_payload() -> Outcome<()> {
        let (ctx, profiles) = ctx();
        profiles.add_organization(Organization::new("BigCoOrg"));
        profiles.add_partner(Partner::new("AcmeCorp", "https://example/as2"));

        let out = res!(outbound::build(
            &ctx, &Organization::new("AcmeCorp"), &Partner::new("BigCoOrg", "https://example/as2"),
            b"ISA*payload*", "doc.edi", "msg-rt-1@acme",
        ));
        let inbound = res!(process_inbound(&ctx, &out.headers, &out.body));
        assert!(inbound.fault.is_none());
        assert_eq!(inbound.payload_bytes, Some(b"ISA*payload*".to_vec()));
        Ok(())
    }

    #[test]
    fn unknown_partner_is_persisted_with_error_status() -> Outcome<()> {
        let (ctx, _profiles) = ctx();
        let mut headers = Headers::new();
        headers.push("AS2-From", "Nobody");
        headers.push("AS2-To", "AlsoNobody");
        headers.push("Message-ID", "<abc@x>");
        headers.push("Content-Type", "application/EDI-X12");
        let outcome = res!(process_inbound(&ctx, &headers, b"ISA*x*"));
        assert_eq!(outcome.fault, Some(As2Fault::PartnerNotFound));
        let stored = res!(ctx.store.find_by_composite_key(&keys::composite_key("abc@x", "AlsoNobody", "Nobody")));
        assert!(stored.is_some());
        Ok(())
    }

    #[test]
    fn duplicate_message_id_is_persisted_as_a_new_error_record() -> Outcome<()> {
        let (ctx, profiles) = ctx();
        profiles.add_organization(Organization::new("BigCoOrg"));
        profiles.add_partner(Partner::new("AcmeCorp", "https://example/as2"));
        let out = res!(outbound::build(
            &ctx, &Organization::new("AcmeCorp"), &Partner::new("BigCoOrg", "https://example/as2"),
            b"ISA*payload*", "doc.edi", "msg-dup-1@acme",
        ));
        let first = res!(process_inbound(&ctx, &out.headers, &out.body));
        assert!(first.fault.is_none());
        let second = res!(process_inbound(&ctx, &out.headers, &out.body));
        assert_eq!(second.fault, Some(As2Fault::DuplicateDocument));
        assert_ne!(first.message.message_id, second.message.message_id);
        Ok(())
    }

    #[test]
    fn insufficient_security_when_encryption_required_but_absent() -> Outcome<()> {
        let (ctx, profiles) = ctx();
        profiles.add_organization(Organization::new("BigCoOrg"));
        let mut partner = Partner::new("AcmeCorp", "https://example/as2");
        partner.contract.encryption_alg = Some(as2_crypto::EncryptionAlg::Aes128Cbc);
        profiles.add_partner(partner);

        let out = res!(outbound::build(
            &ctx, &Organization::new("AcmeCorp"), &Partner::new("BigCoOrg", "https://example/as2"),
            b"ISA*payload*", "doc.edi", "msg-sec-1@acme",
        ));
        let outcome = res!(process_inbound(&ctx, &out.headers, &out.body));
        assert_eq!(outcome.fault, Some(As2Fault::InsufficientSecurity));
        Ok(())
    }
}
