//! MDN Engine: build the disposition notification for an inbound Message, deliver a
//! pending asynchronous one, and parse a response (or async arrival) against an outbound Message.

use crate::{context::EngineContext, error::As2Fault, headers as hdr};

use as2_core::prelude::*;
use as2_crypto::{mic as mic_mod, scheme::DigestAlg, sign};
use as2_mime::{
    canon,
    content_type::ContentType,
    header::Headers,
    multipart::{extract_signed_parts, parse_bytes, parse_part, serialise_multipart, serialise_raw_parts},
    part::MimePart,
};
use as2_profile::{escape, Organization};
use as2_store::{
    keys,
    model::{Mdn, MdnStatus, Message, MessageStatus},
};

use std::{str::FromStr, time::SystemTime};

/// An HTTP transport for the MDN engine and the retry/async coordinator, kept as a trait here
/// since crypto/MIME/store stay synchronous throughout and only a server binary has an actual
/// network stack to offer.
pub trait HttpSender: Send + Sync {
    fn post(&self, url: &str, headers: &Headers, body: &[u8]) -> Outcome<(Headers, Vec<u8>)>;
}

/// A built MDN ready to be returned as the synchronous HTTP response; `None` when the MDN was
/// dispatched asynchronously instead, or when no MDN was requested at all.
pub struct BuiltMdn {
    pub headers: Headers,
    pub body:    Vec<u8>,
}

fn boundary_for(seed: &str, tag: &str) -> String {
    fmt!("----=_Part_{}_{}", tag, seed.chars().filter(|c| c.is_ascii_alphanumeric()).collect::<String>())
}

/// Pull the digest algorithm named in a `disposition-notification-options` value's
/// `signed-receipt-micalg` parameter, e.g. `"signed-receipt-protocol=required, pkcs7-signature;
/// signed-receipt-micalg=optional, sha256"` -> `sha256`.
fn requested_digest_alg(options: &str) -> DigestAlg {
    for segment in options.split(';') {
        if segment.to_lowercase().contains("micalg") {
            if let Some(alg) = segment.rsplit(',').next() {
                return DigestAlg::normalise(alg.trim());
            }
        }
    }
    DigestAlg::Sha1
}

/// Build the MDN for an inbound Message, persisting the MDN record and its artifact
/// bytes. Returns `None` when the sender's request carried no `disposition-notification-to`
/// header (no MDN wanted) or when the MDN was handed off for asynchronous delivery instead of
/// returned synchronously.
pub fn build(
    ctx:                &EngineContext,
    org:                &Organization,
    original_headers:   &Headers,
    message:            &Message,
    fault:              Option<As2Fault>,
)
    -> Outcome<Option<BuiltMdn>>
{
    let mdn_to = match original_headers.get("disposition-notification-to") {
        Some(v) => v,
        None => return Ok(None),
    };
    let _ = mdn_to;

    let wants_signed = original_headers.get("disposition-notification-options")
        .map(|v| v.to_lowercase().contains("pkcs7-signature"))
        .unwrap_or(false);
    let digest_alg = original_headers.get("disposition-notification-options")
        .map(requested_digest_alg)
        .unwrap_or_default();

    let status_text = match fault {
        Some(f) => f.status_message().to_string(),
        None => "Successfully processed".to_string(),
    };
    let confirm_text = org.mdn_confirm_text.replace("{status}", &status_text);

    let mut dispo_lines = Vec::new();
    dispo_lines.push(fmt!("Reporting-UA: {}", ctx.config.user_agent));
    dispo_lines.push(fmt!("Original-Recipient: rfc822; {}", message.as2_to));
    dispo_lines.push(fmt!("Final-Recipient: rfc822; {}", message.as2_to));
    dispo_lines.push(fmt!("Original-Message-ID: {}", hdr::wrap_message_id(&message.message_id)));
    match fault {
        Some(f) => dispo_lines.push(fmt!(
            "Disposition: automatic-action/MDN-sent-automatically; processed/error: {}", f.adv_status(),
        )),
        None => dispo_lines.push(
            "Disposition: automatic-action/MDN-sent-automatically; processed".to_string(),
        ),
    }
    if message.signed {
        if let Some(mic) = &message.mic {
            dispo_lines.push(fmt!("Received-content-MIC: {}", mic));
        }
    }
    let dispo_body = dispo_lines.join("\r\n") + "\r\n";

    let text_part = MimePart::new(
        Headers::new().with("Content-Type", "text/plain; charset=us-ascii"),
        confirm_text.into_bytes(),
    );
    let dispo_part = MimePart::new(
        Headers::new().with("Content-Type", "message/disposition-notification"),
        dispo_body.into_bytes(),
    );

    let report_boundary = boundary_for(&message.message_id, "mdn");
    let report_body = serialise_multipart(&[text_part, dispo_part], &report_boundary, "\r\n");
    let report_headers = Headers::new().with("Content-Type", fmt!(
        "multipart/report; report-type=disposition-notification; boundary=\"{}\"", report_boundary,
    ));
    let mut current = MimePart::new(report_headers, report_body);
    let mut signed = false;

    if wants_signed {
        if let Some(signer) = &org.sign_cert {
            let mic_input = canon::canonicalise(&current.to_bytes("\r\n"));
            let sig_der = res!(sign::sign(&mic_input, signer, digest_alg));
            let sig_part = MimePart::new(
                Headers::new()
                    .with("Content-Type", "application/pkcs7-signature; name=\"smime.p7s\"")
                    .with("Content-Transfer-Encoding", "base64"),
                base64::encode(&sig_der).into_bytes(),
            );
            let sig_boundary = boundary_for(&message.message_id, "mdnsig");
            let body = serialise_raw_parts(&[mic_input, sig_part.to_bytes("\r\n")], &sig_boundary, "\r\n");
            let headers = Headers::new().with("Content-Type", fmt!(
                "multipart/signed; protocol=\"application/pkcs7-signature\"; micalg={}; boundary=\"{}\"",
                digest_alg, sig_boundary,
            ));
            current = MimePart::new(headers, body);
            signed = true;
        }
    }

    let mut out = Headers::new();
    out.push("AS2-Version", &ctx.config.as2_version);
    out.push("MIME-Version", "1.0");
    let mdn_message_id = hdr::generate_message_id(&message.message_id, SystemTime::now(), &ctx.config.local_host);
    out.push("Message-ID", hdr::wrap_message_id(&mdn_message_id));
    out.push("AS2-From", escape::escape(&message.as2_to));
    out.push("AS2-To", escape::escape(&message.as2_from));
    out.push("Date", res!(hdr::rfc2822_date(SystemTime::now())));
    out.push("Subject", "Message Delivery Notification");
    out.push("ediint-features", "multiple-attachments, CEM");
    if let Some(email) = &org.email {
        out.push("From", email);
    }
    for (k, v) in current.headers.iter() {
        out.push(k, v);
    }

    let return_url = original_headers.get("receipt-delivery-option").map(|s| s.to_string());
    let file_path = keys::mdn_store_rel("received", &message.message_id);
    res!(ctx.artifacts.write("", &file_path, &current.body, true));

    let mut mdn_record = Mdn::new(&message.message_id, file_path, out.to_block("\n"));
    mdn_record.signed = signed;
    mdn_record.status = if return_url.is_some() { MdnStatus::Pending } else { MdnStatus::Sent };
    mdn_record.return_url = return_url.clone();
    res!(ctx.store.create_mdn(mdn_record));

    if return_url.is_some() {
        Ok(None)
    } else {
        Ok(Some(BuiltMdn { headers: out, body: current.body }))
    }
}

/// Deliver one pending asynchronous MDN. Bounded by `max_retries`; exceeding it marks
/// the MDN `status=E` and the caller (the coordinator) moves on rather than retrying forever.
pub fn send_one(ctx: &EngineContext, sender: &dyn HttpSender, mut mdn: Mdn) -> Outcome<()> {
    let url = match &mdn.return_url {
        Some(u) => u.clone(),
        None => return Err(err!(errmsg!(
            "MDN for message '{}' has no return_url to deliver to.", mdn.message_id,
        ), Missing, Invalid)),
    };
    let body = res!(ctx.artifacts.read("", &mdn.file_path));
    let headers = res!(Headers::parse_block(&mdn.headers));

    match sender.post(&url, &headers, &body) {
        Ok(_) => {
            mdn.status = MdnStatus::Sent;
            ctx.store.update_mdn(mdn)
        },
        Err(e) => {
            mdn.retries += 1;
            if mdn.retries > ctx.config.max_retries {
                mdn.status = MdnStatus::Error;
            }
            res!(ctx.store.update_mdn(mdn));
            Err(e)
        },
    }
}

/// The effect `parse` had on the outbound Message it resolved to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParseOutcome {
    /// The MDN was applied to a known outbound Message.
    Applied,
    /// No outbound Message matches `Original-Message-ID`.
    MessageNotFound,
}

fn unwrap_part(bytes_with_headers: MimePart) -> Outcome<(ContentType, Vec<u8>)> {
    let ct = res!(bytes_with_headers.content_type());
    Ok((ct, bytes_with_headers.body))
}

/// Parse an MDN, either the synchronous response to an outbound send or an asynchronous arrival
/// already identified as an MDN by the caller, and apply it to the outbound Message it responds
/// to.
pub fn parse(ctx: &EngineContext, headers: &Headers, body: &[u8]) -> Outcome<ParseOutcome> {
    let content_type_str = match headers.get("Content-Type") {
        Some(v) => v,
        None => return Err(err!(errmsg!(
            "MDN response is missing a Content-Type header."), Missing, Invalid)),
    };
    let content_type = res!(ContentType::from_str(content_type_str));
    let is_signed = content_type.is("multipart", "signed");
    let is_report = content_type.is("multipart", "report");
    if !is_signed && !is_report {
        return Err(err!(errmsg!(
            "Body with Content-Type '{}' is neither multipart/signed nor multipart/report.",
            content_type_str,
        ), Invalid, Input));
    }

    let sig_material = if is_signed {
        let boundary = match content_type.boundary() {
            Some(b) => b,
            None => return Err(err!(errmsg!(
                "multipart/signed MDN Content-Type is missing a boundary parameter."), Invalid, Missing)),
        };
        Some(res!(extract_signed_parts(body, boundary)))
    } else {
        None
    };

    let report_part = match &sig_material {
        Some((_raw, canon_bytes, _sig)) => res!(parse_bytes(canon_bytes)),
        None => {
            let mut h = Headers::new();
            h.push("Content-Type", content_type_str);
            MimePart::new(h, body.to_vec())
        },
    };
    let (report_ct, report_body) = res!(unwrap_part(report_part));
    if !report_ct.is("multipart", "report") {
        return Err(err!(errmsg!(
            "Signed MDN envelope did not contain a multipart/report part."), Invalid, Missing));
    }
    let report_boundary = match report_ct.boundary() {
        Some(b) => b,
        None => return Err(err!(errmsg!(
            "multipart/report Content-Type is missing a boundary parameter."), Invalid, Missing)),
    };
    let parts = res!(as2_mime::split_multipart(&report_body, report_boundary));

    let mut dispo_headers = None;
    for raw_part in &parts {
        let part = res!(parse_part(raw_part));
        if let Ok(ct) = part.content_type() {
            if ct.is("message", "disposition-notification") {
                let text = String::from_utf8_lossy(&part.body).into_owned();
                dispo_headers = Some(res!(Headers::parse_block(&text)));
                break;
            }
        }
    }
    let dispo_headers = match dispo_headers {
        Some(h) => h,
        None => return Err(err!(errmsg!(
            "multipart/report body has no message/disposition-notification part."), Invalid, Missing)),
    };

    let original_message_id = hdr::unwrap_message_id(
        dispo_headers.get("Original-Message-ID").unwrap_or(""),
    );
    let mut message = match res!(ctx.store.find_by_message_id(&original_message_id)) {
        Some(m) => m,
        None => return Ok(ParseOutcome::MessageNotFound),
    };

    let partner = res!(ctx.profiles.find_partner(&message.partner));
    let wants_signed_mdn = partner.as_ref().map(|p| p.contract.wants_signed_mdn()).unwrap_or(false);

    if is_signed {
        if let Some((raw, canon_bytes, sig)) = &sig_material {
            let verified = match partner.as_ref().and_then(|p| p.contract.signature_cert.as_ref()) {
                Some(cert) => sign::verify_either(raw, canon_bytes, sig, cert).is_ok(),
                None => false,
            };
            if !verified {
                message.fail(As2Fault::InvalidSignature.adv_status(), As2Fault::InvalidSignature.status_message());
                res!(ctx.store.update_message(message));
                return Ok(ParseOutcome::Applied);
            }
        }
    } else if wants_signed_mdn {
        message.status = MessageStatus::Warning;
        message.status_message = Some(
            "A signed MDN was requested but the response was not signed.".to_string());
    }

    let disposition = dispo_headers.get("Disposition").unwrap_or("").to_string();
    let second_token = disposition.split(';').nth(1).map(str::trim).unwrap_or("");
    if second_token != "processed" {
        message.fail(disposition.clone(), fmt!("MDN reported disposition: {}", disposition));
        res!(ctx.store.update_message(message));
        return Ok(ParseOutcome::Applied);
    }

    if let Some(received_mic) = dispo_headers.get("Received-content-MIC") {
        if let Some(stored_mic) = message.mic.clone() {
            let (received_digest, _) = mic_mod::split_mic(received_mic);
            let (stored_digest, _) = mic_mod::split_mic(&stored_mic);
            if received_digest != stored_digest {
                message.status = MessageStatus::Warning;
                message.status_message = Some(
                    "Received-content-MIC did not match the stored MIC.".to_string());
                res!(ctx.store.update_message(message));
                return Ok(ParseOutcome::Applied);
            }
        }
    }

    message.succeed();
    res!(ctx.store.update_message(message));
    Ok(ParseOutcome::Applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::EngineConfig;
    use as2_crypto::Certificate;
    use as2_profile::{partner::SecurityContract, MemoryProfileStore, Partner};
    use as2_store::{model::Direction, MemoryArtifactStore, MemoryStore};
    use openssl::{
        asn1::Asn1Time, hash::MessageDigest, pkey::PKey, rsa::Rsa,
        x509::{X509Builder, X509NameBuilder},
    };
    use std::sync::Arc;

    fn self_signed(cn: &str) -> (openssl::x509::X509, PKey<openssl::pkey::Private>) {
        let rsa = Rsa::generate(2048).unwrap();
        let pkey = PKey::from_rsa(rsa).unwrap();
        let mut name_builder = X509NameBuilder::new().unwrap();
        name_builder.append_entry_by_text("CN", cn).unwrap();
        let name = name_builder.build();
        let mut builder = X509Builder::new().unwrap();
        builder.set_version(2).unwrap();
        builder.set_subject_name(&name).unwrap();
        builder.set_issuer_name(&name).unwrap();
        builder.set_pubkey(&pkey).unwrap();
        builder.set_not_before(&Asn1Time::days_from_now(0).unwrap()).unwrap();
        builder.set_not_after(&Asn1Time::days_from_now(365).unwrap()).unwrap();
        builder.sign(&pkey, MessageDigest::sha256()).unwrap();
        (builder.build(), pkey)
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
    fn no_mdn_is_built_when_not_requested() -> Outcome<()> {
        let ctx = ctx();
        let org = Organization::new("AcmeOrg");
        let message = Message::new("m1", Direction::In, "AcmeOrg", "BigCo", "AcmeOrg", "BigCo", SystemTime::now());
        let out = res!(build(&ctx, &org, &Headers::new(), &message, None));
        assert!(out.is_none());
        Ok(())
    }

    #[test]
    fn sync_success_mdn_reports_processed() -> Outcome<()> {
        let ctx = ctx();
        let org = Organization::new("AcmeOrg");
        let message = Message::new("m2", Direction::In, "AcmeOrg", "BigCo", "AcmeOrg", "BigCo", SystemTime::now());
        let mut req = Headers::new();
        req.push("disposition-notification-to", "no-reply@bigco.example");
        let out = res!(build(&ctx, &org, &req, &message, None));
        let built = out.expect("sync MDN expected");
        let body_text = String::from_utf8_lossy(&built.body).into_owned();
        assert!(body_text.contains("processed"));
        Ok(())
    }

    #[test]
    fn async_mdn_is_persisted_pending_and_not_returned_sync() -> Outcome<()> {
        let ctx = ctx();
        let org = Organization::new("AcmeOrg");
        let message = Message::new("m3", Direction::In, "AcmeOrg", "BigCo", "AcmeOrg", "BigCo", SystemTime::now());
        let mut req = Headers::new();
        req.push("disposition-notification-to", "no-reply@bigco.example");
        req.push("receipt-delivery-option", "https://bigco.example/as2-mdn");
        let out = res!(build(&ctx, &org, &req, &message, None));
        assert!(out.is_none());
        let stored = res!(ctx.store.find_mdn("m3")).expect("mdn record expected");
        assert_eq!(stored.status, MdnStatus::Pending);
        assert_eq!(stored.return_url.as_deref(), Some("https://bigco.example/as2-mdn"));
        Ok(())
    }

    #[test]
    fn parse_applies_matching_mic_as_success() -> Outcome<()> {
        let ctx = ctx();
        let (cert, pkey) = self_signed("AcmeOrg");
        let org = Organization::new("AcmeOrg").with_sign_cert(Certificate::Private {
            cert: cert.clone(), pkey, ca: None,
        });

        let mut partner = Partner::new("BigCo", "https://bigco.example/as2");
        partner.contract = SecurityContract {
            mdn_requested: true,
            mdn_sign_alg: Some(DigestAlg::Sha256),
            signature_cert: Some(Certificate::Public { cert, ca: None, verify_chain: false }),
            ..Default::default()
        };
        let profiles = MemoryProfileStore::new();
        profiles.add_partner(partner);
        let ctx = EngineContext::new(ctx.store, Arc::new(profiles), ctx.artifacts, ctx.config);

        let mut message = Message::new("orig-1", Direction::Out, "AcmeOrg", "BigCo", "AcmeOrg", "BigCo", SystemTime::now());
        message.signed = true;
        message.mic = Some(res!(mic_mod::mic_with_alg(b"payload", DigestAlg::Sha256)));
        res!(ctx.store.create_message(message.clone()));

        let mut req = Headers::new();
        req.push("disposition-notification-to", "no-reply@acme.example");
        req.push("disposition-notification-options",
            "signed-receipt-protocol=required, pkcs7-signature; signed-receipt-micalg=optional, sha256");

        let built = res!(build(&ctx, &org, &req, &message, None)).expect("sync MDN expected");
        let outcome = res!(parse(&ctx, &built.headers, &built.body));
        assert_eq!(outcome, ParseOutcome::Applied);
        let updated = res!(ctx.store.find_by_message_id("orig-1")).unwrap();
        assert_eq!(updated.status, MessageStatus::Success);
        Ok(())
    }

    #[test]
    fn parse_reports_message_not_found_for_unknown_original_id() -> Outcome<()> {
        let ctx = ctx();
        let org = Organization::new("AcmeOrg");
        let message = Message::new("ghost-1", Direction::In, "AcmeOrg", "BigCo", "AcmeOrg", "BigCo", SystemTime::now());
        let mut req = Headers::new();
        req.push("disposition-notification-to", "no-reply@bigco.example");
        let built = res!(build(&ctx, &org, &req, &message, None)).expect("sync MDN expected");
        let outcome = res!(parse(&ctx, &built.headers, &built.body));
        assert_eq!(outcome, ParseOutcome::MessageNotFound);
        Ok(())
    }
}
