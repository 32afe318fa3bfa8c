//! Outbound Builder: composes, compresses, signs and encrypts a payload into a wire message.
//!
//! Builds an AS2 wire message from a payload and a partner profile. Each transformation step is
//! conditional on the negotiated `SecurityContract`; the running `current` part is threaded
//! through compression, signing and encryption in that fixed order, and its
//! final headers are merged into the outer AS2 header set (step 5) rather than nested a second
//! time, since `Content-Type` etc. become top-level HTTP headers on the wire.

use crate::{context::EngineContext, headers};

use as2_core::prelude::*;
use as2_crypto::{compress, envelope, mic as mic_mod, sign};
use as2_mime::{canon, header::Headers, part::MimePart, multipart::serialise_raw_parts};
use as2_profile::{escape, partner::MdnMode, Organization, Partner};

/// The built wire message, ready to be sent as an HTTP POST body with these headers.
pub struct OutboundMessage {
    pub headers:    Headers,
    pub body:       Vec<u8>,
    /// Populated iff the message was signed.
    pub mic:        Option<String>,
}

fn current_bytes(part: &MimePart) -> Vec<u8> {
    canon::canonicalise(&part.to_bytes("\r\n"))
}

fn boundary_for(message_id: &str, tag: &str) -> String {
    format!("----=_Part_{}_{}", tag, message_id.chars().filter(|c| c.is_ascii_alphanumeric()).collect::<String>())
}

/// Build an outbound AS2 message. `message_id` is the caller-chosen, unwrapped
/// Message-ID (the builder takes it as an input rather than generating one).
pub fn build(
    ctx:            &EngineContext,
    org:            &Organization,
    partner:        &Partner,
    payload_bytes:  &[u8],
    filename:       &str,
    message_id:     &str,
)
    -> Outcome<OutboundMessage>
{
    // Step 1: wrap the payload.
    let mut part_headers = Headers::new();
    part_headers.push("Content-Type", &partner.content_type);
    part_headers.push("Content-Disposition", format!("attachment; filename=\"{}\"", filename));
    let mut current = MimePart::new(part_headers, payload_bytes.to_vec());

    // Step 2: compress.
    if partner.contract.compress {
        let deflated = res!(compress::compress(&current_bytes(&current)));
        let mut h = Headers::new();
        h.push("Content-Type", "application/pkcs7-mime; smime-type=compressed-data; name=\"smime.p7z\"");
        h.push("Content-Transfer-Encoding", "base64");
        current = MimePart::new(h, base64::encode(&deflated).into_bytes());
    }

    // Step 3: sign.
    let mut mic = None;
    if let Some(digest_alg) = partner.contract.signature_alg {
        let signer = match &org.sign_cert {
            Some(cert) => cert,
            None => return Err(err!(errmsg!(
                "Partner '{}' requires a signature but organization '{}' has no signing certificate.",
                partner.as2_name, org.as2_name,
            ), Key, Missing, Configuration)),
        };
        let mic_input = current_bytes(&current);
        mic = Some(res!(mic_mod::mic_with_alg(&mic_input, digest_alg)));
        let sig_der = res!(sign::sign(&mic_input, signer, digest_alg));

        let mut sig_headers = Headers::new();
        sig_headers.push("Content-Type", "application/pkcs7-signature; name=\"smime.p7s\"");
        sig_headers.push("Content-Transfer-Encoding", "base64");
        let sig_part = MimePart::new(sig_headers, base64::encode(&sig_der).into_bytes());

        let boundary = boundary_for(message_id, "sig");
        let body = serialise_raw_parts(&[mic_input, sig_part.to_bytes("\r\n")], &boundary, "\r\n");

        let mut h = Headers::new();
        h.push("Content-Type", format!(
            "multipart/signed; protocol=\"application/pkcs7-signature\"; micalg={}; boundary=\"{}\"",
            digest_alg, boundary,
        ));
        current = MimePart::new(h, body);
    }

    // Step 4: encrypt.
    if let Some(alg) = partner.contract.encryption_alg {
        let recipient = match &partner.contract.encryption_cert {
            Some(cert) => cert,
            None => return Err(err!(errmsg!(
                "Partner '{}' has an encryption algorithm configured but no encryption certificate.",
                partner.as2_name,
            ), Key, Missing, Configuration)),
        };
        let der = res!(envelope::encrypt(&current_bytes(&current), recipient, alg));
        let mut h = Headers::new();
        h.push("Content-Type", "application/pkcs7-mime; smime-type=enveloped-data; name=\"smime.p7m\"");
        h.push("Content-Transfer-Encoding", "base64");
        current = MimePart::new(h, base64::encode(&der).into_bytes());
    }

    // Step 5: assemble AS2 headers, merging in the final part's own headers.
    let mut out = Headers::new();
    out.push("AS2-Version", &ctx.config.as2_version);
    out.push("MIME-Version", "1.0");
    out.push("Message-ID", headers::wrap_message_id(message_id));
    out.push("AS2-From", escape::escape(&org.as2_name));
    out.push("AS2-To", escape::escape(&partner.as2_name));
    out.push("Subject", format!("AS2 message {}", message_id));
    out.push("Date", res!(headers::rfc2822_date(std::time::SystemTime::now())));
    if let Some(email) = &org.email {
        out.push("From", email);
    }
    if !ctx.config.receive_url.is_empty() {
        out.push("recipient-address", &ctx.config.receive_url);
    }
    out.push("user-agent", &ctx.config.user_agent);
    out.push("ediint-features", "multiple-attachments, CEM");
    for (k, v) in current.headers.iter() {
        out.push(k, v);
    }

    // Step 6: MDN negotiation headers.
    if partner.contract.mdn_requested {
        out.push("disposition-notification-to", org.email.clone().unwrap_or_else(|| "no-reply@localhost".to_string()));
        if let Some(mdn_digest) = partner.contract.mdn_sign_alg {
            out.push("disposition-notification-options", format!(
                "signed-receipt-protocol=required, pkcs7-signature; signed-receipt-micalg=optional, {}",
                mdn_digest,
            ));
        }
        if partner.contract.mdn_mode == Some(MdnMode::Async) {
            out.push("receipt-delivery-option", &ctx.config.mdn_url);
        }
    }

    Ok(OutboundMessage { headers: out, body: current.body, mic })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::EngineConfig;
    use as2_profile::{partner::SecurityContract, MemoryProfileStore};
    use as2_store::{MemoryArtifactStore, MemoryStore};
    use std::sync::Arc;

    fn ctx() -> EngineContext {
        EngineContext::new(
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryProfileStore::new()),
            Arc::new(MemoryArtifactStore::new()),
            EngineConfig::default(),
        )
    }

    #[test]
    fn plain_message_carries_payload_unchanged() -> Outcome<()> {
        let org = Organization::new("AcmeOrg");
        let partner = Partner::new("BigCoPartner", "https://bigco.example/as2");
        let out = res!(build(&ctx(), &org, &partner, b"ISA*payload*", "doc.edi", "msg-1@acme"));
        assert_eq!(out.body, b"ISA*payload*".to_vec());
        assert!(out.mic.is_none());
        assert_eq!(out.headers.get("AS2-From"), Some("AcmeOrg"));
        Ok(())
    }

    #[test]
    fn mdn_headers_present_only_when_requested() -> Outcome<()> {
        let org = Organization::new("AcmeOrg");
        let mut partner = Partner::new("BigCoPartner", "https://bigco.example/as2");
        partner.contract = SecurityContract { mdn_requested: true, ..Default::default() };
        let out = res!(build(&ctx(), &org, &partner, b"payload", "doc.edi", "msg-2@acme"));
        assert!(out.headers.contains("disposition-notification-to"));
        Ok(())
    }
}
