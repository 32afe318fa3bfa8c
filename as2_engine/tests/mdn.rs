//! MDN parse coverage beyond what `as2_engine::mdn`'s own inline tests exercise ("MIC
//! equality, MIC tamper, signature tamper, duplicate detection"): tampering with the MDN body
//! after it leaves `mdn::build`, as a partner's MTA or a hostile intermediary might.

use as2_crypto::{mic as mic_mod, Certificate, DigestAlg};
use as2_engine::{
    context::{EngineConfig, EngineContext},
    error::As2Fault,
    mdn::{self, ParseOutcome},
};
use as2_mime::header::Headers;
use as2_profile::{partner::SecurityContract, MemoryProfileStore, Organization, Partner};
use as2_store::{model::{Direction, Message, MessageStatus}, MemoryArtifactStore, MemoryStore};

use openssl::{
    asn1::Asn1Time, hash::MessageDigest, pkey::{PKey, Private}, rsa::Rsa,
    x509::{X509, X509Builder, X509NameBuilder},
};

use std::{sync::Arc, time::SystemTime};

fn self_signed(cn: &str) -> (X509, PKey<Private>) {
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

/// An unsigned-MDN fixture: no `pkcs7-signature` requested and no signing cert on either side, so
/// `mdn::parse` takes the plain `multipart/report` path straight to the MIC comparison.
fn unsigned_mdn_fixture(message_id: &str) -> (EngineContext, Organization, Message, Headers) {
    let org = Organization::new("AcmeOrg");

    let mut partner = Partner::new("BigCo", "https://bigco.example/as2");
    partner.contract = SecurityContract::default();
    let profiles = MemoryProfileStore::new();
    profiles.add_partner(partner);

    let ctx = EngineContext::new(
        Arc::new(MemoryStore::new()),
        Arc::new(profiles),
        Arc::new(MemoryArtifactStore::new()),
        EngineConfig::default(),
    );

    let mut message = Message::new(message_id, Direction::Out, "AcmeOrg", "BigCo", "AcmeOrg", "BigCo", SystemTime::now());
    message.signed = true;
    message.mic = Some(mic_mod::mic_with_alg(b"payload-bytes", DigestAlg::Sha256).expect("mic"));
    ctx.store.create_message(message.clone()).expect("persist message");

    let mut req = Headers::new();
    req.push("disposition-notification-to", "no-reply@acme.example");

    (ctx, org, message, req)
}

/// A signed-MDN fixture: `pkcs7-signature` requested, `org` holds the signing cert, the partner
/// record holds the matching public cert, so `mdn::parse` takes the `multipart/signed` path.
fn signed_mdn_fixture(message_id: &str) -> (EngineContext, Organization, Message, Headers) {
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

    let ctx = EngineContext::new(
        Arc::new(MemoryStore::new()),
        Arc::new(profiles),
        Arc::new(MemoryArtifactStore::new()),
        EngineConfig::default(),
    );

    let mut message = Message::new(message_id, Direction::Out, "AcmeOrg", "BigCo", "AcmeOrg", "BigCo", SystemTime::now());
    message.signed = true;
    message.mic = Some(mic_mod::mic_with_alg(b"payload-bytes", DigestAlg::Sha256).expect("mic"));
    ctx.store.create_message(message.clone()).expect("persist message");

    let mut req = Headers::new();
    req.push("disposition-notification-to", "no-reply@acme.example");
    req.push("disposition-notification-options",
        "signed-receipt-protocol=required, pkcs7-signature; signed-receipt-micalg=optional, sha256");

    (ctx, org, message, req)
}

#[test]
fn matching_mic_resolves_to_success() {
    let (ctx, org, message, req) = unsigned_mdn_fixture("mic-match-1");
    let built = mdn::build(&ctx, &org, &req, &message, None).expect("build").expect("sync mdn");
    let outcome = mdn::parse(&ctx, &built.headers, &built.body).expect("parse");
    assert_eq!(outcome, ParseOutcome::Applied);
    let updated = ctx.store.find_by_message_id("mic-match-1").expect("lookup").expect("message");
    assert_eq!(updated.status, MessageStatus::Success);
}

#[test]
fn tampered_mic_resolves_to_warning_not_silent_success() {
    let (ctx, org, message, req) = unsigned_mdn_fixture("mic-tamper-1");
    let built = mdn::build(&ctx, &org, &req, &message, None).expect("build").expect("sync mdn");

    let stored_digest = message.mic.as_deref().unwrap().split(',').next().unwrap().to_string();
    let body_text = String::from_utf8_lossy(&built.body).into_owned();
    assert!(body_text.contains(&stored_digest), "fixture bug: MIC digest not found in built MDN body");
    let tampered = body_text.replace(&stored_digest, "dGFtcGVyZWQtbWlj");

    let outcome = mdn::parse(&ctx, &built.headers, tampered.as_bytes()).expect("parse");
    assert_eq!(outcome, ParseOutcome::Applied);
    let updated = ctx.store.find_by_message_id("mic-tamper-1").expect("lookup").expect("message");
    assert_eq!(updated.status, MessageStatus::Warning);
}

#[test]
fn tampered_signature_is_reported_as_invalid() {
    let (ctx, org, message, req) = signed_mdn_fixture("sig-tamper-1");
    let built = mdn::build(&ctx, &org, &req, &message, None).expect("build").expect("sync mdn");

    let mut tampered_body = built.body.clone();
    // Swap one base64 character well inside the PKCS#7 signature content for another, clear of
    // the closing `--boundary--` delimiter, so the body still decodes as valid base64 but as a
    // different signature.
    let flip_at = tampered_body.len() - 50;
    tampered_body[flip_at] = if tampered_body[flip_at] == b'A' { b'B' } else { b'A' };

    let outcome = mdn::parse(&ctx, &built.headers, &tampered_body).expect("parse");
    assert_eq!(outcome, ParseOutcome::Applied);
    let updated = ctx.store.find_by_message_id("sig-tamper-1").expect("lookup").expect("message");
    assert_eq!(updated.status, MessageStatus::Error);
    assert_eq!(updated.adv_status.as_deref(), Some(As2Fault::InvalidSignature.adv_status()));
}

#[test]
fn parsing_the_same_mdn_twice_is_idempotent() {
    let (ctx, org, message, req) = unsigned_mdn_fixture("mdn-dup-1");
    let built = mdn::build(&ctx, &org, &req, &message, None).expect("build").expect("sync mdn");

    let first = mdn::parse(&ctx, &built.headers, &built.body).expect("first parse");
    let second = mdn::parse(&ctx, &built.headers, &built.body).expect("second parse");
    assert_eq!(first, ParseOutcome::Applied);
    assert_eq!(second, ParseOutcome::Applied);
    let updated = ctx.store.find_by_message_id("mdn-dup-1").expect("lookup").expect("message");
    assert_eq!(updated.status, MessageStatus::Success);
}
