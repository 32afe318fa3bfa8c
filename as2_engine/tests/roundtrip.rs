//! End-to-end outbound-build/inbound-process coverage across the security-contract permutations
//! RFC 4130 §2.4.2 allows: a representative subset
//! selected for orthogonality rather than the full 16, since compress/sign/encrypt each flip
//! independently and sync/async MDN delivery is itself orthogonal to all three.

use as2_crypto::{Certificate, DigestAlg, EncryptionAlg};
use as2_engine::{
    context::{EngineConfig, EngineContext},
    inbound, mdn, outbound,
};
use as2_profile::{partner::{MdnMode, SecurityContract}, MemoryProfileStore, Organization, Partner};
use as2_store::{MemoryArtifactStore, MemoryStore};

use openssl::{
    asn1::Asn1Time, hash::MessageDigest, pkey::{PKey, Private}, rsa::Rsa,
    x509::{X509, X509Builder, X509NameBuilder},
};

use std::sync::Arc;

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

struct Fixture {
    ctx:          EngineContext,
    sender_org:   Organization,
    sender_as_partner_profile: Partner,
    receiver_org: Organization,
}

/// Build a context with both sides of a conversation registered: the sender acts as "AcmeCorp",
/// the receiver as "BigCoOrg", each holding whatever certificates `contract` requires.
fn fixture(contract: SecurityContract) -> Fixture {
    let profiles = Arc::new(MemoryProfileStore::new());
    let ctx = EngineContext::new(
        Arc::new(MemoryStore::new()),
        profiles.clone(),
        Arc::new(MemoryArtifactStore::new()),
        EngineConfig::default(),
    );

    let (sign_cert, sign_key) = self_signed("AcmeCorp");
    let (enc_cert, enc_key) = self_signed("BigCoOrg");

    let mut sender_org = Organization::new("AcmeCorp").with_email("sender@acme.example");
    if contract.is_signed() {
        sender_org = sender_org.with_sign_cert(Certificate::Private {
            cert: sign_cert.clone(), pkey: sign_key, ca: None,
        });
    }

    let mut receiver_org = Organization::new("BigCoOrg").with_email("receiver@bigco.example");
    if contract.is_encrypted() {
        receiver_org = receiver_org.with_decrypt_cert(Certificate::Private {
            cert: enc_cert.clone(), pkey: enc_key, ca: None,
        });
    }

    // The partner record each side holds of the other.
    let mut receiver_side_partner_view = Partner::new("AcmeCorp", "https://acme.example/as2");
    let mut contract_for_receiver = contract.clone();
    if contract.is_signed() {
        contract_for_receiver.signature_cert = Some(Certificate::Public { cert: sign_cert.clone(), ca: None, verify_chain: false });
    }
    receiver_side_partner_view = receiver_side_partner_view.with_contract(contract_for_receiver);
    profiles.add_partner(receiver_side_partner_view);
    profiles.add_organization(receiver_org.clone());

    let mut sender_side_partner_view = Partner::new("BigCoOrg", "https://bigco.example/as2");
    let mut contract_for_sender = contract.clone();
    if contract.is_encrypted() {
        contract_for_sender.encryption_cert = Some(Certificate::Public { cert: enc_cert, ca: None, verify_chain: false });
    }
    sender_side_partner_view = sender_side_partner_view.with_contract(contract_for_sender);
    profiles.add_organization(sender_org.clone());

    Fixture { ctx, sender_org, sender_as_partner_profile: sender_side_partner_view, receiver_org }
}

fn run_case(contract: SecurityContract, message_id: &str) {
    let f = fixture(contract);
    let built = outbound::build(
        &f.ctx, &f.sender_org, &f.sender_as_partner_profile, b"ISA*permutation-payload*", "doc.edi", message_id,
    ).unwrap_or_else(|e| panic!("outbound::build failed for '{}': {}", message_id, e));

    let inbound_outcome = inbound::process_inbound(&f.ctx, &built.headers, &built.body)
        .unwrap_or_else(|e| panic!("process_inbound failed for '{}': {}", message_id, e));

    assert!(inbound_outcome.fault.is_none(), "case '{}' unexpectedly faulted: {:?}", message_id, inbound_outcome.fault);
    assert_eq!(inbound_outcome.payload_bytes, Some(b"ISA*permutation-payload*".to_vec()));

    if inbound_outcome.mdn_requested {
        let mdn_out = mdn::build(&f.ctx, &f.receiver_org, &built.headers, &inbound_outcome.message, None)
            .unwrap_or_else(|e| panic!("mdn::build failed for '{}': {}", message_id, e));
        match mdn_out {
            Some(sync_mdn) => {
                let outcome = mdn::parse(&f.ctx, &sync_mdn.headers, &sync_mdn.body)
                    .unwrap_or_else(|e| panic!("mdn::parse failed for '{}': {}", message_id, e));
                assert_eq!(outcome, mdn::ParseOutcome::Applied);
            },
            None => {
                // Async: the MDN was persisted pending delivery rather than returned synchronously.
                let stored = f.ctx.store.find_mdn(&inbound_outcome.message.message_id)
                    .unwrap_or_else(|e| panic!("find_mdn failed for '{}': {}", message_id, e));
                assert!(stored.is_some(), "async MDN record missing for '{}'", message_id);
            },
        }
    }
}

#[test]
fn plain_message_no_security() {
    run_case(SecurityContract::default(), "rt-plain@acme");
}

#[test]
fn compress_only() {
    run_case(SecurityContract { compress: true, ..Default::default() }, "rt-compress@acme");
}

#[test]
fn sign_only_with_sync_mdn() {
    run_case(SecurityContract {
        signature_alg: Some(DigestAlg::Sha256),
        mdn_requested: true,
        mdn_mode: Some(MdnMode::Sync),
        ..Default::default()
    }, "rt-sign-sync@acme");
}

#[test]
fn encrypt_only() {
    run_case(SecurityContract {
        encryption_alg: Some(EncryptionAlg::Aes256Cbc),
        ..Default::default()
    }, "rt-encrypt@acme");
}

#[test]
fn sign_and_encrypt_with_async_mdn() {
    run_case(SecurityContract {
        signature_alg: Some(DigestAlg::Sha256),
        encryption_alg: Some(EncryptionAlg::Aes256Cbc),
        mdn_requested: true,
        mdn_mode: Some(MdnMode::Async),
        ..Default::default()
    }, "rt-sign-encrypt-async@acme");
}

#[test]
fn compress_sign_and_encrypt_with_sync_mdn() {
    run_case(SecurityContract {
        compress: true,
        signature_alg: Some(DigestAlg::Sha256),
        encryption_alg: Some(EncryptionAlg::Aes256Cbc),
        mdn_requested: true,
        mdn_mode: Some(MdnMode::Sync),
        ..Default::default()
    }, "rt-compress-sign-encrypt-sync@acme");
}
