//! CMS detached signing and verification.

use crate::{
    keys::Certificate,
    scheme::DigestAlg,
};

use as2_core::prelude::*;

use openssl::{
    pkcs7::{Pkcs7, Pkcs7Flags},
    stack::Stack,
    x509::store::X509StoreBuilder,
};

/// Sign `data` (already canonicalised by the caller) with `signer`'s private key, producing a
/// DER-encoded detached PKCS#7 `signed-data` structure suitable for the second part of a
/// `multipart/signed` wrapper.
///
/// `digest_alg` only governs the `micalg` the caller advertises and records; the detached
/// signature itself is produced with `PKCS7_NOATTR` so no signing-time attributes leak partner
/// identity beyond the certificate itself.
pub fn sign(data: &[u8], signer: &Certificate, _digest_alg: DigestAlg) -> Outcome<Vec<u8>> {
    let pkey = res!(signer.private_key());
    let cert = signer.cert();
    let certs = res!(Stack::new(), Key, Init);
    let flags = Pkcs7Flags::DETACHED | Pkcs7Flags::BINARY | Pkcs7Flags::NOATTR | Pkcs7Flags::NOCERTS;
    let pkcs7 = match Pkcs7::sign(cert, pkey, &certs, data, flags) {
        Ok(p) => p,
        Err(e) => return Err(err!(e, errmsg!(
            "Failed to build a PKCS#7 detached signature."), Key, Invalid)),
    };
    let der = res!(pkcs7.to_der(), Key, Encode);
    Ok(der)
}

/// Verify a detached signature over `data`, trusting `signer`'s certificate (and its CA, if
/// `signer.verify_chain()`). `data` is whatever bytes the caller chose to hash — either the raw
/// on-wire signed part, or a locally canonicalised reconstruction (two verification
/// modes; the caller tries both and accepts either).
pub fn verify(data: &[u8], signature_der: &[u8], signer: &Certificate) -> Outcome<()> {
    let pkcs7 = match Pkcs7::from_der(signature_der) {
        Ok(p) => p,
        Err(_) => return Err(err!(errmsg!(
            "Signature attachment is not a valid DER-encoded PKCS#7 structure."),
            Decrypt, Invalid, Decode)),
    };

    let mut certs = res!(Stack::new(), Key, Init);
    res!(certs.push(signer.cert().clone()), Key, Init);

    let mut store_builder = res!(X509StoreBuilder::new(), Key, Init);
    if let Some(ca) = signer.ca() {
        res!(store_builder.add_cert(ca.clone()), Key, Init);
    }
    let store = store_builder.build();

    let flags = if signer.verify_chain() {
        Pkcs7Flags::BINARY | Pkcs7Flags::NOINTERN
    } else {
        Pkcs7Flags::BINARY | Pkcs7Flags::NOINTERN | Pkcs7Flags::NOVERIFY
    };

    match pkcs7.verify(&certs, &store, Some(data), None, flags) {
        Ok(()) => Ok(()),
        Err(e) => Err(err!(e, errmsg!(
            "PKCS#7 signature verification failed."), Decrypt, Invalid, Mismatch)),
    }
}

/// Try verification against the exact on-wire bytes first, falling back to a locally
/// canonicalised reconstruction if that fails ("two verification modes ... success
/// on either path accepts the message").
pub fn verify_either(
    raw_data:       &[u8],
    canon_data:     &[u8],
    signature_der:  &[u8],
    signer:         &Certificate,
)
    -> Outcome<()>
{
    if verify(raw_data, signature_der, signer).is_ok() {
        return Ok(());
    }
    verify(canon_data, signature_der, signer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use openssl::{
        asn1::Asn1Time,
        hash::MessageDigest,
        pkey::PKey,
        rsa::Rsa,
        x509::{X509, X509Builder, X509NameBuilder},
    };

    fn self_signed(cn: &str) -> (X509, PKey<openssl::pkey::Private>) {
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

    #[test]
    fn signs_and_verifies_with_matching_cert() -> Outcome<()> {
        let (cert, pkey) = self_signed("Acme Corp");
        let signer = Certificate::Private { cert: cert.clone(), pkey, ca: None };
        let data = b"canonicalised EDI payload\r\n";
        let sig = res!(sign(data, &signer, DigestAlg::Sha256));
        let verifier = Certificate::Public { cert, ca: None, verify_chain: false };
        res!(verify(data, &sig, &verifier));
        Ok(())
    }

    #[test]
    fn rejects_signature_from_a_different_cert() -> Outcome<()> {
        let (cert_a, pkey_a) = self_signed("Acme Corp");
        let (cert_b, _pkey_b) = self_signed("Big Co");
        let signer = Certificate::Private { cert: cert_a, pkey: pkey_a, ca: None };
        let data = b"payload";
        let sig = res!(sign(data, &signer, DigestAlg::Sha1));
        let wrong_verifier = Certificate::Public { cert: cert_b, ca: None, verify_chain: false };
        assert!(verify(data, &sig, &wrong_verifier).is_err());
        Ok(())
    }
}
