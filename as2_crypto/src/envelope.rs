//! CMS enveloped-data encryption and decryption.

use crate::{
    keys::Certificate,
    scheme::EncryptionAlg,
};

use as2_core::prelude::*;

use openssl::{
    pkcs7::{Pkcs7, Pkcs7Flags},
    stack::Stack,
};

/// Encrypt `data` to `recipient`'s public certificate with `alg`, returning a DER-encoded PKCS#7
/// `enveloped-data` structure (the content of an `application/pkcs7-mime; smime-type=enveloped-
/// data` part).
pub fn encrypt(data: &[u8], recipient: &Certificate, alg: EncryptionAlg) -> Outcome<Vec<u8>> {
    let mut certs = res!(Stack::new(), Key, Init);
    res!(certs.push(recipient.cert().clone()), Key, Init);
    let flags = Pkcs7Flags::BINARY;
    let pkcs7 = match Pkcs7::encrypt(&certs, data, alg.cipher(), flags) {
        Ok(p) => p,
        Err(e) => return Err(err!(e, errmsg!(
            "Failed to build a PKCS#7 enveloped-data structure using {}.", alg),
            Encrypt, Invalid)),
    };
    let der = res!(pkcs7.to_der(), Encrypt, Encode);
    Ok(der)
}

/// Decrypt a DER-encoded PKCS#7 `enveloped-data` structure with `recipient`'s private key.
///
/// `der` may be base64-armoured text or raw binary; callers should run
/// [`crate::mic::normalise_der`] first. Wrong-key and corrupt-envelope both surface as a
/// single `DecryptionFailed`-tagged error, matching the documented contract that "all carry the underlying
/// cause string" without leaking which specific failure mode occurred (distinguishing them would
/// be an oracle for an attacker probing ciphertexts).
pub fn decrypt(der: &[u8], recipient: &Certificate) -> Outcome<Vec<u8>> {
    let pkey = res!(recipient.private_key());
    let cert = recipient.cert();
    let pkcs7 = match Pkcs7::from_der(der) {
        Ok(p) => p,
        Err(_) => return Err(err!(errmsg!(
            "Enveloped-data attachment is not a valid DER-encoded PKCS#7 structure."),
            Decrypt, Invalid, Decode)),
    };
    match pkcs7.decrypt(pkey, cert, Pkcs7Flags::empty()) {
        Ok(plaintext) => Ok(plaintext),
        Err(e) => Err(err!(e, errmsg!(
            "Failed to decrypt PKCS#7 enveloped-data with the organization's private key."),
            Decrypt, Invalid)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openssl::{
        asn1::Asn1Time,
        hash::MessageDigest,
        pkey::PKey,
        rsa::Rsa,
        x509::{X509Builder, X509NameBuilder},
    };

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

    #[test]
    fn round_trips_aes256() -> Outcome<()> {
        let (cert, pkey) = self_signed("Acme Corp");
        let public = Certificate::Public { cert: cert.clone(), ca: None, verify_chain: false };
        let private = Certificate::Private { cert, pkey, ca: None };
        let plaintext = b"canonicalised EDI payload\r\n";
        let enveloped = res!(encrypt(plaintext, &public, EncryptionAlg::Aes256Cbc));
        let recovered = res!(decrypt(&enveloped, &private));
        assert_eq!(recovered, plaintext);
        Ok(())
    }

    #[test]
    fn wrong_key_fails_to_decrypt() -> Outcome<()> {
        let (cert_a, _) = self_signed("Acme Corp");
        let (cert_b, pkey_b) = self_signed("Big Co");
        let public_a = Certificate::Public { cert: cert_a, ca: None, verify_chain: false };
        let private_b = Certificate::Private { cert: cert_b, pkey: pkey_b, ca: None };
        let enveloped = res!(encrypt(b"secret", &public_a, EncryptionAlg::Aes128Cbc));
        assert!(decrypt(&enveloped, &private_b).is_err());
        Ok(())
    }
}
