//! MIC (Message Integrity Check) computation and armour normalisation.

use crate::scheme::DigestAlg;

use as2_core::prelude::*;

use openssl::hash;

/// `base64(digest(bytes))` using `alg`. The caller is responsible for passing already
/// canonicalised bytes when the MIC must match what a signature was computed over ("MIC
/// equality").
pub fn mic(bytes: &[u8], alg: DigestAlg) -> Outcome<String> {
    let digest = res!(hash::hash(alg.message_digest(), bytes), Decrypt, Invalid);
    Ok(base64::encode(&digest))
}

/// The stored `mic` field format: `base64(digest) + ", " + alg` (the outbound builder's
/// micalg is recoverable from the wire, but persisted MDN `Received-content-MIC` values carry
/// the algorithm name alongside the digest for comparison without cross-referencing the
/// message).
pub fn mic_with_alg(bytes: &[u8], alg: DigestAlg) -> Outcome<String> {
    let digest = res!(mic(bytes, alg));
    Ok(fmt!("{}, {}", digest, alg))
}

/// Split a `Received-content-MIC` / stored `mic` value into `(digest_b64, alg_name)` on the
/// first comma, tolerating a missing algorithm suffix.
pub fn split_mic(value: &str) -> (&str, Option<&str>) {
    match value.split_once(',') {
        Some((digest, alg)) => (digest.trim(), Some(alg.trim())),
        None => (value.trim(), None),
    }
}

/// Detect and normalise base64-armoured or raw binary CMS data into raw DER bytes (
/// `Decrypt`: "Inputs may be base64-armoured or raw binary; detect and normalise").
///
/// DER `SEQUENCE`/`ContentInfo` structures begin with tag byte `0x30`; anything else is assumed
/// to be base64 text (optionally wrapped across multiple lines).
pub fn normalise_der(input: &[u8]) -> Outcome<Vec<u8>> {
    if input.first() == Some(&0x30) {
        return Ok(input.to_vec());
    }
    let stripped: String = input.iter()
        .filter(|b| !b.is_ascii_whitespace())
        .map(|b| *b as char)
        .collect();
    if stripped.is_empty() {
        return Ok(input.to_vec());
    }
    let looks_base64 = stripped.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '/' || c == '=');
    if looks_base64 {
        Ok(res!(base64::decode(&stripped), Decode, Invalid))
    } else {
        Ok(input.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mic_of_known_bytes_matches_known_sha1_digest() -> Outcome<()> {
        // sha1("abc") = a9993e364706816aba3e25717850c26c9cd0d89
        let m = res!(mic(b"abc", DigestAlg::Sha1));
        let expected = base64::encode(
            &hex::decode("a9993e364706816aba3e25717850c26c9cd0d89").unwrap());
        assert_eq!(m, expected);
        Ok(())
    }

    #[test]
    fn split_mic_handles_missing_alg_suffix() {
        assert_eq!(split_mic("abcd=="), ("abcd==", None));
        assert_eq!(split_mic("abcd==, sha256"), ("abcd==", Some("sha256")));
    }

    #[test]
    fn normalise_der_decodes_base64_and_passes_through_binary() -> Outcome<()> {
        let der_like = vec![0x30, 0x10, 0x02, 0x01, 0x00];
        assert_eq!(res!(normalise_der(&der_like)), der_like);

        let armoured = base64::encode(&der_like);
        assert_eq!(res!(normalise_der(armoured.as_bytes())), der_like);
        Ok(())
    }
}
