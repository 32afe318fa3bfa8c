//! Boundary-based multipart split/join that preserves exact on-wire bytes.
//!
//! A `multipart/signed` signature is only valid over the *exact* bytes the signer hashed. Once a
//! MIME tree is parsed into typed structures and re-serialised, whitespace, header field order,
//! or base64 wrapping can change even though the logical content did not. So this module never
//! reconstructs a signed part from its parsed `MimePart`; it locates it in the original byte
//! stream by boundary scanning (scan forward, only copy what is needed) and hands back a
//! verbatim slice.

use crate::{
    canon,
    header::Headers,
    part::MimePart,
};

use as2_core::prelude::*;

/// One part of a multipart body, as found verbatim between two boundary delimiter lines.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RawPart {
    /// Bytes of the header block, not including the blank-line separator.
    pub header_bytes:  Vec<u8>,
    /// Bytes of the body, i.e. everything after the blank line up to (not including) the CRLF
    /// that precedes the next boundary delimiter.
    pub body_bytes:     Vec<u8>,
    /// The full part exactly as it appeared on the wire: `header_bytes` + blank line +
    /// `body_bytes`.
    pub all_bytes:      Vec<u8>,
}

fn find_from(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if needle.is_empty() || from > haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}

fn find_blank_line(bytes: &[u8]) -> Option<(usize, usize)> {
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i..].starts_with(b"\r\n\r\n") {
            return Some((i, 4));
        }
        if bytes[i..].starts_with(b"\n\n") {
            return Some((i, 2));
        }
        i += 1;
    }
    None
}

fn split_header_body(bytes: &[u8]) -> RawPart {
    match find_blank_line(bytes) {
        Some((pos, len)) => RawPart {
            header_bytes:   bytes[..pos].to_vec(),
            body_bytes:     bytes[pos + len..].to_vec(),
            all_bytes:      bytes.to_vec(),
        },
        None => RawPart {
            header_bytes:   bytes.to_vec(),
            body_bytes:     Vec::new(),
            all_bytes:      bytes.to_vec(),
        },
    }
}

/// Split a multipart body on `boundary`, returning each body part with its exact on-wire bytes.
///
/// The closing `--boundary--` delimiter and any epilogue after it are discarded. A preamble
/// before the first delimiter (permitted by RFC 2046, unused by conforming AS2 senders) is also
/// discarded.
pub fn split_multipart(raw: &[u8], boundary: &str) -> Outcome<Vec<RawPart>> {
    let delim = fmt!("--{}", boundary);
    let delim_bytes = delim.as_bytes();

    let mut positions: Vec<(usize, bool)> = Vec::new();
    let mut i = 0;
    while let Some(found) = find_from(raw, delim_bytes, i) {
        let at_line_start = found == 0 || raw[found - 1] == b'\n';
        let after = found + delim_bytes.len();
        if at_line_start {
            let is_final = raw.get(after..after + 2) == Some(b"--");
            positions.push((found, is_final));
            i = after;
        } else {
            i = found + 1;
        }
    }

    if positions.len() < 2 {
        return Err(err!(errmsg!(
            "Could not find at least two '--{}' boundary delimiters in the multipart body.",
            boundary,
        ), Invalid, Missing, Input));
    }

    let mut parts = Vec::new();
    for w in positions.windows(2) {
        let (start, is_final) = w[0];
        if is_final {
            break;
        }
        let (next_start, _) = w[1];
        let line_end = match find_from(raw, b"\n", start) {
            Some(p) => p + 1,
            None => return Err(err!(errmsg!(
                "Boundary delimiter line at offset {} is not newline-terminated.", start,
            ), Invalid, Input)),
        };
        let mut part_end = next_start;
        if part_end >= 2 && &raw[part_end - 2..part_end] == b"\r\n" {
            part_end -= 2;
        } else if part_end >= 1 && raw[part_end - 1] == b'\n' {
            part_end -= 1;
        }
        if line_end > part_end {
            return Err(err!(errmsg!(
                "Multipart boundary delimiters at offsets {} and {} enclose no content.",
                start, next_start,
            ), Invalid, Input));
        }
        parts.push(split_header_body(&raw[line_end..part_end]));
    }
    Ok(parts)
}

/// Decode a [`RawPart`]'s header block into a [`MimePart`]; `body` remains the exact on-wire
/// bytes (the caller base64-decodes if `Content-Transfer-Encoding: base64` applies).
pub fn parse_part(raw: &RawPart) -> Outcome<MimePart> {
    let header_str = String::from_utf8_lossy(&raw.header_bytes).into_owned();
    let headers = res!(Headers::parse_block(&header_str));
    Ok(MimePart::new(headers, raw.body_bytes.clone()))
}

/// Decode a standalone (non-multipart) part's on-wire bytes, e.g. the cleartext yielded by
/// decrypting a `pkcs7-mime` envelope, which is itself a full header-block-plus-body part (
/// step 4 "Replace working part with the decrypted inner MIME").
pub fn parse_bytes(bytes: &[u8]) -> Outcome<MimePart> {
    parse_part(&split_header_body(bytes))
}

/// Decode a signature attachment part's body, base64-decoding it if so marked.
fn decode_signature_part(sig_part: &MimePart) -> Outcome<Vec<u8>> {
    let is_base64 = sig_part.headers.get("Content-Transfer-Encoding")
        .map(|v| v.eq_ignore_ascii_case("base64"))
        .unwrap_or(false);
    if is_base64 {
        let stripped: String = sig_part.body.iter()
            .filter(|b| !b.is_ascii_whitespace())
            .map(|b| *b as char)
            .collect();
        Ok(res!(base64::decode(&stripped), Decode, Invalid))
    } else {
        Ok(sig_part.body.clone())
    }
}

/// Locate the signed part and its detached signature inside a `multipart/signed` body, scanning
/// `boundary` on the original byte stream, returning both verification candidates named
/// for a two-mode verify: the exact on-wire bytes of the signed part, and a locally-canonicalised
/// reconstruction (CRLF line endings, single trailing newline), plus the decoded detached
/// signature bytes.
pub fn extract_signed_parts(raw: &[u8], boundary: &str) -> Outcome<(Vec<u8>, Vec<u8>, Vec<u8>)> {
    let parts = res!(split_multipart(raw, boundary));
    if parts.len() != 2 {
        return Err(err!(errmsg!(
            "A 'multipart/signed' body must have exactly 2 parts, found {}.", parts.len(),
        ), Invalid, Size));
    }
    let raw_bytes = parts[0].all_bytes.clone();
    let canon_bytes = canon::canonicalise(&raw_bytes);
    let sig_part = res!(parse_part(&parts[1]));
    let sig_bytes = res!(decode_signature_part(&sig_part));
    Ok((raw_bytes, canon_bytes, sig_bytes))
}

/// Locate the `(signed-part-bytes, signature-bytes)` pair inside a `multipart/signed` body,
/// returning only the canonicalised signed-part candidate; used by callers (e.g. the MIC
/// input) that only ever want the canonical form.
pub fn extract_signed_and_signature(raw: &[u8], boundary: &str) -> Outcome<(Vec<u8>, Vec<u8>)> {
    let (_raw, canon, sig) = res!(extract_signed_parts(raw, boundary));
    Ok((canon, sig))
}

/// Serialise `parts` as a multipart body with the given `boundary`, using `eol` as the line
/// terminator throughout.
pub fn serialise_multipart(parts: &[MimePart], boundary: &str, eol: &str) -> Vec<u8> {
    serialise_raw_parts(&parts.iter().map(|p| p.to_bytes(eol)).collect::<Vec<_>>(), boundary, eol)
}

/// Serialise already-serialised part bytes (header block + blank line + body each) as a
/// multipart body. Used when a part's bytes must be the exact ones a signature or digest was
/// computed over rather than a fresh re-serialisation of a [`MimePart`], which
/// [`serialise_multipart`] would produce instead.
pub fn serialise_raw_parts(parts: &[Vec<u8>], boundary: &str, eol: &str) -> Vec<u8> {
    let mut out = Vec::new();
    for part in parts {
        out.extend_from_slice(b"--");
        out.extend_from_slice(boundary.as_bytes());
        out.extend_from_slice(eol.as_bytes());
        out.extend_from_slice(part);
        out.extend_from_slice(eol.as_bytes());
    }
    out.extend_from_slice(b"--");
    out.extend_from_slice(boundary.as_bytes());
    out.extend_from_slice(b"--");
    out.extend_from_slice(eol.as_bytes());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::Headers;

    fn sample(boundary: &str) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(format!(
            "--{b}\r\nContent-Type: application/EDI-X12\r\n\r\nISA*payload*\r\n--{b}\r\nContent-Type: application/pkcs7-signature\r\nContent-Transfer-Encoding: base64\r\n\r\n{sig}\r\n--{b}--\r\n",
            b = boundary,
            sig = base64::encode(b"fake-signature-bytes"),
        ).as_bytes());
        out
    }

    #[test]
    fn splits_two_parts() -> Outcome<()> {
        let raw = sample("B1");
        let parts = res!(split_multipart(&raw, "B1"));
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].body_bytes, b"ISA*payload*".to_vec());
        Ok(())
    }

    #[test]
    fn extracts_signed_bytes_and_decodes_signature() -> Outcome<()> {
        let raw = sample("B1");
        let (signed, sig) = res!(extract_signed_and_signature(&raw, "B1"));
        assert!(signed.ends_with(b"ISA*payload*\r\n"));
        assert_eq!(sig, b"fake-signature-bytes".to_vec());
        Ok(())
    }

    #[test]
    fn serialise_raw_parts_preserves_exact_bytes() -> Outcome<()> {
        let part0 = b"Content-Type: application/EDI-X12\r\n\r\nISA*payload*\r\n".to_vec();
        let part1 = b"Content-Type: application/pkcs7-signature\r\n\r\nsigbytes".to_vec();
        let bytes = serialise_raw_parts(&[part0.clone(), part1.clone()], "B3", "\r\n");
        let parts = res!(split_multipart(&bytes, "B3"));
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].all_bytes, part0);
        Ok(())
    }

    #[test]
    fn serialise_round_trips_through_split() -> Outcome<()> {
        let mut h1 = Headers::new();
        h1.push("Content-Type", "application/EDI-X12");
        let part1 = MimePart::new(h1, b"ISA*00*".to_vec());
        let bytes = serialise_multipart(&[part1], "B2", "\r\n");
        let parts = res!(split_multipart(&bytes, "B2"));
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].body_bytes, b"ISA*00*".to_vec());
        Ok(())
    }
}
