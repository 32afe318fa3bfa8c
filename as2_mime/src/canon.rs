//! Canonicalisation per RFC 1848.
//!
//! Interoperability with other AS2 stacks hinges on this: a signature is computed over, and
//! verified against, a byte-for-byte specific representation of a MIME part. The first choice is
//! always the exact bytes a part arrived in; canonicalisation is the fallback used when building
//! a part locally (outbound) or when raw-bytes verification fails on the way in.

/// Normalise line endings to CRLF and ensure the content ends in exactly one trailing newline.
///
/// - Lone `LF` (not preceded by `CR`) is promoted to `CRLF`.
/// - Existing `CRLF` sequences are left untouched.
/// - Trailing blank lines are collapsed to a single trailing `CRLF`.
pub fn canonicalise(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len() + 16);
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b == b'\n' {
            if out.last() != Some(&b'\r') {
                out.push(b'\r');
            }
            out.push(b'\n');
        } else if b == b'\r' {
            out.push(b'\r');
            if i + 1 < bytes.len() && bytes[i + 1] == b'\n' {
                out.push(b'\n');
                i += 1;
            } else {
                out.push(b'\n');
            }
        } else {
            out.push(b);
        }
        i += 1;
    }
    // Trim all trailing CRLFs then add exactly one back.
    while out.ends_with(b"\r\n") {
        out.truncate(out.len() - 2);
    }
    out.push(b'\r');
    out.push(b'\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promotes_lone_lf_to_crlf() {
        let input = b"ISA*00*          *00\nGS*PO*SENDER\n";
        let out = canonicalise(input);
        assert_eq!(out, b"ISA*00*          *00\r\nGS*PO*SENDER\r\n".to_vec());
    }

    #[test]
    fn collapses_multiple_trailing_newlines_to_one() {
        let input = b"line one\r\nline two\n\n\n";
        let out = canonicalise(input);
        assert_eq!(out, b"line one\r\nline two\r\n".to_vec());
    }

    #[test]
    fn leaves_existing_crlf_untouched() {
        let input = b"a\r\nb\r\n";
        assert_eq!(canonicalise(input), input.to_vec());
    }
}
