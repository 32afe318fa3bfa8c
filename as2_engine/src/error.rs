//! Engine-level failure kinds and the `adv_status` table.
//!
//! `As2Fault` is what the inbound pipeline and MDN engine actually persist and report; each
//! pipeline step maps its own upstream `as2_crypto`/`as2_mime` error to the fault it represents
//! at the call site, since only the caller knows which step failed. The table below is
//! authoritative, so nothing downstream re-derives an `adv_status` string from a message.

/// The seven classified failure kinds, each carrying its own `adv_status` wire token.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum As2Fault {
    PartnerNotFound,
    InsufficientSecurity,
    DecryptionFailed,
    InvalidSignature,
    DecompressionFailed,
    DuplicateDocument,
    UnexpectedError,
}

impl As2Fault {
    /// The MDN `Disposition:` failure token and persisted Message `adv_status`.
    pub fn adv_status(&self) -> &'static str {
        match self {
            Self::PartnerNotFound       => "unknown-trading-partner",
            Self::InsufficientSecurity  => "insufficient-message-security",
            Self::DecryptionFailed      => "decryption-failed",
            Self::InvalidSignature      => "integrity-check-failed",
            Self::DecompressionFailed   => "decompression-failed",
            Self::DuplicateDocument     => "duplicate-document",
            Self::UnexpectedError       => "unexpected-processing-error",
        }
    }

    /// A short, operator-facing sentence describing the fault; distinct from `adv_status`,
    /// which is the fixed wire token an interoperating AS2 stack parses (Message's
    /// `status_message` field vs its `adv_status` field).
    pub fn status_message(&self) -> &'static str {
        match self {
            Self::PartnerNotFound =>
                "The AS2-From/AS2-To headers did not resolve to a known organization/partner pair.",
            Self::InsufficientSecurity =>
                "The partner profile requires encryption and/or a signature the message did not carry.",
            Self::DecryptionFailed =>
                "The CMS enveloped-data content could not be decrypted.",
            Self::InvalidSignature =>
                "Neither raw-bytes nor canonicalised signature verification succeeded.",
            Self::DecompressionFailed =>
                "The CMS compressed-data content was corrupt.",
            Self::DuplicateDocument =>
                "A prior Message already exists for this organization/partner/Message-ID.",
            Self::UnexpectedError =>
                "An unanticipated failure occurred while processing the message.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adv_status_table_matches_wire_tokens() {
        assert_eq!(As2Fault::PartnerNotFound.adv_status(), "unknown-trading-partner");
        assert_eq!(As2Fault::InsufficientSecurity.adv_status(), "insufficient-message-security");
        assert_eq!(As2Fault::DecryptionFailed.adv_status(), "decryption-failed");
        assert_eq!(As2Fault::InvalidSignature.adv_status(), "integrity-check-failed");
        assert_eq!(As2Fault::DecompressionFailed.adv_status(), "decompression-failed");
        assert_eq!(As2Fault::DuplicateDocument.adv_status(), "duplicate-document");
        assert_eq!(As2Fault::UnexpectedError.adv_status(), "unexpected-processing-error");
    }
}
