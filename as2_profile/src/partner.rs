use as2_crypto::{Certificate, DigestAlg, EncryptionAlg};

use std::fmt;

/// Where an MDN is delivered.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MdnMode {
    Sync,
    Async,
}

impl fmt::Display for MdnMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", match self {
            Self::Sync  => "SYNC",
            Self::Async => "ASYNC",
        })
    }
}

/// The negotiated security contract with a partner. Every field is independently optional
/// because RFC 4130 §2.4.2 defines 16 valid combinations of compress/sign/encrypt/MDN.
#[derive(Clone, Debug, Default)]
pub struct SecurityContract {
    pub compress:           bool,
    pub signature_alg:      Option<DigestAlg>,
    /// The partner's public certificate, used to verify signatures on messages received from
    /// them.
    pub signature_cert:     Option<Certificate>,
    pub encryption_alg:     Option<EncryptionAlg>,
    /// The partner's public certificate, used to encrypt messages sent to them.
    pub encryption_cert:    Option<Certificate>,
    pub mdn_requested:      bool,
    pub mdn_mode:           Option<MdnMode>,
    pub mdn_sign_alg:       Option<DigestAlg>,
}

impl SecurityContract {
    pub fn is_signed(&self) -> bool {
        self.signature_alg.is_some()
    }

    pub fn is_encrypted(&self) -> bool {
        self.encryption_alg.is_some()
    }

    pub fn wants_signed_mdn(&self) -> bool {
        self.mdn_requested && self.mdn_sign_alg.is_some()
    }
}

/// A remote trading partner.
#[derive(Clone, Debug)]
pub struct Partner {
    pub as2_name:               String,
    pub contract:               SecurityContract,
    pub url:                    String,
    pub basic_auth:             Option<(String, String)>,
    /// PEM CA bundle trusted for this partner's HTTPS endpoint.
    pub https_ca:               Option<Vec<u8>>,
    /// Content-Type the outbound payload's initial MIME part is wrapped in, e.g.
    /// `application/EDI-X12`.
    pub content_type:           String,
    /// Whether inbound filenames (Content-Disposition) are honoured, or the message is named
    /// `<message_id>.msg` instead.
    pub keep_filename:          bool,
    pub post_send_command:      Option<String>,
    pub post_receive_command:   Option<String>,
}

impl Partner {
    pub fn new(as2_name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            as2_name:               as2_name.into(),
            contract:               SecurityContract::default(),
            url:                    url.into(),
            basic_auth:             None,
            https_ca:               None,
            content_type:           "application/EDI-X12".to_string(),
            keep_filename:          false,
            post_send_command:      None,
            post_receive_command:   None,
        }
    }

    pub fn with_contract(mut self, contract: SecurityContract) -> Self {
        self.contract = contract;
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn with_keep_filename(mut self, keep: bool) -> Self {
        self.keep_filename = keep;
        self
    }
}
