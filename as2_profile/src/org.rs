use as2_crypto::Certificate;

/// A local trading identity.
///
/// Owns at most one private signing key and one private decryption key — in practice these are
/// often the same certificate bundle, but a profile may configure distinct ones, so they are
/// kept as separate optional fields rather than assuming reuse.
#[derive(Clone, Debug)]
pub struct Organization {
    pub as2_name:           String,
    pub email:              Option<String>,
    pub sign_cert:          Option<Certificate>,
    pub decrypt_cert:       Option<Certificate>,
    /// The confirmation-message template used in a signed/unsigned MDN's `text/plain` part
    /// when the partner has none of its own. `{status}` is substituted with the human
    /// outcome summary.
    pub mdn_confirm_text:   String,
}

impl Organization {
    pub fn new(as2_name: impl Into<String>) -> Self {
        Self {
            as2_name:           as2_name.into(),
            email:              None,
            sign_cert:          None,
            decrypt_cert:       None,
            mdn_confirm_text:   "The message has been received.".to_string(),
        }
    }

    pub fn with_sign_cert(mut self, cert: Certificate) -> Self {
        self.sign_cert = Some(cert);
        self
    }

    pub fn with_decrypt_cert(mut self, cert: Certificate) -> Self {
        self.decrypt_cert = Some(cert);
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_mdn_confirm_text(mut self, text: impl Into<String>) -> Self {
        self.mdn_confirm_text = text.into();
        self
    }
}
