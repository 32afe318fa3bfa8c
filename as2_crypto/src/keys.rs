//! Certificate loading.
//!
//! A `Certificate` is polymorphic over two roles, mirroring the way a partner profile can name
//! either a private key bundle (used to sign or decrypt) or a bare public certificate (used to
//! verify or encrypt). Express it as a tagged variant rather than two unrelated types so callers
//! can store whichever one a profile was actually configured with.

use as2_core::prelude::*;

use openssl::{
    pkcs12::Pkcs12,
    pkey::{PKey, Private},
    x509::X509,
};

/// A certificate as provisioned for an Organization or Partner. Certificates arrive
/// pre-provisioned; this type only loads and holds them, it never issues or signs new ones.
#[derive(Clone)]
pub enum Certificate {
    /// A private key bundle (PKCS#12), used by an Organization to sign outbound messages or
    /// decrypt inbound ones.
    Private {
        cert:   X509,
        pkey:   PKey<Private>,
        ca:     Option<X509>,
    },
    /// A bare public certificate, used to verify a partner's signature or encrypt to them.
    Public {
        cert:           X509,
        ca:             Option<X509>,
        verify_chain:   bool,
    },
}

impl Certificate {
    /// Load a private bundle (PKCS#12 DER) protected by `passphrase`, with an optional PEM CA
    /// bundle for chain validation.
    pub fn load_private(
        pkcs12_der:     &[u8],
        passphrase:     &str,
        ca_pem:         Option<&[u8]>,
    )
        -> Outcome<Self>
    {
        let pkcs12 = res!(Pkcs12::from_der(pkcs12_der), Key, Decode);
        let parsed = res!(pkcs12.parse2(passphrase), Key, Decrypt);
        let cert = match parsed.cert {
            Some(cert) => cert,
            None => return Err(err!(
                "Private certificate bundle did not contain a certificate.",
                Key, Missing, Configuration)),
        };
        let pkey = match parsed.pkey {
            Some(pkey) => pkey,
            None => return Err(err!(
                "Private certificate bundle did not contain a private key.",
                Key, Missing, Configuration)),
        };
        let ca = match ca_pem {
            Some(bytes) => Some(res!(X509::from_pem(bytes), Key, Decode)),
            None => parsed.ca.and_then(|stack| stack.into_iter().next()),
        };
        Ok(Self::Private { cert, pkey, ca })
    }

    /// Load a bare public certificate (PEM) with an optional CA bundle (PEM) used when
    /// `verify_chain` is set.
    pub fn load_public(
        cert_pem:       &[u8],
        ca_pem:         Option<&[u8]>,
        verify_chain:   bool,
    )
        -> Outcome<Self>
    {
        let cert = res!(X509::from_pem(cert_pem), Key, Decode);
        let ca = match ca_pem {
            Some(bytes) => Some(res!(X509::from_pem(bytes), Key, Decode)),
            None => None,
        };
        Ok(Self::Public { cert, ca, verify_chain })
    }

    pub fn cert(&self) -> &X509 {
        match self {
            Self::Private { cert, .. } => cert,
            Self::Public { cert, .. } => cert,
        }
    }

    pub fn ca(&self) -> Option<&X509> {
        match self {
            Self::Private { ca, .. } => ca.as_ref(),
            Self::Public { ca, .. } => ca.as_ref(),
        }
    }

    pub fn verify_chain(&self) -> bool {
        match self {
            Self::Private { .. } => true,
            Self::Public { verify_chain, .. } => *verify_chain,
        }
    }

    /// The private key, if this is a private bundle; signing and decryption both require it.
    pub fn private_key(&self) -> Outcome<&PKey<Private>> {
        match self {
            Self::Private { pkey, .. } => Ok(pkey),
            Self::Public { .. } => Err(err!(
                "A public certificate has no private key to sign or decrypt with.",
                Key, Missing, Invalid)),
        }
    }
}
