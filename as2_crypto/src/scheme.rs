//! Algorithm selection for AS2 encryption, signing and MIC digests.
//!
//! An AS2 partner profile names algorithms as lowercase, dash-separated strings (`aes128`,
//! `sha-256`, ...) taken straight off the wire or out of a config file. These enums are the
//! single place that maps those names onto the concrete openssl primitives.

use as2_core::prelude::*;

use openssl::{
    hash::MessageDigest,
    symm::Cipher,
};

use std::{
    fmt,
    str::FromStr,
};

/// Symmetric ciphers RFC 4130 permits for the enveloped-data (encryption) part of a message.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EncryptionAlg {
    DesEde3Cbc,
    DesCbc,
    Aes128Cbc,
    Aes192Cbc,
    Aes256Cbc,
    Rc2_40Cbc,
}

impl fmt::Display for EncryptionAlg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::DesEde3Cbc => "des_ede3_cbc",
            Self::DesCbc     => "des_cbc",
            Self::Aes128Cbc  => "aes_128_cbc",
            Self::Aes192Cbc  => "aes_192_cbc",
            Self::Aes256Cbc  => "aes_256_cbc",
            Self::Rc2_40Cbc  => "rc2_40_cbc",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for EncryptionAlg {
    type Err = Error<ErrTag>;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let norm = s.to_lowercase().replace('-', "_");
        Ok(match norm.as_str() {
            "des_ede3_cbc" | "tripledes_cbc" | "3des" => Self::DesEde3Cbc,
            "des_cbc"                                 => Self::DesCbc,
            "aes_128_cbc" | "aes128"                   => Self::Aes128Cbc,
            "aes_192_cbc" | "aes192"                   => Self::Aes192Cbc,
            "aes_256_cbc" | "aes256"                   => Self::Aes256Cbc,
            "rc2_40_cbc" | "rc2"                       => Self::Rc2_40Cbc,
            _ => return Err(err!(
                errmsg!("Unsupported AS2 encryption algorithm '{}'.", s),
                Invalid, Unimplemented, Configuration)),
        })
    }
}

impl EncryptionAlg {
    pub fn cipher(&self) -> Cipher {
        match self {
            Self::DesEde3Cbc => Cipher::des_ede3_cbc(),
            Self::DesCbc     => Cipher::des_cbc(),
            Self::Aes128Cbc  => Cipher::aes_128_cbc(),
            Self::Aes192Cbc  => Cipher::aes_192_cbc(),
            Self::Aes256Cbc  => Cipher::aes_256_cbc(),
            Self::Rc2_40Cbc  => Cipher::rc2_40_cbc(),
        }
    }
}

/// Digest algorithms used both for signing (`micalg`) and for MIC computation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DigestAlg {
    Sha1,
    Sha256,
    Sha384,
    Sha512,
}

impl fmt::Display for DigestAlg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Sha1   => "sha1",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
        };
        write!(f, "{}", s)
    }
}

impl DigestAlg {
    /// Normalise an on-wire `micalg` token (dashes removed, case-insensitive) and fall back to
    /// `sha1` for anything unrecognised, per the AS2 profile's permissive digest negotiation.
    pub fn normalise(name: &str) -> Self {
        let stripped = name.to_lowercase().replace('-', "");
        match stripped.as_str() {
            "sha256" => Self::Sha256,
            "sha384" => Self::Sha384,
            "sha512" => Self::Sha512,
            _        => Self::Sha1,
        }
    }

    pub fn message_digest(&self) -> MessageDigest {
        match self {
            Self::Sha1   => MessageDigest::sha1(),
            Self::Sha256 => MessageDigest::sha256(),
            Self::Sha384 => MessageDigest::sha384(),
            Self::Sha512 => MessageDigest::sha512(),
        }
    }
}

impl Default for DigestAlg {
    fn default() -> Self { Self::Sha1 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_digest_falls_back_to_sha1() -> Outcome<()> {
        assert_eq!(DigestAlg::normalise("sha-256"), DigestAlg::Sha256);
        assert_eq!(DigestAlg::normalise("md5"), DigestAlg::Sha1);
        assert_eq!(DigestAlg::normalise(""), DigestAlg::Sha1);
        Ok(())
    }

    #[test]
    fn encryption_alg_parses_partner_profile_names() -> Outcome<()> {
        assert_eq!(res!(EncryptionAlg::from_str("aes128")), EncryptionAlg::Aes128Cbc);
        assert_eq!(res!(EncryptionAlg::from_str("des_ede3_cbc")), EncryptionAlg::DesEde3Cbc);
        assert!(EncryptionAlg::from_str("blowfish").is_err());
        Ok(())
    }
}
