use crate::{
    content_type::ContentType,
    header::Headers,
};

use as2_core::prelude::*;

use std::str::FromStr;

/// A decoded MIME body part: headers plus body bytes.
///
/// Unlike [`crate::multipart::RawPart`], the body here may already have been through a decode
/// step (base64, etc.) by the caller; `MimePart` itself does not assume an encoding. Use
/// [`crate::multipart::split_multipart`] when byte-for-byte fidelity with the original wire
/// bytes is required (signed parts).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MimePart {
    pub headers:    Headers,
    pub body:       Vec<u8>,
}

impl MimePart {
    pub fn new(headers: Headers, body: Vec<u8>) -> Self {
        Self { headers, body }
    }

    pub fn content_type(&self) -> Outcome<ContentType> {
        match self.headers.get("Content-Type") {
            Some(v) => ContentType::from_str(v),
            None => Err(err!(errmsg!(
                "MIME part has no Content-Type header."), Missing, Invalid)),
        }
    }

    pub fn content_disposition_filename(&self) -> Option<String> {
        let cd = self.headers.get("Content-Disposition")?;
        for seg in cd.split(';').skip(1) {
            let seg = seg.trim();
            if let Some((k, v)) = seg.split_once('=') {
                if k.trim().eq_ignore_ascii_case("filename") {
                    return Some(v.trim().trim_matches('"').to_string());
                }
            }
        }
        None
    }

    /// Serialise as `headers-block` + blank line + `body`, using `eol` as the line terminator.
    pub fn to_bytes(&self, eol: &str) -> Vec<u8> {
        let mut out = self.headers.to_block(eol).into_bytes();
        out.extend_from_slice(eol.as_bytes());
        out.extend_from_slice(&self.body);
        out
    }
}
