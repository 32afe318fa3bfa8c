//! `Content-Type` header values.
//!
//! AS2 traffic uses content types that a closed, fixed `MediaType` enum was never meant to
//! cover: `application/pkcs7-mime; smime-type=enveloped-data`, `application/EDI-X12`,
//! `multipart/signed; protocol=application/pkcs7-signature; micalg=sha1`. Rather than extend a
//! fixed type/subtype enum for every partner's business document type, a `ContentType` here is
//! an ordered `type/subtype` pair plus an ordered parameter list, matching what is actually on
//! the wire.

use as2_core::prelude::*;

use std::fmt;

/// A MIME `Content-Type` value: `type/subtype; param=value; ...`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContentType {
    pub main_type:  String,
    pub sub_type:   String,
    pub params:     Vec<(String, String)>,
}

impl ContentType {
    pub fn new<S1: Into<String>, S2: Into<String>>(main_type: S1, sub_type: S2) -> Self {
        Self {
            main_type:  main_type.into(),
            sub_type:   sub_type.into(),
            params:     Vec::new(),
        }
    }

    pub fn with_param<S1: Into<String>, S2: Into<String>>(mut self, key: S1, val: S2) -> Self {
        self.params.push((key.into(), val.into()));
        self
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn full_type(&self) -> String {
        fmt!("{}/{}", self.main_type, self.sub_type)
    }

    pub fn is_multipart(&self) -> bool {
        self.main_type.eq_ignore_ascii_case("multipart")
    }

    pub fn is(&self, main: &str, sub: &str) -> bool {
        self.main_type.eq_ignore_ascii_case(main) && self.sub_type.eq_ignore_ascii_case(sub)
    }

    pub fn boundary(&self) -> Option<&str> {
        self.param("boundary")
    }

    pub fn smime_type(&self) -> Option<&str> {
        self.param("smime-type")
    }

    pub fn micalg(&self) -> Option<&str> {
        self.param("micalg")
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.main_type, self.sub_type)?;
        for (k, v) in &self.params {
            // Quote parameter values containing ';' or whitespace, as partner stacks commonly do
            // for `name="smime.p7m"`.
            if v.contains(|c: char| c.is_whitespace() || c == ';' || c == '"') {
                write!(f, "; {}=\"{}\"", k, v.replace('"', "\\\""))?;
            } else {
                write!(f, "; {}={}", k, v)?;
            }
        }
        Ok(())
    }
}

impl std::str::FromStr for ContentType {
    type Err = Error<ErrTag>;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut segs = s.split(';');
        let type_pair = match segs.next() {
            Some(t) => t.trim(),
            None => return Err(err!(errmsg!(
                "Empty Content-Type value."), Invalid, Input)),
        };
        let (main_type, sub_type) = match type_pair.split_once('/') {
            Some((a, b)) => (a.trim().to_string(), b.trim().to_string()),
            None => return Err(err!(errmsg!(
                "Content-Type '{}' is missing a '/' between type and subtype.", type_pair,
            ), Invalid, Input)),
        };
        let mut params = Vec::new();
        for seg in segs {
            let seg = seg.trim();
            if seg.is_empty() {
                continue;
            }
            match seg.split_once('=') {
                Some((k, v)) => {
                    let v = v.trim().trim_matches('"');
                    params.push((k.trim().to_lowercase(), v.to_string()));
                },
                None => params.push((seg.to_lowercase(), String::new())),
            }
        }
        Ok(Self { main_type, sub_type, params })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn parses_pkcs7_mime_with_params() -> Outcome<()> {
        let ct = res!(ContentType::from_str(
            "application/pkcs7-mime; smime-type=enveloped-data; name=\"smime.p7m\""));
        assert_eq!(ct.main_type, "application");
        assert_eq!(ct.sub_type, "pkcs7-mime");
        assert_eq!(ct.smime_type(), Some("enveloped-data"));
        assert_eq!(ct.param("name"), Some("smime.p7m"));
        Ok(())
    }

    #[test]
    fn round_trips_multipart_signed() -> Outcome<()> {
        let ct = ContentType::new("multipart", "signed")
            .with_param("protocol", "application/pkcs7-signature")
            .with_param("micalg", "sha1")
            .with_param("boundary", "----=_Part_0_12345");
        let s = ct.to_string();
        let parsed = res!(ContentType::from_str(&s));
        assert_eq!(parsed.boundary(), Some("----=_Part_0_12345"));
        assert_eq!(parsed.micalg(), Some("sha1"));
        Ok(())
    }
}
