//! An ordered, case-insensitive header list.
//!
//! AS2 introduces a long tail of custom headers (`AS2-From`, `AS2-To`, `Disposition-Notification-
//! Options`, `Receipt-Delivery-Option`, `EDIINT-Features`, ...) that sit alongside standard MIME
//! and HTTP fields. A closed, enum-of-known-names model is the right shape for a general HTTP
//! stack, but the wrong one here: most of what this codec reads and writes is not in any fixed
//! catalogue. So this module folds continuation lines, splits the first `:`, and stores every
//! field verbatim, representing every header the same way, as an ordered name/value pair, so a
//! caller never needs to teach this crate a new header name.

use as2_core::prelude::*;

use std::fmt;

/// An ordered, duplicate-preserving header list with case-insensitive lookup.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push<S1: Into<String>, S2: Into<String>>(&mut self, name: S1, val: S2) {
        self.0.push((name.into(), val.into()));
    }

    pub fn with<S1: Into<String>, S2: Into<String>>(mut self, name: S1, val: S2) -> Self {
        self.push(name, val);
        self
    }

    /// First value matching `name`, case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.0.iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn remove(&mut self, name: &str) {
        self.0.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
    }

    pub fn set<S1: Into<String>, S2: Into<String>>(&mut self, name: S1, val: S2) {
        let name = name.into();
        self.remove(&name);
        self.push(name, val);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render as a header block using `eol` as the line terminator, with a trailing `eol` after
    /// the last field (but no blank-line separator — callers append that themselves before a
    /// body, as the outbound builder's "headers are joined `Key: Value\n`" convention leaves the
    /// blank-line/body boundary to its caller).
    pub fn to_block(&self, eol: &str) -> String {
        let mut out = String::new();
        for (k, v) in &self.0 {
            out.push_str(k);
            out.push_str(": ");
            out.push_str(v);
            out.push_str(eol);
        }
        out
    }

    /// Parse an unfolded header block (lines already joined on continuation whitespace are not
    /// required; this performs the unfolding itself per RFC 5322 §2.2.3).
    pub fn parse_block(raw: &str) -> Outcome<Self> {
        let mut headers = Self::new();
        let mut pending: Option<(String, String)> = None;
        for line in raw.split(['\n']) {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.is_empty() {
                continue;
            }
            if line.starts_with(' ') || line.starts_with('\t') {
                match &mut pending {
                    Some((_, v)) => {
                        v.push(' ');
                        v.push_str(line.trim());
                    },
                    None => return Err(err!(errmsg!(
                        "Header block starts with a continuation line: '{}'.", line,
                    ), Invalid, Input)),
                }
                continue;
            }
            if let Some((name, val)) = pending.take() {
                headers.push(name, val);
            }
            match line.split_once(':') {
                Some((name, val)) => pending = Some((name.trim().to_string(), val.trim().to_string())),
                None => return Err(err!(errmsg!(
                    "Header line '{}' has no ':' separator.", line,
                ), Invalid, Input)),
            }
        }
        if let Some((name, val)) = pending.take() {
            headers.push(name, val);
        }
        Ok(headers)
    }
}

impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_block("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_and_unfolds_continuation_lines() -> Outcome<()> {
        let raw = "Content-Type: multipart/signed;\r\n protocol=\"application/pkcs7-signature\";\r\n micalg=sha1\r\nAS2-From: \"Acme Corp\"\r\n";
        let headers = res!(Headers::parse_block(raw));
        assert_eq!(
            headers.get("Content-Type"),
            Some("multipart/signed; protocol=\"application/pkcs7-signature\"; micalg=sha1"),
        );
        assert_eq!(headers.get("as2-from"), Some("\"Acme Corp\""));
        Ok(())
    }

    #[test]
    fn get_is_case_insensitive_and_preserves_order() {
        let mut h = Headers::new();
        h.push("AS2-From", "acme");
        h.push("AS2-To", "bigco");
        assert_eq!(h.get("as2-to"), Some("bigco"));
        let names: Vec<&str> = h.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["AS2-From", "AS2-To"]);
    }
}
