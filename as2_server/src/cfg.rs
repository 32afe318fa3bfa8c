//! Server configuration, loaded in order of increasing
//! precedence: compiled defaults, an optional flat `as2.toml` file, then environment variables.
//!
//! `as2.toml` here is read as a flat `key = value` line list rather than full TOML, since the
//! option set is flat (see DESIGN.md).

use as2_core::prelude::*;

use std::{collections::HashMap, fs, path::Path, time::Duration};

/// `AS2HOST/AS2PORT/AS2URI/MDNURL/ASYNCMDNWAIT/MAXRETRIES/MAXARCHDAYS/LOGLEVEL` plus the TLS
/// cert/key paths.
#[derive(Clone, Debug)]
pub struct Config {
    pub host:               String,
    pub port:               u16,
    pub uri:                String,
    pub mdn_url:            String,
    pub async_mdn_wait:     Duration,
    pub max_retries:        u32,
    pub max_arch_days:      u32,
    pub log_level:          String,
    pub ssl_cert_path:      Option<String>,
    pub ssl_key_path:       Option<String>,
    /// Root directory artifact storage is rooted under (not itself a named config option, but
    /// needed to construct `as2_store::FileArtifactStore`).
    pub data_dir:           String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host:           "0.0.0.0".to_string(),
            port:           8080,
            uri:            "/as2".to_string(),
            mdn_url:        String::new(),
            async_mdn_wait: Duration::from_secs(60 * 60 * 24),
            max_retries:    5,
            max_arch_days:  90,
            log_level:      "info".to_string(),
            ssl_cert_path:  None,
            ssl_key_path:   None,
            data_dir:       "./data".to_string(),
        }
    }
}

impl Config {
    pub fn receive_url(&self) -> String {
        fmt!("http{}://{}:{}{}", if self.tls_enabled() { "s" } else { "" }, self.host, self.port, self.uri)
    }

    pub fn tls_enabled(&self) -> bool {
        self.ssl_cert_path.is_some() && self.ssl_key_path.is_some()
    }

    /// Load defaults, then overlay `path` (if it exists) and the process environment.
    pub fn load(path: &Path) -> Outcome<Self> {
        let mut cfg = Self::default();
        if path.exists() {
            let text = res!(fs::read_to_string(path), IO, File, Read);
            cfg.apply_map(&parse_flat_kv(&text));
        }
        cfg.apply_env();
        Ok(cfg)
    }

    fn apply_map(&mut self, map: &HashMap<String, String>) {
        if let Some(v) = map.get("AS2HOST")     { self.host = v.clone(); }
        if let Some(v) = map.get("AS2PORT")     { if let Ok(n) = v.parse() { self.port = n; } }
        if let Some(v) = map.get("AS2URI")      { self.uri = v.clone(); }
        if let Some(v) = map.get("MDNURL")      { self.mdn_url = v.clone(); }
        if let Some(v) = map.get("ASYNCMDNWAIT") { if let Ok(n) = v.parse() { self.async_mdn_wait = Duration::from_secs(n * 60); } }
        if let Some(v) = map.get("MAXRETRIES")  { if let Ok(n) = v.parse() { self.max_retries = n; } }
        if let Some(v) = map.get("MAXARCHDAYS") { if let Ok(n) = v.parse() { self.max_arch_days = n; } }
        if let Some(v) = map.get("LOGLEVEL")    { self.log_level = v.clone(); }
        if let Some(v) = map.get("AS2_SSL_CERT") { self.ssl_cert_path = Some(v.clone()); }
        if let Some(v) = map.get("AS2_SSL_KEY")  { self.ssl_key_path = Some(v.clone()); }
        if let Some(v) = map.get("AS2_DATA_DIR") { self.data_dir = v.clone(); }
    }

    fn apply_env(&mut self) {
        let mut map = HashMap::new();
        for key in [
            "AS2HOST", "AS2PORT", "AS2URI", "MDNURL", "ASYNCMDNWAIT", "MAXRETRIES",
            "MAXARCHDAYS", "LOGLEVEL", "AS2_SSL_CERT", "AS2_SSL_KEY", "AS2_DATA_DIR",
        ] {
            if let Ok(v) = std::env::var(key) {
                map.insert(key.to_string(), v);
            }
        }
        self.apply_map(&map);
    }
}

/// Parse `KEY = value` / `KEY=value` lines, ignoring blanks and `#`-comments. Not a TOML parser;
/// this config's option set is a flat string/number table, so a line-oriented reader covers it
/// without a new parsing dependency.
fn parse_flat_kv(text: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            let value = value.trim().trim_matches('"').to_string();
            map.insert(key.trim().to_string(), value);
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_defaults() {
        std::env::set_var("AS2PORT", "9191");
        let mut cfg = Config::default();
        cfg.apply_env();
        assert_eq!(cfg.port, 9191);
        std::env::remove_var("AS2PORT");
    }

    #[test]
    fn flat_kv_parses_quoted_and_bare_values() {
        let map = parse_flat_kv("AS2HOST = \"0.0.0.0\"\nAS2PORT=8443\n# a comment\n\nMAXRETRIES = 7");
        assert_eq!(map.get("AS2HOST").map(String::as_str), Some("0.0.0.0"));
        assert_eq!(map.get("AS2PORT").map(String::as_str), Some("8443"));
        assert_eq!(map.get("MAXRETRIES").map(String::as_str), Some("7"));
    }

    #[test]
    fn receive_url_reflects_tls_state() {
        let mut cfg = Config::default();
        cfg.host = "example.com".to_string();
        cfg.port = 8080;
        cfg.uri = "/as2".to_string();
        assert_eq!(cfg.receive_url(), "http://example.com:8080/as2");
        cfg.ssl_cert_path = Some("cert.pem".to_string());
        cfg.ssl_key_path = Some("key.pem".to_string());
        assert_eq!(cfg.receive_url(), "https://example.com:8080/as2");
    }
}
