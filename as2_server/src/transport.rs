//! Outbound HTTP(S) transport: a plain `tokio` + `tokio-rustls` connection, writing a
//! hand-assembled request line/header-block/body and reading the status line and response body
//! back directly.
//!
//! `as2_engine::mdn::HttpSender` is a synchronous trait, since the engine itself is synchronous
//! throughout; this adapter bridges that to the async runtime with `Handle::block_on`.

use as2_core::prelude::*;
use as2_engine::mdn::HttpSender;
use as2_mime::header::Headers;

use std::sync::Arc;

use rustls::{ClientConfig, RootCertStore};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
    runtime::Handle,
};
use tokio_rustls::TlsConnector;

struct ParsedUrl {
    tls:    bool,
    host:   String,
    port:   u16,
    path:   String,
}

fn parse_url(url: &str) -> Outcome<ParsedUrl> {
    let (scheme, rest) = url.split_once("://")
        .ok_or_else(|| err!(errmsg!("URL '{}' is missing a scheme.", url), Invalid, Input))?;
    let tls = match scheme {
        "https" => true,
        "http"  => false,
        other   => return Err(err!(errmsg!("Unsupported URL scheme '{}'.", other), Invalid, Input)),
    };
    let (authority, path) = match rest.find('/') {
        Some(i) => (&rest[..i], &rest[i..]),
        None    => (rest, "/"),
    };
    let (host, port) = match authority.split_once(':') {
        Some((h, p)) => (h.to_string(), p.parse().map_err(|_| err!(errmsg!("Invalid port in '{}'.", url), Invalid, Input))?),
        None => (authority.to_string(), if tls { 443 } else { 80 }),
    };
    Ok(ParsedUrl { tls, host, port, path: path.to_string() })
}

fn client_config(ca_pem: Option<&[u8]>) -> Outcome<ClientConfig> {
    let mut roots = RootCertStore::empty();
    match ca_pem {
        Some(pem) => {
            let mut reader = std::io::BufReader::new(pem);
            for cert in rustls_pemfile::certs(&mut reader) {
                let cert = res!(cert, IO, File, Read);
                let _ = roots.add(cert);
            }
        },
        None => {
            roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        },
    }
    Ok(ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth())
}

async fn post_async(url: &str, headers: &Headers, body: &[u8], https_ca: Option<&[u8]>) -> Outcome<(Headers, Vec<u8>)> {
    let parsed = res!(parse_url(url));

    let mut request = format!("POST {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\nContent-Length: {}\r\n",
        parsed.path, parsed.host, body.len());
    for (name, value) in headers.iter() {
        request.push_str(&format!("{}: {}\r\n", name, value));
    }
    request.push_str("\r\n");

    let mut response_bytes = Vec::new();
    let stream = res!(TcpStream::connect((parsed.host.as_str(), parsed.port)).await, IO, Network);

    if parsed.tls {
        let config = res!(client_config(https_ca));
        let connector = TlsConnector::from(Arc::new(config));
        let server_name = res!(rustls::pki_types::ServerName::try_from(parsed.host.clone())
            .map_err(|e| err!(errmsg!("Invalid server name '{}': {}", parsed.host, e), Invalid, Input)));
        let mut tls_stream = res!(connector.connect(server_name, stream).await, IO, Network);
        res!(tls_stream.write_all(request.as_bytes()).await, IO, Network, Write);
        res!(tls_stream.write_all(body).await, IO, Network, Write);
        res!(tls_stream.read_to_end(&mut response_bytes).await, IO, Network, Read);
    } else {
        let mut stream = stream;
        res!(stream.write_all(request.as_bytes()).await, IO, Network, Write);
        res!(stream.write_all(body).await, IO, Network, Write);
        res!(stream.read_to_end(&mut response_bytes).await, IO, Network, Read);
    }

    parse_response(&response_bytes)
}

fn parse_response(raw: &[u8]) -> Outcome<(Headers, Vec<u8>)> {
    let split_at = raw.windows(4).position(|w| w == b"\r\n\r\n")
        .ok_or_else(|| err!(errmsg!("Response carried no header/body separator."), Invalid, Decode))?;
    let header_block = String::from_utf8_lossy(&raw[..split_at]);
    let body = raw[split_at + 4..].to_vec();

    let mut lines = header_block.lines();
    let status_line = lines.next().unwrap_or("");
    let status_code: u16 = status_line.split_whitespace().nth(1).and_then(|s| s.parse().ok()).unwrap_or(0);
    if !(200..300).contains(&status_code) {
        return Err(err!(errmsg!("Remote returned HTTP status '{}'.", status_line), Invalid, Network));
    }

    let mut headers = Headers::new();
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            headers.push(name.trim(), value.trim());
        }
    }
    Ok((headers, body))
}

/// The reference binary's `HttpSender`: bridges `as2_engine`'s synchronous transport seam onto a
/// tokio runtime handle captured at construction.
pub struct TokioHttpSender {
    handle: Handle,
}

impl TokioHttpSender {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }
}

impl HttpSender for TokioHttpSender {
    fn post(&self, url: &str, headers: &Headers, body: &[u8]) -> Outcome<(Headers, Vec<u8>)> {
        self.handle.block_on(post_async(url, headers, body, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_https_url_with_explicit_port_and_path() -> Outcome<()> {
        let parsed = res!(parse_url("https://as2.example.com:8443/as2/receive"));
        assert!(parsed.tls);
        assert_eq!(parsed.host, "as2.example.com");
        assert_eq!(parsed.port, 8443);
        assert_eq!(parsed.path, "/as2/receive");
        Ok(())
    }

    #[test]
    fn parses_http_url_defaulting_port_and_path() -> Outcome<()> {
        let parsed = res!(parse_url("http://partner.example"));
        assert!(!parsed.tls);
        assert_eq!(parsed.port, 80);
        assert_eq!(parsed.path, "/");
        Ok(())
    }

    #[test]
    fn parse_response_splits_headers_and_body() -> Outcome<()> {
        let raw = b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n\r\nhello";
        let (headers, body) = res!(parse_response(raw));
        assert_eq!(headers.get("Content-Type"), Some("text/plain"));
        assert_eq!(body, b"hello".to_vec());
        Ok(())
    }

    #[test]
    fn parse_response_rejects_non_2xx_status() {
        let raw = b"HTTP/1.1 404 Not Found\r\n\r\n";
        assert!(parse_response(raw).is_err());
    }
}
