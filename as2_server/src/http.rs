//! The `Receive(headers, body)` HTTP entry point: a plain `TcpStream`/`TlsAcceptor` accept loop
//! with TLS peek, since this binary serves exactly one route.

use crate::transport::TokioHttpSender;

use as2_core::prelude::*;
use as2_engine::{context::EngineContext, inbound, mdn};
use as2_mime::header::Headers;

use std::{net::SocketAddr, sync::Arc};

use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    runtime::Handle,
};
use tokio_rustls::TlsAcceptor;

/// Read one HTTP/1.1 request off `stream`: request line, headers, and a body sized by
/// `Content-Length` (AS2 requests are never chunked in practice; nothing here handles
/// `Transfer-Encoding`).
async fn read_request<S: AsyncRead + Unpin>(stream: &mut S) -> Outcome<(String, String, Headers, Vec<u8>)> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];
    let header_end = loop {
        let n = res!(stream.read(&mut chunk).await, IO, Network, Read);
        if n == 0 {
            break None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break Some(pos);
        }
        if buf.len() > 16 * 1024 * 1024 {
            return Err(err!(errmsg!("Request header block exceeded 16MiB."), Excessive, Input));
        }
    };
    let header_end = res!(header_end.ok_or_else(|| err!(errmsg!("Connection closed before headers completed."), IO, Network)));

    let header_text = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = header_text.lines();
    let request_line = lines.next().unwrap_or("").to_string();
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or("").to_string();
    let path = parts.next().unwrap_or("/").to_string();

    let mut headers = Headers::new();
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            headers.push(name.trim(), value.trim());
        }
    }

    let content_length: usize = headers.get("Content-Length").and_then(|v| v.parse().ok()).unwrap_or(0);
    let mut body = buf[header_end + 4..].to_vec();
    while body.len() < content_length {
        let n = res!(stream.read(&mut chunk).await, IO, Network, Read);
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }
    if body.len() > content_length {
        body.truncate(content_length);
    }

    Ok((method, path, headers, body))
}

fn write_response(status: u16, reason: &str, headers: &Headers, body: &[u8]) -> Vec<u8> {
    let mut out = format!("HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n", status, reason, body.len());
    for (name, value) in headers.iter() {
        out.push_str(&format!("{}: {}\r\n", name, value));
    }
    out.push_str("\r\n");
    let mut bytes = out.into_bytes();
    bytes.extend_from_slice(body);
    bytes
}

/// Dispatch one parsed request to the engine: `GET` help text, `OPTIONS` allow-list,
/// `POST` business document or asynchronous MDN arrival.
async fn handle(ctx: &EngineContext, method: &str, headers: &Headers, body: &[u8]) -> (u16, &'static str, Headers, Vec<u8>) {
    match method {
        "GET" => (200, "OK", Headers::new().with("Content-Type", "text/plain"),
            b"as2rs: POST an AS2 message to this endpoint.".to_vec()),
        "OPTIONS" => (200, "OK", Headers::new().with("Allow", "POST, GET"), Vec::new()),
        "POST" => handle_post(ctx, headers, body).await,
        _ => (405, "Method Not Allowed", Headers::new(), Vec::new()),
    }
}

async fn handle_post(ctx: &EngineContext, headers: &Headers, body: &[u8]) -> (u16, &'static str, Headers, Vec<u8>) {
    let content_type = headers.get("Content-Type").unwrap_or("").to_lowercase();
    let is_mdn_arrival = (content_type.contains("multipart/report") || content_type.contains("multipart/signed"))
        && !headers.contains("AS2-From");

    if is_mdn_arrival {
        return match mdn::parse(ctx, headers, body) {
            Ok(mdn::ParseOutcome::Applied) =>
                (200, "OK", Headers::new().with("Content-Type", "text/plain"), b"MDN received.".to_vec()),
            Ok(mdn::ParseOutcome::MessageNotFound) =>
                (404, "Not Found", Headers::new(), Vec::new()),
            Err(e) => {
                warn!("Failed to parse an inbound MDN: {}.", e);
                (400, "Bad Request", Headers::new(), Vec::new())
            },
        };
    }

    for required in ["AS2-From", "AS2-To", "Message-ID"] {
        if !headers.contains(required) {
            return (400, "Bad Request", Headers::new(),
                format!("Missing required header: {}", required).into_bytes());
        }
    }

    let outcome = match inbound::process_inbound(ctx, headers, body) {
        Ok(o) => o,
        Err(e) => {
            error!("Unhandled failure processing an inbound message: {}.", e);
            return (500, "Internal Server Error", Headers::new(), Vec::new());
        },
    };

    if !outcome.mdn_requested {
        return (200, "OK", Headers::new(), Vec::new());
    }

    let org = match ctx.profiles.find_organization(&outcome.message.org) {
        Ok(Some(o)) => o,
        _ => return (200, "OK", Headers::new(), Vec::new()),
    };

    match mdn::build(ctx, &org, headers, &outcome.message, outcome.fault) {
        Ok(Some(built)) => (200, "OK", built.headers, built.body),
        Ok(None) => (200, "OK", Headers::new(), Vec::new()),
        Err(e) => {
            warn!("Failed to build the MDN for message '{}': {}.", outcome.message.message_id, e);
            (200, "OK", Headers::new(), Vec::new())
        },
    }
}

async fn serve_connection<S: AsyncRead + AsyncWrite + Unpin>(ctx: Arc<EngineContext>, mut stream: S) {
    let (method, _path, headers, body) = match read_request(&mut stream).await {
        Ok(r) => r,
        Err(e) => {
            debug!("Discarding a connection that did not carry a complete HTTP request: {}.", e);
            return;
        },
    };
    let (status, reason, response_headers, response_body) = handle(&ctx, &method, &headers, &body).await;
    let response = write_response(status, reason, &response_headers, &response_body);
    if let Err(e) = stream.write_all(&response).await {
        warn!("Failed to write the HTTP response: {}.", e);
    }
}

/// Plaintext accept loop.
pub async fn serve(addr: SocketAddr, ctx: Arc<EngineContext>) -> Outcome<()> {
    let listener = res!(TcpListener::bind(addr).await, IO, Network);
    info!("Listening on {} (plaintext).", addr);
    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(pair) => pair,
            Err(e) => {
                error!(err!(e, "TCP accept failed."; IO, Network));
                continue;
            },
        };
        debug!("Accepted connection from {}.", peer);
        let ctx = ctx.clone();
        tokio::spawn(async move {
            serve_connection(ctx, stream).await;
        });
    }
}

/// TLS accept loop, used when `AS2_SSL_CERT`/`AS2_SSL_KEY` are configured. No plaintext-redirect
/// fallback — this binary serves exactly one protocol per listener, chosen once at startup.
pub async fn serve_tls(addr: SocketAddr, ctx: Arc<EngineContext>, acceptor: TlsAcceptor) -> Outcome<()> {
    let listener = res!(TcpListener::bind(addr).await, IO, Network);
    info!("Listening on {} (TLS).", addr);
    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(pair) => pair,
            Err(e) => {
                error!(err!(e, "TCP accept failed."; IO, Network));
                continue;
            },
        };
        let acceptor = acceptor.clone();
        let ctx = ctx.clone();
        tokio::spawn(async move {
            match acceptor.accept(stream).await {
                Ok(tls_stream) => {
                    debug!("Accepted TLS connection from {}.", peer);
                    serve_connection(ctx, tls_stream).await;
                },
                Err(e) => warn!("TLS handshake with {} failed: {}.", peer, e),
            }
        });
    }
}

/// Spawn the retry/async coordinator as a periodic background task.
pub fn spawn_coordinator(ctx: Arc<EngineContext>, handle: Handle, interval: std::time::Duration) {
    tokio::spawn(async move {
        let sender = TokioHttpSender::new(handle);
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            match as2_engine::coordinator::tick(&ctx, &sender) {
                Ok(report) => info!(
                    "Coordinator tick: {} MDNs sent, {} MDNs failed, {} timed out, {} retried, {} failed.",
                    report.mdns_sent, report.mdns_failed, report.messages_timed_out,
                    report.messages_retried, report.messages_failed,
                ),
                Err(e) => error!("Coordinator tick failed: {}.", e),
            }
        }
    });
}
