//! Reference AS2 server binary: load configuration, bootstrap the data directory, start the
//! HTTP receive endpoint and the background retry/async coordinator.
#![forbid(unsafe_code)]

use as2_core::prelude::*;

use std::{fs::File, io::BufReader, net::SocketAddr, path::Path, sync::Arc, time::Duration};

use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use tokio_rustls::TlsAcceptor;

fn load_tls_config(cert_path: &str, key_path: &str) -> Outcome<rustls::ServerConfig> {
    let cert_file = res!(File::open(cert_path), IO, File, Read);
    let mut cert_reader = BufReader::new(cert_file);
    let certs: std::result::Result<Vec<CertificateDer>, _> = rustls_pemfile::certs(&mut cert_reader).collect();
    let certs = res!(certs, IO, File, Read);

    let key_file = res!(File::open(key_path), IO, File, Read);
    let mut key_reader = BufReader::new(key_file);
    let keys: std::result::Result<Vec<PrivatePkcs8KeyDer>, _> = rustls_pemfile::pkcs8_private_keys(&mut key_reader).collect();
    let keys = res!(keys, IO, File, Read);
    let private_key: PrivateKeyDer<'_> = match keys.into_iter().next() {
        Some(k) => k.into(),
        None => return Err(err!(errmsg!("No private key found in '{}'.", key_path), Missing, Input)),
    };

    let server_config = res!(
        rustls::ServerConfig::builder().with_no_client_auth().with_single_cert(certs, private_key),
        Init, Invalid,
    );
    Ok(server_config)
}

fn main() -> Outcome<()> {
    let mut log_cfg = get_log_config!();
    log_cfg.file = None;
    set_log_config!(log_cfg);

    let config_path = std::env::var("AS2_CONFIG").unwrap_or_else(|_| "as2.toml".to_string());
    let cfg = res!(as2_server::cfg::Config::load(Path::new(&config_path)));
    {
        let mut unlocked_cfg = lock_write!(LOG.cfg);
        unlocked_cfg.level = res!(LogLevel::from_str(&cfg.log_level));
    }

    let runtime = res!(tokio::runtime::Builder::new_multi_thread().enable_all().build(), Init, IO);
    let handle = runtime.handle().clone();

    let outcome = runtime.block_on(async move {
        let ctx = res!(as2_server::context::bootstrap(&cfg));
        let addr: SocketAddr = res!(format!("{}:{}", cfg.host, cfg.port).parse(), Invalid, Input);

        as2_server::http::spawn_coordinator(ctx.clone(), handle, Duration::from_secs(60));

        if cfg.tls_enabled() {
            let cert_path = cfg.ssl_cert_path.as_ref().unwrap();
            let key_path = cfg.ssl_key_path.as_ref().unwrap();
            let tls_config = res!(load_tls_config(cert_path, key_path));
            let acceptor = TlsAcceptor::from(Arc::new(tls_config));
            res!(as2_server::http::serve_tls(addr, ctx, acceptor).await);
        } else {
            res!(as2_server::http::serve(addr, ctx).await);
        }
        Ok(())
    });

    log_finish_wait!();
    outcome
}
