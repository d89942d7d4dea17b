//! Server-side TLS configuration for the LDAPS listener.
//!
//! Certificate and key loading follows the same `rustls-pemfile` idiom used
//! for outbound TLS elsewhere in this codebase, aimed at a `ServerConfig`
//! instead of a `ClientConfig`.

use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;

use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::ServerConfig;

use crate::error::{ServerError, ServerResult};

pub fn load_server_config(cert_path: &str, key_path: &str) -> ServerResult<Arc<ServerConfig>> {
    let certs = load_certs(cert_path)?;
    let key = load_private_key(key_path)?;

    let config = ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .map_err(|e| ServerError::tls(format!("invalid certificate/key pair: {e}")))?;

    Ok(Arc::new(config))
}

fn load_certs(path: &str) -> ServerResult<Vec<CertificateDer<'static>>> {
    let file = File::open(path).map_err(|e| ServerError::tls(format!("opening {path}: {e}")))?;
    let mut reader = BufReader::new(file);
    rustls_pemfile::certs(&mut reader)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ServerError::tls(format!("parsing certificate {path}: {e}")))
}

fn load_private_key(path: &str) -> ServerResult<PrivateKeyDer<'static>> {
    let file = File::open(path).map_err(|e| ServerError::tls(format!("opening {path}: {e}")))?;
    let mut reader = BufReader::new(file);
    rustls_pemfile::private_key(&mut reader)
        .map_err(|e| ServerError::tls(format!("parsing private key {path}: {e}")))?
        .ok_or_else(|| ServerError::tls(format!("no private key found in {path}")))
}
