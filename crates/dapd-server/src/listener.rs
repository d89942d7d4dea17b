//! Protocol front-end.
//!
//! Two listeners, enabled independently. When both are enabled the
//! plaintext listener is spawned into the background and the TLS listener
//! takes the calling task; with only one enabled, it runs on the calling
//! task. Each accepted connection is serviced by its own spawned task —
//! the entity store is immutable, so no coordination between connections
//! is required.

use std::sync::Arc;

use dapd_auth::hardware_token::HardwareTokenVerifier;
use dapd_config::{LdapListenerConfig, LdapsListenerConfig};
use dapd_directory::EntityStore;
use dapd_proto::message::{BindCredentials, LdapMessage, LdapResult, ProtocolOp};
use dapd_proto::{read_message, write_message, ResultCode};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;

use crate::bind::bind;
use crate::error::ServerResult;
use crate::search::search;
use crate::stats::Stats;
use crate::tls::load_server_config;

pub struct AppState {
    pub store: EntityStore,
    pub hardware_verifier: Option<HardwareTokenVerifier>,
    pub stats: Stats,
    /// TLS-required policy: reject binds arriving over the plaintext
    /// listener.
    pub enforce_tls: bool,
}

/// Per-connection state: just the bound identity.
#[derive(Default)]
struct Connection {
    bound_dn: String,
}

pub async fn run(
    ldap: &LdapListenerConfig,
    ldaps: &LdapsListenerConfig,
    state: Arc<AppState>,
) -> ServerResult<()> {
    match (ldap.enabled, ldaps.enabled) {
        (true, true) => {
            let plaintext_addr = ldap.listen.clone();
            let plaintext_state = state.clone();
            tokio::spawn(async move {
                if let Err(e) = serve_plaintext(&plaintext_addr, plaintext_state).await {
                    tracing::error!(error = %e, "plaintext listener exited");
                }
            });
            serve_tls(&ldaps.listen, &ldaps.cert, &ldaps.key, state).await
        }
        (false, true) => serve_tls(&ldaps.listen, &ldaps.cert, &ldaps.key, state).await,
        (true, false) => serve_plaintext(&ldap.listen, state).await,
        (false, false) => Ok(()),
    }
}

async fn serve_plaintext(addr: &str, state: Arc<AppState>) -> ServerResult<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr, "plaintext listener accepting connections");
    loop {
        let (stream, peer) = listener.accept().await?;
        let state = state.clone();
        tokio::spawn(async move {
            tracing::debug!(%peer, "plaintext connection accepted");
            handle_connection(stream, state, false).await;
        });
    }
}

async fn serve_tls(
    addr: &str,
    cert_path: &str,
    key_path: &str,
    state: Arc<AppState>,
) -> ServerResult<()> {
    let server_config = load_server_config(cert_path, key_path)?;
    let acceptor = TlsAcceptor::from(server_config);
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr, "TLS listener accepting connections");
    loop {
        let (stream, peer) = listener.accept().await?;
        let acceptor = acceptor.clone();
        let state = state.clone();
        tokio::spawn(async move {
            match acceptor.accept(stream).await {
                Ok(tls_stream) => {
                    tracing::debug!(%peer, "TLS connection accepted");
                    handle_connection(tls_stream, state, true).await;
                }
                Err(e) => tracing::warn!(%peer, error = %e, "TLS handshake failed"),
            }
        });
    }
}

async fn handle_connection<S>(mut stream: S, state: Arc<AppState>, is_encrypted: bool)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut conn = Connection::default();

    loop {
        let msg = match read_message(&mut stream).await {
            Ok(Some(msg)) => msg,
            Ok(None) => {
                state.stats.record_close();
                return;
            }
            Err(e) => {
                tracing::warn!(error = %e, "connection read error, closing");
                state.stats.record_close();
                return;
            }
        };

        match msg.op {
            ProtocolOp::BindRequest(req) => {
                let result = handle_bind(&req, &conn, &state, is_encrypted).await;
                if result.code.is_success() {
                    if let BindCredentials::Simple(_) = &req.credentials {
                        conn.bound_dn = req.name.clone();
                    }
                }
                let response = LdapMessage {
                    message_id: msg.message_id,
                    op: ProtocolOp::BindResponse(result),
                };
                if write_message(&mut stream, &response).await.is_err() {
                    state.stats.record_close();
                    return;
                }
            }
            ProtocolOp::SearchRequest(req) => {
                let outcome =
                    search(&conn.bound_dn, &req.base_object, &req.filter, &state.store, &state.stats);
                for entry in &outcome.entries {
                    let entry_msg = LdapMessage {
                        message_id: msg.message_id,
                        op: ProtocolOp::SearchResultEntry(entry.clone()),
                    };
                    if write_message(&mut stream, &entry_msg).await.is_err() {
                        state.stats.record_close();
                        return;
                    }
                }
                let done = LdapMessage {
                    message_id: msg.message_id,
                    op: ProtocolOp::SearchResultDone(LdapResult {
                        code: outcome.code,
                        matched_dn: String::new(),
                        message: String::new(),
                    }),
                };
                if write_message(&mut stream, &done).await.is_err() {
                    state.stats.record_close();
                    return;
                }
            }
            ProtocolOp::UnbindRequest => {
                state.stats.record_close();
                return;
            }
            ProtocolOp::Unsupported => {
                tracing::warn!("unsupported protocol operation, closing connection");
                state.stats.record_close();
                return;
            }
            ProtocolOp::BindResponse(_)
            | ProtocolOp::SearchResultEntry(_)
            | ProtocolOp::SearchResultDone(_) => {
                tracing::warn!("client sent a response-shaped message, closing connection");
                state.stats.record_close();
                return;
            }
        }
    }
}

async fn handle_bind(
    req: &dapd_proto::message::BindRequest,
    _conn: &Connection,
    state: &Arc<AppState>,
    is_encrypted: bool,
) -> LdapResult {
    if state.enforce_tls && !is_encrypted {
        tracing::warn!("bind refused on unencrypted transport");
        return LdapResult::error(ResultCode::InsufficientAccessRights, "TLS required");
    }

    let password = match &req.credentials {
        BindCredentials::Simple(password) => password.clone(),
        BindCredentials::Other => {
            tracing::warn!("non-simple bind rejected (no SASL support)");
            return LdapResult::error(ResultCode::InvalidCredentials, "unsupported auth choice");
        }
    };

    let code = bind(
        &req.name,
        &password,
        &state.store,
        state.hardware_verifier.as_ref(),
        &state.stats,
    )
    .await;

    if code.is_success() {
        LdapResult::success()
    } else {
        LdapResult::error(code, "bind failed")
    }
}
