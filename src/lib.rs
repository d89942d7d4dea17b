//! `dapd_lib` — re-exports used by integration tests under `tests/`.

pub use dapd_auth as auth;
pub use dapd_config as config;
pub use dapd_directory as directory;
pub use dapd_proto as proto;
pub use dapd_server as server;
