//! Search handler.

use dapd_directory::{dn::dn_ends_with, synthesize_group, synthesize_user, EntityStore};
use dapd_proto::filter::{top_level_object_class, Filter};
use dapd_proto::{ResultCode, SearchResultEntry};

use crate::stats::Stats;

pub struct SearchOutcome {
    pub code: ResultCode,
    pub entries: Vec<SearchResultEntry>,
}

impl SearchOutcome {
    fn error(code: ResultCode) -> Self {
        Self { code, entries: Vec::new() }
    }
}

/// Traversal scope derived from the filter's top-level `objectClass` value.
enum Scope {
    UsersOnly,
    GroupsOnly,
    Both,
}

pub fn search(
    bind_dn: &str,
    request_base_dn: &str,
    filter: &Filter,
    store: &EntityStore,
    stats: &Stats,
) -> SearchOutcome {
    stats.record_search_req();

    if bind_dn.is_empty() {
        tracing::warn!("anonymous search rejected");
        return SearchOutcome::error(ResultCode::InsufficientAccessRights);
    }
    let base_dn_suffix = format!(",{}", store.base_dn());
    if !dn_ends_with(bind_dn, &base_dn_suffix) {
        tracing::warn!(bind_dn, "search bind DN outside base DN");
        return SearchOutcome::error(ResultCode::InsufficientAccessRights);
    }

    let scope = match classify(filter) {
        Ok(scope) => scope,
        Err(unsupported) => {
            tracing::warn!(filter = %unsupported, "unsupported filter object class");
            return SearchOutcome::error(ResultCode::OperationsError);
        }
    };

    let mut entries = Vec::new();
    if matches!(scope, Scope::UsersOnly | Scope::Both) {
        for user in store.iterate_users() {
            let entry = synthesize_user(user, store);
            if dn_ends_with(&entry.dn, request_base_dn) {
                entries.push(SearchResultEntry { dn: entry.dn, attributes: entry.attrs });
            }
        }
    }
    if matches!(scope, Scope::GroupsOnly | Scope::Both) {
        for group in store.iterate_groups() {
            let entry = synthesize_group(group, store);
            if dn_ends_with(&entry.dn, request_base_dn) {
                entries.push(SearchResultEntry { dn: entry.dn, attributes: entry.attrs });
            }
        }
    }

    stats.record_search_success();
    SearchOutcome { code: ResultCode::Success, entries }
}

/// Map the filter's top-level `objectClass` value to a traversal scope.
/// `Err` carries the unrecognised value for logging.
fn classify(filter: &Filter) -> Result<Scope, String> {
    match top_level_object_class(filter) {
        None => Ok(Scope::Both),
        Some(value) => match value.to_lowercase().as_str() {
            "posixgroup" | "groupofnames" => Ok(Scope::GroupsOnly),
            "posixaccount" | "inetorgperson" | "person" => Ok(Scope::UsersOnly),
            other => Err(other.to_string()),
        },
    }
}
