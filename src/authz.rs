//! Rule-based authorization over path hierarchies
//!
//! A [`Policy`] is an ordered list of declarative [`Rule`]s with OR
//! semantics: a request is authorized as soon as any rule grants it, and
//! the order of the rules never changes the outcome. Rules match path
//! prefixes, so granting `/res` also covers `/res/123`, unless a
//! `deny_path_substrings` entry vetoes the concrete path.

use serde::{Deserialize, Serialize};

use crate::claims::Claims;

/// A declarative access grant for a set of path prefixes.
///
/// A rule grants a request when all of the following hold:
/// - one of `paths` equals an ancestor of the requested path,
/// - `methods` contains the request method,
/// - no entry of `deny_path_substrings` occurs in the full request path,
/// - at least one non-empty identity predicate (users, groups, roles,
///   clients) matches the request identity.
///
/// A rule whose identity predicates are all empty matches no one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Rule {
    pub paths: Vec<String>,
    pub methods: Vec<String>,
    #[serde(default)]
    pub users: Vec<String>,
    #[serde(default)]
    pub groups: Vec<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub clients: Vec<String>,
    #[serde(default)]
    pub deny_path_substrings: Vec<String>,
}

impl Rule {
    fn identity_matches(&self, claims: &Claims) -> bool {
        // Empty usernames and client ids never match, so an anonymous
        // identity can only be granted through an explicit group sentinel.
        (!claims.username.is_empty() && self.users.iter().any(|u| *u == claims.username))
            || claims.groups.iter().any(|g| self.groups.contains(g))
            || claims.roles.iter().any(|r| self.roles.contains(r))
            || (!claims.client_id.is_empty() && self.clients.iter().any(|c| *c == claims.client_id))
    }
}

/// An ordered rule set with an enable switch.
///
/// Immutable once loaded; reconfiguration replaces the whole value (the
/// validator swaps it atomically behind an `Arc`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Policy {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl Policy {
    /// Check whether an identity may access a resource with a method.
    ///
    /// Pure function over the loaded rules; repeated calls with identical
    /// inputs yield identical results.
    pub fn authorized(&self, resource: &str, method: &str, claims: &Claims) -> bool {
        let candidates = path_ancestors(resource);
        for rule in &self.rules {
            if !rule.methods.iter().any(|m| m == method) {
                continue;
            }
            // Deny substrings veto on the full literal path, not on the
            // ancestor that ends up matching.
            if rule
                .deny_path_substrings
                .iter()
                .any(|s| resource.contains(s.as_str()))
            {
                continue;
            }
            if !rule.identity_matches(claims) {
                continue;
            }
            if candidates.iter().any(|c| rule.paths.contains(c)) {
                return true;
            }
        }
        false
    }
}

/// Decompose a resource path into its ancestors, most specific first:
/// `/a/b/c` -> `["/a/b/c", "/a/b", "/a"]`. The bare root is never a
/// candidate.
fn path_ancestors(resource: &str) -> Vec<String> {
    let segments: Vec<&str> = resource.split('/').skip(1).collect();
    let mut tree = Vec::with_capacity(segments.len());
    for i in (1..=segments.len()).rev() {
        let candidate = format!("/{}", segments[..i].join("/"));
        if candidate != "/" {
            tree.push(candidate);
        }
    }
    tree
}
