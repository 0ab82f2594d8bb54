//! Decoded identity attributes of a validated request

/// Group name that authorization rules must list explicitly to open a
/// route to unauthenticated requests.
pub const ANONYMOUS_GROUP: &str = "anonymous";

/// Identity attributes decoded from a validated token.
///
/// An anonymous request is represented by [`Claims::anonymous`]: empty
/// username, roles and client id, carrying only the [`ANONYMOUS_GROUP`]
/// sentinel so that rules can opt in to public access explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Claims {
    /// Preferred username
    pub username: String,
    /// Group memberships
    pub groups: Vec<String>,
    /// Assigned roles
    pub roles: Vec<String>,
    /// Client the token was issued to
    pub client_id: String,
}

impl Claims {
    /// The synthetic identity of a request without credentials.
    pub fn anonymous() -> Self {
        Self {
            groups: vec![ANONYMOUS_GROUP.to_string()],
            ..Self::default()
        }
    }

    /// Whether this is the synthetic anonymous identity.
    pub fn is_anonymous(&self) -> bool {
        self.username.is_empty()
            && self.client_id.is_empty()
            && self.roles.is_empty()
            && self.groups.iter().all(|g| g == ANONYMOUS_GROUP)
    }

    /// Check membership in a specific group
    pub fn in_group(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g == group)
    }

    /// Check for a specific role
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}
