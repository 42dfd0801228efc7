//! Membership lookup seam.
//!
//! User accounts and organization membership live in the external auth
//! system. The event publishers only need one thing from it: resolving a
//! user id to a display name before an assignment event is published, so
//! subscribers never perform a second lookup.

use std::collections::HashMap;

pub trait MemberDirectory: Send + Sync {
    /// The display name for a workspace member, if known.
    fn display_name(&self, user_id: &str) -> Option<String>;
}

/// Fixed id → name mapping. Used in tests and demo setups; production wires
/// an adapter over the auth service's member listing here.
#[derive(Debug, Default)]
pub struct StaticMembers {
    names: HashMap<String, String>,
}

impl StaticMembers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_member(mut self, user_id: impl Into<String>, name: impl Into<String>) -> Self {
        self.names.insert(user_id.into(), name.into());
        self
    }
}

impl MemberDirectory for StaticMembers {
    fn display_name(&self, user_id: &str) -> Option<String> {
        self.names.get(user_id).cloned()
    }
}
