//! Role resolution

use crate::models::{Role, User};

/// Role `user` holds in `team_id`, or `None` when they are not a member
///
/// `None` is a plain deny for every caller; it is never an error.
pub fn resolve_role(user: &User, team_id: &str) -> Option<Role> {
    user.membership(team_id).map(|m| m.role)
}
