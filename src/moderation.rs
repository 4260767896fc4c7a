//! Authorization predicates.
//!
//! Two pure rules, kept separate from entity loading so they can be tested
//! exhaustively:
//!
//! - [`can_mutate`] governs content (reviews, comments): the owner or any
//!   Moderator/Admin may edit or delete.
//! - [`can_moderate`] governs moderation-path actions on user accounts and
//!   is evaluated on the *target's* role. Admin accounts are untouchable on
//!   this path, for every actor. Self-service account edits go through a
//!   separate path that never consults this rule.

use crate::orm::users::Role;

/// True iff the acting user owns the resource or holds an elevated role.
/// A `false` result is not an error; callers translate it into
/// [`crate::Error::Forbidden`].
pub fn can_mutate(acting_user_id: i32, acting_role: Role, resource_owner_id: i32) -> bool {
    acting_user_id == resource_owner_id || is_elevated(acting_role)
}

/// True iff `acting_role` may update or delete an account of `target_role`
/// through the moderation endpoints.
pub fn can_moderate(acting_role: Role, target_role: Role) -> bool {
    match target_role {
        Role::Admin => false,
        Role::Moderator => acting_role == Role::Admin,
        Role::User => is_elevated(acting_role),
    }
}

/// Moderator or Admin.
pub fn is_elevated(role: Role) -> bool {
    matches!(role, Role::Moderator | Role::Admin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_mutate_truth_table() {
        // (is_owner, role) -> expected, over all six combinations.
        let cases = [
            (true, Role::User, true),
            (true, Role::Moderator, true),
            (true, Role::Admin, true),
            (false, Role::User, false),
            (false, Role::Moderator, true),
            (false, Role::Admin, true),
        ];

        for (is_owner, role, expected) in cases {
            let owner_id = 1;
            let acting_id = if is_owner { 1 } else { 2 };
            assert_eq!(
                can_mutate(acting_id, role, owner_id),
                expected,
                "owner={} role={:?}",
                is_owner,
                role
            );
        }
    }

    #[test]
    fn can_moderate_denies_admin_targets_for_everyone() {
        for actor in [Role::User, Role::Moderator, Role::Admin] {
            assert!(!can_moderate(actor, Role::Admin), "actor={:?}", actor);
        }
    }

    #[test]
    fn can_moderate_moderator_targets_require_admin() {
        assert!(can_moderate(Role::Admin, Role::Moderator));
        assert!(!can_moderate(Role::Moderator, Role::Moderator));
        assert!(!can_moderate(Role::User, Role::Moderator));
    }

    #[test]
    fn can_moderate_user_targets_allow_elevated_actors() {
        assert!(can_moderate(Role::Admin, Role::User));
        assert!(can_moderate(Role::Moderator, Role::User));
        assert!(!can_moderate(Role::User, Role::User));
    }
}
