//! Role-scoped data access rules.
//!
//! Every rule here fails closed: a caller whose role or ownership does not
//! positively match a rule is denied. Handlers call these helpers instead of
//! re-deriving role logic per route.

use crate::models::{Role, User};
use crate::services::{Claims, ServiceError};

/// What a caller may see of the account collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserListingScope {
    /// Every account.
    All,
    /// Only accounts whose counselor field equals the caller id.
    Roster,
    /// The operation does not exist for this role.
    Denied,
}

pub fn user_listing_scope(role: Role) -> UserListingScope {
    match role {
        Role::Admin => UserListingScope::All,
        Role::Counselor => UserListingScope::Roster,
        Role::User => UserListingScope::Denied,
    }
}

/// May `caller` read reports owned by `target`?
///
/// Admins see everyone; counselors only their roster, checked against the
/// target account's counselor field; users only themselves.
pub fn can_view_reports(caller: &Claims, target: &User) -> bool {
    match caller.role {
        Role::Admin => true,
        Role::Counselor => target.counselor.as_deref() == Some(caller.sub.as_str()),
        Role::User => caller.sub == target.id,
    }
}

/// Role and counselor assignment for a privileged create-user call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserSpec {
    pub role: Role,
    pub counselor: Option<String>,
    /// True when the counselor id came from the client and must be checked
    /// against the store (it has to resolve to a counselor-role account).
    pub counselor_needs_validation: bool,
}

/// Decide what account a creator may produce.
///
/// Admins may create any role; when they create a user without naming a
/// counselor they become the counselor themselves, so every user always has
/// an owner. Counselors may only create users, and the assignment is forced
/// to the calling counselor regardless of any supplied id.
pub fn new_user_spec(
    creator_role: Role,
    creator_id: &str,
    requested_role: Option<Role>,
    counselor_id: Option<String>,
) -> Result<NewUserSpec, ServiceError> {
    match creator_role {
        Role::Admin => {
            let role = requested_role.unwrap_or(Role::User);
            if role != Role::User {
                return Ok(NewUserSpec {
                    role,
                    counselor: None,
                    counselor_needs_validation: false,
                });
            }
            match counselor_id {
                Some(id) => Ok(NewUserSpec {
                    role,
                    counselor: Some(id),
                    counselor_needs_validation: true,
                }),
                None => Ok(NewUserSpec {
                    role,
                    counselor: Some(creator_id.to_string()),
                    counselor_needs_validation: false,
                }),
            }
        }
        Role::Counselor => {
            if matches!(requested_role, Some(r) if r != Role::User) {
                return Err(ServiceError::Forbidden(
                    "Counselors can only create users".to_string(),
                ));
            }
            Ok(NewUserSpec {
                role: Role::User,
                counselor: Some(creator_id.to_string()),
                counselor_needs_validation: false,
            })
        }
        Role::User => Err(ServiceError::Forbidden(
            "Not authorized to create users".to_string(),
        )),
    }
}
