//! Role and ownership access rules.
//!
//! Every rule is a pure function of the caller's identity and the target's
//! recorded ownership. Nothing here touches the database or the request;
//! the HTTP layer resolves both and passes plain values in.

use model::entities::user::UserRole;

use crate::error::{AuthError, Result};

/// The authenticated caller, resolved once per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub id: i32,
    pub role: UserRole,
}

impl Caller {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Creating a listing requires the agent (or admin) role.
pub fn require_agent(caller: &Caller) -> Result<()> {
    match caller.role {
        UserRole::Agent | UserRole::Admin => Ok(()),
        UserRole::Buyer => Err(AuthError::Forbidden),
    }
}

/// Mutating a listing (update, delete, photo add/remove) requires being its
/// owning agent, or admin.
pub fn require_property_owner(caller: &Caller, agent_id: i32) -> Result<()> {
    if caller.is_admin() || caller.id == agent_id {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}

/// Viewing or deleting a single inquiry: admin any; buyer only their own;
/// agent only when the inquiry targets one of their listings.
pub fn require_inquiry_access(
    caller: &Caller,
    buyer_id: i32,
    property_agent_id: i32,
) -> Result<()> {
    match caller.role {
        UserRole::Admin => Ok(()),
        UserRole::Buyer if caller.id == buyer_id => Ok(()),
        UserRole::Agent if caller.id == property_agent_id => Ok(()),
        _ => Err(AuthError::Forbidden),
    }
}

/// Which inquiries a caller may list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InquiryScope {
    /// Admin: everything.
    All,
    /// Buyer: inquiries they sent.
    SentBy(i32),
    /// Agent: inquiries on listings they own.
    OnListingsOf(i32),
}

pub fn inquiry_scope(caller: &Caller) -> InquiryScope {
    match caller.role {
        UserRole::Admin => InquiryScope::All,
        UserRole::Buyer => InquiryScope::SentBy(caller.id),
        UserRole::Agent => InquiryScope::OnListingsOf(caller.id),
    }
}
