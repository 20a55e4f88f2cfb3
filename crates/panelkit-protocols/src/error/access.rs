//! Errors raised by route access gates.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// The route requires a signed-in user.
    #[error("Please log in to continue.")]
    NotAuthenticated,

    /// The user lacks one of the permissions the route requires.
    #[error("You are not authorized to access {0}")]
    NotAuthorized(String),
}
