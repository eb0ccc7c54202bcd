//! Authentication collaborator abstraction.
//!
//! The identity provider (a hosted auth service in production) is consumed
//! through the [`AuthBackend`] trait. Only the state-machine contract the
//! presentation layer needs is modeled here; the wire protocol belongs to
//! the implementer.

use crate::domain::Result;
use futures_util::future::BoxFuture;

/// Abstraction over the external identity provider.
///
/// Implementations report credential failures through
/// [`MeridianError::Auth`](crate::domain::MeridianError::Auth) so the
/// session layer can surface the reason verbatim.
pub trait AuthBackend: Send + Sync {
    /// Returns the identity of the signed-in user, if any.
    fn current_user(&self) -> Option<String>;

    /// Signs in with email and password.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the provider is
    /// unreachable.
    fn sign_in<'a>(&'a self, email: &'a str, password: &'a str) -> BoxFuture<'a, Result<()>>;

    /// Registers a new account with email and password.
    ///
    /// # Errors
    ///
    /// Returns an error if registration is rejected or the provider is
    /// unreachable.
    fn sign_up<'a>(&'a self, email: &'a str, password: &'a str) -> BoxFuture<'a, Result<()>>;

    /// Signs the current user out. Infallible by contract; providers drop
    /// local session state unconditionally.
    fn sign_out(&self);
}
