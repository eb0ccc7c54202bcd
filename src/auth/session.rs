//! Client-side authentication state machine.
//!
//! [`AuthSession`] wraps an injected [`AuthBackend`] and publishes
//! [`AuthState`] transitions to the presentation layer. Credential
//! validation that does not need the provider (empty fields, the clinic's
//! email-domain allow-list) happens here, before any backend call; the
//! allow-list is a client-side gate, not a server-enforced policy.

use crate::app::ObservableValue;
use crate::auth::backend::AuthBackend;
use std::sync::Arc;

/// Message published when credentials are submitted with an empty field.
const EMPTY_FIELDS_MESSAGE: &str = "Email and password must not be empty";

/// Message published when the email fails the domain allow-list.
const DOMAIN_MESSAGE: &str = "Only members of the clinic may use this app";

/// Authentication state as consumed by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// A user is signed in.
    Authenticated,
    /// No user is signed in.
    Unauthenticated,
    /// A sign-in or sign-up call is in flight.
    Loading,
    /// The last attempt failed; the message is display copy.
    Error(String),
}

/// Authentication session over an injected backend.
///
/// Failures never escape this boundary: every rejection becomes an
/// [`AuthState::Error`] with a displayable message.
pub struct AuthSession {
    backend: Arc<dyn AuthBackend>,
    state: ObservableValue<AuthState>,
    /// Lowercased `@domain` suffix accepted by the allow-list.
    domain_suffix: String,
}

impl AuthSession {
    /// Creates a session and probes the backend for an existing identity.
    ///
    /// `allowed_domain` may be given with or without the leading `@`.
    #[must_use]
    pub fn new(backend: Arc<dyn AuthBackend>, allowed_domain: &str) -> Self {
        let initial = if backend.current_user().is_some() {
            AuthState::Authenticated
        } else {
            AuthState::Unauthenticated
        };
        tracing::debug!(state = ?initial, "auth session initialized");

        Self {
            backend,
            state: ObservableValue::new(initial),
            domain_suffix: format!("@{}", allowed_domain.trim_start_matches('@').to_lowercase()),
        }
    }

    /// Returns a handle to the published auth state.
    #[must_use]
    pub fn states(&self) -> ObservableValue<AuthState> {
        self.state.clone()
    }

    /// Signs in, publishing `Loading` then `Authenticated` or `Error`.
    pub async fn sign_in(&self, email: &str, password: &str) {
        if !self.validate(email, password) {
            return;
        }

        self.state.set(AuthState::Loading);
        match self.backend.sign_in(email, password).await {
            Ok(()) => {
                tracing::debug!("sign-in succeeded");
                self.state.set(AuthState::Authenticated);
            }
            Err(e) => {
                tracing::debug!(error = %e, "sign-in rejected");
                self.state.set(AuthState::Error(e.user_message()));
            }
        }
    }

    /// Registers a new account, publishing the same transitions as sign-in.
    pub async fn sign_up(&self, email: &str, password: &str) {
        if !self.validate(email, password) {
            return;
        }

        self.state.set(AuthState::Loading);
        match self.backend.sign_up(email, password).await {
            Ok(()) => {
                tracing::debug!("sign-up succeeded");
                self.state.set(AuthState::Authenticated);
            }
            Err(e) => {
                tracing::debug!(error = %e, "sign-up rejected");
                self.state.set(AuthState::Error(e.user_message()));
            }
        }
    }

    /// Signs out and publishes `Unauthenticated`.
    pub fn sign_out(&self) {
        self.backend.sign_out();
        tracing::debug!("signed out");
        self.state.set(AuthState::Unauthenticated);
    }

    /// Runs the local checks; publishes `Error` and returns false on reject.
    fn validate(&self, email: &str, password: &str) -> bool {
        if email.is_empty() || password.is_empty() {
            self.state.set(AuthState::Error(EMPTY_FIELDS_MESSAGE.to_string()));
            return false;
        }
        if !email.to_lowercase().ends_with(&self.domain_suffix) {
            tracing::debug!(domain = %self.domain_suffix, "email outside allowed domain");
            self.state.set(AuthState::Error(DOMAIN_MESSAGE.to_string()));
            return false;
        }
        true
    }
}
