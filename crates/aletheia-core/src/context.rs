// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Explicit session context handed to every controller and service.
//!
//! The context is acquired once at startup, refreshed whenever the auth
//! provider reports a change, and torn down on sign-out. Handlers read the
//! identity through [`SessionContext::require`] instead of ambient state.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::info;

use crate::error::AletheiaError;
use crate::traits::AuthAdapter;
use crate::types::UserId;

/// A verified identity from the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthIdentity {
    pub user_id: UserId,
    pub email: Option<String>,
}

impl AuthIdentity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: UserId(user_id.into()),
            email: None,
        }
    }
}

/// Shared, observable handle on the current identity.
///
/// Cloning is cheap; all clones observe the same state.
#[derive(Debug, Clone)]
pub struct SessionContext {
    state: Arc<watch::Sender<Option<AuthIdentity>>>,
}

impl SessionContext {
    /// A context with nobody signed in.
    pub fn signed_out() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { state: Arc::new(tx) }
    }

    /// A context already holding `identity`.
    pub fn signed_in(identity: AuthIdentity) -> Self {
        let (tx, _rx) = watch::channel(Some(identity));
        Self { state: Arc::new(tx) }
    }

    /// Acquires the initial identity from the auth provider.
    pub async fn acquire(auth: &dyn AuthAdapter) -> Result<Self, AletheiaError> {
        let identity = auth.current_identity().await?;
        if let Some(ref id) = identity {
            info!(user_id = %id.user_id, "session acquired");
        }
        let (tx, _rx) = watch::channel(identity);
        Ok(Self { state: Arc::new(tx) })
    }

    /// Applies an auth-state-change event.
    pub fn refresh(&self, identity: Option<AuthIdentity>) {
        self.state.send_replace(identity);
    }

    /// Tears the session down.
    pub fn sign_out(&self) {
        if self.state.send_replace(None).is_some() {
            info!("signed out");
        }
    }

    /// The current identity, if any.
    pub fn current(&self) -> Option<AuthIdentity> {
        self.state.borrow().clone()
    }

    /// The current identity, or [`AletheiaError::Unauthenticated`].
    pub fn require(&self) -> Result<AuthIdentity, AletheiaError> {
        self.current().ok_or(AletheiaError::Unauthenticated)
    }

    /// Shorthand for `require()?.user_id`.
    pub fn user_id(&self) -> Result<UserId, AletheiaError> {
        self.require().map(|id| id.user_id)
    }

    /// Watches for identity changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<AuthIdentity>> {
        self.state.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedAuth(Option<AuthIdentity>);

    #[async_trait]
    impl AuthAdapter for FixedAuth {
        async fn current_identity(&self) -> Result<Option<AuthIdentity>, AletheiaError> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn acquire_reads_identity_from_provider() {
        let ctx = SessionContext::acquire(&FixedAuth(Some(AuthIdentity::new("u1"))))
            .await
            .unwrap();
        assert_eq!(ctx.user_id().unwrap(), UserId("u1".into()));
    }

    #[tokio::test]
    async fn require_fails_when_signed_out() {
        let ctx = SessionContext::acquire(&FixedAuth(None)).await.unwrap();
        assert!(matches!(ctx.require(), Err(AletheiaError::Unauthenticated)));
    }

    #[tokio::test]
    async fn clones_observe_refresh_and_sign_out() {
        let ctx = SessionContext::signed_out();
        let other = ctx.clone();
        let mut rx = ctx.subscribe();

        ctx.refresh(Some(AuthIdentity::new("u2")));
        rx.changed().await.unwrap();
        assert_eq!(other.current().unwrap().user_id.as_str(), "u2");

        other.sign_out();
        assert!(ctx.current().is_none());
    }
}
