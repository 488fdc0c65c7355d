// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication provider seam.

use async_trait::async_trait;

use crate::context::AuthIdentity;
use crate::error::AletheiaError;

/// The managed authentication/session provider.
#[async_trait]
pub trait AuthAdapter: Send + Sync {
    /// The currently signed-in identity, if any.
    async fn current_identity(&self) -> Result<Option<AuthIdentity>, AletheiaError>;
}
