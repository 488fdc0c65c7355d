// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles a signed-in session, a temp SQLite store wired to
//! a change feed, a mock provider behind the analysis gateway, and the
//! default configuration.

use std::sync::Arc;

use aletheia_bus::ChangeFeed;
use aletheia_config::model::{AletheiaConfig, StorageConfig};
use aletheia_core::{AletheiaError, AuthIdentity, SessionContext, StorageAdapter, UserId};
use aletheia_gateway::AnalysisGateway;
use aletheia_storage::SqliteStorage;

use crate::mock_provider::MockProvider;

/// Identity every harness session is signed in as.
pub const TEST_USER: &str = "test-user";

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    responses: Vec<String>,
    config: AletheiaConfig,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            responses: Vec::new(),
            config: AletheiaConfig::default(),
        }
    }

    /// Set mock provider responses.
    pub fn with_mock_responses<I, S>(mut self, responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.responses = responses.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the default configuration. The storage section is ignored.
    pub fn with_config(mut self, config: AletheiaConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(self) -> Result<TestHarness, AletheiaError> {
        let temp_dir = tempfile::TempDir::new().map_err(AletheiaError::storage)?;
        let db_path = temp_dir.path().join("test.db");

        let mut config = self.config;
        config.storage = StorageConfig {
            database_path: db_path.to_string_lossy().to_string(),
            wal_mode: true,
        };

        let feed = ChangeFeed::default();
        let storage = SqliteStorage::with_feed(config.storage.clone(), feed.clone());
        storage.initialize().await?;
        let storage: Arc<dyn StorageAdapter> = Arc::new(storage);

        let mock_provider = Arc::new(MockProvider::with_responses(self.responses));
        let gateway = Arc::new(
            AnalysisGateway::new(mock_provider.clone())
                .with_persona(config.chat.persona_name.clone())
                .with_history_window(config.chat.history_window),
        );

        let session = SessionContext::signed_in(AuthIdentity::new(TEST_USER));

        Ok(TestHarness {
            mock_provider,
            gateway,
            storage,
            feed,
            session,
            config,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment with mock adapters and temp storage.
pub struct TestHarness {
    /// The mock completion provider.
    pub mock_provider: Arc<MockProvider>,
    /// Analysis gateway over the mock provider.
    pub gateway: Arc<AnalysisGateway>,
    /// SQLite storage adapter (temp DB, cleaned up on drop).
    pub storage: Arc<dyn StorageAdapter>,
    /// Feed the storage adapter publishes on.
    pub feed: ChangeFeed,
    /// Signed in as [`TEST_USER`].
    pub session: SessionContext,
    pub config: AletheiaConfig,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// A harness with default settings and no queued replies.
    pub async fn new() -> Result<Self, AletheiaError> {
        Self::builder().build().await
    }

    pub fn user_id(&self) -> UserId {
        UserId(TEST_USER.to_string())
    }
}
