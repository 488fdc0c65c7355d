// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wires configuration into the concrete adapters every command shares.

use std::sync::Arc;

use aletheia_bus::ChangeFeed;
use aletheia_companion::{
    AnalysisService, ConversationSession, JournalService, MeditationController, Recommender,
    VoiceConversation,
};
use aletheia_config::model::AletheiaConfig;
use aletheia_core::{
    AletheiaError, AuthAdapter, AuthIdentity, SessionContext, SpeechSynthesizer, StorageAdapter,
};
use aletheia_gateway::{AnalysisGateway, GatewayProvider};
use aletheia_insights::Insights;
use aletheia_storage::SqliteStorage;
use aletheia_voice::{CommandPlayer, CommandSynthesizer, LineRecognizer, PrintSynthesizer, VoiceIo};
use async_trait::async_trait;
use tracing::{info, warn};

/// Signs in the single local user named in `app.user_id`.
pub struct LocalAuth {
    user_id: String,
}

impl LocalAuth {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

#[async_trait]
impl AuthAdapter for LocalAuth {
    async fn current_identity(&self) -> Result<Option<AuthIdentity>, AletheiaError> {
        Ok(Some(AuthIdentity::new(self.user_id.clone())))
    }
}

/// Shared handles for one CLI invocation.
pub struct App {
    pub config: AletheiaConfig,
    pub session: SessionContext,
    pub storage: Arc<SqliteStorage>,
    pub feed: ChangeFeed,
    pub gateway: Arc<AnalysisGateway>,
    pub voice: Arc<VoiceIo>,
    pub audio: Arc<CommandPlayer>,
}

impl App {
    /// Opens storage and builds the gateway and voice backends.
    pub async fn init(config: AletheiaConfig) -> Result<Self, AletheiaError> {
        let session = SessionContext::acquire(&LocalAuth::new(config.app.user_id.clone())).await?;

        let feed = ChangeFeed::default();
        let storage = SqliteStorage::with_feed(config.storage.clone(), feed.clone());
        storage.initialize().await?;
        let storage = Arc::new(storage);

        let provider = Arc::new(GatewayProvider::from_config(&config.gateway)?);
        let gateway = Arc::new(
            AnalysisGateway::new(provider)
                .with_persona(config.chat.persona_name.clone())
                .with_history_window(config.chat.history_window),
        );

        let synthesizer: Arc<dyn SpeechSynthesizer> = match CommandSynthesizer::detect(&config.voice)
        {
            Some(tts) => {
                info!(flavor = ?tts.flavor(), "speech synthesizer found");
                Arc::new(tts)
            }
            None => {
                warn!("no speech synthesizer found, replies will be printed");
                Arc::new(PrintSynthesizer)
            }
        };
        let voice = Arc::new(VoiceIo::new(
            Arc::new(LineRecognizer::stdin()),
            synthesizer,
            &config.voice,
        ));
        let audio = Arc::new(CommandPlayer::new(config.voice.player_command.as_deref()));

        Ok(Self {
            config,
            session,
            storage,
            feed,
            gateway,
            voice,
            audio,
        })
    }

    fn store(&self) -> Arc<dyn StorageAdapter> {
        self.storage.clone()
    }

    pub fn conversation(&self) -> Arc<ConversationSession> {
        Arc::new(ConversationSession::new(
            self.session.clone(),
            self.store(),
            self.gateway.clone(),
        ))
    }

    pub fn voice_conversation(&self) -> Arc<VoiceConversation> {
        Arc::new(VoiceConversation::new(
            self.conversation(),
            self.voice.clone(),
            self.gateway.clone(),
            self.store(),
            self.session.clone(),
            &self.config.chat,
        ))
    }

    pub fn meditation(&self) -> Arc<MeditationController> {
        Arc::new(MeditationController::new(
            self.session.clone(),
            self.store(),
            self.gateway.clone(),
            self.voice.clone(),
            self.audio.clone(),
            self.config.meditation.clone(),
        ))
    }

    pub fn analysis(&self) -> AnalysisService {
        AnalysisService::new(self.session.clone(), self.store(), self.gateway.clone())
    }

    pub fn journal(&self) -> JournalService {
        JournalService::new(self.session.clone(), self.store())
    }

    pub fn recommender(&self) -> Recommender {
        Recommender::new(
            self.session.clone(),
            self.store(),
            self.gateway.clone(),
            &self.config.meditation,
        )
    }

    pub fn insights(&self) -> Insights {
        Insights::new(self.session.clone(), self.store(), self.config.insights.clone())
    }

    /// Silences voice I/O and closes storage.
    pub async fn shutdown(&self) -> Result<(), AletheiaError> {
        if let Err(e) = self.voice.silence().await {
            warn!(error = %e, "failed to silence voice I/O");
        }
        self.storage.close().await?;
        info!("aletheia shut down");
        Ok(())
    }
}
