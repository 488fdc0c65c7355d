// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session controllers for Aletheia.
//!
//! - [`ConversationSession`]: text chat with the companion, one turn in flight.
//! - [`VoiceConversation`]: serial listen, think, speak turn-taking with a
//!   summary on exit.
//! - [`MeditationController`]: scripted narration over looping background audio.
//! - [`AnalysisService`], [`JournalService`] and [`Recommender`]: the
//!   single-request features around them.

pub mod analysis;
pub mod conversation;
pub mod journal;
pub mod meditation;
pub mod recommendation;
pub mod shutdown;
pub mod voice_mode;

pub use analysis::{AnalysisOutcome, AnalysisService};
pub use conversation::{ChatState, ChatTurn, ConversationSession};
pub use journal::{END_DICTATION, JournalDraft, JournalService};
pub use meditation::{MeditationController, MeditationExit, MeditationStart, MeditationState};
pub use recommendation::{Recommendation, Recommender};
pub use voice_mode::{VoiceConversation, VoiceEvent, VoiceState};
