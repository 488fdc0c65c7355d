// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-only views derived from persisted records: the weekly activity
//! series, the mood calendar, the emotion distribution, dashboard totals and
//! meditation history. No write path exists here.

pub mod aggregate;
pub mod dashboard;
pub mod history;
pub mod live;

pub use aggregate::{DayCount, MoodDay, Share, activity_series, distribution, mood_calendar};
pub use dashboard::{DashboardStats, Insights};
pub use history::{MeditationDay, MeditationStats, meditation_stats};
pub use live::LiveView;
