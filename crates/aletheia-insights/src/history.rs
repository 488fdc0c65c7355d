// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Meditation history statistics.

use aletheia_core::types::{MeditationSession, MeditationType};
use chrono::{NaiveDate, TimeZone};
use serde::Serialize;

use crate::aggregate::{ACTIVITY_DAYS, local_date, trailing_days};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MeditationDay {
    pub date: NaiveDate,
    pub sessions: usize,
    pub minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeditationStats {
    pub total_sessions: usize,
    pub total_minutes: u32,
    /// Trailing week, oldest first, ending today.
    pub weekly: Vec<MeditationDay>,
    /// Sessions per program, most practised first. Programs never
    /// practised are left out.
    pub by_type: Vec<(MeditationType, usize)>,
}

pub fn meditation_stats<Tz: TimeZone>(
    sessions: &[MeditationSession],
    today: NaiveDate,
    tz: &Tz,
) -> MeditationStats {
    let weekly = trailing_days(today, ACTIVITY_DAYS)
        .into_iter()
        .map(|date| {
            let (count, minutes) = sessions
                .iter()
                .filter(|s| local_date(&s.completed_at, tz) == date)
                .fold((0, 0), |(n, m), s| (n + 1, m + s.duration_minutes));
            MeditationDay {
                date,
                sessions: count,
                minutes,
            }
        })
        .collect();

    let mut by_type: Vec<(MeditationType, usize)> = Vec::new();
    for session in sessions {
        match by_type.iter_mut().find(|(t, _)| *t == session.meditation_type) {
            Some((_, n)) => *n += 1,
            None => by_type.push((session.meditation_type, 1)),
        }
    }
    by_type.sort_by(|a, b| b.1.cmp(&a.1));

    MeditationStats {
        total_sessions: sessions.len(),
        total_minutes: sessions.iter().map(|s| s.duration_minutes).sum(),
        weekly,
        by_type,
    }
}
