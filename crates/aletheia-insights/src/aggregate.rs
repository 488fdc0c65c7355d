// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure reductions over emotion records.
//!
//! Every function here takes the records as fetched (newest first) plus the
//! caller's notion of "today" and time zone. Nothing reads the clock, so the
//! same inputs always yield the same view.

use aletheia_core::Emotion;
use aletheia_core::types::EmotionRecord;
use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};
use serde::Serialize;

/// Length of the activity series.
pub const ACTIVITY_DAYS: u64 = 7;

/// Length of the mood calendar.
pub const CALENDAR_DAYS: u64 = 30;

/// The calendar date a timestamp falls on in `tz`.
pub fn local_date<Tz: TimeZone>(at: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    at.with_timezone(tz).date_naive()
}

/// `days` consecutive dates ending on `today`, oldest first.
pub fn trailing_days(today: NaiveDate, days: u64) -> Vec<NaiveDate> {
    (0..days)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back)))
        .collect()
}

/// Records per day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayCount {
    pub date: NaiveDate,
    pub count: usize,
}

/// Same-day record counts for the trailing week, oldest first.
///
/// Always [`ACTIVITY_DAYS`] entries long, ending on `today`.
pub fn activity_series<Tz: TimeZone>(
    records: &[EmotionRecord],
    today: NaiveDate,
    tz: &Tz,
) -> Vec<DayCount> {
    trailing_days(today, ACTIVITY_DAYS)
        .into_iter()
        .map(|date| DayCount {
            date,
            count: records
                .iter()
                .filter(|r| local_date(&r.created_at, tz) == date)
                .count(),
        })
        .collect()
}

/// One cell of the mood calendar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MoodDay {
    pub date: NaiveDate,
    /// Most frequent label that day, `None` when nothing was recorded.
    pub emotion: Option<Emotion>,
    /// Mean intensity, `0.0` when nothing was recorded.
    pub intensity: f64,
    pub count: usize,
}

impl MoodDay {
    pub fn has_data(&self) -> bool {
        self.count > 0
    }
}

/// The trailing-month heatmap, oldest first.
///
/// Always [`CALENDAR_DAYS`] entries long, ending on `today`.
pub fn mood_calendar<Tz: TimeZone>(
    records: &[EmotionRecord],
    today: NaiveDate,
    tz: &Tz,
) -> Vec<MoodDay> {
    trailing_days(today, CALENDAR_DAYS)
        .into_iter()
        .map(|date| {
            let day: Vec<&EmotionRecord> = records
                .iter()
                .filter(|r| local_date(&r.created_at, tz) == date)
                .collect();
            if day.is_empty() {
                return MoodDay {
                    date,
                    emotion: None,
                    intensity: 0.0,
                    count: 0,
                };
            }
            let intensity = day.iter().map(|r| r.intensity).sum::<f64>() / day.len() as f64;
            MoodDay {
                date,
                emotion: majority(day.iter().map(|r| r.emotion)),
                intensity,
                count: day.len(),
            }
        })
        .collect()
}

/// Label counts in first-encountered order.
fn tally(emotions: impl IntoIterator<Item = Emotion>) -> Vec<(Emotion, usize)> {
    let mut counts: Vec<(Emotion, usize)> = Vec::new();
    for emotion in emotions {
        match counts.iter_mut().find(|(e, _)| *e == emotion) {
            Some((_, n)) => *n += 1,
            None => counts.push((emotion, 1)),
        }
    }
    counts
}

/// The most frequent label; ties go to whichever was seen first.
pub fn majority(emotions: impl IntoIterator<Item = Emotion>) -> Option<Emotion> {
    let mut best: Option<(Emotion, usize)> = None;
    for (emotion, count) in tally(emotions) {
        if best.is_none_or(|(_, top)| count > top) {
            best = Some((emotion, count));
        }
    }
    best.map(|(emotion, _)| emotion)
}

/// One slice of the emotion distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Share {
    pub emotion: Emotion,
    pub count: usize,
    pub proportion: f64,
}

/// Frequency of each label across `records`, largest first.
///
/// Proportions sum to 1 when `records` is non-empty; an empty input yields
/// an empty distribution.
pub fn distribution(records: &[EmotionRecord]) -> Vec<Share> {
    let total = records.len();
    let mut shares: Vec<Share> = tally(records.iter().map(|r| r.emotion))
        .into_iter()
        .map(|(emotion, count)| Share {
            emotion,
            count,
            proportion: count as f64 / total as f64,
        })
        .collect();
    // Stable, so equal counts keep first-encountered order.
    shares.sort_by(|a, b| b.count.cmp(&a.count));
    shares
}

#[cfg(test)]
mod tests {
    use super::*;
    use aletheia_core::UserId;
    use chrono::{FixedOffset, NaiveTime};

    pub(crate) fn record(emotion: Emotion, intensity: f64, at: DateTime<Utc>) -> EmotionRecord {
        EmotionRecord {
            id: aletheia_core::types::new_id(),
            user_id: UserId("u".into()),
            emotion,
            intensity,
            text: String::new(),
            summary: String::new(),
            quote: String::new(),
            song: String::new(),
            suggestion: String::new(),
            created_at: at,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(day: NaiveDate, hour: u32) -> DateTime<Utc> {
        day.and_time(NaiveTime::from_hms_opt(hour, 0, 0).unwrap()).and_utc()
    }

    #[test]
    fn activity_series_is_seven_days_even_when_empty() {
        let today = date(2026, 3, 10);
        let series = activity_series(&[], today, &Utc);
        assert_eq!(series.len(), 7);
        assert_eq!(series[0].date, date(2026, 3, 4));
        assert_eq!(series[6].date, today);
        assert!(series.iter().all(|d| d.count == 0));
    }

    #[test]
    fn activity_series_counts_per_day_and_ignores_older_records() {
        let today = date(2026, 3, 10);
        let records = vec![
            record(Emotion::Happy, 0.5, at(today, 9)),
            record(Emotion::Sad, 0.5, at(today, 18)),
            record(Emotion::Calm, 0.5, at(date(2026, 3, 8), 12)),
            record(Emotion::Calm, 0.5, at(date(2026, 2, 1), 12)),
        ];
        let series = activity_series(&records, today, &Utc);
        assert_eq!(series[6].count, 2);
        assert_eq!(series[4].count, 1);
        assert_eq!(series.iter().map(|d| d.count).sum::<usize>(), 3);
    }

    #[test]
    fn day_boundaries_follow_the_local_zone() {
        let today = date(2026, 3, 10);
        // 23:30 UTC on the 9th is already the 10th in UTC+2.
        let late = record(
            Emotion::Excited,
            0.5,
            today.pred_opt().unwrap().and_hms_opt(23, 30, 0).unwrap().and_utc(),
        );
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(activity_series(std::slice::from_ref(&late), today, &plus_two)[6].count, 1);
        assert_eq!(activity_series(&[late], today, &Utc)[5].count, 1);
    }

    #[test]
    fn mood_calendar_takes_majority_and_mean() {
        let today = date(2026, 3, 10);
        let records = vec![
            record(Emotion::Happy, 0.9, at(today, 8)),
            record(Emotion::Sad, 0.3, at(today, 9)),
            record(Emotion::Happy, 0.6, at(today, 10)),
        ];
        let calendar = mood_calendar(&records, today, &Utc);
        assert_eq!(calendar.len(), 30);
        let last = calendar[29];
        assert_eq!(last.emotion, Some(Emotion::Happy));
        assert_eq!(last.count, 3);
        assert!((last.intensity - 0.6).abs() < 1e-9);
        assert!(!calendar[0].has_data());
        assert_eq!(calendar[0].emotion, None);
        assert_eq!(calendar[0].date, date(2026, 2, 9));
    }

    #[test]
    fn majority_ties_go_to_first_seen() {
        assert_eq!(
            majority([Emotion::Sad, Emotion::Calm, Emotion::Calm, Emotion::Sad]),
            Some(Emotion::Sad)
        );
        assert_eq!(majority(Vec::<Emotion>::new()), None);
    }

    #[test]
    fn distribution_is_sorted_with_proportions() {
        let now = Utc::now();
        let records = vec![
            record(Emotion::Calm, 0.5, now),
            record(Emotion::Anxious, 0.5, now),
            record(Emotion::Anxious, 0.5, now),
            record(Emotion::Happy, 0.5, now),
        ];
        let shares = distribution(&records);
        assert_eq!(shares.len(), 3);
        assert_eq!(shares[0].emotion, Emotion::Anxious);
        assert_eq!(shares[0].proportion, 0.5);
        assert_eq!(shares[1].emotion, Emotion::Calm);
        assert_eq!(shares[2].emotion, Emotion::Happy);
        assert!(distribution(&[]).is_empty());
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn calendar_and_series_have_fixed_length(
                offsets in proptest::collection::vec(0i64..60 * 24, 0..40),
            ) {
                let today = date(2026, 6, 1);
                let records: Vec<EmotionRecord> = offsets
                    .iter()
                    .map(|h| record(Emotion::Calm, 0.5, at(today, 12) - chrono::Duration::hours(*h)))
                    .collect();
                prop_assert_eq!(mood_calendar(&records, today, &Utc).len(), 30);
                prop_assert_eq!(activity_series(&records, today, &Utc).len(), 7);
            }

            #[test]
            fn proportions_sum_to_one(labels in proptest::collection::vec(0usize..8, 1..50)) {
                let now = Utc::now();
                let records: Vec<EmotionRecord> = labels
                    .iter()
                    .map(|i| record(Emotion::ALL[*i], 0.5, now))
                    .collect();
                let sum: f64 = distribution(&records).iter().map(|s| s.proportion).sum();
                prop_assert!((sum - 1.0).abs() < 1e-9);
            }
        }
    }
}
