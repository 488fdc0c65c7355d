// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Derived views that recompute themselves when their source table changes.
//!
//! A change event is only ever a cue to re-fetch and replace; nothing is
//! merged incrementally.

use std::future::Future;

use aletheia_bus::{ChangeEvent, ChangeFeed, ChangeKind, Subscription, Table};
use aletheia_core::AletheiaError;
use chrono::{NaiveDate, TimeZone, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::aggregate::MoodDay;
use crate::dashboard::Insights;
use crate::history::MeditationStats;

/// A value kept current by a background refresh task.
pub struct LiveView<T> {
    rx: watch::Receiver<T>,
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl<T> LiveView<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Computes the initial value, then recomputes it on every event from
    /// `subscription` whose kind matches `only` (any kind when `None`).
    ///
    /// Subscribe before calling this so no change between the initial
    /// fetch and the first `next()` is lost.
    pub async fn spawn<F, Fut>(
        mut subscription: Subscription,
        only: Option<ChangeKind>,
        refresh: F,
    ) -> Result<Self, AletheiaError>
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, AletheiaError>> + Send,
    {
        let initial = refresh().await?;
        let (tx, rx) = watch::channel(initial);
        let token = CancellationToken::new();
        let task_token = token.clone();

        let handle = tokio::spawn(async move {
            loop {
                let event: ChangeEvent = tokio::select! {
                    _ = task_token.cancelled() => break,
                    next = subscription.next() => match next {
                        Some(event) => event,
                        None => break,
                    },
                };
                if only.is_some_and(|kind| kind != event.kind) {
                    continue;
                }
                debug!(table = %event.table, kind = %event.kind, "recomputing live view");
                match refresh().await {
                    Ok(value) => {
                        tx.send_replace(value);
                    }
                    Err(e) => warn!(error = %e, table = %event.table, "live view refresh failed"),
                }
            }
        });

        Ok(Self { rx, token, handle })
    }

    /// The latest computed value.
    pub fn current(&self) -> T {
        self.rx.borrow().clone()
    }

    /// Waits for the next recomputation. `None` once the view has stopped.
    pub async fn changed(&mut self) -> Option<T> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    pub fn watch(&self) -> watch::Receiver<T> {
        self.rx.clone()
    }

    pub async fn stop(self) {
        self.token.cancel();
        if let Err(e) = self.handle.await {
            warn!(error = %e, "live view task ended abnormally");
        }
    }
}

fn today_in<Tz: TimeZone>(tz: &Tz) -> NaiveDate {
    Utc::now().with_timezone(tz).date_naive()
}

impl Insights {
    /// Mood calendar refreshed on each new emotion record.
    pub async fn live_mood_calendar<Tz>(
        &self,
        feed: &ChangeFeed,
        tz: Tz,
    ) -> Result<LiveView<Vec<MoodDay>>, AletheiaError>
    where
        Tz: TimeZone + Send + Sync + 'static,
        Tz::Offset: Send + Sync,
    {
        let subscription = feed.subscribe(self.user_id()?, &[Table::EmotionRecords]);
        let this = self.clone();
        LiveView::spawn(subscription, Some(ChangeKind::Insert), move || {
            let this = this.clone();
            let tz = tz.clone();
            async move {
                let today = today_in(&tz);
                this.mood_calendar(today, &tz).await
            }
        })
        .await
    }

    /// Meditation statistics refreshed on any session change.
    pub async fn live_meditation_history<Tz>(
        &self,
        feed: &ChangeFeed,
        tz: Tz,
    ) -> Result<LiveView<MeditationStats>, AletheiaError>
    where
        Tz: TimeZone + Send + Sync + 'static,
        Tz::Offset: Send + Sync,
    {
        let subscription = feed.subscribe(self.user_id()?, &[Table::MeditationSessions]);
        let this = self.clone();
        LiveView::spawn(subscription, None, move || {
            let this = this.clone();
            let tz = tz.clone();
            async move {
                let today = today_in(&tz);
                this.meditation_history(today, &tz).await
            }
        })
        .await
    }
}
