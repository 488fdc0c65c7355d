// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed queries, one module per table.

pub mod emotions;
pub mod journal;
pub mod meditations;
pub mod messages;
pub mod summaries;
