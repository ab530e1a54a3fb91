//! Soft validation of the "about" section.
//!
//! Results are advisory: they are shown next to the fields and never
//! prevent a save.

use std::ops::RangeInclusive;

use serde::Serialize;

use crate::domain::{split_paragraphs, AboutContent};

/// Accepted title length, in characters after trimming.
pub const TITLE_LEN: RangeInclusive<usize> = 10..=80;

/// Accepted number of non-empty paragraphs.
pub const PARAGRAPH_COUNT: RangeInclusive<usize> = 1..=4;

/// Accepted number of bullets.
pub const BULLET_COUNT: RangeInclusive<usize> = 3..=6;

/// Accepted length of each bullet, in characters after trimming.
pub const BULLET_LEN: RangeInclusive<usize> = 1..=60;

/// Pass/fail indicators plus the measurements behind them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AboutReport {
    pub title_ok: bool,
    pub paragraphs_ok: bool,
    pub bullet_count_ok: bool,
    pub bullet_lengths_ok: bool,
    pub title_len: usize,
    pub paragraph_count: usize,
    pub bullet_lengths: Vec<usize>,
}

impl AboutReport {
    /// Whether every rule passes.
    #[must_use]
    pub const fn all_ok(&self) -> bool {
        self.title_ok && self.paragraphs_ok && self.bullet_count_ok && self.bullet_lengths_ok
    }
}

// Lengths are Unicode scalar values, so an emoji counts as one.
fn char_len(s: &str) -> usize {
    s.trim().chars().count()
}

/// Recomputes the soft rules for the about section.
#[must_use]
pub fn validate_about(about: &AboutContent) -> AboutReport {
    let title_len = char_len(&about.title);
    let paragraph_count = split_paragraphs(&about.paragraph).len();
    let bullet_lengths: Vec<usize> = about.bullets.iter().map(|b| char_len(b)).collect();

    AboutReport {
        title_ok: TITLE_LEN.contains(&title_len),
        paragraphs_ok: PARAGRAPH_COUNT.contains(&paragraph_count),
        bullet_count_ok: BULLET_COUNT.contains(&about.bullets.len()),
        bullet_lengths_ok: bullet_lengths.iter().all(|n| BULLET_LEN.contains(n)),
        title_len,
        paragraph_count,
        bullet_lengths,
    }
}
