use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-difficulty history of daily puzzles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    played: u32,
    won: u32,
    current_streak: u32,
    max_streak: u32,
    last_played: Option<NaiveDate>,
    last_won: Option<NaiveDate>,
    /// guesses taken -> number of wins
    distribution: BTreeMap<u32, u32>,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn played(&self) -> u32 {
        self.played
    }

    pub const fn won(&self) -> u32 {
        self.won
    }

    pub const fn max_streak(&self) -> u32 {
        self.max_streak
    }

    /// The streak as of `today`: a missed day ends it even before the next
    /// win is recorded.
    pub fn current_streak(&self, today: NaiveDate) -> u32 {
        match self.last_won {
            Some(last) if last == today || Some(last) == today.pred_opt() => self.current_streak,
            _ => 0,
        }
    }

    pub fn distribution(&self) -> &BTreeMap<u32, u32> {
        &self.distribution
    }

    pub fn report(&self, today: NaiveDate) -> StatsReport<'_> {
        StatsReport { stats: self, today }
    }

    pub fn win_rate(&self) -> f64 {
        if self.played == 0 {
            return 0.0;
        }
        f64::from(self.won) / f64::from(self.played)
    }

    /// Counts `date` as played once, however many times it's opened.
    pub fn record_played(&mut self, date: NaiveDate) -> bool {
        if self.last_played == Some(date) {
            return false;
        }

        self.played += 1;
        self.last_played = Some(date);
        true
    }

    /// Returns `false` if `date` was already won.
    pub fn record_win(&mut self, date: NaiveDate, guesses: u32) -> bool {
        if self.last_won == Some(date) {
            return false;
        }

        self.record_played(date);

        let continues = self.last_won.is_some_and(|last| Some(last) == date.pred_opt());
        self.current_streak = if continues { self.current_streak + 1 } else { 1 };
        self.max_streak = self.max_streak.max(self.current_streak);

        self.won += 1;
        self.last_won = Some(date);
        *self.distribution.entry(guesses).or_default() += 1;

        true
    }
}

/// [`Stats`] as they stand on a given day.
#[derive(Debug, Clone, Copy)]
pub struct StatsReport<'a> {
    stats: &'a Stats,
    today: NaiveDate,
}

impl std::fmt::Display for StatsReport<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stats = self.stats;
        writeln!(
            f,
            "played {} | won {} ({:.0}%) | streak {} | best streak {}",
            stats.played,
            stats.won,
            stats.win_rate() * 100.0,
            stats.current_streak(self.today),
            stats.max_streak
        )?;

        for (guesses, count) in &stats.distribution {
            writeln!(f, "{guesses:>3}: {}", "#".repeat(*count as usize))?;
        }

        Ok(())
    }
}
