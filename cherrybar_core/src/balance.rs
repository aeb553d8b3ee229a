use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};

/// Player credits plus the lagging value shown on screen.
///
/// Neither value is clamped. An operator edit can put the balance below zero; spins are
/// then declined until credits come back above zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    credits: i64,
    displayed: i64,
    smoothing_divisor: i64,
}

impl Balance {
    pub fn new(credits: i64, smoothing_divisor: u32) -> Self {
        Self {
            credits,
            displayed: 0,
            smoothing_divisor: i64::from(smoothing_divisor.max(1)),
        }
    }

    pub fn credits(&self) -> i64 {
        self.credits
    }

    pub fn displayed(&self) -> i64 {
        self.displayed
    }

    pub fn can_afford(&self, cost: u32) -> bool {
        self.credits > 0 && self.credits >= i64::from(cost)
    }

    pub fn debit(&mut self, amount: u32) {
        self.credits = self.credits.saturating_sub(i64::from(amount));
    }

    pub fn credit(&mut self, amount: u32) {
        self.credits = self.credits.saturating_add(i64::from(amount));
    }

    pub fn overwrite(&mut self, credits: i64) {
        self.credits = credits;
    }

    /// Parses an operator edit; the balance is untouched on error.
    pub fn overwrite_from_str(&mut self, input: &str) -> GameResult<i64> {
        let credits = input
            .trim()
            .parse::<i64>()
            .map_err(|source| GameError::InvalidBalance {
                input: input.to_string(),
                source,
            })?;
        self.overwrite(credits);
        Ok(credits)
    }

    /// One frame of display smoothing: accelerate upward, fall back one credit at a time.
    pub fn tick(&mut self) -> i64 {
        if self.displayed < self.credits {
            let gap = self.credits.saturating_sub(self.displayed);
            self.displayed = self
                .displayed
                .saturating_add(gap / self.smoothing_divisor + 1)
                .min(self.credits);
        } else if self.displayed > self.credits {
            self.displayed -= 1;
        }
        self.displayed
    }

    pub fn is_settled(&self) -> bool {
        self.displayed == self.credits
    }
}
