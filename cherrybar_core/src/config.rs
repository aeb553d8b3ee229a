//! Game configuration.
//!
//! The payout rules are fixed; only presentation timings, the starting balance and the
//! spin cost are configurable.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{GameError, GameResult};
use crate::reels::{Easing, ReelId, REEL_COUNT};

/// Timings for the win pulse shown over the reels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrizePulse {
    /// Grow from nothing to full size (ms)
    pub scale_up_ms: u32,
    /// Drift upward over this long (ms)
    pub float_ms: u32,
    /// How far the label drifts (px)
    pub float_px: f64,
    /// Wait before fading (ms)
    pub fade_delay_ms: u32,
    /// Fade to transparent (ms)
    pub fade_ms: u32,
    /// Curve shared by the scale, drift and fade
    pub easing: Easing,
}

impl PrizePulse {
    /// Time until the label resets.
    pub fn total_ms(&self) -> u32 {
        self.float_ms.max(self.fade_delay_ms + self.fade_ms).max(self.scale_up_ms)
    }
}

impl Default for PrizePulse {
    fn default() -> Self {
        Self {
            scale_up_ms: 200,
            float_ms: 2000,
            float_px: 200.0,
            fade_delay_ms: 1000,
            fade_ms: 1000,
            easing: Easing::Power1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Credits at session start
    pub starting_balance: i64,
    /// Credits taken per accepted spin
    pub spin_cost: u32,
    /// Strip icon height (px); one stop is half an icon
    pub icon_height: f64,
    /// Spin time per reel, left to right (ms)
    pub reel_durations_ms: [u32; REEL_COUNT],
    /// Larger values make the balance counter catch up more slowly
    pub smoothing_divisor: u32,
    pub prize_pulse: PrizePulse,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_balance: 10,
            spin_cost: 1,
            icon_height: 121.0,
            reel_durations_ms: [2000, 2500, 3000],
            smoothing_divisor: 50,
            prize_pulse: PrizePulse::default(),
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> GameResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| GameError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> GameResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| GameError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> GameResult<()> {
        if self.reel_durations_ms.iter().any(|&d| d == 0) {
            return Err(GameError::Config("reel durations must be non-zero".into()));
        }
        if !(self.icon_height.is_finite() && self.icon_height > 0.0) {
            return Err(GameError::Config("icon height must be positive".into()));
        }
        if self.smoothing_divisor == 0 {
            return Err(GameError::Config("smoothing divisor must be non-zero".into()));
        }
        Ok(())
    }

    /// Scale all timings by factor (< 1.0 = faster). Durations never drop below 1 ms.
    pub fn scaled(&self, factor: f64) -> Self {
        let scale = |ms: u32| ((ms as f64 * factor).round() as u32).max(1);
        Self {
            reel_durations_ms: self.reel_durations_ms.map(scale),
            prize_pulse: PrizePulse {
                scale_up_ms: scale(self.prize_pulse.scale_up_ms),
                float_ms: scale(self.prize_pulse.float_ms),
                fade_delay_ms: scale(self.prize_pulse.fade_delay_ms),
                fade_ms: scale(self.prize_pulse.fade_ms),
                ..self.prize_pulse
            },
            ..self.clone()
        }
    }

    pub fn duration(&self, reel: ReelId) -> u32 {
        self.reel_durations_ms[reel.index()]
    }

    /// The reel whose completion settles the spin. Ties go to the rightmost reel.
    pub fn slowest_reel(&self) -> ReelId {
        ReelId::ALL
            .iter()
            .copied()
            .max_by_key(|r| self.duration(*r))
            .unwrap_or(ReelId::Right)
    }
}
