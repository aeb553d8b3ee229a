use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::GameResult;
use crate::rng::RandomSource;
use crate::symbols::{Position, Symbol};

pub const REEL_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReelId {
    Left,
    Center,
    Right,
}

impl ReelId {
    pub const ALL: [ReelId; REEL_COUNT] = [ReelId::Left, ReelId::Center, ReelId::Right];

    pub fn index(self) -> usize {
        match self {
            ReelId::Left => 0,
            ReelId::Center => 1,
            ReelId::Right => 2,
        }
    }
}

/// Stopped symbols on the payline, left to right.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReelValues(pub [Symbol; REEL_COUNT]);

impl ReelValues {
    pub fn from_indices(indices: [u8; REEL_COUNT]) -> GameResult<Self> {
        let [a, b, c] = indices;
        Ok(Self([a.try_into()?, b.try_into()?, c.try_into()?]))
    }

    pub fn indices(&self) -> [u8; REEL_COUNT] {
        self.0.map(Symbol::index)
    }

    pub fn get(&self, reel: ReelId) -> Symbol {
        self.0[reel.index()]
    }

    pub fn left(&self) -> Symbol {
        self.0[0]
    }

    /// Independent uniform draw per reel.
    pub fn draw<R: RandomSource + ?Sized>(rng: &mut R) -> Self {
        Self([
            Symbol::from_unit(rng.next_unit()),
            Symbol::from_unit(rng.next_unit()),
            Symbol::from_unit(rng.next_unit()),
        ])
    }
}

impl fmt::Display for ReelValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.0;
        write!(f, "[{a} {b} {c}]")
    }
}

/// Operator pick for one reel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReelOverride {
    pub symbol: Symbol,
    #[serde(default)]
    pub position: Position,
}

impl ReelOverride {
    pub fn resolve(self) -> Symbol {
        self.position.apply(self.symbol)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideSelection(pub [ReelOverride; REEL_COUNT]);

impl OverrideSelection {
    pub fn values(&self) -> ReelValues {
        ReelValues(self.0.map(ReelOverride::resolve))
    }

    pub fn set(&mut self, reel: ReelId, pick: ReelOverride) {
        self.0[reel.index()] = pick;
    }
}

/// Where the next stops come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "selection", rename_all = "lowercase")]
pub enum FixedMode {
    #[default]
    Off,
    On(OverrideSelection),
}

impl FixedMode {
    pub fn is_on(&self) -> bool {
        matches!(self, FixedMode::On(_))
    }

    pub fn next_values<R: RandomSource + ?Sized>(&self, rng: &mut R) -> ReelValues {
        match self {
            FixedMode::Off => ReelValues::draw(rng),
            FixedMode::On(selection) => selection.values(),
        }
    }
}

/// How far a strip scrolls to travel from `prev` to `next` over `duration_ms`.
///
/// The baseline term scales with the duration so every reel makes whole laps; the
/// correction term lands the strip on `next` half an icon per stop.
pub fn scroll_distance(prev: Symbol, next: Symbol, duration_ms: u32, icon_height: f64) -> f64 {
    let baseline = icon_height * duration_ms as f64 / 100.0;
    let correction = (prev.index() as f64 - next.index() as f64) * icon_height / 2.0;
    baseline + correction
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Easing {
    #[default]
    Linear,
    /// Quadratic ease-out.
    Power1,
}

impl Easing {
    /// CSS timing function for browser tweens.
    pub fn css(self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::Power1 => "cubic-bezier(0.5, 1, 0.89, 1)",
        }
    }
}

/// A request for the animation service to move one reel strip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReelAnimation {
    pub reel: ReelId,
    pub from_offset: f64,
    pub to_offset: f64,
    /// `to_offset - from_offset`; negative, the strip scrolls upward.
    pub delta: f64,
    pub duration_ms: u32,
    pub easing: Easing,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedSource;

    fn sym(i: u8) -> Symbol {
        Symbol::new(i).unwrap()
    }

    #[test]
    fn draw_consumes_one_value_per_reel() {
        let mut rng = ScriptedSource::new(vec![0.05, 0.55, 0.99, 0.3]);
        let values = ReelValues::draw(&mut rng);
        assert_eq!(values.indices(), [0, 5, 9]);
        assert_eq!(ReelValues::draw(&mut rng).indices()[0], 3);
    }

    #[test]
    fn fixed_mode_ignores_rng() {
        let mut selection = OverrideSelection::default();
        selection.set(ReelId::Left, ReelOverride { symbol: sym(9), position: Position::Top });
        selection.set(ReelId::Center, ReelOverride { symbol: sym(0), position: Position::Bottom });
        selection.set(ReelId::Right, ReelOverride { symbol: sym(4), position: Position::Center });
        let mut rng = ScriptedSource::new(vec![0.5]);
        let values = FixedMode::On(selection).next_values(&mut rng);
        assert_eq!(values.indices(), [0, 9, 4]);
        assert_eq!(rng.remaining(), 1);
    }

    #[test]
    fn scroll_distance_lands_on_target() {
        let h = 121.0;
        assert_eq!(scroll_distance(sym(0), sym(0), 2000, h), 2420.0);
        assert_eq!(scroll_distance(sym(4), sym(0), 2000, h), 2420.0 + 242.0);
        assert_eq!(scroll_distance(sym(0), sym(4), 2000, h), 2420.0 - 242.0);
        // still moves forward for the largest backward correction
        assert!(scroll_distance(sym(0), sym(9), 2000, h) > 0.0);
    }

    #[test]
    fn fixed_mode_serializes_tagged() {
        let json = serde_json::to_string(&FixedMode::Off).unwrap();
        assert_eq!(json, r#"{"mode":"off"}"#);
        let back: FixedMode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, FixedMode::Off);
    }
}
