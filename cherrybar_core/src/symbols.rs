use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::GameError;

/// Number of stop positions on a reel strip.
pub const SYMBOL_COUNT: u8 = 10;

const LABELS: [&str; SYMBOL_COUNT as usize] = [
    "BAR on the center",
    "2xBAR at the bottom",
    "2xBAR on the center",
    "7 at the bottom",
    "7 on the center",
    "cherry at the bottom",
    "cherry on the center",
    "cherry at the top",
    "3xBAR at the bottom",
    "3xBAR on the center",
];

/// A stop position on the reel strip, `0..=9`.
///
/// Stops advance by half an icon, so even stops sit an icon on the payline and odd stops
/// sit between two neighbouring icons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Symbol(u8);

impl Symbol {
    pub const ALL: [Symbol; SYMBOL_COUNT as usize] = [
        Symbol(0),
        Symbol(1),
        Symbol(2),
        Symbol(3),
        Symbol(4),
        Symbol(5),
        Symbol(6),
        Symbol(7),
        Symbol(8),
        Symbol(9),
    ];

    pub fn new(index: u8) -> Option<Self> {
        (index < SYMBOL_COUNT).then_some(Symbol(index))
    }

    /// Maps a uniform draw in `[0, 1)` onto a stop by truncation.
    pub fn from_unit(u: f64) -> Self {
        let idx = (u * SYMBOL_COUNT as f64).floor() as i64;
        Symbol(idx.clamp(0, SYMBOL_COUNT as i64 - 1) as u8)
    }

    pub fn index(self) -> u8 {
        self.0
    }

    pub fn label(self) -> &'static str {
        LABELS[self.0 as usize]
    }

    pub fn is_centered(self) -> bool {
        self.0 % 2 == 0
    }

    /// One stop further along the strip, wrapping 9 back to 0.
    pub fn next(self) -> Self {
        Symbol((self.0 + 1) % SYMBOL_COUNT)
    }

    /// One stop back along the strip, wrapping 0 around to 9.
    pub fn prev(self) -> Self {
        Symbol((self.0 + SYMBOL_COUNT - 1) % SYMBOL_COUNT)
    }
}

impl TryFrom<u8> for Symbol {
    type Error = GameError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Symbol::new(value).ok_or(GameError::SymbolOutOfRange(value))
    }
}

impl From<Symbol> for u8 {
    fn from(s: Symbol) -> u8 {
        s.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Operator-selected nudge applied on top of a fixed symbol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Top,
    #[default]
    Center,
    Bottom,
}

impl Position {
    pub fn apply(self, base: Symbol) -> Symbol {
        match self {
            Position::Top => base.next(),
            Position::Center => base,
            Position::Bottom => base.prev(),
        }
    }
}

impl std::str::FromStr for Position {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(Position::Top),
            "center" | "" => Ok(Position::Center),
            "bottom" => Ok(Position::Bottom),
            other => Err(GameError::Config(format!("unknown position `{other}`"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range() {
        assert!(Symbol::new(9).is_some());
        assert!(Symbol::new(10).is_none());
        assert!(matches!(Symbol::try_from(12), Err(GameError::SymbolOutOfRange(12))));
    }

    #[test]
    fn unit_draw_truncates() {
        assert_eq!(Symbol::from_unit(0.0).index(), 0);
        assert_eq!(Symbol::from_unit(0.0999).index(), 0);
        assert_eq!(Symbol::from_unit(0.1).index(), 1);
        assert_eq!(Symbol::from_unit(0.95).index(), 9);
        assert_eq!(Symbol::from_unit(0.999_999_9).index(), 9);
    }

    #[test]
    fn even_stops_are_centered() {
        let centered: Vec<u8> = Symbol::ALL
            .iter()
            .filter(|s| s.is_centered())
            .map(|s| s.index())
            .collect();
        assert_eq!(centered, vec![0, 2, 4, 6, 8]);
        assert!(Symbol::new(4).unwrap().label().ends_with("on the center"));
    }

    #[test]
    fn positions_wrap_both_ways() {
        let nine = Symbol::new(9).unwrap();
        let zero = Symbol::new(0).unwrap();
        assert_eq!(Position::Top.apply(nine), zero);
        assert_eq!(Position::Bottom.apply(zero), nine);
        assert_eq!(Position::Center.apply(nine), nine);
        assert_eq!(Position::Top.apply(Symbol::new(4).unwrap()).index(), 5);
    }

    #[test]
    fn parses_positions() {
        assert_eq!("TOP".parse::<Position>().unwrap(), Position::Top);
        assert_eq!("bottom".parse::<Position>().unwrap(), Position::Bottom);
        assert!("sideways".parse::<Position>().is_err());
    }

    #[test]
    fn serde_rejects_bad_index() {
        let ok: Symbol = serde_json::from_str("7").unwrap();
        assert_eq!(ok.index(), 7);
        assert!(serde_json::from_str::<Symbol>("10").is_err());
    }
}
