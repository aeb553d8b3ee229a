//! Fixed payout rules for a three-reel line.
//!
//! Rules are checked in order and the first match wins:
//!
//! 1. three identical stops pay from [`TRIPLE_PRIZES`];
//! 2. every stop in the cherry/seven band (`3..=7`) pays [`MIDDLE_BAND_PRIZE`] when all
//!    three are centered, or when all three are off-center and within two stops of each
//!    other;
//! 3. every stop in the bar band (`> 6` or `< 4`) pays [`OUTER_BAND_PRIZE`] when all three
//!    are centered, or when all three are off-center and within five stops once the top of
//!    the strip is folded under the bottom.

use serde::{Deserialize, Serialize};

use crate::reels::ReelValues;
use crate::symbols::Symbol;

/// Prize for three identical stops, indexed by the stop.
pub const TRIPLE_PRIZES: [u32; 10] = [10, 20, 20, 150, 150, 4000, 1000, 2000, 50, 50];

pub const MIDDLE_BAND_PRIZE: u32 = 75;
pub const OUTER_BAND_PRIZE: u32 = 5;

const MIDDLE_BAND_MAX_SPREAD: i32 = 3;
const OUTER_BAND_MAX_SPREAD: i32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", content = "symbol", rename_all = "snake_case")]
pub enum Rule {
    Triple(Symbol),
    MiddleBand,
    OuterBand,
}

impl Rule {
    pub fn describe(self) -> String {
        match self {
            Rule::Triple(s) => format!("three of a kind ({})", s.label()),
            Rule::MiddleBand => "cherries and sevens".to_string(),
            Rule::OuterBand => "any bars".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Win {
    pub rule: Rule,
    pub prize: u32,
}

/// Prize for a stopped line, `0` when nothing matches.
pub fn resolve(values: ReelValues) -> u32 {
    evaluate(values).map_or(0, |w| w.prize)
}

pub fn evaluate(values: ReelValues) -> Option<Win> {
    let [a, b, c] = values.indices();

    if a == b && b == c {
        return Some(Win {
            rule: Rule::Triple(values.left()),
            prize: TRIPLE_PRIZES[a as usize],
        });
    }

    let stops = [a as i32, b as i32, c as i32];
    let centered = values.0.map(Symbol::is_centered);

    if stops.iter().all(|&v| v > 2 && v < 8) {
        return paired_parity(centered, stops, MIDDLE_BAND_MAX_SPREAD).then_some(Win {
            rule: Rule::MiddleBand,
            prize: MIDDLE_BAND_PRIZE,
        });
    }

    if stops.iter().all(|&v| v > 6 || v < 4) {
        let folded = stops.map(|v| if v > 6 { v - 10 } else { v });
        return paired_parity(centered, folded, OUTER_BAND_MAX_SPREAD).then_some(Win {
            rule: Rule::OuterBand,
            prize: OUTER_BAND_PRIZE,
        });
    }

    None
}

// Any centered symbol: all three must be centered. None centered: they must lie within `spread`.
fn paired_parity(centered: [bool; 3], stops: [i32; 3], spread: i32) -> bool {
    if centered.iter().any(|&c| c) {
        centered.iter().all(|&c| c)
    } else {
        within_spread(stops, spread)
    }
}

fn within_spread([a, b, c]: [i32; 3], spread: i32) -> bool {
    (a - b).abs() < spread && (a - c).abs() < spread && (b - c).abs() < spread
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(a: u8, b: u8, c: u8) -> ReelValues {
        ReelValues::from_indices([a, b, c]).unwrap()
    }

    #[test]
    fn triples_pay_table() {
        for (i, prize) in TRIPLE_PRIZES.iter().enumerate() {
            let i = i as u8;
            let win = evaluate(line(i, i, i)).unwrap();
            assert_eq!(win.prize, *prize);
            assert_eq!(win.rule, Rule::Triple(Symbol::new(i).unwrap()));
        }
        assert_eq!(resolve(line(5, 5, 5)), 4000);
    }

    #[test]
    fn middle_band_cases() {
        assert_eq!(resolve(line(4, 6, 4)), 75);
        assert_eq!(resolve(line(3, 5, 5)), 75);
        assert_eq!(resolve(line(7, 5, 7)), 75);
        assert_eq!(resolve(line(3, 5, 7)), 0);
        assert_eq!(resolve(line(4, 5, 6)), 0);
        assert_eq!(resolve(line(3, 4, 5)), 0);
    }

    #[test]
    fn outer_band_cases() {
        assert_eq!(resolve(line(0, 2, 8)), 5);
        assert_eq!(resolve(line(9, 1, 3)), 5);
        assert_eq!(resolve(line(7, 9, 1)), 5);
        assert_eq!(resolve(line(8, 2, 9)), 0);
        assert_eq!(resolve(line(0, 1, 2)), 0);
        // folded: 7 -> -3, so -3..3 spans six stops
        assert_eq!(resolve(line(7, 1, 3)), 0);
    }

    #[test]
    fn middle_band_takes_precedence() {
        // {3, 7} lies in both bands; the middle band rule decides
        let win = evaluate(line(3, 7, 3));
        assert_eq!(win, None);
    }

    #[test]
    fn unmatched_lines_pay_nothing() {
        assert_eq!(resolve(line(0, 5, 9)), 0);
        assert_eq!(resolve(line(2, 4, 6)), 0);
        assert!(evaluate(line(1, 6, 8)).is_none());
    }
}
