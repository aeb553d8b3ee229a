pub mod balance;
pub mod config;
pub mod engine;
pub mod error;
pub mod paytable;
pub mod reels;
pub mod rng;
pub mod symbols;

pub use crate::balance::Balance;
pub use crate::config::{GameConfig, PrizePulse};
pub use crate::engine::{Command, Effect, Session, Snapshot, SpinPhase, SpinReport};
pub use crate::error::{GameError, GameResult};
pub use crate::paytable::{evaluate, resolve, Rule, Win};
pub use crate::reels::{
    scroll_distance, Easing, FixedMode, OverrideSelection, ReelAnimation, ReelId, ReelOverride,
    ReelValues,
};
#[cfg(feature = "thread-rng")]
pub use crate::rng::ThreadRandom;
pub use crate::rng::{derive_hash_hex, RandomSource, ScriptedSource, SeededStream};
pub use crate::symbols::{Position, Symbol};
