use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    balance::Balance,
    config::{GameConfig, PrizePulse},
    error::{GameError, GameResult},
    paytable::{self, Win},
    reels::{scroll_distance, Easing, FixedMode, ReelAnimation, ReelId, ReelValues, REEL_COUNT},
    rng::RandomSource,
};

/// Input from the front-end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    SpinRequested,
    ReelAnimationCompleted(ReelId),
    OverrideChanged(FixedMode),
    BalanceEdited(String),
    FrameTick,
}

/// Work the front-end has to carry out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    /// Lock the spin button.
    SpinStarted { spin: u64, balance: i64 },
    /// Report `ReelAnimationCompleted` when done.
    AnimateReel(ReelAnimation),
    /// Unlock the spin button.
    SpinFinished(SpinReport),
    ShowPrize { amount: u32, pulse: PrizePulse },
    RenderBalance { balance: i64, displayed: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinReport {
    pub spin: u64,
    pub values: ReelValues,
    pub win: Option<Win>,
    pub balance: i64,
}

impl SpinReport {
    pub fn prize(&self) -> u32 {
        self.win.map_or(0, |w| w.prize)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpinPhase {
    Idle,
    Spinning { stopped: [bool; REEL_COUNT] },
}

impl SpinPhase {
    pub fn is_spinning(&self) -> bool {
        matches!(self, SpinPhase::Spinning { .. })
    }
}

/// Serializable view of a session for front-ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: SpinPhase,
    pub balance: i64,
    pub displayed_balance: i64,
    pub values: ReelValues,
    pub previous: ReelValues,
    pub offsets: [f64; REEL_COUNT],
    pub fixed_mode: FixedMode,
    pub last_win: Option<Win>,
    pub spins: u64,
}

/// One player's game: reels, balance and the spin state machine.
#[derive(Debug)]
pub struct Session<R> {
    config: GameConfig,
    rng: R,
    phase: SpinPhase,
    values: ReelValues,
    previous: ReelValues,
    offsets: [f64; REEL_COUNT],
    balance: Balance,
    fixed_mode: FixedMode,
    last_win: Option<Win>,
    spins: u64,
}

impl<R: RandomSource> Session<R> {
    pub fn new(config: GameConfig, rng: R) -> GameResult<Self> {
        config.validate()?;
        Ok(Self::build(config, rng))
    }

    /// Fresh session with the cabinet defaults: 10 credits, fixed mode off.
    pub fn with_defaults(rng: R) -> Self {
        Self::build(GameConfig::default(), rng)
    }

    fn build(config: GameConfig, rng: R) -> Self {
        let balance = Balance::new(config.starting_balance, config.smoothing_divisor);
        Self {
            config,
            rng,
            phase: SpinPhase::Idle,
            values: ReelValues::default(),
            previous: ReelValues::default(),
            offsets: [0.0; REEL_COUNT],
            balance,
            fixed_mode: FixedMode::Off,
            last_win: None,
            spins: 0,
        }
    }

    pub fn dispatch(&mut self, command: Command) -> GameResult<Vec<Effect>> {
        match command {
            Command::SpinRequested => Ok(self.request_spin()),
            Command::ReelAnimationCompleted(reel) => Ok(self.reel_stopped(reel)),
            Command::OverrideChanged(mode) => {
                self.fixed_mode = mode;
                debug!(fixed = mode.is_on(), "override changed");
                Ok(Vec::new())
            }
            Command::BalanceEdited(input) => {
                self.edit_balance(&input)?;
                Ok(vec![self.render_balance()])
            }
            Command::FrameTick => {
                self.balance.tick();
                Ok(vec![self.render_balance()])
            }
        }
    }

    fn request_spin(&mut self) -> Vec<Effect> {
        if self.phase.is_spinning() {
            debug!("spin declined: reels still turning");
            return Vec::new();
        }
        if !self.balance.can_afford(self.config.spin_cost) {
            debug!(balance = self.balance.credits(), "spin declined: no credits");
            return Vec::new();
        }

        self.balance.debit(self.config.spin_cost);
        self.spins += 1;
        self.phase = SpinPhase::Spinning {
            stopped: [false; REEL_COUNT],
        };
        self.values = self.fixed_mode.next_values(&mut self.rng);
        info!(
            spin = self.spins,
            values = %self.values,
            fixed = self.fixed_mode.is_on(),
            balance = self.balance.credits(),
            "spin accepted"
        );

        let mut effects = Vec::with_capacity(REEL_COUNT + 1);
        effects.push(Effect::SpinStarted {
            spin: self.spins,
            balance: self.balance.credits(),
        });
        for reel in ReelId::ALL {
            effects.push(Effect::AnimateReel(self.animate(reel)));
        }
        effects
    }

    fn animate(&mut self, reel: ReelId) -> ReelAnimation {
        let i = reel.index();
        let duration_ms = self.config.duration(reel);
        let distance = scroll_distance(
            self.previous.get(reel),
            self.values.get(reel),
            duration_ms,
            self.config.icon_height,
        );
        let from_offset = self.offsets[i];
        let to_offset = from_offset - distance;
        self.offsets[i] = to_offset;
        ReelAnimation {
            reel,
            from_offset,
            to_offset,
            delta: -distance,
            duration_ms,
            easing: Easing::Linear,
        }
    }

    fn reel_stopped(&mut self, reel: ReelId) -> Vec<Effect> {
        let SpinPhase::Spinning { mut stopped } = self.phase else {
            debug!(?reel, "completion ignored: not spinning");
            return Vec::new();
        };
        stopped[reel.index()] = true;
        if reel != self.config.slowest_reel() {
            self.phase = SpinPhase::Spinning { stopped };
            return Vec::new();
        }
        self.settle()
    }

    fn settle(&mut self) -> Vec<Effect> {
        self.phase = SpinPhase::Idle;
        self.previous = self.values;

        let win = paytable::evaluate(self.values);
        let prize = win.map_or(0, |w| w.prize);
        self.balance.credit(prize);
        self.last_win = win;

        let report = SpinReport {
            spin: self.spins,
            values: self.values,
            win,
            balance: self.balance.credits(),
        };
        info!(
            spin = report.spin,
            values = %report.values,
            prize,
            balance = report.balance,
            "spin settled"
        );

        let mut effects = vec![Effect::SpinFinished(report)];
        if prize > 0 {
            effects.push(Effect::ShowPrize {
                amount: prize,
                pulse: self.config.prize_pulse,
            });
        }
        effects
    }

    fn edit_balance(&mut self, input: &str) -> GameResult<i64> {
        if self.fixed_mode.is_on() {
            return Err(GameError::BalanceLocked);
        }
        let credits = self.balance.overwrite_from_str(input)?;
        info!(balance = credits, "balance overwritten");
        Ok(credits)
    }

    fn render_balance(&self) -> Effect {
        Effect::RenderBalance {
            balance: self.balance.credits(),
            displayed: self.balance.displayed(),
        }
    }

    /// Requests a spin and completes every reel straight away, fastest first.
    ///
    /// Returns `None` when the spin was declined.
    pub fn spin_now(&mut self) -> Option<SpinReport> {
        let started = self.request_spin();
        if started.is_empty() {
            return None;
        }
        let mut order = ReelId::ALL;
        order.sort_by_key(|r| self.config.duration(*r));
        let slowest = self.config.slowest_reel();
        for reel in order.into_iter().filter(|r| *r != slowest).chain([slowest]) {
            for effect in self.reel_stopped(reel) {
                if let Effect::SpinFinished(report) = effect {
                    return Some(report);
                }
            }
        }
        None
    }

    pub fn phase(&self) -> SpinPhase {
        self.phase
    }

    pub fn values(&self) -> ReelValues {
        self.values
    }

    pub fn previous(&self) -> ReelValues {
        self.previous
    }

    pub fn balance(&self) -> &Balance {
        &self.balance
    }

    pub fn offsets(&self) -> [f64; REEL_COUNT] {
        self.offsets
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            balance: self.balance.credits(),
            displayed_balance: self.balance.displayed(),
            values: self.values,
            previous: self.previous,
            offsets: self.offsets,
            fixed_mode: self.fixed_mode,
            last_win: self.last_win,
            spins: self.spins,
        }
    }
}
