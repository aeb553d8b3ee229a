//! Terminal adapters: tokio timers stand in for the reel animations and completions
//! come back through a channel into the same single-threaded loop.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{interval, sleep, MissedTickBehavior};
use tracing::{debug, info};

use cherrybar_core::{Command, Effect, FixedMode, GameConfig, RandomSource, Session};

const FRAME: Duration = Duration::from_millis(16);

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub spins: u64,
    pub won: u64,
    pub balance: i64,
}

pub async fn run<R: RandomSource>(
    config: GameConfig,
    rng: R,
    fixed: FixedMode,
    max_spins: u64,
) -> anyhow::Result<Summary> {
    let mut session = Session::new(config, rng)?;
    session.dispatch(Command::OverrideChanged(fixed))?;

    let (tx, mut rx) = mpsc::unbounded_channel::<Command>();
    let mut frames = interval(FRAME);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut summary = Summary {
        balance: session.balance().credits(),
        ..Summary::default()
    };

    while summary.spins < max_spins {
        let effects = session.dispatch(Command::SpinRequested)?;
        if effects.is_empty() {
            info!(balance = session.balance().credits(), "out of credits");
            break;
        }
        let mut settled = apply(effects, &tx, &mut summary);

        while !settled {
            let command = tokio::select! {
                Some(command) = rx.recv() => command,
                _ = frames.tick() => Command::FrameTick,
            };
            settled = apply(session.dispatch(command)?, &tx, &mut summary);
        }
    }

    Ok(summary)
}

/// Carries out effects; `true` once the spin has settled.
fn apply(effects: Vec<Effect>, tx: &mpsc::UnboundedSender<Command>, summary: &mut Summary) -> bool {
    let mut settled = false;
    for effect in effects {
        match effect {
            Effect::SpinStarted { spin, balance } => {
                println!("spin #{spin} (balance {balance})");
            }
            Effect::AnimateReel(animation) => {
                let tx = tx.clone();
                tokio::spawn(async move {
                    sleep(Duration::from_millis(u64::from(animation.duration_ms))).await;
                    // receiver outlives every spin
                    let _ = tx.send(Command::ReelAnimationCompleted(animation.reel));
                });
            }
            Effect::SpinFinished(report) => {
                summary.spins += 1;
                summary.won += u64::from(report.prize());
                summary.balance = report.balance;
                settled = true;
                match report.win {
                    Some(win) => println!(
                        "  {} -> {} ({})",
                        report.values,
                        win.prize,
                        win.rule.describe()
                    ),
                    None => println!("  {} -> 0", report.values),
                }
            }
            Effect::ShowPrize { amount, .. } => println!("  *** {amount} ***"),
            Effect::RenderBalance { balance, displayed } => {
                debug!(balance, displayed, "frame");
            }
        }
    }
    settled
}

#[cfg(test)]
mod tests {
    use super::*;
    use cherrybar_core::ScriptedSource;

    fn fast() -> GameConfig {
        GameConfig::default().scaled(0.001)
    }

    #[tokio::test(flavor = "current_thread")]
    async fn plays_until_spin_limit() {
        let rng = ScriptedSource::for_stops([4, 6, 4, 0, 1, 2]);
        let summary = run(fast(), rng, FixedMode::Off, 2).await.unwrap();
        assert_eq!(summary.spins, 2);
        assert_eq!(summary.won, 75);
        assert_eq!(summary.balance, 10 - 2 + 75);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn stops_when_credits_run_out() {
        let config = GameConfig {
            starting_balance: 2,
            ..fast()
        };
        let rng = ScriptedSource::for_stops([0, 1, 2, 0, 1, 2]);
        let summary = run(config, rng, FixedMode::Off, 100).await.unwrap();
        assert_eq!(summary.spins, 2);
        assert_eq!(summary.balance, 0);
    }
}
