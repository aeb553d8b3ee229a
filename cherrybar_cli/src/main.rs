use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cherrybar_core::{
    evaluate, paytable, FixedMode, GameConfig, OverrideSelection, Position, RandomSource,
    ReelId, ReelOverride, ReelValues, SeededStream, Symbol, ThreadRandom,
};

mod play;

#[derive(Parser)]
#[command(name = "cherrybar", about = "Three-reel slot machine in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the prize for one stopped line
    Resolve {
        left: u8,
        center: u8,
        right: u8,
        /// Emit the matched rule as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the payout rules and symbol table
    Paytable,
    /// Play spins with timed reel animations
    Play(PlayArgs),
}

#[derive(clap::Args)]
struct PlayArgs {
    /// Stop after this many settled spins
    #[arg(long, default_value_t = 10)]
    spins: u64,
    /// Starting credits, overrides the config file
    #[arg(long, env = "CHERRYBAR_BALANCE", allow_hyphen_values = true)]
    balance: Option<i64>,
    /// Seed for a reproducible session
    #[arg(long, env = "CHERRYBAR_SEED")]
    seed: Option<String>,
    /// Fixed stops for every spin, e.g. 5:5:5
    #[arg(long, value_parser = parse_stops)]
    fixed: Option<[u8; 3]>,
    /// Position nudges for fixed stops, e.g. top:center:bottom
    #[arg(long, value_parser = parse_positions, requires = "fixed")]
    positions: Option<[Position; 3]>,
    /// Timing multiplier (< 1.0 = faster)
    #[arg(long, default_value_t = 1.0)]
    turbo: f64,
    /// JSON game config
    #[arg(long, env = "CHERRYBAR_CONFIG")]
    config: Option<std::path::PathBuf>,
}

fn parse_stops(s: &str) -> Result<[u8; 3], String> {
    let parts: Vec<u8> = s
        .split(':')
        .map(|p| p.trim().parse::<u8>().map_err(|e| format!("`{p}`: {e}")))
        .collect::<Result<_, _>>()?;
    match parts.as_slice() {
        [a, b, c] if parts.iter().all(|v| Symbol::new(*v).is_some()) => Ok([*a, *b, *c]),
        [_, _, _] => Err("stops must be within 0..=9".into()),
        _ => Err("expected three stops as L:C:R".into()),
    }
}

fn parse_positions(s: &str) -> Result<[Position; 3], String> {
    let parts: Vec<Position> = s
        .split(':')
        .map(|p| p.parse::<Position>().map_err(|e| e.to_string()))
        .collect::<Result<_, _>>()?;
    match parts.as_slice() {
        [a, b, c] => Ok([*a, *b, *c]),
        _ => Err("expected three positions as L:C:R".into()),
    }
}

fn load_config(args: &PlayArgs) -> anyhow::Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(balance) = args.balance {
        config.starting_balance = balance;
    }
    if !(args.turbo.is_finite() && args.turbo > 0.0) {
        bail!("--turbo must be a positive number");
    }
    config = config.scaled(args.turbo);
    config.validate()?;
    Ok(config)
}

fn fixed_mode(args: &PlayArgs) -> anyhow::Result<FixedMode> {
    let Some(stops) = args.fixed else {
        return Ok(FixedMode::Off);
    };
    let positions = args.positions.unwrap_or_default();
    let mut selection = OverrideSelection::default();
    for reel in ReelId::ALL {
        let i = reel.index();
        let symbol = Symbol::try_from(stops[i]).context("fixed stop")?;
        selection.set(
            reel,
            ReelOverride {
                symbol,
                position: positions[i],
            },
        );
    }
    Ok(FixedMode::On(selection))
}

fn print_paytable() {
    println!("Three of a kind:");
    for (symbol, prize) in Symbol::ALL.iter().zip(paytable::TRIPLE_PRIZES) {
        println!("  {symbol} {:<22} {prize:>5}", symbol.label());
    }
    println!(
        "Cherries and sevens (all stops 3..=7): {}",
        paytable::MIDDLE_BAND_PRIZE
    );
    println!("  all centered, or all off-center within two stops");
    println!(
        "Any bars (all stops outside 4..=6): {}",
        paytable::OUTER_BAND_PRIZE
    );
    println!("  all centered, or all off-center within five stops");
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve {
            left,
            center,
            right,
            json,
        } => {
            let values = ReelValues::from_indices([left, center, right])?;
            if json {
                let body = serde_json::json!({
                    "values": values,
                    "win": evaluate(values),
                    "prize": cherrybar_core::resolve(values),
                });
                println!("{body}");
                return Ok(());
            }
            match evaluate(values) {
                Some(win) => println!("{values} pays {} ({})", win.prize, win.rule.describe()),
                None => println!("{values} pays 0"),
            }
        }
        Commands::Paytable => print_paytable(),
        Commands::Play(args) => {
            let config = load_config(&args)?;
            let fixed = fixed_mode(&args)?;
            let rng: Box<dyn RandomSource> = match &args.seed {
                Some(seed) => {
                    let stream = SeededStream::new(seed.as_str());
                    println!("seed hash {}", stream.seed_hash_hex());
                    Box::new(stream)
                }
                None => Box::new(ThreadRandom),
            };
            let summary = play::run(config, rng, fixed, args.spins).await?;
            println!(
                "{} spins, {} won, balance {}",
                summary.spins, summary.won, summary.balance
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_stop_triples() {
        assert_eq!(parse_stops("5:5:5").unwrap(), [5, 5, 5]);
        assert!(parse_stops("5:5").is_err());
        assert!(parse_stops("5:5:10").is_err());
        assert!(parse_stops("a:b:c").is_err());
    }

    #[test]
    fn parses_position_triples() {
        assert_eq!(
            parse_positions("top:center:bottom").unwrap(),
            [Position::Top, Position::Center, Position::Bottom]
        );
        assert!(parse_positions("top").is_err());
    }

    fn play_args() -> PlayArgs {
        PlayArgs {
            spins: 1,
            balance: None,
            seed: None,
            fixed: None,
            positions: None,
            turbo: 1.0,
            config: None,
        }
    }

    #[test]
    fn balance_flag_overrides_config_file() {
        let path = std::env::temp_dir().join(format!("cherrybar-{}.json", std::process::id()));
        let json = r#"{"starting_balance": 50, "reel_durations_ms": [100, 200, 300]}"#;
        std::fs::write(&path, json).unwrap();
        let from_file = PlayArgs {
            config: Some(path.clone()),
            ..play_args()
        };
        let config = load_config(&from_file).unwrap();
        assert_eq!(config.starting_balance, 50);
        assert_eq!(config.reel_durations_ms, [100, 200, 300]);

        let overridden = PlayArgs {
            balance: Some(7),
            turbo: 0.5,
            ..from_file
        };
        let config = load_config(&overridden).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(config.starting_balance, 7);
        assert_eq!(config.reel_durations_ms, [50, 100, 150]);
    }

    #[test]
    fn rejects_non_positive_turbo() {
        for turbo in [0.0, -1.0, f64::NAN] {
            let args = PlayArgs {
                turbo,
                ..play_args()
            };
            assert!(load_config(&args).is_err());
        }
        assert!(load_config(&play_args()).is_ok());
    }

    #[test]
    fn fixed_stops_take_position_nudges() {
        assert_eq!(fixed_mode(&play_args()).unwrap(), FixedMode::Off);

        let args = PlayArgs {
            fixed: Some([9, 0, 4]),
            positions: Some([Position::Top, Position::Bottom, Position::Center]),
            ..play_args()
        };
        let mode = fixed_mode(&args).unwrap();
        assert!(mode.is_on());
        let FixedMode::On(selection) = mode else {
            panic!("expected fixed mode");
        };
        assert_eq!(selection.values().indices(), [0, 9, 4]);

        let centered = PlayArgs {
            fixed: Some([5, 5, 5]),
            ..play_args()
        };
        let FixedMode::On(selection) = fixed_mode(&centered).unwrap() else {
            panic!("expected fixed mode");
        };
        assert_eq!(selection.values().indices(), [5, 5, 5]);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let args = PlayArgs {
            config: Some("/nonexistent/cherrybar.json".into()),
            ..play_args()
        };
        assert!(load_config(&args).is_err());
    }

    #[test]
    fn cli_shape_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
