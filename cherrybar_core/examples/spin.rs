use cherrybar_core::{Effect, GameConfig, SeededStream, Session};

fn main() {
    // Five spins from a fixed seed, completing every reel at once
    let rng = SeededStream::new("example-seed");
    println!("seed_hash={}", rng.seed_hash_hex());
    let mut session = match Session::new(GameConfig::default(), rng) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{e}");
            return;
        }
    };
    for _ in 0..5 {
        match session.spin_now() {
            Some(report) => println!(
                "spin={} values={} prize={} balance={}",
                report.spin,
                report.values,
                report.prize(),
                report.balance
            ),
            None => break,
        }
    }
    if let Ok(effects) = session.dispatch(cherrybar_core::Command::FrameTick) {
        if let Some(Effect::RenderBalance { displayed, .. }) = effects.first() {
            println!("displayed after one frame={displayed}");
        }
    }
}
