//! Hex Hack entry point
//!
//! On the web the module start hook in `web` does the setup and JavaScript
//! drives the session. Natively this runs a headless session that solves
//! puzzles from their hints, which is handy for checking generation and
//! timing changes.
//!
//! Usage: `hex-hack [seed] [config.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use glam::Vec3;
    use hex_hack::puzzle::Ray;
    use hex_hack::{PuzzleConfig, Session, SessionEvent, SessionPhase};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    env_logger::init();
    log::info!("Hex Hack (native) starting...");

    let mut args = std::env::args().skip(1);
    let seed = match args.next().map(|arg| arg.parse::<u64>()) {
        Some(Ok(seed)) => seed,
        Some(Err(e)) => {
            log::warn!("Invalid seed ({}), using 0", e);
            0
        }
        None => 0,
    };
    let config = match args.next() {
        Some(path) => match PuzzleConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{}; using default config", e);
                PuzzleConfig::default()
            }
        },
        None => PuzzleConfig::default(),
    };
    log::info!("Seed: {}", seed);

    /// Frame step at 60 Hz
    const FRAME_DT: f32 = 1.0 / 60.0;
    /// Frames between two simulated clicks
    const CLICK_INTERVAL: u32 = 6;

    let mut session = Session::new(Pcg32::seed_from_u64(seed), config);
    session.begin(0.0);

    let mut frame: u32 = 0;
    while session.phase() == SessionPhase::Ongoing {
        let now = frame as f32 * FRAME_DT;

        // Aim at the first tile that still needs turning and click it
        if frame % CLICK_INTERVAL == 0 && !session.puzzle().is_locked() {
            let hint = session.puzzle().hint();
            if let Some(hex) = hint.iter().position(|&clicks| clicks > 0) {
                let anchor = session.puzzle().anchor(hex);
                session.pointer_ray(&Ray::new(anchor + Vec3::Z * 4.0, Vec3::NEG_Z), now);
                session.left_click(now);
            }
        }

        session.update(now);
        for event in session.take_events() {
            match event {
                SessionEvent::Solved { score } => println!("{:>6.2}s  solved #{}", now, score),
                SessionEvent::NextPuzzle => log::debug!("Next puzzle at {:.2}s", now),
                SessionEvent::Expired { score } => println!("{:>6.2}s  time up, {} solved", now, score),
            }
        }
        frame += 1;
    }

    let now = frame as f32 * FRAME_DT;
    match serde_json::to_string_pretty(&session.draw_state(now)) {
        Ok(json) => println!("Final draw state:\n{}", json),
        Err(e) => log::error!("Failed to serialize draw state: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is hex_hack::web::wasm_start, this is just to satisfy the compiler
}
