//! Arkanoid entry point
//!
//! Native builds run a headless demo: the autopilot plays one level and the
//! result is logged. The browser build drives `platform::web::WebSession`
//! from JavaScript instead.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(err) = native::run(&args) {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is the wasm_bindgen start function, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use arkanoid::consts::DEFAULT_SEED;
    use arkanoid::sim::{FrameOutcome, Phase, Session, autopilot};
    use arkanoid::{SessionConfig, SimError};

    const DEFAULT_MAX_FRAMES: u64 = 100_000;

    /// `arkanoid [tier] [seed] [max_frames]`
    pub fn run(args: &[String]) -> Result<(), SimError> {
        let tier = args.first().map(String::as_str).unwrap_or("beginner");
        let seed = parse_arg(args.get(1), DEFAULT_SEED)?;
        let max_frames = parse_arg(args.get(2), DEFAULT_MAX_FRAMES)?;

        let mut session = Session::new(SessionConfig::with_seed(seed));
        session.select_level(tier)?;
        session.launch_ball()?;
        log::info!("Arkanoid (native demo) seed {} - autopilot engaged", seed);

        let mut outcome = FrameOutcome::Continue;
        while session.frame() < max_frames {
            session.set_paddle_direction(autopilot::steer(&session));
            outcome = session.step()?;
            for event in session.drain_events() {
                log::trace!("{:?} ({})", event, event.sound());
            }
            if outcome.is_terminal() {
                break;
            }
        }

        let total = session.blocks().len();
        match session.phase() {
            Phase::Won => println!(
                "You win! Score {}/{} in {} frames",
                session.score(),
                total,
                session.frame()
            ),
            Phase::Lost => println!(
                "Game over. Score {}/{} after {} frames",
                session.score(),
                total,
                session.frame()
            ),
            _ => println!(
                "Stopped after {} frames ({:?}). Score {}/{}",
                session.frame(),
                outcome,
                session.score(),
                total
            ),
        }
        Ok(())
    }

    fn parse_arg<T: std::str::FromStr>(arg: Option<&String>, default: T) -> Result<T, SimError> {
        match arg {
            Some(raw) => raw
                .parse()
                .map_err(|_| SimError::Config(format!("not a number: `{}`", raw))),
            None => Ok(default),
        }
    }
}
