//! Ball Slope entry point
//!
//! Natively this runs the simulation headless: load an optional JSON config,
//! drop a ball, step it for a fixed time and print the final state as JSON.
//! The browser build drives the library through `ball_slope::wasm` instead.

#[cfg(not(target_arch = "wasm32"))]
const RUN_SECONDS: u64 = 10;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use ball_slope::SimConfig;
    use ball_slope::sim::{Boundary, Corner, Simulation, Vector2};

    env_logger::init();
    log::info!("Ball Slope (native) starting...");

    let config = match std::env::args().nth(1) {
        Some(path) => match SimConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        },
        None => SimConfig::default(),
    };

    let mut sim = Simulation::new(config);

    // Drop the ball from the middle of the free space
    let spawn = match sim.boundary() {
        Boundary::Slope(_) => Vector2::new(sim.config().width / 2.0, sim.config().height * 0.1),
        Boundary::Quad(quad) => {
            let corners = [
                Corner::TopLeft,
                Corner::TopRight,
                Corner::BottomRight,
                Corner::BottomLeft,
            ];
            corners.iter().map(|&c| quad.corner(c)).sum::<Vector2>() / 4.0
        }
    };
    if sim.spawn_body(spawn).is_none() {
        log::error!("No room to spawn a ball at ({:.1}, {:.1})", spawn.x, spawn.y);
        std::process::exit(1);
    }

    let frames = RUN_SECONDS * u64::from(sim.config().frame_rate);
    for _ in 0..frames {
        let report = sim.tick();
        if report.bounced {
            if let Some(body) = sim.body() {
                log::info!("Frame {}: bounce, {}", sim.frame(), body);
            }
        }
    }

    log::info!(
        "Ran {} frames: {} bounces, {} ignored responses",
        sim.frame(),
        sim.bounces(),
        sim.ignored_responses()
    );

    match serde_json::to_string_pretty(&sim) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize state: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is ball_slope::wasm::start, this is just to satisfy the compiler
}
