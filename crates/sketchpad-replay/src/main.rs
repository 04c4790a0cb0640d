//! Replays a recorded input script and prints the resulting scene.
//!
//! Usage: `sketchpad-replay <script.json>`

mod script;

use script::{ReplayError, Script};
use std::process::ExitCode;

fn run(path: &str) -> Result<String, ReplayError> {
    let source = std::fs::read_to_string(path).map_err(|source| ReplayError::Io {
        path: path.to_string(),
        source,
    })?;
    log::info!("Replaying {}", path);
    Script::parse(&source)?.replay()
}

fn main() -> ExitCode {
    env_logger::init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: sketchpad-replay <script.json>");
        return ExitCode::from(1);
    };

    match run(&path) {
        Ok(scene) => {
            println!("{}", scene);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Replay failed: {}", e);
            eprintln!("sketchpad-replay: {}", e);
            ExitCode::from(1)
        }
    }
}
