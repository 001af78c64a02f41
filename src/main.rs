use std::path::PathBuf;

use speckle::{options::Options, Viewer};

/// Options file read from the working directory when present.
const OPTIONS_FILE: &str = "speckle.toml";

fn main() {
    env_logger::init();

    let Some(path) = std::env::args().nth(1).map(PathBuf::from) else {
        log::error!("Usage: speckle <file.xyz> [preset]");
        std::process::exit(1);
    };

    let options_path = PathBuf::from(OPTIONS_FILE);
    let mut options = if options_path.exists() {
        match Options::load(&options_path) {
            Ok(options) => options,
            Err(e) => {
                log::error!("{}: {e}", options_path.display());
                std::process::exit(1);
            }
        }
    } else {
        Options::default()
    };
    if let Some(preset) = std::env::args().nth(2) {
        options.display.preset = preset;
    }

    let viewer = Viewer::builder()
        .with_path(path)
        .with_options(options)
        .build();
    if let Err(e) = viewer.run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
