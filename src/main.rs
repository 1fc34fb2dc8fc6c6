//! Host-side helper: `cargo run` builds the dweet_embed WASM package into
//! `static/pkg` and serves the demo page in `static/` over HTTP.
//!
//! The port comes from `DWEET_PORT` (default 8000).

use std::process::{Command, Stdio};
use std::{env, thread, time::Duration};

use dweet_embed::logging::{self, LoggingConfig};

const DEFAULT_PORT: u16 = 8000;

fn main() {
    // Only meaningful on non-wasm targets.
    if env::var("TARGET").unwrap_or_default() == "wasm32-unknown-unknown" {
        return;
    }
    logging::init(LoggingConfig::default());

    let port = match env::var("DWEET_PORT") {
        Ok(raw) => raw.parse::<u16>().unwrap_or_else(|_| {
            log::warn!("DWEET_PORT={raw} is not a port, using {DEFAULT_PORT}");
            DEFAULT_PORT
        }),
        Err(_) => DEFAULT_PORT,
    };

    log::info!("building WASM pkg …");
    match Command::new("wasm-pack")
        .args(["build", "--release", "--target", "web", "--out-dir", "static/pkg"])
        .env("WASM_PACK_RUNNING", "1")
        .status()
    {
        Ok(st) if st.success() => {}
        Ok(_) => {
            log::error!("wasm-pack finished with errors. Ensure wasm-pack is installed (https://rustwasm.github.io/wasm-pack/).");
            std::process::exit(1);
        }
        Err(_) => {
            log::warn!("wasm-pack not found in PATH. Skipping wasm build; the demo may serve stale artifacts.");
        }
    }

    log::info!("launching demo at http://127.0.0.1:{port} …");
    let server = Command::new("python3")
        .args(["-m", "http.server", &port.to_string(), "--directory", "static"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();
    if let Err(err) = server {
        log::error!("failed to start http server: {err}");
        std::process::exit(1);
    }

    // Keep process alive
    loop {
        thread::sleep(Duration::from_secs(60));
    }
}
