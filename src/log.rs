#[cfg(not(target_arch = "wasm32"))]
use log::LevelFilter;

/// Initialize logging for crossgrid.
///
/// # Behavior
/// - **Native (CLI):** crossgrid's own modules log at `Debug` if `debug_enabled`, else
///   `Info`; other crates only at `Warn`. `RUST_LOG` overrides both.
/// - **WASM:** logs to the browser console at `Debug` or `Info`.
///
/// Calling it twice is harmless: the second initialization is ignored.
pub fn init_logger(debug_enabled: bool) {
    #[cfg(target_arch = "wasm32")]
    {
        let level = if debug_enabled { log::Level::Debug } else { log::Level::Info };

        if let Err(e) = console_log::init_with_level(level) {
            let msg = format!("crossgrid: console logger unavailable ({e})");
            web_sys::console::error_1(&msg.into());
            return;
        }
        log::debug!("console logger ready at {level:?}");
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        use std::io::Write;

        let level = if debug_enabled { LevelFilter::Debug } else { LevelFilter::Info };

        let mut builder = env_logger::Builder::new();
        builder
            .filter_level(LevelFilter::Warn)
            .filter_module(env!("CARGO_CRATE_NAME"), level)
            .format(|buf, record| {
                // stage name, e.g. "search" for crossgrid::search
                let stage = record.target().rsplit("::").next().unwrap_or_default();
                writeln!(buf, "[{:<5} {stage}] {}", record.level(), record.args())
            });

        if let Ok(filters) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filters);
        }

        if builder.try_init().is_ok() {
            log::debug!("stderr logger ready at {level:?}");
        }
    }
}
