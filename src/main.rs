//! # FlyByWire
//!
//! Host loop for the controller registry.
//!
//! Restores the saved registry (or starts empty), activates the controllers
//! listed in the settings, evaluates every active controller at a fixed rate
//! and saves the registry on Ctrl+C.

use anyhow::{Context, Result};
use std::collections::HashMap;
use tokio::time::interval;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use flybywire::config::{LoggingSettings, Settings};
use flybywire::controller::{ButtonCallback, ControllerIdentity};
use flybywire::registry::Registry;

/// Settings file used when none is given on the command line
const DEFAULT_SETTINGS_PATH: &str = "config/default.toml";

/// Number of update ticks between status log messages
const STATUS_INTERVAL_TICKS: u64 = 600;

/// Installs the console subscriber and, if enabled, a daily log file.
///
/// The returned guard flushes the file writer on drop and must live as long
/// as the process logs.
fn init_logging(logging: &LoggingSettings) -> Option<WorkerGuard> {
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let console = tracing_subscriber::fmt::layer();

    if logging.file_logging {
        let appender = tracing_appender::rolling::daily(&logging.log_dir, "flybywire.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let file = tracing_subscriber::fmt::layer().with_ansi(false).with_writer(writer);
        tracing_subscriber::registry().with(filter).with(console).with(file).init();
        Some(guard)
    } else {
        tracing_subscriber::registry().with(filter).with(console).init();
        None
    }
}

fn log_press() -> ButtonCallback {
    Box::new(|identity: ControllerIdentity, button: usize| debug!("{}: press {}", identity, button))
}

fn log_release() -> ButtonCallback {
    Box::new(|identity: ControllerIdentity, button: usize| debug!("{}: release {}", identity, button))
}

/// Main entry point
///
/// # Control Flow
///
/// 1. Load settings and set up logging
/// 2. Restore the registry, falling back to an empty one
/// 3. Activate startup controllers and rebind callbacks on restored ones
/// 4. Evaluate all controllers every tick until Ctrl+C, applying preset
///    switches and throttle steps
/// 5. Save the registry
///
/// # Errors
///
/// Returns error if the settings cannot be loaded or the registry cannot be saved.
#[tokio::main]
async fn main() -> Result<()> {
    let settings_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_SETTINGS_PATH.to_string());
    let settings = Settings::load(&settings_path)
        .with_context(|| format!("loading settings from {}", settings_path))?;

    let _log_guard = init_logging(&settings.logging);
    info!("FlyByWire v{} starting...", env!("CARGO_PKG_VERSION"));

    let registry_path = settings.persistence.path.clone();
    let mut registry = Registry::deserialize_from(&registry_path).unwrap_or_else(|| {
        info!("Starting with an empty controller registry");
        Registry::new()
    });

    let restored: Vec<ControllerIdentity> = registry
        .controllers()
        .iter()
        .map(|config| config.identity())
        .collect();
    for identity in restored {
        registry.rebind_callbacks(identity, log_press(), log_release());
    }

    for controller in &settings.input.startup_controllers {
        let identity = controller.identity();
        if !registry.activate(identity, log_press(), log_release()) {
            debug!("{} restored from registry file", identity);
        }
    }

    let mut ticker = interval(settings.update_period());
    let mut ticks: u64 = 0;
    let mut throttles: HashMap<ControllerIdentity, f32> = HashMap::new();

    info!(
        "Evaluating {} controller(s) at {}Hz",
        registry.len(),
        settings.input.update_rate_hz
    );
    info!("Press Ctrl+C to exit");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                for config in registry.controllers_mut() {
                    let pressed = match config.adapter() {
                        Some(adapter) => adapter.pressed_buttons(),
                        None => {
                            warn!("{} has no adapter", config.identity());
                            continue;
                        }
                    };

                    let throttle = throttles.entry(config.identity()).or_insert(0.0);
                    for action in config.evaluate_discrete_actions(pressed) {
                        *throttle = config.apply_discrete_action(action, *throttle);
                        debug!(
                            "{}: {:?} (preset {}, throttle {:.2})",
                            config.identity(),
                            action,
                            config.current_preset_index(),
                            *throttle
                        );
                    }
                    for (action, value) in config.evaluate_continuous_actions() {
                        debug!("{}: {:?} = {:.3}", config.identity(), action, value);
                    }
                }

                ticks += 1;
                if ticks % STATUS_INTERVAL_TICKS == 0 {
                    info!("{} updates, {} controller(s) active", ticks, registry.len());
                }
            }

            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                break;
            }
        }
    }

    registry
        .serialize_to(&registry_path)
        .with_context(|| format!("saving controller registry to {}", registry_path))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_interval_constant() {
        // At the default 60Hz, 600 ticks = 10 seconds
        assert_eq!(STATUS_INTERVAL_TICKS, 600);
    }

    #[test]
    fn test_default_settings_file_parses() {
        let settings = Settings::load(concat!(env!("CARGO_MANIFEST_DIR"), "/config/default.toml"));
        assert!(settings.is_ok());
    }
}
