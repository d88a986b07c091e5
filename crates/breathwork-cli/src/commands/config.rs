use breathwork_core::pattern::{MAX_PHASE_SECS, MIN_BREATH_SECS};
use breathwork_core::timer::{DURATION_PRESETS_MIN, MAX_DURATION_MIN, MIN_DURATION_MIN};
use breathwork_core::Config;
use clap::Subcommand;
use serde::Serialize;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "session.duration_min", "cues.enabled")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// List all config values with the accepted ranges
    List,
    /// Reset config to defaults
    Reset,
}

/// Accepted values, printed next to the config so `set` has no surprises.
#[derive(Debug, Serialize)]
struct Limits {
    duration_min: Range,
    duration_presets_min: &'static [u32],
    /// Custom pattern inhale/exhale; holds may also be 0.
    phase_secs: Range,
}

#[derive(Debug, Serialize)]
struct Range {
    min: u32,
    max: u32,
}

#[derive(Serialize)]
struct ConfigListing<'a> {
    #[serde(flatten)]
    config: &'a Config,
    limits: Limits,
}

fn listing(config: &Config) -> ConfigListing<'_> {
    ConfigListing {
        config,
        limits: Limits {
            duration_min: Range {
                min: MIN_DURATION_MIN,
                max: MAX_DURATION_MIN,
            },
            duration_presets_min: &DURATION_PRESETS_MIN,
            phase_secs: Range {
                min: MIN_BREATH_SECS,
                max: MAX_PHASE_SECS,
            },
        },
    }
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => {
                    eprintln!("unknown key: {key}");
                    std::process::exit(1);
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            println!("ok");
        }
        ConfigAction::List => {
            let config = Config::load()?;
            let json = serde_json::to_string_pretty(&listing(&config))?;
            println!("{json}");
        }
        ConfigAction::Reset => {
            let config = Config::default();
            config.save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
