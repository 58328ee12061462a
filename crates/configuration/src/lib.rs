use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{
    Config, DashboardSettings, DataSettings, ForecastSettings, LoggingSettings, MAX_HORIZON,
};

/// The file read when no explicit path is given. It is optional.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Loads the application configuration.
///
/// Sources are layered: struct defaults, then the TOML file (`path` or
/// `config.toml`, neither required to exist), then `SALES__*` environment
/// variables such as `SALES__FORECAST__HORIZON=6`.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let file = match path {
        // An explicitly named file must exist.
        Some(p) => config::File::from(p).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        .add_source(
            config::Environment::with_prefix("SALES")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(
        metric = %config.forecast.metric,
        horizon = config.forecast.horizon,
        window = config.forecast.window,
        "Configuration loaded."
    );
    Ok(config)
}
