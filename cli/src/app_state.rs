use eqlog_types::TrackerConfig;
use tracing::warn;

const APP_NAME: &str = "eqlog";

/// Load the tracker config from the user's config directory, falling back to defaults.
pub fn load_config() -> TrackerConfig {
    match confy::load::<TrackerConfig>(APP_NAME, None) {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "failed to load config, using defaults");
            TrackerConfig::default()
        }
    }
}
