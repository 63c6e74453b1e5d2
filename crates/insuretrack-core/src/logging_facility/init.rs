use std::sync::Once;

use serde::Deserialize;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Output format and default verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Human-readable, `insuretrack=debug`
    Development,
    /// JSON lines, `insuretrack=info`
    Production,
    /// Bare registry; tests install their own layer via `init_test_capture`
    Test,
}

const DEVELOPMENT_FILTER: &str = "insuretrack=debug";
const PRODUCTION_FILTER: &str = "insuretrack=info";

static INIT_ONCE: Once = Once::new();

/// Install the global subscriber for `profile`
///
/// Only the first call has an effect. `RUST_LOG` overrides the profile's
/// default filter.
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| match profile {
        Profile::Development => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter_or(DEVELOPMENT_FILTER))
                .with_writer(std::io::stderr)
                .try_init()
                .ok();
        }
        Profile::Production => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(env_filter_or(PRODUCTION_FILTER))
                .with_writer(std::io::stderr)
                .try_init()
                .ok();
        }
        Profile::Test => {
            tracing_subscriber::registry().try_init().ok();
        }
    });
}

fn env_filter_or(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_idempotent() {
        init(Profile::Test);
        init(Profile::Test);
    }

    #[test]
    fn test_profile_deserializes_lowercase() {
        let profile: Profile = serde_json::from_str("\"production\"").unwrap();
        assert_eq!(profile, Profile::Production);
        assert!(serde_json::from_str::<Profile>("\"Verbose\"").is_err());
    }
}
