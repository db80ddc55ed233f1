//! Option-set finalization
//!
//! Layers caller overrides and `BOOTCONF_*` environment variables over the
//! built-in defaults.

pub mod loader;

pub use loader::{
    OptionsLoader, ENV_CONSUL, ENV_FILENAME, ENV_PREFIX, ENV_REMOTE_DSN, ENV_REMOTE_KEY,
    ENV_REMOTE_PROVIDER, ENV_TYPE, OPTION_ENV_KEYS,
};
