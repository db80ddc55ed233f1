use std::env;

use crate::domain::models::{BootstrapOptions, OptionOverrides, RemoteSettings};

/// Overrides the configuration format type
pub const ENV_TYPE: &str = "BOOTCONF_TYPE";
/// Overrides the configuration base filename
pub const ENV_FILENAME: &str = "BOOTCONF_FILENAME";
/// Overrides the prefix of overlaid environment variables
pub const ENV_PREFIX: &str = "BOOTCONF_ENV_PREFIX";
/// Overrides the remote provider kind
pub const ENV_REMOTE_PROVIDER: &str = "BOOTCONF_REMOTE_PROVIDER";
/// Overrides the remote connection string
pub const ENV_REMOTE_DSN: &str = "BOOTCONF_REMOTE_DSN";
/// Overrides the remote lookup key
pub const ENV_REMOTE_KEY: &str = "BOOTCONF_REMOTE_KEY";
/// Consul host shorthand: provider "consul", key "/<filename>"
pub const ENV_CONSUL: &str = "BOOTCONF_CONSUL";

/// Every variable consulted while finalizing options
pub const OPTION_ENV_KEYS: [&str; 7] = [
    ENV_TYPE,
    ENV_FILENAME,
    ENV_PREFIX,
    ENV_REMOTE_PROVIDER,
    ENV_REMOTE_DSN,
    ENV_REMOTE_KEY,
    ENV_CONSUL,
];

/// Option-set loader with layered overrides
pub struct OptionsLoader;

impl OptionsLoader {
    /// Finalize the option set for one bootstrap run
    ///
    /// Precedence (lowest to highest):
    /// 1. Built-in defaults
    /// 2. Caller overrides
    /// 3. `BOOTCONF_*` environment variables
    pub fn load(overrides: OptionOverrides) -> BootstrapOptions {
        let options = overrides.apply(BootstrapOptions::default());
        Self::apply_env_with(options, |key| env::var(key).ok())
    }

    /// Apply environment overrides read through `lookup`
    ///
    /// Empty values count as unset. `BOOTCONF_CONSUL` fills the whole remote
    /// descriptor; the individual `BOOTCONF_REMOTE_*` variables then win
    /// field by field.
    pub fn apply_env_with<F>(mut options: BootstrapOptions, lookup: F) -> BootstrapOptions
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.is_empty());

        if let Some(value) = var(ENV_TYPE) {
            options.config_type = value;
        }
        if let Some(value) = var(ENV_FILENAME) {
            options.filename = value;
        }
        if let Some(value) = var(ENV_PREFIX) {
            options.env_prefix = Some(value);
        }

        if let Some(host) = var(ENV_CONSUL) {
            options.remote = RemoteSettings {
                provider: Some("consul".to_string()),
                dsn: Some(host),
                key: Some(format!("/{}", options.filename)),
            };
        }
        if let Some(value) = var(ENV_REMOTE_PROVIDER) {
            options.remote.provider = Some(value);
        }
        if let Some(value) = var(ENV_REMOTE_DSN) {
            options.remote.dsn = Some(value);
        }
        if let Some(value) = var(ENV_REMOTE_KEY) {
            options.remote.key = Some(value);
        }

        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_overrides_caller_values() {
        let caller = OptionOverrides::new()
            .with_type("yaml")
            .with_filename("service")
            .apply(BootstrapOptions::default());

        let options = OptionsLoader::apply_env_with(
            caller,
            lookup_from(&[(ENV_TYPE, "toml"), (ENV_PREFIX, "APP")]),
        );

        assert_eq!(options.config_type, "toml");
        assert_eq!(options.filename, "service", "Caller value should persist");
        assert_eq!(options.env_prefix.as_deref(), Some("APP"));
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let options = OptionsLoader::apply_env_with(
            BootstrapOptions::default(),
            lookup_from(&[(ENV_TYPE, ""), (ENV_REMOTE_DSN, "")]),
        );

        assert_eq!(options.config_type, "json");
        assert_eq!(options.remote, RemoteSettings::default());
    }

    #[test]
    fn test_consul_shorthand_builds_descriptor() {
        let options = OptionsLoader::apply_env_with(
            BootstrapOptions::default(),
            lookup_from(&[(ENV_CONSUL, "consul:8500"), (ENV_FILENAME, "billing")]),
        );

        let descriptor = options.remote.descriptor().unwrap();
        assert_eq!(descriptor.provider, "consul");
        assert_eq!(descriptor.dsn, "consul:8500");
        assert_eq!(descriptor.key, "/billing");
    }

    #[test]
    fn test_explicit_remote_vars_beat_consul_shorthand() {
        let options = OptionsLoader::apply_env_with(
            BootstrapOptions::default(),
            lookup_from(&[
                (ENV_CONSUL, "consul:8500"),
                (ENV_REMOTE_KEY, "/shared/config"),
            ]),
        );

        let descriptor = options.remote.descriptor().unwrap();
        assert_eq!(descriptor.dsn, "consul:8500");
        assert_eq!(descriptor.key, "/shared/config");
    }

    #[test]
    fn test_load_reads_process_environment() {
        temp_env::with_vars(
            [
                (ENV_TYPE, Some("yaml")),
                (ENV_FILENAME, None),
                (ENV_PREFIX, None),
                (ENV_REMOTE_PROVIDER, None),
                (ENV_REMOTE_DSN, None),
                (ENV_REMOTE_KEY, None),
                (ENV_CONSUL, None),
            ],
            || {
                let options = OptionsLoader::load(OptionOverrides::new().with_type("toml"));
                assert_eq!(options.config_type, "yaml");
                assert!(options.remote.descriptor().is_err());
            },
        );
    }

    proptest! {
        #[test]
        fn prop_env_always_wins(
            caller_type in proptest::option::of("[a-z]{1,8}"),
            caller_name in proptest::option::of("[a-z]{1,8}"),
            caller_dsn in proptest::option::of("[a-z]{1,8}"),
            env_type in "[a-z]{1,8}",
            env_name in "[a-z]{1,8}",
            env_prefix in "[A-Z]{1,8}",
            env_provider in "[a-z]{1,8}",
            env_dsn in "[a-z]{1,8}",
            env_key in "/[a-z]{1,8}",
        ) {
            let mut overrides = OptionOverrides::new();
            overrides.config_type = caller_type;
            overrides.filename = caller_name;
            overrides.remote.dsn = caller_dsn;

            let options = OptionsLoader::apply_env_with(
                overrides.apply(BootstrapOptions::default()),
                lookup_from(&[
                    (ENV_TYPE, env_type.as_str()),
                    (ENV_FILENAME, env_name.as_str()),
                    (ENV_PREFIX, env_prefix.as_str()),
                    (ENV_REMOTE_PROVIDER, env_provider.as_str()),
                    (ENV_REMOTE_DSN, env_dsn.as_str()),
                    (ENV_REMOTE_KEY, env_key.as_str()),
                ]),
            );

            prop_assert_eq!(options.config_type, env_type);
            prop_assert_eq!(options.filename, env_name);
            prop_assert_eq!(options.env_prefix, Some(env_prefix));
            prop_assert_eq!(options.remote.provider, Some(env_provider));
            prop_assert_eq!(options.remote.dsn, Some(env_dsn));
            prop_assert_eq!(options.remote.key, Some(env_key));
        }
    }
}
