//! Bootstrap orchestrator
//!
//! Runs one linear pass over the sources:
//! `.env` file, option finalization, remote, file. The result is a
//! [`ConfigContext`] holding the finalized options, the resolved store, one
//! error slot per source and a readiness report.

use figment::value::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::merge_engine::{MergeEngine, SourceLayer};
use super::probe::{probe_env_file, probe_file, probe_remote, ProbeResult};
use super::retry_policy::RemoteFetchPolicy;
use super::store::ResolvedConfig;
use crate::domain::errors::{RequirementError, SourceError, SourceErrorKind};
use crate::domain::models::{
    BootstrapOptions, OptionOverrides, Source, SourceReport, DEFAULT_ENV_FILE,
};
use crate::domain::ports::Timer;
use crate::infrastructure::config::OptionsLoader;
use crate::infrastructure::remote::ProviderRegistry;
use crate::infrastructure::timer::SystemTimer;

/// Runs bootstraps with a provider registry and a timer
#[derive(Clone)]
pub struct Bootstrapper {
    registry: ProviderRegistry,
    timer: Arc<dyn Timer>,
}

impl Bootstrapper {
    /// Built-in providers and the system clock
    pub fn new() -> Self {
        Self {
            registry: ProviderRegistry::with_defaults(),
            timer: Arc::new(SystemTimer),
        }
    }

    #[must_use]
    pub fn with_registry(mut self, registry: ProviderRegistry) -> Self {
        self.registry = registry;
        self
    }

    #[must_use]
    pub fn with_timer(mut self, timer: Arc<dyn Timer>) -> Self {
        self.timer = timer;
        self
    }

    /// Probe every source and build a fresh context
    ///
    /// Never fails: each probe's error lands in its source's slot.
    pub fn configure(&self, overrides: OptionOverrides) -> ConfigContext {
        let env_file = overrides
            .env_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ENV_FILE));
        debug!(path = %env_file.display(), "loading environment file");
        let env_probe = probe_env_file(&env_file);

        let options = OptionsLoader::load(overrides);
        debug!(
            config_type = %options.config_type,
            filename = %options.filename,
            prefix = ?options.env_prefix,
            "options finalized"
        );

        let mut engine = MergeEngine::new(options.merge_policy);
        let policy = RemoteFetchPolicy::new(options.retry.clone(), Arc::clone(&self.timer));

        let remote_probe = probe_remote(&options, &self.registry, &policy);
        let file_probe = probe_file(&options);

        let mut slots = ErrorSlots::default();
        let mut reports = Vec::with_capacity(Source::ALL.len());
        for probe in [env_probe, remote_probe, file_probe] {
            reports.push(record(probe, &mut engine, &mut slots));
        }

        let store = ResolvedConfig::new(engine, options.env_prefix.clone());
        ConfigContext {
            options,
            store,
            slots,
            reports,
        }
    }
}

impl Default for Bootstrapper {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Bootstrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bootstrapper")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

/// Load a probe's document into the engine, or park its error in the slot
fn record(probe: ProbeResult, engine: &mut MergeEngine, slots: &mut ErrorSlots) -> SourceReport {
    let ProbeResult {
        source,
        location,
        attempts,
        outcome,
    } = probe;

    match outcome {
        Ok(data) => {
            let location = location.unwrap_or_default();
            info!(source = %source, location = %location, attempts, "source loaded");
            // The environment probe only feeds the process environment
            if source != Source::Environment {
                engine.load(SourceLayer {
                    source,
                    location: location.clone(),
                    data,
                });
            }
            SourceReport::loaded(source, location, attempts)
        }
        Err(err) => {
            match err.kind() {
                SourceErrorKind::Unavailable => {
                    info!(source = %source, reason = %err, "source unavailable");
                }
                SourceErrorKind::Failed => {
                    warn!(source = %source, error = %err, "source failed");
                }
            }
            let report = SourceReport::from_error(source, &err, location, attempts);
            slots.set(source, err);
            report
        }
    }
}

#[derive(Debug, Default)]
struct ErrorSlots {
    environment: Option<SourceError>,
    file: Option<SourceError>,
    remote: Option<SourceError>,
}

impl ErrorSlots {
    fn set(&mut self, source: Source, err: SourceError) {
        *self.slot_mut(source) = Some(err);
    }

    fn slot_mut(&mut self, source: Source) -> &mut Option<SourceError> {
        match source {
            Source::Environment => &mut self.environment,
            Source::File => &mut self.file,
            Source::Remote => &mut self.remote,
        }
    }

    const fn get(&self, source: Source) -> Option<&SourceError> {
        match source {
            Source::Environment => self.environment.as_ref(),
            Source::File => self.file.as_ref(),
            Source::Remote => self.remote.as_ref(),
        }
    }
}

/// Result of one bootstrap: options, store, error slots and reports
///
/// Reads take `&self`; share it across threads behind an `Arc`.
#[derive(Debug)]
pub struct ConfigContext {
    options: BootstrapOptions,
    store: ResolvedConfig,
    slots: ErrorSlots,
    reports: Vec<SourceReport>,
}

impl ConfigContext {
    pub const fn options(&self) -> &BootstrapOptions {
        &self.options
    }

    pub const fn config(&self) -> &ResolvedConfig {
        &self.store
    }

    /// Per-source verdicts in probe order: environment, remote, file
    pub fn reports(&self) -> &[SourceReport] {
        &self.reports
    }

    /// Error left by the source's probe, if it did not load
    pub const fn error_for(&self, source: Source) -> Option<&SourceError> {
        self.slots.get(source)
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.store.get(key)
    }

    pub fn is_set(&self, key: &str) -> bool {
        self.store.is_set(key)
    }

    pub fn get_string(&self, key: &str) -> String {
        self.store.get_string(key)
    }

    pub fn get_int(&self, key: &str) -> i64 {
        self.store.get_int(key)
    }

    pub fn get_float(&self, key: &str) -> f64 {
        self.store.get_float(key)
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.store.get_bool(key)
    }

    pub fn get_string_slice(&self, key: &str) -> Vec<String> {
        self.store.get_string_slice(key)
    }

    /// Check that every key resolves to a value
    ///
    /// # Errors
    /// `MissingKeys` naming each absent key, in the order given.
    pub fn ensure_loaded<S: AsRef<str>>(&self, keys: &[S]) -> Result<(), RequirementError> {
        let missing: Vec<String> = keys
            .iter()
            .map(|key| key.as_ref())
            .filter(|key| !self.is_set(key))
            .map(str::to_string)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(RequirementError::MissingKeys(missing))
        }
    }

    /// Like [`Self::ensure_loaded`], but logs and exits with status 1
    pub fn must_load<S: AsRef<str>>(&self, keys: &[S]) {
        if let Err(err) = self.ensure_loaded(keys) {
            if let RequirementError::MissingKeys(missing) = &err {
                for key in missing {
                    error!(key = %key, "Config {key} is not defined");
                }
            }
            error!("{err}");
            std::process::exit(1);
        }
    }

    /// Check that the named sources loaded
    ///
    /// With no sources named this only fails when every source failed.
    ///
    /// # Errors
    /// `AllSourcesFailed`, or `RequiredSourceFailed` for the first named
    /// source whose slot holds an error.
    pub fn ensure_sources_succeeded(&self, required: &[Source]) -> Result<(), RequirementError> {
        if required.is_empty() {
            if Source::ALL
                .iter()
                .all(|source| self.error_for(*source).is_some())
            {
                return Err(RequirementError::AllSourcesFailed);
            }
            return Ok(());
        }

        for source in required {
            if let Some(err) = self.error_for(*source) {
                return Err(RequirementError::RequiredSourceFailed {
                    required: *source,
                    reason: err.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Like [`Self::ensure_sources_succeeded`], but logs and exits with status 1
    pub fn must_source(&self, required: &[Source]) {
        if let Err(err) = self.ensure_sources_succeeded(required) {
            error!("{err}");
            std::process::exit(1);
        }
    }

    /// Bootstrap again, replacing options, store and error slots wholesale
    pub fn reconfigure(&mut self, bootstrapper: &Bootstrapper, overrides: OptionOverrides) {
        *self = bootstrapper.configure(overrides);
    }
}

/// Bootstrap with the built-in providers and the system clock
pub fn configure(overrides: OptionOverrides) -> ConfigContext {
    Bootstrapper::new().configure(overrides)
}

/// Bootstrap with default options, environment overrides still applied
pub fn configure_with_defaults() -> ConfigContext {
    configure(OptionOverrides::new())
}
