//! Source probes
//!
//! Each probe tries one source and reports what it found. Probes never
//! propagate errors; the outcome is handed to the bootstrap, which records
//! it in the source's error slot.

use figment::value::Dict;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::retry_policy::RemoteFetchPolicy;
use crate::domain::errors::SourceError;
use crate::domain::models::{BootstrapOptions, ConfigFormat, Source};
use crate::infrastructure::remote::ProviderRegistry;

/// What one probe produced
#[derive(Debug)]
pub struct ProbeResult {
    pub source: Source,
    /// Path or URL that was read, or that was looked for
    pub location: Option<String>,
    /// Fetch attempts; 1 for local sources, 0 when nothing was tried
    pub attempts: u32,
    /// Decoded document; the environment probe yields an empty map
    pub outcome: Result<Dict, SourceError>,
}

/// Load `KEY=VALUE` lines from `path` into the process environment
///
/// Variables already set in the environment keep their values.
pub fn probe_env_file(path: &Path) -> ProbeResult {
    let location = Some(path.display().to_string());
    let outcome = match dotenvy::from_path(path) {
        Ok(()) => Ok(Dict::new()),
        Err(e) if e.not_found() => Err(SourceError::EnvFileMissing {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(SourceError::EnvFileInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }),
    };

    ProbeResult {
        source: Source::Environment,
        location,
        attempts: 1,
        outcome,
    }
}

/// Locate `<filename>.<type>` in the search directories and decode it
///
/// Directories are tried in order and the first existing file wins, even if
/// it then fails to parse.
pub fn probe_file(options: &BootstrapOptions) -> ProbeResult {
    let file_name = format!("{}.{}", options.filename, options.config_type);
    let mut result = ProbeResult {
        source: Source::File,
        location: None,
        attempts: 0,
        outcome: Ok(Dict::new()),
    };

    let format = match options.config_type.parse::<ConfigFormat>() {
        Ok(format) => format,
        Err(err) => {
            result.outcome = Err(err);
            return result;
        }
    };

    let mut searched = Vec::new();
    for dir in &options.search_dirs {
        let Some(dir) = expand_dir(dir) else {
            debug!(dir = %dir.display(), "skipping search directory with unset variable");
            continue;
        };

        let candidate = dir.join(&file_name);
        searched.push(dir);
        if !candidate.is_file() {
            continue;
        }

        debug!(path = %candidate.display(), "found config file");
        result.location = Some(candidate.display().to_string());
        result.attempts = 1;
        result.outcome = read_config_file(&candidate, format);
        return result;
    }

    result.outcome = Err(SourceError::FileNotFound {
        file: file_name,
        searched,
    });
    result
}

fn read_config_file(path: &Path, format: ConfigFormat) -> Result<Dict, SourceError> {
    let content = fs::read_to_string(path).map_err(|e| SourceError::FileUnreadable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    format
        .decode(&content)
        .map_err(|reason| SourceError::FileInvalid {
            path: path.to_path_buf(),
            format,
            reason,
        })
}

/// Expand a leading `~` or `$VAR` component from the environment
///
/// Returns `None` when the referenced variable is unset or empty. `~user`
/// forms are left as they are.
pub fn expand_dir(dir: &Path) -> Option<PathBuf> {
    let Some(raw) = dir.to_str() else {
        return Some(dir.to_path_buf());
    };

    let (var, rest) = if let Some(rest) = raw.strip_prefix('~') {
        if !(rest.is_empty() || rest.starts_with('/')) {
            return Some(dir.to_path_buf());
        }
        ("HOME", rest)
    } else if let Some(stripped) = raw.strip_prefix('$') {
        let end = stripped.find('/').unwrap_or(stripped.len());
        stripped.split_at(end)
    } else {
        return Some(dir.to_path_buf());
    };

    let base = env::var(var).ok().filter(|value| !value.is_empty())?;
    let rest = rest.trim_start_matches('/');
    if rest.is_empty() {
        Some(PathBuf::from(base))
    } else {
        Some(Path::new(&base).join(rest))
    }
}

/// Fetch the remote document through the retry policy
///
/// Without a complete descriptor nothing is contacted and the result is
/// "not configured".
pub fn probe_remote(
    options: &BootstrapOptions,
    registry: &ProviderRegistry,
    policy: &RemoteFetchPolicy,
) -> ProbeResult {
    let mut result = ProbeResult {
        source: Source::Remote,
        location: None,
        attempts: 0,
        outcome: Ok(Dict::new()),
    };

    let descriptor = match options.remote.descriptor() {
        Ok(descriptor) => descriptor,
        Err(err) => {
            result.outcome = Err(err);
            return result;
        }
    };
    result.location = Some(format!(
        "{}://{}/{}",
        descriptor.provider,
        descriptor.dsn,
        descriptor.key.trim_start_matches('/')
    ));

    let format = match options.config_type.parse::<ConfigFormat>() {
        Ok(format) => format,
        Err(err) => {
            result.outcome = Err(err);
            return result;
        }
    };

    let provider = match registry.get(&descriptor.provider) {
        Ok(provider) => provider,
        Err(err) => {
            result.outcome = Err(err.into());
            return result;
        }
    };

    let fetched = policy.execute(|attempt| {
        debug!(attempt, provider = %descriptor.provider, "fetching remote source");
        provider.fetch(&descriptor, format)
    });

    result.attempts = fetched.attempts;
    result.outcome = fetched.result.map_err(SourceError::from);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::OptionOverrides;
    use std::fs;
    use tempfile::TempDir;

    fn options_for(dirs: &[PathBuf]) -> BootstrapOptions {
        OptionOverrides::new()
            .with_search_dirs(dirs.iter().cloned())
            .apply(BootstrapOptions::default())
    }

    #[test]
    fn test_probe_file_first_match_wins() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        fs::write(first.path().join("config.json"), r#"{"port": 1}"#).unwrap();
        fs::write(second.path().join("config.json"), r#"{"port": 2}"#).unwrap();

        let result = probe_file(&options_for(&[
            first.path().to_path_buf(),
            second.path().to_path_buf(),
        ]));

        let dict = result.outcome.unwrap();
        assert_eq!(
            crate::services::store::value_to_i64(dict.get("port").unwrap()),
            Some(1)
        );
        assert_eq!(
            result.location,
            Some(first.path().join("config.json").display().to_string())
        );
    }

    #[test]
    fn test_probe_file_skips_missing_directories() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.json"), r#"{"port": 8080}"#).unwrap();

        let result = probe_file(&options_for(&[
            dir.path().join("missing"),
            dir.path().to_path_buf(),
        ]));

        assert!(result.outcome.is_ok());
    }

    #[test]
    fn test_probe_file_not_found_lists_searched_directories() {
        let dir = TempDir::new().unwrap();

        let result = probe_file(&options_for(&[dir.path().to_path_buf()]));

        match result.outcome {
            Err(SourceError::FileNotFound { file, searched }) => {
                assert_eq!(file, "config.json");
                assert_eq!(searched, vec![dir.path().to_path_buf()]);
            }
            other => panic!("Expected FileNotFound, got {other:?}"),
        }
        assert_eq!(result.attempts, 0);
    }

    #[test]
    fn test_probe_file_parse_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.json"), "{ broken").unwrap();

        let result = probe_file(&options_for(&[dir.path().to_path_buf()]));

        assert!(matches!(
            result.outcome,
            Err(SourceError::FileInvalid {
                format: ConfigFormat::Json,
                ..
            })
        ));
    }

    #[test]
    fn test_probe_file_unsupported_type() {
        let options = OptionOverrides::new()
            .with_type("ini")
            .apply(BootstrapOptions::default());

        let result = probe_file(&options);

        assert!(matches!(
            result.outcome,
            Err(SourceError::UnsupportedFormat(ref name)) if name == "ini"
        ));
    }

    #[test]
    fn test_probe_file_uses_type_as_extension() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("service.yml"), "port: 7000\n").unwrap();

        let options = OptionOverrides::new()
            .with_type("yml")
            .with_filename("service")
            .with_search_dirs([dir.path()])
            .apply(BootstrapOptions::default());

        assert!(probe_file(&options).outcome.is_ok());
    }

    #[test]
    fn test_expand_dir() {
        temp_env::with_vars(
            [("HOME", Some("/home/svc")), ("CONF_ROOT", None::<&str>)],
            || {
                assert_eq!(
                    expand_dir(Path::new("$HOME")),
                    Some(PathBuf::from("/home/svc"))
                );
                assert_eq!(
                    expand_dir(Path::new("~/.config")),
                    Some(PathBuf::from("/home/svc/.config"))
                );
                assert_eq!(expand_dir(Path::new("~")), Some(PathBuf::from("/home/svc")));
                assert_eq!(
                    expand_dir(Path::new("~user/x")),
                    Some(PathBuf::from("~user/x"))
                );
                assert_eq!(expand_dir(Path::new("$CONF_ROOT/app")), None);
                assert_eq!(
                    expand_dir(Path::new("/etc")),
                    Some(PathBuf::from("/etc"))
                );
            },
        );
    }

    #[test]
    fn test_probe_env_file_loads_variables() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "PROBE_TEST_TOKEN=abc123\n# comment\n").unwrap();

        temp_env::with_var_unset("PROBE_TEST_TOKEN", || {
            let result = probe_env_file(&path);
            assert!(result.outcome.is_ok());
            assert_eq!(env::var("PROBE_TEST_TOKEN").unwrap(), "abc123");
        });
    }

    #[test]
    fn test_probe_env_file_keeps_existing_variables() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "PROBE_TEST_REGION=from-file\n").unwrap();

        temp_env::with_var("PROBE_TEST_REGION", Some("from-shell"), || {
            probe_env_file(&path);
            assert_eq!(env::var("PROBE_TEST_REGION").unwrap(), "from-shell");
        });
    }

    #[test]
    fn test_probe_env_file_missing_is_unavailable() {
        let dir = TempDir::new().unwrap();

        let result = probe_env_file(&dir.path().join(".env"));

        let err = result.outcome.unwrap_err();
        assert!(matches!(err, SourceError::EnvFileMissing { .. }));
        assert_eq!(
            err.kind(),
            crate::domain::errors::SourceErrorKind::Unavailable
        );
    }

    #[test]
    fn test_probe_env_file_malformed_is_failed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "NOT A VALID LINE\n").unwrap();

        let result = probe_env_file(&path);

        assert!(matches!(
            result.outcome,
            Err(SourceError::EnvFileInvalid { .. })
        ));
    }
}
