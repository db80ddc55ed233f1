use bootconf::cli::{Cli, Commands, ValueKind};
use bootconf::infrastructure::logging::LogFormat;
use bootconf::{RetryStrategy, Source};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[test]
fn test_parse_get_with_kind() {
    let cli = Cli::try_parse_from(["bootconf", "get", "db.port", "--as", "int"]).unwrap();

    match cli.command {
        Commands::Get { key, kind } => {
            assert_eq!(key, "db.port");
            assert_eq!(kind, ValueKind::Int);
        }
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_get_defaults_to_string() {
    let cli = Cli::try_parse_from(["bootconf", "get", "name"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Get {
            kind: ValueKind::String,
            ..
        }
    ));
}

#[test]
fn test_parse_check_with_keys_and_sources() {
    let cli = Cli::try_parse_from([
        "bootconf", "check", "--key", "db.host", "--key", "db.port", "--source", "file",
        "--source", "consul",
    ])
    .unwrap();

    match cli.command {
        Commands::Check { keys, sources } => {
            assert_eq!(keys, vec!["db.host", "db.port"]);
            assert_eq!(sources, vec![Source::File, Source::Remote]);
        }
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_invalid_source_is_rejected() {
    assert!(Cli::try_parse_from(["bootconf", "check", "--source", "etcd"]).is_err());
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "bootconf",
        "sources",
        "--type",
        "yaml",
        "--dir",
        "./conf",
        "--dir",
        "/etc/svc",
        "--json",
        "--log-format",
        "json",
    ])
    .unwrap();

    assert!(cli.json);
    assert_eq!(cli.log_format, LogFormat::Json);
    assert_eq!(cli.source.config_type.as_deref(), Some("yaml"));
    assert_eq!(
        cli.source.dirs,
        vec![PathBuf::from("./conf"), PathBuf::from("/etc/svc")]
    );
}

#[test]
fn test_flags_become_overrides() {
    let cli = Cli::try_parse_from([
        "bootconf",
        "--filename",
        "service",
        "--prefix",
        "svc",
        "--remote-provider",
        "consul",
        "--remote-dsn",
        "localhost:8500",
        "--remote-key",
        "/service",
        "--retry-attempts",
        "3",
        "dump",
    ])
    .unwrap();

    let overrides = cli.source.to_overrides();
    assert_eq!(overrides.filename.as_deref(), Some("service"));
    assert_eq!(overrides.env_prefix.as_deref(), Some("svc"));
    assert_eq!(overrides.remote.dsn.as_deref(), Some("localhost:8500"));
    assert_eq!(
        overrides.retry,
        Some(RetryStrategy::fixed(Duration::from_secs(10), 3))
    );
    assert!(overrides.search_dirs.is_none(), "No --dir keeps the defaults");
}

#[test]
fn test_no_retry_flags_keep_default_strategy() {
    let cli = Cli::try_parse_from(["bootconf", "sources"]).unwrap();
    assert!(cli.source.to_overrides().retry.is_none());
}
