//! Unit tests for CLI commands
#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::cli::{inspect_report, resolve_config, Cli, Commands, Emit, Overrides};
use crate::config::PathType;
use crate::descriptor::{LoadOptions, Registry, RegistrySource};
use clap::Parser;
use std::fs;

#[test]
fn test_generate_command_parses() {
    let cli = Cli::try_parse_from([
        "gokitmux-gen",
        "generate",
        "--descriptor",
        "api.yaml",
        "--param",
        "gen_service,module=example.com/api",
        "--paths",
        "source_relative",
        "--emit",
        "json",
        "--dry-run",
    ])
    .unwrap();

    match cli.command {
        Commands::Generate {
            descriptor,
            out_dir,
            param,
            paths,
            emit,
            dry_run,
            format,
            ..
        } => {
            assert_eq!(descriptor.to_string_lossy(), "api.yaml");
            assert_eq!(out_dir.to_string_lossy(), ".");
            assert_eq!(param.as_deref(), Some("gen_service,module=example.com/api"));
            assert_eq!(paths, Some(PathType::SourceRelative));
            assert_eq!(emit, Emit::Json);
            assert!(dry_run);
            assert!(!format);
        }
        _ => panic!("Expected Generate command"),
    }
}

#[test]
fn test_invalid_paths_value_is_rejected() {
    let cli = Cli::try_parse_from([
        "gokitmux-gen",
        "generate",
        "--descriptor",
        "api.yaml",
        "--paths",
        "nearby",
    ]);
    assert!(cli.is_err());
}

#[test]
fn test_all_commands_parse() {
    let commands = vec![
        vec!["gokitmux-gen", "generate", "--descriptor", "api.yaml"],
        vec!["gokitmux-gen", "generate", "-d", "api.yaml", "-o", "out", "--format"],
        vec!["gokitmux-gen", "inspect", "--descriptor", "api.yaml"],
    ];

    for args in commands {
        let cli = Cli::try_parse_from(&args);
        assert!(cli.is_ok(), "Failed to parse command: {:?}", args);
    }
}

#[test]
fn test_config_layering() {
    let dir = tempfile::tempdir().unwrap();
    let descriptor = dir.path().join("api.yaml");
    fs::write(&descriptor, "files: []\n").unwrap();
    fs::write(
        dir.path().join("gokitmux.toml"),
        "output_path = \"example.com/api/gw\"\nmetrics = \"example.com/metrics\"\n",
    )
    .unwrap();

    let overrides = Overrides {
        error_encoder: Some("encodeError".into()),
        gen_service: true,
        ..Default::default()
    };
    let config = resolve_config(
        &descriptor,
        None,
        Some("module=example.com/api,register_func_suffix=Server"),
        &overrides,
    )
    .unwrap();
    assert_eq!(config.output_path, "example.com/api/gw");
    assert_eq!(config.module.as_deref(), Some("example.com/api"));
    assert_eq!(config.metrics.as_deref(), Some("example.com/metrics"));
    assert_eq!(config.register_func_suffix, "Server");
    assert_eq!(config.error_encoder.as_deref(), Some("encodeError"));
    assert!(config.generate_service);
}

#[test]
fn test_flags_override_param() {
    let dir = tempfile::tempdir().unwrap();
    let descriptor = dir.path().join("api.yaml");
    let overrides = Overrides {
        output_path: Some("flag/out".into()),
        ..Default::default()
    };
    let config =
        resolve_config(&descriptor, None, Some("output_path=param/out"), &overrides).unwrap();
    assert_eq!(config.output_path, "flag/out");
}

#[test]
fn test_missing_explicit_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let descriptor = dir.path().join("api.yaml");
    let missing = dir.path().join("nope.toml");
    let err = resolve_config(&descriptor, Some(&missing), None, &Overrides::default()).unwrap_err();
    assert!(err.to_string().contains("Generator config not found"));
}

#[test]
fn test_unknown_param_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let descriptor = dir.path().join("api.yaml");
    let err = resolve_config(&descriptor, None, Some("colour=blue"), &Overrides::default())
        .unwrap_err();
    assert!(err.to_string().contains("colour"));
}

#[test]
fn test_inspect_report() {
    let source: RegistrySource =
        serde_yaml::from_str(include_str!("../../tests/fixtures/library.yaml")).unwrap();
    let registry = Registry::from_source(source, &LoadOptions::default()).unwrap();
    let report = inspect_report(&registry).unwrap();

    assert!(report.starts_with("acme/library/v1/library.proto\n"));
    assert!(report.contains("  library_service.list_books\n"));
    assert!(report.contains(
        "    [0] GET /v1/genres/{genre}/authors/{filter.author}/books -> /v1/genres/{genre}/authors/{filter.author}/books\n"
    ));
    assert!(report.contains("        path:   genre, filter.author (enum)\n"));
    assert!(report.contains("        query:  filter.year, page\n"));
    assert!(report.contains("        body:   *\n"));
    assert!(report.contains("  library_service.ping\n    (no HTTP binding)\n"));
    assert!(report.contains("acme/admin/v1/admin.proto\n  Admin.Reindex\n    (no HTTP binding)\n"));
}
