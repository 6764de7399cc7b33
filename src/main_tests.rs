// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `main.rs` - argument parsing, configuration loading and output

#[cfg(test)]
mod tests {
    use super::super::{load_config, render, Args, OutputFormat};
    use clap::Parser;
    use endpoint_composer::endpoint::{Endpoint, RecordType, Ttl};
    use endpoint_composer::pipeline_errors::ConfigError;
    use endpoint_composer::wrappers::WrapperConfig;
    use std::io::Write;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "endpoint-composer",
            "--config",
            "pipeline.yaml",
            "--endpoints",
            "a.yaml",
            "--endpoints",
            "b.yaml",
            "--output",
            "json",
        ])
        .unwrap();

        assert_eq!(args.config, Some(PathBuf::from("pipeline.yaml")));
        assert_eq!(
            args.endpoints,
            vec![PathBuf::from("a.yaml"), PathBuf::from("b.yaml")]
        );
        assert_eq!(args.output, OutputFormat::Json);
    }

    #[test]
    fn test_args_require_endpoints() {
        assert!(Args::try_parse_from(["endpoint-composer"]).is_err());
    }

    #[test]
    fn test_args_default_output_is_yaml() {
        let args = Args::try_parse_from(["endpoint-composer", "--endpoints", "a.yaml"]).unwrap();
        assert_eq!(args.output, OutputFormat::Yaml);
        assert!(args.config.is_none());
    }

    #[tokio::test]
    async fn test_load_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"minTtl: 60\nnat64Networks: ['64:ff9b::/96']\n")
            .unwrap();

        let config = load_config(file.path()).await.unwrap();

        assert_eq!(
            config,
            WrapperConfig::default()
                .with_min_ttl(Duration::from_secs(60))
                .with_nat64_networks(["64:ff9b::/96"])
        );
    }

    #[tokio::test]
    async fn test_load_config_unknown_type_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"minTtl: soon\n").unwrap();

        let err = load_config(file.path()).await.unwrap_err();

        assert!(matches!(err, ConfigError::ParseFailed { .. }));
    }

    #[tokio::test]
    async fn test_load_config_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();

        let err = load_config(&dir.path().join("missing.yaml")).await.unwrap_err();

        assert!(matches!(err, ConfigError::ReadFailed { .. }));
    }

    #[test]
    fn test_render_yaml_and_json() {
        let endpoints = vec![Endpoint::with_ttl(
            "www.example.org",
            RecordType::A,
            Ttl(300),
            ["192.0.2.10"],
        )];

        let yaml = render(endpoints.clone(), OutputFormat::Yaml).unwrap();
        assert!(yaml.contains("dnsName: www.example.org"));
        assert!(yaml.contains("recordTTL: 300"));

        let json = render(endpoints, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["endpoints"][0]["recordType"], "A");
        assert_eq!(value["endpoints"][0]["targets"][0], "192.0.2.10");
    }
}
