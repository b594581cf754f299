// Configuration layering and validation tests.

use appd_backend_export::cli::Cli;
use appd_backend_export::config::AppConfig;
use clap::Parser;

fn bare_cli() -> Cli {
    Cli::parse_from(["appd-backend-export"])
}

fn required_env(extra: &[(&str, Option<&str>)]) -> Vec<(String, Option<String>)> {
    let mut vars = vec![
        ("ABE_CONTROLLER__BASE_URL", Some("https://controller.example.com")),
        ("ABE_CONTROLLER__ACCOUNT", Some("customer1")),
        ("ABE_CONTROLLER__USERNAME", Some("api_user")),
        ("ABE_CONTROLLER__PASSWORD", Some("secret-password")),
    ];
    vars.extend_from_slice(extra);
    vars.into_iter()
        .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
        .collect()
}

#[test]
fn defaults_fill_everything_but_the_connection() {
    temp_env::with_vars(required_env(&[]), || {
        let config = AppConfig::load(&bare_cli()).expect("config loads");

        assert_eq!(config.controller.base_url, "https://controller.example.com");
        assert_eq!(config.controller.timeout_secs, 30);
        assert_eq!(config.export.application_names, ".*");
        assert_eq!(config.export.backend_type, "^Call-");
        assert!(!config.export.skip_thread_tasks);
        assert_eq!(config.export.output_path, "backends.csv");
        assert_eq!(config.log.level, "info");
        assert_eq!(config.log.format, "pretty");
    });
}

#[test]
fn missing_credentials_fail_before_any_network_call() {
    temp_env::with_vars(
        required_env(&[("ABE_CONTROLLER__PASSWORD", None)]),
        || {
            let err = AppConfig::load(&bare_cli()).expect_err("must fail");
            assert!(err.to_string().contains("Missing credentials"));
        },
    );
}

#[test]
fn empty_base_url_is_rejected() {
    temp_env::with_vars(
        required_env(&[("ABE_CONTROLLER__BASE_URL", None)]),
        || {
            let err = AppConfig::load(&bare_cli()).expect_err("must fail");
            assert!(err.to_string().contains("base_url"));
        },
    );
}

#[test]
fn invalid_filter_regex_is_rejected_at_load_time() {
    temp_env::with_vars(
        required_env(&[("ABE_EXPORT__BACKEND_TYPE", Some("("))]),
        || {
            let err = AppConfig::load(&bare_cli()).expect_err("must fail");
            assert!(err.to_string().contains("Invalid regex"));
        },
    );
}

#[test]
fn environment_overrides_defaults() {
    temp_env::with_vars(
        required_env(&[
            ("ABE_EXPORT__SKIP_THREAD_TASKS", Some("true")),
            ("ABE_EXPORT__BACKEND_TYPE", Some("^Call-JDBC")),
            ("ABE_CONTROLLER__TIMEOUT_SECS", Some("90")),
        ]),
        || {
            let config = AppConfig::load(&bare_cli()).expect("config loads");
            assert!(config.export.skip_thread_tasks);
            assert_eq!(config.export.backend_type, "^Call-JDBC");
            assert_eq!(config.controller.timeout_secs, 90);
        },
    );
}

#[test]
fn cli_flags_override_the_environment() {
    temp_env::with_vars(
        required_env(&[("ABE_EXPORT__OUTPUT_PATH", Some("env.csv"))]),
        || {
            let cli = Cli::parse_from([
                "appd-backend-export",
                "--applications",
                "^prod-",
                "--skip-thread-tasks",
                "--output",
                "cli.csv",
            ]);
            let config = AppConfig::load(&cli).expect("config loads");

            assert_eq!(config.export.application_names, "^prod-");
            assert!(config.export.skip_thread_tasks);
            assert_eq!(config.export.output_path, "cli.csv");
        },
    );
}
