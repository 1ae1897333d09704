//! Integration tests for layered TOML + env configuration loading.
//!
//! Uses `figment::Jail` for sandboxed cwd/env manipulation, the same
//! approach the config crate's own unit-level sibling uses.

use figment::Jail;
use kw_config::RunConfig;

#[test]
fn loads_builder_bounds_from_project_toml() {
    Jail::expect_with(|jail| {
        jail.create_dir(".kiriwake")?;
        jail.create_file(
            ".kiriwake/config.toml",
            r#"
[builder]
min_chars = 300
max_chars = 2000
"#,
        )?;

        let config = RunConfig::load().expect("config loads");
        assert_eq!(config.builder.min_chars, 300);
        assert_eq!(config.builder.max_chars, 2000);
        Ok(())
    });
}

#[test]
fn env_var_overrides_project_toml() {
    Jail::expect_with(|jail| {
        jail.create_dir(".kiriwake")?;
        jail.create_file(
            ".kiriwake/config.toml",
            r#"
[builder]
min_chars = 300
"#,
        )?;
        jail.set_env("KW_BUILDER__MIN_CHARS", "500");

        let config = RunConfig::load().expect("config loads");
        assert_eq!(config.builder.min_chars, 500);
        Ok(())
    });
}

#[test]
fn defaults_apply_with_no_files_or_env() {
    Jail::expect_with(|_jail| {
        let config = RunConfig::load().expect("config loads");
        assert_eq!(config.builder.min_chars, 200);
        assert_eq!(config.builder.max_chars, 1200);
        assert_eq!(config.detect.theta_high, 0.85);
        Ok(())
    });
}

#[test]
fn invalid_merged_config_is_rejected() {
    Jail::expect_with(|jail| {
        jail.create_dir(".kiriwake")?;
        jail.create_file(
            ".kiriwake/config.toml",
            r#"
[builder]
min_chars = 5000
max_chars = 100
"#,
        )?;

        let result = RunConfig::load();
        assert!(result.is_err());
        Ok(())
    });
}

#[test]
fn detector_theta_env_override() {
    Jail::expect_with(|jail| {
        jail.set_env("KW_DETECT__THETA_HIGH", "0.9");
        jail.set_env("KW_DETECT__THETA_LOW", "0.4");

        let config = RunConfig::load().expect("config loads");
        assert!((config.detect.theta_high - 0.9).abs() < 1e-6);
        assert!((config.detect.theta_low - 0.4).abs() < 1e-6);
        Ok(())
    });
}
