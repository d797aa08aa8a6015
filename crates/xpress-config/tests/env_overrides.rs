use figment::Jail;
use xpress_config::{ConfigError, XpressConfig};
use xpress_schema::SchemaDraft;

#[test]
fn env_vars_fill_config_values() {
    Jail::expect_with(|jail| {
        jail.set_env("XPRESS_VALIDATION__DRAFT", "draft6");
        jail.set_env("XPRESS_VALIDATION__VALIDATE_FORMATS", "false");

        let config = XpressConfig::load().expect("config loads");
        assert_eq!(config.validation.draft, SchemaDraft::Draft6);
        assert!(!config.validation.validate_formats);
        Ok(())
    });
}

#[test]
fn env_beats_project_toml() {
    Jail::expect_with(|jail| {
        std::fs::create_dir_all(jail.directory().join(".xpress"))
            .map_err(|e| e.to_string())?;
        jail.create_file(
            ".xpress/config.toml",
            r#"
[general]
log_filter = "info"
"#,
        )?;
        jail.set_env("XPRESS_GENERAL__LOG_FILTER", "debug");

        let config = XpressConfig::load().expect("config loads");
        assert_eq!(config.general.log_filter, "debug");
        Ok(())
    });
}

#[test]
fn blank_log_filter_is_rejected() {
    Jail::expect_with(|jail| {
        std::fs::create_dir_all(jail.directory().join(".xpress"))
            .map_err(|e| e.to_string())?;
        jail.create_file(
            ".xpress/config.toml",
            r#"
[general]
log_filter = ""
"#,
        )?;

        let result = XpressConfig::load();
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
        Ok(())
    });
}
