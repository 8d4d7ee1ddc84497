use figment::Jail;
use larder_config::LarderConfig;

#[test]
fn env_vars_fill_sections() {
    Jail::expect_with(|jail| {
        jail.set_env("LARDER_POS__CLIENT_ID", "env-client");
        jail.set_env("LARDER_POS__CLIENT_SECRET", "env-secret");
        jail.set_env("LARDER_SYNC__MAX_CONCURRENCY", "2");

        let config = LarderConfig::load().expect("config loads");
        assert!(config.pos.is_configured());
        assert_eq!(config.sync.max_concurrency, 2);
        assert!(config.require_pos().is_ok());
        Ok(())
    });
}

#[test]
fn invalid_number_is_a_config_error() {
    Jail::expect_with(|jail| {
        jail.set_env("LARDER_SYNC__MAX_CONCURRENCY", "many");

        let err = LarderConfig::load().expect_err("should fail to parse");
        assert!(err.to_string().starts_with("Configuration error"));
        Ok(())
    });
}
