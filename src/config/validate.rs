use anyhow::{Result, bail};

use super::AppConfig;

/// Collects every problem before failing so a misconfigured deployment is
/// fixed in one pass.
pub fn validate(cfg: &AppConfig) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    if cfg.general.host.trim().is_empty() {
        errors.push("general.host must not be empty".to_string());
    }

    if cfg.general.port == 0 {
        errors.push("general.port must be > 0".to_string());
    }

    if cfg.general.public_dir.trim().is_empty() {
        errors.push("general.public_dir must not be empty".to_string());
    }

    if cfg.database.url.trim().is_empty() {
        errors.push("database.url must not be empty".to_string());
    }

    if cfg.database.max_connections == 0 {
        errors.push("database.max_connections must be > 0".to_string());
    }

    if cfg.database.min_idle > cfg.database.max_connections {
        errors.push(format!(
            "database.min_idle ({}) must be <= database.max_connections ({})",
            cfg.database.min_idle, cfg.database.max_connections
        ));
    }

    if errors.is_empty() {
        return Ok(());
    }

    bail!("invalid app config:\n- {}", errors.join("\n- "))
}

#[cfg(test)]
mod tests {
    use super::validate;
    use crate::config::AppConfig;

    #[test]
    fn defaults_are_valid() {
        validate(&AppConfig::default()).expect("default config should validate");
    }

    #[test]
    fn reports_every_problem_at_once() {
        let mut cfg = AppConfig::default();
        cfg.general.host = "  ".to_string();
        cfg.database.url = String::new();
        cfg.database.max_connections = 1;
        cfg.database.min_idle = 4;

        let message = validate(&cfg).expect_err("config should be rejected").to_string();
        assert!(message.contains("general.host must not be empty"));
        assert!(message.contains("database.url must not be empty"));
        assert!(message.contains("database.min_idle (4) must be <= database.max_connections (1)"));
    }
}
