use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use dwh_core::DwhConfig;

/// Env var naming the warehouse config file.
pub const CONFIG_ENV: &str = "DWH_CONFIG";

/// Config file read when `DWH_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "dwh.toml";

/// Flags shared by both binaries.
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Print each statement's tag and SQL before executing it
    #[arg(short, long)]
    pub verbose: bool,
}

impl CommonArgs {
    /// Config file path: `DWH_CONFIG`, or `dwh.toml` in the working directory.
    pub fn config_path(&self) -> PathBuf {
        env::var(CONFIG_ENV)
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Load `.env`, then the config file, with env overrides applied.
    pub fn load_config(&self) -> Result<DwhConfig> {
        let path = self.config_path();
        DwhConfig::load(&path)
            .with_context(|| format!("failed to load config from {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::sync::Mutex;

    // Tests touching DWH_CONFIG must run serially.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        common: CommonArgs,
    }

    #[test]
    fn verbose_short_and_long() {
        let cli = TestCli::try_parse_from(["create-tables", "-v"]).unwrap();
        assert!(cli.common.verbose);
        let cli = TestCli::try_parse_from(["create-tables", "--verbose"]).unwrap();
        assert!(cli.common.verbose);
        let cli = TestCli::try_parse_from(["create-tables"]).unwrap();
        assert!(!cli.common.verbose);
    }

    #[test]
    fn config_path_from_env() {
        let _lock = ENV_LOCK.lock().unwrap();
        let cli = TestCli::try_parse_from(["etl"]).unwrap();

        env::remove_var(CONFIG_ENV);
        assert_eq!(cli.common.config_path(), PathBuf::from("dwh.toml"));

        env::set_var(CONFIG_ENV, "/etc/dwh/prod.toml");
        assert_eq!(cli.common.config_path(), PathBuf::from("/etc/dwh/prod.toml"));

        env::set_var(CONFIG_ENV, "");
        assert_eq!(cli.common.config_path(), PathBuf::from("dwh.toml"));

        env::remove_var(CONFIG_ENV);
    }

    #[test]
    fn only_verbose_is_accepted() {
        assert!(TestCli::try_parse_from(["etl", "--dry-run"]).is_err());
        assert!(TestCli::try_parse_from(["etl", "--config", "/etc/dwh/prod.toml"]).is_err());
        assert!(TestCli::try_parse_from(["etl", "dwh.toml"]).is_err());
    }

    #[test]
    fn missing_config_file_has_context() {
        let _lock = ENV_LOCK.lock().unwrap();
        env::set_var(CONFIG_ENV, "/nonexistent/dwh.toml");

        let cli = TestCli::try_parse_from(["etl"]).unwrap();
        let err = cli.common.load_config().unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/dwh.toml"));

        env::remove_var(CONFIG_ENV);
    }
}
