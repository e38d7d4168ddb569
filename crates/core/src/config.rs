use std::env;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default Redshift port.
pub const DEFAULT_PORT: u16 = 5439;

/// Env var selecting the override profile (e.g. `PROD` reads `PROD_DWH_HOST` first).
pub const PROFILE_ENV: &str = "DWH_PROFILE";

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn override_string(profile: &str, key: &str, target: &mut String) {
    if let Some(v) = profiled_env_opt(profile, key) {
        *target = v;
    }
}

// ── Top-level config ──────────────────────────────────────────

/// Warehouse connection, load-role and source locations.
///
/// Parsed from a TOML file whose sections mirror the classic `dwh.cfg`
/// layout (`[CLUSTER]`, `[IAM_ROLE]`, `[S3]`), plus an optional `[ETL]`
/// section. Environment variables override file values; see
/// [`DwhConfig::apply_env_overrides`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DwhConfig {
    #[serde(rename = "CLUSTER", default)]
    pub cluster: ClusterConfig,
    #[serde(rename = "IAM_ROLE", default)]
    pub iam_role: IamRoleConfig,
    #[serde(rename = "S3", default)]
    pub s3: S3Config,
    #[serde(rename = "ETL", default)]
    pub etl: EtlConfig,
}

impl DwhConfig {
    /// Parse config from a TOML string, apply env overrides for the profile
    /// named by `DWH_PROFILE`, then validate.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let profile = env_opt(PROFILE_ENV)
            .map(|s| s.to_uppercase())
            .unwrap_or_default();
        Self::from_toml_profiled(toml_str, &profile)
    }

    /// Same as [`from_toml`](Self::from_toml) with an explicit profile.
    pub fn from_toml_profiled(toml_str: &str, profile: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(toml_str)?;
        config.apply_env_overrides(profile);
        config.validate()?;
        Ok(config)
    }

    /// Load config from a file path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Load `.env`, then the config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        load_dotenv();
        Self::from_file(path)
    }

    /// Overlay `DWH_*` environment variables onto file values.
    pub fn apply_env_overrides(&mut self, profile: &str) {
        let c = &mut self.cluster;
        override_string(profile, "DWH_HOST", &mut c.host);
        override_string(profile, "DWH_DB_NAME", &mut c.db_name);
        override_string(profile, "DWH_DB_USER", &mut c.db_user);
        override_string(profile, "DWH_DB_PASSWORD", &mut c.db_password);
        override_string(profile, "DWH_SSL_MODE", &mut c.ssl_mode);
        if let Some(port) = profiled_env_opt(profile, "DWH_DB_PORT").and_then(|v| v.parse().ok()) {
            c.db_port = port;
        }

        override_string(profile, "DWH_IAM_ROLE_ARN", &mut self.iam_role.arn);

        let s3 = &mut self.s3;
        override_string(profile, "DWH_LOG_DATA", &mut s3.log_data);
        override_string(profile, "DWH_LOG_JSONPATH", &mut s3.log_jsonpath);
        override_string(profile, "DWH_SONG_DATA", &mut s3.song_data);
        if let Some(region) = profiled_env_opt(profile, "DWH_S3_REGION") {
            s3.region = Some(region);
        }

        if let Some(mode) =
            profiled_env_opt(profile, "DWH_WEEK_EXTRACTION").and_then(|v| v.parse().ok())
        {
            self.etl.week_extraction = mode;
        }
    }

    /// Check that every required value is present and well-formed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require("CLUSTER.HOST", &self.cluster.host)?;
        require("CLUSTER.DB_NAME", &self.cluster.db_name)?;
        require("CLUSTER.DB_USER", &self.cluster.db_user)?;
        require("CLUSTER.DB_PASSWORD", &self.cluster.db_password)?;
        if self.cluster.db_port == 0 {
            return Err(ConfigError::Invalid {
                key: "CLUSTER.DB_PORT",
                reason: "port must be non-zero".into(),
            });
        }

        require("IAM_ROLE.ARN", &self.iam_role.arn)?;
        if !self.iam_role.arn.starts_with("arn:") {
            return Err(ConfigError::Invalid {
                key: "IAM_ROLE.ARN",
                reason: format!("expected an ARN, got '{}'", self.iam_role.arn),
            });
        }

        require_s3("S3.LOG_DATA", &self.s3.log_data)?;
        require_s3("S3.LOG_JSONPATH", &self.s3.log_jsonpath)?;
        require_s3("S3.SONG_DATA", &self.s3.song_data)?;
        if let Some(region) = &self.s3.region {
            require("S3.REGION", region)?;
        }
        Ok(())
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  cluster:  {}", self.cluster.redacted_connection_string());
        tracing::info!("  iam_role: {}", self.iam_role.arn);
        tracing::info!(
            "  s3:       log_data={}, song_data={}, region={}",
            self.s3.log_data,
            self.s3.song_data,
            self.s3.region.as_deref().unwrap_or("(cluster default)")
        );
        tracing::info!("  etl:      week_extraction={}", self.etl.week_extraction);
    }
}

fn require(key: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid {
            key,
            reason: "value is missing".into(),
        });
    }
    Ok(())
}

fn require_s3(key: &'static str, value: &str) -> Result<(), ConfigError> {
    require(key, value)?;
    if !value.starts_with("s3://") {
        return Err(ConfigError::Invalid {
            key,
            reason: format!("expected an s3:// location, got '{}'", value),
        });
    }
    Ok(())
}

// ── Cluster ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct ClusterConfig {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub db_name: String,
    #[serde(default)]
    pub db_user: String,
    #[serde(default)]
    pub db_password: String,
    #[serde(default = "default_port")]
    pub db_port: u16,
    #[serde(default = "default_ssl_mode")]
    pub ssl_mode: String,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_ssl_mode() -> String {
    "prefer".to_string()
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            db_name: String::new(),
            db_user: String::new(),
            db_password: String::new(),
            db_port: default_port(),
            ssl_mode: default_ssl_mode(),
        }
    }
}

impl ClusterConfig {
    /// libpq-style key/value connection string, keys in
    /// host, dbname, user, password, port order.
    pub fn connection_string(&self) -> String {
        format!(
            "host={} dbname={} user={} password={} port={}",
            self.host, self.db_name, self.db_user, self.db_password, self.db_port
        )
    }

    /// Same as [`connection_string`](Self::connection_string) with the password masked.
    pub fn redacted_connection_string(&self) -> String {
        Self {
            db_password: "***".into(),
            ..self.clone()
        }
        .connection_string()
    }
}

// ── IAM role ──────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct IamRoleConfig {
    /// Role the warehouse assumes to read from S3 during `COPY`.
    #[serde(default)]
    pub arn: String,
}

// ── S3 sources ────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct S3Config {
    /// Prefix holding the event log files.
    #[serde(default)]
    pub log_data: String,
    /// JSONPaths file mapping event log fields onto `staging_events` columns.
    #[serde(default)]
    pub log_jsonpath: String,
    /// Prefix holding the song catalog files.
    #[serde(default)]
    pub song_data: String,
    /// Bucket region, when it differs from the cluster's.
    #[serde(default)]
    pub region: Option<String>,
}

// ── ETL options ───────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct EtlConfig {
    #[serde(default)]
    pub week_extraction: WeekExtraction,
}

/// How the `time.week` column is derived from `start_time`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekExtraction {
    /// `EXTRACT(WEEK FROM start_time)`.
    #[default]
    Week,
    /// `EXTRACT(HOUR FROM start_time)`, matching tables built by the old loader.
    LegacyHour,
}

impl fmt::Display for WeekExtraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Week => f.write_str("week"),
            Self::LegacyHour => f.write_str("legacy_hour"),
        }
    }
}

impl FromStr for WeekExtraction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "week" => Ok(Self::Week),
            "legacy_hour" => Ok(Self::LegacyHour),
            other => Err(format!("unknown week extraction '{}'", other)),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────
