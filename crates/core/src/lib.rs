pub mod config;
pub mod error;

pub use config::{ClusterConfig, DwhConfig, EtlConfig, IamRoleConfig, S3Config, WeekExtraction};
pub use error::ConfigError;
