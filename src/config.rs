// src/config.rs

use crate::error::{EtlError, Result};
use std::{env, fmt, path::Path};

const DEFAULT_AWS_REGION: &str = "us-east-1";

/// Every environment key the tool reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    DbHost,
    DbPort,
    DbUser,
    DbPassword,
    DbName,
    BucketName,
    FileName,
    AwsAccessKey,
    AwsSecretKey,
    AwsRegion,
    AwsEndpoint,
}

impl ConfigKey {
    /// Keys that must be present and non-empty.
    pub const REQUIRED: [ConfigKey; 9] = [
        ConfigKey::DbHost,
        ConfigKey::DbPort,
        ConfigKey::DbUser,
        ConfigKey::DbPassword,
        ConfigKey::DbName,
        ConfigKey::BucketName,
        ConfigKey::FileName,
        ConfigKey::AwsAccessKey,
        ConfigKey::AwsSecretKey,
    ];

    /// Name of the environment variable, exactly as it is looked up.
    pub fn var_name(self) -> &'static str {
        match self {
            ConfigKey::DbHost => "DB_HOST",
            ConfigKey::DbPort => "DB_PORT",
            ConfigKey::DbUser => "DB_USER",
            ConfigKey::DbPassword => "DB_PASSWORD",
            ConfigKey::DbName => "DB_NAME",
            ConfigKey::BucketName => "bucket_name",
            ConfigKey::FileName => "file_name",
            ConfigKey::AwsAccessKey => "aws_access_key",
            ConfigKey::AwsSecretKey => "aws_secret_key",
            ConfigKey::AwsRegion => "aws_region",
            ConfigKey::AwsEndpoint => "aws_endpoint",
        }
    }
}

/// Database connection parameters.
#[derive(Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

/// Object storage target and credentials.
#[derive(Clone)]
pub struct S3Config {
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    /// S3-compatible endpoint; `None` means AWS itself.
    pub endpoint: Option<String>,
}

/// Validated run configuration, built once at startup.
#[derive(Clone, Debug)]
pub struct EtlConfig {
    pub db: DbConfig,
    pub s3: S3Config,
    /// Path of the CSV file to load.
    pub file_name: String,
}

impl EtlConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from any key lookup, reporting every missing
    /// required key at once.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: ConfigKey| {
            lookup(key.var_name())
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let missing: Vec<&str> = ConfigKey::REQUIRED
            .iter()
            .filter(|k| get(**k).is_none())
            .map(|k| k.var_name())
            .collect();
        if !missing.is_empty() {
            return Err(EtlError::Config(format!(
                "missing required variables: {}",
                missing.join(", ")
            )));
        }

        let required = |key: ConfigKey| {
            get(key).ok_or_else(|| EtlError::Config(format!("missing {}", key.var_name())))
        };

        let raw_port = required(ConfigKey::DbPort)?;
        let port = raw_port.parse::<u16>().map_err(|e| {
            EtlError::Config(format!(
                "{} must be a port number, got {:?}: {}",
                ConfigKey::DbPort.var_name(),
                raw_port,
                e
            ))
        })?;

        Ok(Self {
            db: DbConfig {
                host: required(ConfigKey::DbHost)?,
                port,
                user: required(ConfigKey::DbUser)?,
                password: required(ConfigKey::DbPassword)?,
                database: required(ConfigKey::DbName)?,
            },
            s3: S3Config {
                bucket: required(ConfigKey::BucketName)?,
                access_key: required(ConfigKey::AwsAccessKey)?,
                secret_key: required(ConfigKey::AwsSecretKey)?,
                region: get(ConfigKey::AwsRegion).unwrap_or_else(|| DEFAULT_AWS_REGION.into()),
                endpoint: get(ConfigKey::AwsEndpoint),
            },
            file_name: required(ConfigKey::FileName)?,
        })
    }
}

/// Load a `.env` file into the process environment.
///
/// An explicit path must exist; without one a `.env` in the working
/// directory is used when present. Returns the file that was loaded.
pub fn load_dotenv(path: Option<&Path>) -> Result<Option<String>> {
    match path {
        Some(p) => {
            dotenvy::from_path(p)
                .map_err(|e| EtlError::Config(format!("reading {}: {}", p.display(), e)))?;
            Ok(Some(p.display().to_string()))
        }
        None => match dotenvy::dotenv() {
            Ok(found) => Ok(Some(found.display().to_string())),
            Err(e) if e.not_found() => Ok(None),
            Err(e) => Err(EtlError::Config(format!("reading .env: {}", e))),
        },
    }
}

// secrets never reach the log file
impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .finish()
    }
}

impl fmt::Debug for S3Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3Config")
            .field("bucket", &self.bucket)
            .field("access_key", &"***")
            .field("secret_key", &"***")
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}
