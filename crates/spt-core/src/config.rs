//! Configuration module
//!
//! Reads server, upload, session and mail settings from the environment
//! (with `.env` support) and validates them at startup.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// 5 × 2 MiB
pub const DEFAULT_MAX_UPLOAD_SIZE_BYTES: u64 = 5 * 2 * 1024 * 1024;
pub const DEFAULT_ALLOWED_EXTENSIONS: &str = "pdf,jpg,png,heic,jpeg,docx";
const DEFAULT_PORT: u16 = 4000;
const DEFAULT_SMTP_PORT: u16 = 587;
const MIN_SESSION_SECRET_LEN: usize = 32;

/// What to do with a file that exceeds the size ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OversizePolicy {
    /// Reject the upload; nothing is moved
    Reject,
    /// Store the file anyway and report the size problem as a warning
    Warn,
}

impl FromStr for OversizePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" => Ok(OversizePolicy::Reject),
            "warn" => Ok(OversizePolicy::Warn),
            other => Err(anyhow::anyhow!(
                "UPLOAD_OVERSIZE_POLICY must be 'reject' or 'warn', got '{}'",
                other
            )),
        }
    }
}

#[derive(Clone, Debug)]
pub struct UploadConfig {
    pub private_root: PathBuf,
    pub max_size_bytes: u64,
    pub allowed_extensions: Vec<String>,
    pub oversize_policy: OversizePolicy,
}

impl UploadConfig {
    pub fn new(private_root: impl Into<PathBuf>) -> Self {
        Self {
            private_root: private_root.into(),
            max_size_bytes: DEFAULT_MAX_UPLOAD_SIZE_BYTES,
            allowed_extensions: parse_list(DEFAULT_ALLOWED_EXTENSIONS),
            oversize_policy: OversizePolicy::Reject,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub secret: String,
    pub cookie_name: String,
    pub login_path: String,
}

#[derive(Clone, Debug)]
pub struct MailConfig {
    pub enabled: bool,
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_tls: bool,
    pub from: Option<String>,
    pub subject_tag: Option<String>,
    pub templates_path: Option<PathBuf>,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_host: None,
            smtp_port: DEFAULT_SMTP_PORT,
            smtp_user: None,
            smtp_password: None,
            smtp_tls: true,
            from: None,
            subject_tag: None,
            templates_path: None,
        }
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub upload: UploadConfig,
    pub session: SessionConfig,
    pub mail: MailConfig,
}

/// `production` or `prod`, any case
pub fn is_production_environment(environment: &str) -> bool {
    let env = environment.trim().to_lowercase();
    env == "production" || env == "prod"
}

impl Config {
    /// Load `.env` (if present) and read the process environment
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());
        let flag = |key: &str, default: bool| {
            var(key)
                .and_then(|s| s.trim().to_lowercase().parse().ok())
                .unwrap_or(default)
        };

        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let server_port = match var("PORT") {
            Some(port) => port
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            None => DEFAULT_PORT,
        };

        let private_root = var("PRIVATE_FILES_ROOT")
            .map(PathBuf::from)
            .ok_or_else(|| anyhow::anyhow!("PRIVATE_FILES_ROOT must be set"))?;

        let max_size_bytes = match var("UPLOAD_MAX_SIZE_BYTES") {
            Some(size) => size
                .parse()
                .map_err(|_| anyhow::anyhow!("UPLOAD_MAX_SIZE_BYTES must be a valid number"))?,
            None => DEFAULT_MAX_UPLOAD_SIZE_BYTES,
        };

        let oversize_policy = match var("UPLOAD_OVERSIZE_POLICY") {
            Some(policy) => policy.parse()?,
            None => OversizePolicy::Reject,
        };

        let upload = UploadConfig {
            private_root,
            max_size_bytes,
            allowed_extensions: parse_list(
                &var("UPLOAD_ALLOWED_EXTENSIONS")
                    .unwrap_or_else(|| DEFAULT_ALLOWED_EXTENSIONS.to_string()),
            ),
            oversize_policy,
        };

        let session = SessionConfig {
            secret: var("SESSION_SECRET")
                .ok_or_else(|| anyhow::anyhow!("SESSION_SECRET must be set"))?,
            cookie_name: var("SESSION_COOKIE_NAME").unwrap_or_else(|| "spt_session".to_string()),
            login_path: var("LOGIN_PATH").unwrap_or_else(|| "/login".to_string()),
        };

        let mail = MailConfig {
            enabled: flag("MAIL_ENABLED", false),
            smtp_host: var("SMTP_HOST"),
            smtp_port: var("SMTP_PORT")
                .and_then(|s| s.parse().ok())
                .filter(|&p| p > 0)
                .unwrap_or(DEFAULT_SMTP_PORT),
            smtp_user: var("SMTP_USER"),
            smtp_password: var("SMTP_PASSWORD"),
            smtp_tls: flag("SMTP_TLS", true),
            from: var("MAIL_FROM"),
            subject_tag: var("MAIL_SUBJECT_TAG"),
            templates_path: var("MESSAGE_TEMPLATES_PATH").map(PathBuf::from),
        };

        let config = Config {
            server_port,
            cors_origins: parse_cors(&var("CORS_ORIGINS").unwrap_or_else(|| "*".to_string())),
            environment,
            upload,
            session,
            mail,
        };

        config.validate()?;
        Ok(config)
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_environment(&self.environment)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.session.secret.len() < MIN_SESSION_SECRET_LEN {
            return Err(anyhow::anyhow!(
                "SESSION_SECRET must be at least {} characters long",
                MIN_SESSION_SECRET_LEN
            ));
        }

        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if self.upload.max_size_bytes == 0 {
            return Err(anyhow::anyhow!("UPLOAD_MAX_SIZE_BYTES must be greater than 0"));
        }

        if self.upload.allowed_extensions.is_empty() {
            return Err(anyhow::anyhow!(
                "UPLOAD_ALLOWED_EXTENSIONS must list at least one extension"
            ));
        }

        if self.mail.enabled && (self.mail.smtp_host.is_none() || self.mail.from.is_none()) {
            return Err(anyhow::anyhow!(
                "MAIL_ENABLED=true requires SMTP_HOST and MAIL_FROM to be set"
            ));
        }

        Ok(())
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_start_matches('.').to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_cors(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
