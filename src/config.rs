use std::env;

use config::{Config, ConfigError, File};
use dotenv::dotenv;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use strum_macros::{AsRefStr, EnumString};

/// Layered application settings.
///
/// Sources, later ones winning: `configuration/base.yaml`,
/// `configuration/<environment>.yaml`, `APP_*` environment variables and
/// finally the bare provider/database variables (`DATABASE_URL`, `AUTH0_*`,
/// `SESSION_SECRET`, `TELEMETRY_SENTRY_DSN`). Every file is optional; missing
/// keys fall back to the `Default` impls below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    pub scores: ScoreSettings,
    pub telemetry: TelemetrySettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub matrix_host: String,
}

impl Default for ApplicationSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            environment: Environment::Dev,
            matrix_host: "matrix.robswebhub.net".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Unset means the in-memory match store is used.
    pub connection_string: Option<SecretString>,
}

/// Signing key used when none is configured. Refused in production.
pub const DEV_SESSION_SECRET: &str = "dev-session-secret-change-in-production";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    pub domain: String,
    pub client_id: String,
    pub callback_url: String,
    pub session_secret: SecretString,
    pub session_days: i64,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            domain: "robswebhub.eu.auth0.com".to_string(),
            client_id: String::new(),
            callback_url: "http://127.0.0.1:8000/callback".to_string(),
            session_secret: SecretString::new(DEV_SESSION_SECRET.to_string().into_boxed_str()),
            session_days: 7,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScoreSettings {
    /// Upper bound on the "recent results" list.
    pub recent_limit: i64,
    /// Size of the aggregation window, counted back from today.
    pub window_months: u32,
}

impl Default for ScoreSettings {
    fn default() -> Self {
        Self {
            recent_limit: 10,
            window_months: 6,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TelemetrySettings {
    /// Error reporting is off while unset.
    pub sentry_dsn: Option<SecretString>,
}

impl TelemetrySettings {
    pub fn sentry_enabled(&self) -> bool {
        self.sentry_dsn
            .as_ref()
            .is_some_and(|dsn| !dsn.expose_secret().is_empty())
    }
}

impl Settings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.application.host, self.application.port)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, EnumString, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Environment {
    #[default]
    Dev,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

pub fn get_configuration() -> Result<Settings, ConfigError> {
    dotenv().ok();

    let base_path = env::current_dir().map_err(|e| ConfigError::Foreign(Box::new(e)))?;
    let configuration_directory = base_path.join("configuration");

    let raw_environment = env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "dev".into());
    let environment: Environment = raw_environment.parse().map_err(|_| {
        ConfigError::Message(format!(
            "{} is not a supported environment. Use either `dev` or `production`.",
            raw_environment
        ))
    })?;

    let environment_filename = format!("{}.yaml", environment.as_ref());
    let config = Config::builder()
        .add_source(File::from(configuration_directory.join("base.yaml")).required(false))
        .add_source(File::from(configuration_directory.join(environment_filename)).required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let mut settings = config.try_deserialize::<Settings>()?;
    settings.application.environment = environment;
    apply_env_overrides(&mut settings);
    validate_settings(&settings)?;

    Ok(settings)
}

/// Rejects settings that must not reach production.
pub fn validate_settings(settings: &Settings) -> Result<(), ConfigError> {
    if !settings.application.environment.is_production() {
        return Ok(());
    }

    let secret = settings.auth.session_secret.expose_secret();
    if secret.is_empty() || secret == DEV_SESSION_SECRET {
        return Err(ConfigError::Message(
            "SESSION_SECRET must be set to a private value in production".to_string(),
        ));
    }

    Ok(())
}

/// Variables that don't follow the `APP_` naming.
fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(db_url) = env::var("DATABASE_URL") {
        settings.database.connection_string = Some(SecretString::new(db_url.into_boxed_str()));
    }
    if let Ok(domain) = env::var("AUTH0_DOMAIN") {
        settings.auth.domain = domain;
    }
    if let Ok(client_id) = env::var("AUTH0_CLIENT_ID") {
        settings.auth.client_id = client_id;
    }
    if let Ok(callback_url) = env::var("AUTH0_CALLBACK_URL") {
        settings.auth.callback_url = callback_url;
    }
    if let Ok(session_secret) = env::var("SESSION_SECRET") {
        settings.auth.session_secret = SecretString::new(session_secret.into_boxed_str());
    }
    if let Ok(dsn) = env::var("TELEMETRY_SENTRY_DSN") {
        settings.telemetry.sentry_dsn = Some(SecretString::new(dsn.into_boxed_str()));
    }
    // Hosting platforms hand out the listening port as a bare PORT.
    if settings.application.environment.is_production() {
        if let Some(port) = env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            settings.application.port = port;
        }
    }
}
