use std::env;
use config::{Config, File, ConfigError};
use dotenv::dotenv;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::config::firebase::FirebaseSettings;
use crate::config::jwt::JwtSettings;

#[derive(Deserialize, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub session: SessionConfig,
    #[serde(default)]
    pub firebase: FirebaseSettings,
    pub store: StoreSettings,
    pub identity: IdentitySettings,
}

impl Settings {
    /// True when any configured backend talks to Firebase, in which case the
    /// Firebase block has to pass validation before startup.
    pub fn uses_firebase(&self) -> bool {
        self.store.backend == StoreBackend::Firestore
            || self.identity.provider == IdentityBackend::Firebase
    }
}

#[derive(Deserialize, Debug)]
pub struct SessionConfig {
    pub secret: SecretString,
    pub expiration_hours: i64,
}

#[derive(Deserialize, Debug)]
pub struct ApplicationSettings {
    pub port: u16,
    pub host: String,
    pub log_level: String,
    /// Offset used to combine admin date/time inputs and to render display
    /// strings, e.g. "+05:30".
    pub utc_offset: String,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    Firestore,
}

#[derive(Deserialize, Debug)]
pub struct StoreSettings {
    pub backend: StoreBackend,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IdentityBackend {
    Static,
    Firebase,
}

#[derive(Deserialize, Debug, Clone)]
pub struct StaticAccount {
    pub email: String,
    /// bcrypt hash of the account password
    pub password_hash: SecretString,
}

#[derive(Deserialize, Debug)]
pub struct IdentitySettings {
    pub provider: IdentityBackend,
    #[serde(default)]
    pub accounts: Vec<StaticAccount>,
}

pub fn get_config() -> Result<Settings, ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| ConfigError::Message(format!("Failed to determine the current directory: {}", e)))?;
    let configuration_directory = base_path.join("configuration");

    dotenv().ok();

    let environment: Environment = env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(ConfigError::Message)?;

    let env_filename = format!("{}.yml", environment.as_str());
    let config = Config::builder()
        .add_source(File::from(configuration_directory.join("base.yml")))
        .add_source(File::from(configuration_directory.join(env_filename)))
        .add_source(
            config::Environment::default()
                .prefix("APP")
                .prefix_separator("__")
                .separator("__")
        )
        .build()?;

    let mut settings = config.try_deserialize::<Settings>()?;

    // Hosting platforms usually expose the web API key under its plain name
    if let Ok(api_key) = env::var("FIREBASE_API_KEY") {
        settings.firebase.api_key = Some(SecretString::new(api_key.into_boxed_str()));
    }

    if let Ok(session_secret) = env::var("SESSION_SECRET") {
        settings.session.secret = SecretString::new(session_secret.into_boxed_str());
    }

    Ok(settings)
}

pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. \
                Use either `local` or `production`.",
                other
            )),
        }
    }
}

pub fn get_jwt_settings(settings: &Settings) -> JwtSettings {
    JwtSettings::new(
        settings.session.secret.expose_secret().to_string(),
        settings.session.expiration_hours,
    )
}
