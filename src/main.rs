use std::net::TcpListener;
use std::sync::Arc;

use scoreboard_backend::auth::identity::{FirebaseIdentity, SharedIdentity, StaticIdentity};
use scoreboard_backend::config::settings::{
    get_config, get_jwt_settings, IdentityBackend, StoreBackend,
};
use scoreboard_backend::db::firestore::FirestoreStore;
use scoreboard_backend::db::memory::MemoryStore;
use scoreboard_backend::db::SharedStore;
use scoreboard_backend::run;
use scoreboard_backend::scoreboard::DisplayZone;
use scoreboard_backend::telemetry::{get_subscriber, init_subscriber};

fn startup_error(message: impl std::fmt::Display) -> std::io::Error {
    tracing::error!("{}", message);
    std::io::Error::new(std::io::ErrorKind::InvalidInput, message.to_string())
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Panic if we can't read the config
    let config = get_config().expect("Failed to read the config.");

    let subscriber = get_subscriber(
        "scoreboard-backend".into(),
        config.application.log_level.clone(),
        std::io::stdout,
    );
    init_subscriber(subscriber);

    if config.uses_firebase() {
        config.firebase.validate().map_err(startup_error)?;
    }

    let store: SharedStore = match config.store.backend {
        StoreBackend::Firestore => Arc::new(FirestoreStore::new(&config.firebase).map_err(startup_error)?),
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store, data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let identity: SharedIdentity = match config.identity.provider {
        IdentityBackend::Firebase => Arc::new(FirebaseIdentity::new(&config.firebase).map_err(startup_error)?),
        IdentityBackend::Static => Arc::new(StaticIdentity::new(config.identity.accounts.clone())),
    };

    let zone = DisplayZone::parse(&config.application.utc_offset).map_err(startup_error)?;
    let jwt_settings = get_jwt_settings(&config);

    let address = format!("{}:{}", config.application.host, config.application.port);
    let listener = TcpListener::bind(&address)?;
    tracing::info!("Listening on {}", address);

    run(
        listener,
        store,
        identity,
        jwt_settings,
        zone,
        config.application.allowed_origins.clone(),
    )?
    .await
}
