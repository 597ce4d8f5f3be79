use std::net::TcpListener;
use std::sync::Arc;

use once_cell::sync::Lazy;
use reqwest::{Client, Method, Response};
use secrecy::SecretString;
use serde_json::{json, Value};

use scoreboard_backend::auth::identity::{SharedIdentity, StaticIdentity};
use scoreboard_backend::config::settings::{get_config, get_jwt_settings, StaticAccount};
use scoreboard_backend::db::memory::MemoryStore;
use scoreboard_backend::run;
use scoreboard_backend::scoreboard::DisplayZone;
use scoreboard_backend::telemetry::{get_subscriber, init_subscriber};
use scoreboard_backend::utils::password::hash_password;

pub const ADMIN_EMAIL: &str = "admin@scoreboard.test";
pub const ADMIN_PASSWORD: &str = "correct-horse-battery";

// Ensure that the `tracing` stack is only initialised once using `once_cell`
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

pub struct TestApp {
    pub address: String,
    pub store: Arc<MemoryStore>,
}

pub async fn spawn_app() -> TestApp {
    spawn_app_in_zone(DisplayZone::utc()).await
}

pub async fn spawn_app_in_zone(zone: DisplayZone) -> TestApp {
    let identity = Arc::new(StaticIdentity::new(vec![StaticAccount {
        email: ADMIN_EMAIL.to_string(),
        password_hash: SecretString::new(
            hash_password(ADMIN_PASSWORD)
                .expect("Failed to hash password")
                .into_boxed_str(),
        ),
    }]));
    spawn_app_with(zone, identity).await
}

/// Spawn the app with its admins signing in through `identity`.
pub async fn spawn_app_with(zone: DisplayZone, identity: SharedIdentity) -> TestApp {
    // The first time `initialize` is invoked the code in `TRACING` is executed.
    // All other invocations will instead skip execution.
    Lazy::force(&TRACING);

    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    // Get port assigned by the OS
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let configuration = get_config().expect("Failed to read configuration.");
    let jwt_settings = get_jwt_settings(&configuration);

    let store = Arc::new(MemoryStore::new());

    let server = run(
        listener,
        store.clone(),
        identity,
        jwt_settings,
        zone,
        configuration.application.allowed_origins.clone(),
    )
    .expect("Failed to bind address");
    // Launch the server as a background task
    let _ = tokio::spawn(server);

    TestApp { address, store }
}

pub async fn login_admin(app_address: &str) -> String {
    let response = Client::new()
        .post(&format!("{}/admin/login", app_address))
        .json(&json!({
            "email": ADMIN_EMAIL,
            "password": ADMIN_PASSWORD
        }))
        .send()
        .await
        .expect("Failed to execute login request.");
    assert_eq!(200, response.status().as_u16(), "Admin login should succeed");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["data"]["token"]
        .as_str()
        .expect("No token in response")
        .to_string()
}

pub async fn make_authenticated_request(
    client: &Client,
    method: Method,
    url: &str,
    token: &str,
    body: Option<Value>,
) -> Response {
    let mut request = client.request(method, url).bearer_auth(token);
    if let Some(body) = body {
        request = request.json(&body);
    }
    request.send().await.expect("Failed to execute request.")
}

pub fn event_body(title: &str, sport: &str, gender: &str, date: &str, time: &str, teams: [&str; 2]) -> Value {
    json!({
        "matchTitle": title,
        "sport": sport,
        "gender": gender,
        "matchType": "Normal",
        "date": date,
        "time": time,
        "teams": teams
    })
}

/// Create an event through the admin API and return its id.
pub async fn create_event(app_address: &str, token: &str, body: Value) -> String {
    let response = make_authenticated_request(
        &Client::new(),
        Method::POST,
        &format!("{}/admin/events", app_address),
        token,
        Some(body),
    )
    .await;
    assert_eq!(201, response.status().as_u16(), "Event creation should succeed");

    let body: Value = response.json().await.expect("Failed to parse event response");
    body["data"]["id"].as_str().expect("No event id").to_string()
}

pub async fn get_json(url: &str) -> (u16, Value) {
    let response = Client::new()
        .get(url)
        .send()
        .await
        .expect("Failed to execute request.");
    let status = response.status().as_u16();
    let body = response.json().await.expect("Response was not json");
    (status, body)
}
