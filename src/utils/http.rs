use std::time::Duration;

use once_cell::sync::Lazy;
use reqwest::Client;

const DEFAULT_CLIENT_TIMEOUT_SECONDS: u64 = 30;

static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(DEFAULT_CLIENT_TIMEOUT_SECONDS))
        .build()
        .expect("Failed to build HTTP client")
});

pub fn get_http_client() -> &'static Client {
    &HTTP_CLIENT
}
