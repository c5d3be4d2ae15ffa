use std::time::Instant;

use reqwest::{Client, Method, StatusCode};
use serde_json::{json, Value};

use crate::report::Report;

pub const CREATED_PROFILE: &str = "created profile";
pub const RETRIEVED_PROFILE: &str = "retrieved profile";
pub const EXPECTED_PROFILE: &str = "expected profile";
pub const RETRIEVED_PAGE: &str = "retrieved page";
pub const DELETED_PROFILE: &str = "deleted profile";
pub const NO_RETRIEVED_PROFILE: &str = "no retrieved profile";

#[derive(Debug, Clone)]
pub struct ScenarioConfig {
    /// Base URL of the profile manager API, without trailing slash
    pub base_url: String,
    pub iterations: usize,
}

impl ScenarioConfig {
    pub fn new(base_url: &str, iterations: usize) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            iterations,
        }
    }
}

/// Profile created on every iteration.
pub fn new_profile_payload() -> Value {
    json!({
        "name": {
            "prefix": "k6",
            "first": "performance",
            "last": "test"
        }
    })
}

/// Send one request, recording its latency. Returns the raw response body.
async fn send(
    client: &Client,
    report: &mut Report,
    method: Method,
    url: &str,
    body: Option<&Value>,
) -> Result<(StatusCode, String), String> {
    let mut request = client.request(method.clone(), url);
    if let Some(body) = body {
        request = request.json(body);
    }

    let started = Instant::now();
    let response = request
        .send()
        .await
        .map_err(|e| format!("{} {}: {}", method, url, e))?;
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| format!("{} {}: {}", method, url, e))?;
    report.record_latency(started.elapsed());
    Ok((status, text))
}

/// Run the scenario once. Later steps are skipped when the profile could not
/// be created.
pub async fn run_iteration(
    client: &Client,
    base_url: &str,
    report: &mut Report,
) -> Result<(), String> {
    let profiles_url = format!("{}/profiles", base_url);
    let payload = new_profile_payload();

    let (status, created) =
        send(client, report, Method::POST, &profiles_url, Some(&payload)).await?;
    if !report.check(CREATED_PROFILE, status == StatusCode::CREATED) {
        return Err(format!(
            "POST {} answered {} instead of 201",
            profiles_url, status
        ));
    }
    let id = serde_json::from_str::<Value>(&created)
        .ok()
        .and_then(|profile| profile.get("id").and_then(Value::as_str).map(String::from))
        .ok_or_else(|| format!("The created profile has no identifier: {}", created))?;
    let profile_url = format!("{}/{}", profiles_url, id);

    // Same bytes, not only the same JSON value
    let (status, retrieved) = send(client, report, Method::GET, &profile_url, None).await?;
    report.check(RETRIEVED_PROFILE, status == StatusCode::OK);
    report.check(EXPECTED_PROFILE, retrieved == created);

    let (status, _) = send(client, report, Method::GET, &profiles_url, None).await?;
    report.check(RETRIEVED_PAGE, status == StatusCode::OK);

    let (status, _) = send(client, report, Method::DELETE, &profile_url, None).await?;
    report.check(DELETED_PROFILE, status == StatusCode::NO_CONTENT);

    let (status, _) = send(client, report, Method::GET, &profile_url, None).await?;
    report.check(NO_RETRIEVED_PROFILE, status == StatusCode::NOT_FOUND);

    Ok(())
}

/// One virtual user: `config.iterations` scenario runs, one after the other.
pub async fn run_virtual_user(client: Client, config: ScenarioConfig) -> Report {
    let mut report = Report::new();
    for _ in 0..config.iterations {
        if let Err(error) = run_iteration(&client, &config.base_url, &mut report).await {
            report.record_error(error);
        }
    }
    report
}
