//! Mock server helpers for the releases API and asset downloads

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::builders::ReleaseFixture;
use super::constants::*;

pub const LATEST_RELEASE_PATH: &str = "/repos/kubev/kubev/releases/latest";

/// Path of a release asset on the download host
pub fn asset_path(version: &str, name: &str) -> String {
    format!("/kubev/kubev/releases/download/{}/{}", version, name)
}

/// Latest-release endpoint answering with `tag`
pub async fn mock_latest_release(server: &MockServer, tag: &str) {
    Mock::given(method("GET"))
        .and(path(LATEST_RELEASE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tag_name": tag,
            "name": format!("Release {}", tag),
            "draft": false,
            "prerelease": false,
            "published_at": "2026-01-01T00:00:00Z",
        })))
        .mount(server)
        .await;
}

/// Latest-release endpoint that only answers requests carrying `token`
pub async fn mock_latest_release_with_token(server: &MockServer, tag: &str, token: &str) {
    Mock::given(method("GET"))
        .and(path(LATEST_RELEASE_PATH))
        .and(header("authorization", format!("Bearer {}", token).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "tag_name": tag })))
        .expect(1)
        .mount(server)
        .await;
}

/// Latest-release endpoint answering with an arbitrary status and body
pub async fn mock_latest_release_raw(server: &MockServer, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(LATEST_RELEASE_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

/// Fail the test (on server drop) if the latest-release endpoint is hit
pub async fn forbid_latest_release(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(LATEST_RELEASE_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}

/// Serve both assets of `fixture`
pub async fn mock_release_assets(server: &MockServer, fixture: &ReleaseFixture) {
    mock_asset(
        server,
        &fixture.version,
        &fixture.manifest_name,
        fixture.manifest.as_bytes(),
    )
    .await;
    mock_asset(server, &fixture.version, &fixture.archive_name, &fixture.archive).await;
}

pub async fn mock_asset(server: &MockServer, version: &str, name: &str, body: &[u8]) {
    Mock::given(method("GET"))
        .and(path(asset_path(version, name)))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
        .mount(server)
        .await;
}

/// Asset that fails `fail_count` times with 503 before succeeding
pub async fn mock_flaky_asset(
    server: &MockServer,
    version: &str,
    name: &str,
    fail_count: u64,
    body: &[u8],
) {
    Mock::given(method("GET"))
        .and(path(asset_path(version, name)))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(fail_count)
        .mount(server)
        .await;

    mock_asset(server, version, name, body).await;
}

/// Asset that always answers with `status`, expecting exactly `expected_hits` requests
pub async fn mock_failing_asset(
    server: &MockServer,
    version: &str,
    name: &str,
    status: u16,
    expected_hits: u64,
) {
    Mock::given(method("GET"))
        .and(path(asset_path(version, name)))
        .respond_with(ResponseTemplate::new(status))
        .expect(expected_hits)
        .mount(server)
        .await;
}

/// Asset whose response is held back for `delay`
pub async fn mock_stalled_asset(server: &MockServer, version: &str, name: &str, delay: Duration) {
    Mock::given(method("GET"))
        .and(path(asset_path(version, name)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(SUCCESS_CONTENT.to_vec())
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

/// Fail the test (on server drop) if the asset is requested
pub async fn forbid_asset(server: &MockServer, version: &str, name: &str) {
    Mock::given(method("GET"))
        .and(path(asset_path(version, name)))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}
