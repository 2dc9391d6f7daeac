//! Functional checks against a running deployment.
//!
//! Ignored by default. Point them at a live service with:
//!
//! ```text
//! WEB_URL=http://localhost:4567 AVAILABLE_PET_NAME=doggie NEW_PET_NAME=kitty \
//!     cargo test --test functional -- --ignored
//! ```

use std::env;

fn web_url() -> String {
    env::var("WEB_URL")
        .expect("WEB_URL must point at the running service")
        .trim_end_matches('/')
        .to_string()
}

async fn page_text(url: &str) -> String {
    let response = reqwest::get(url).await.expect("service is reachable");
    assert!(
        response.status().is_success(),
        "GET {url} returned {}",
        response.status()
    );
    response.text().await.expect("body is text")
}

#[tokio::test]
#[ignore = "needs WEB_URL and a live pet store"]
async fn pet_is_listed_as_available() {
    let pet_name = env::var("AVAILABLE_PET_NAME").expect("AVAILABLE_PET_NAME must be set");
    let page = page_text(&web_url()).await;

    assert!(page.starts_with("<h2>Available</h2>"), "unexpected page: {page}");
    assert!(
        page.lines().any(|line| line == format!("{pet_name}<br />")),
        "{pet_name} not found in: {page}"
    );
}

#[tokio::test]
#[ignore = "needs WEB_URL and a live pet store"]
async fn pet_is_listed_as_new() {
    let pet_name = env::var("NEW_PET_NAME").expect("NEW_PET_NAME must be set");
    let page = page_text(&format!("{}/new", web_url())).await;

    assert!(page.starts_with("<h2>New</h2>"), "unexpected page: {page}");
    assert!(
        page.lines().any(|line| line == format!("{pet_name}<br />")),
        "{pet_name} not found in: {page}"
    );
}
