//! Registration, login and session flows over HTTP.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use reqwest::StatusCode;

use recipe_book_integration_tests::{TestApp, location};
use recipe_book_web::db::UserStore;

const ALICE: &[(&str, &str)] = &[
    ("user[username]", "alice"),
    ("user[email]", "a@x.com"),
    ("user[password]", "secret1"),
];

async fn register_alice(app: &TestApp) {
    let response = app.post_form("/accounts/register", ALICE).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/accounts");
}

/// Follow `/accounts` to the account page and return its body.
async fn account_page(app: &TestApp) -> String {
    let response = app.get("/accounts").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let target = location(&response);
    assert!(target.starts_with("/accounts/"), "unexpected redirect {target}");
    assert_ne!(target, "/accounts/noAccount");

    let response = app.get(&target).await;
    assert_eq!(response.status(), StatusCode::OK);
    response.text().await.unwrap()
}

#[tokio::test]
async fn test_register_hashes_password_and_starts_session() {
    let app = TestApp::spawn().await;
    register_alice(&app).await;

    let user = app
        .store
        .find_user_by_username("alice")
        .await
        .unwrap()
        .unwrap();
    assert_ne!(user.password_hash, "secret1");

    let body = account_page(&app).await;
    assert!(body.contains("alice"));
    assert!(body.contains("a@x.com"));
}

#[tokio::test]
async fn test_session_cookie_name_and_inactivity_expiry() {
    let app = TestApp::spawn().await;

    let response = app.post_form("/accounts/register", ALICE).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let cookie = response
        .headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("rb_session="))
        .expect("session cookie not set")
        .to_string();

    assert!(cookie.contains("Max-Age=300"), "unexpected cookie {cookie}");
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Path=/"));
    assert!(!cookie.contains("Secure"));
}

#[tokio::test]
async fn test_logout_then_login_again() {
    let app = TestApp::spawn().await;
    register_alice(&app).await;

    let response = app.post_form("/logout", &[]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    assert_eq!(location(&app.get("/accounts").await), "/accounts/noAccount");

    let response = app
        .post_form(
            "/accounts/login",
            &[("user[username]", "alice"), ("user[password]", "secret1")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/accounts");

    assert!(account_page(&app).await.contains("a@x.com"));
}

#[tokio::test]
async fn test_login_unknown_username_redirects_with_error() {
    let app = TestApp::spawn().await;

    let response = app
        .post_form(
            "/accounts/login",
            &[("user[username]", "nobody"), ("user[password]", "secret1")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/accounts/login?error=credentials");

    let page = app.get("/accounts/login?error=credentials").await;
    assert_eq!(page.status(), StatusCode::OK);
    assert!(
        page.text()
            .await
            .unwrap()
            .contains("Invalid username or password")
    );
}

#[tokio::test]
async fn test_login_wrong_password_redirects_with_error() {
    let app = TestApp::spawn().await;
    register_alice(&app).await;
    app.post_form("/logout", &[]).await;

    let response = app
        .post_form(
            "/accounts/login",
            &[("user[username]", "alice"), ("user[password]", "wrong")],
        )
        .await;
    assert_eq!(location(&response), "/accounts/login?error=credentials");
    assert_eq!(location(&app.get("/accounts").await), "/accounts/noAccount");
}

#[tokio::test]
async fn test_register_missing_password_is_400() {
    let app = TestApp::spawn().await;

    let response = app
        .post_form(
            "/accounts/register",
            &[("user[username]", "bob"), ("user[email]", "b@x.com")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.text().await.unwrap(),
        "\"user.password\" is required"
    );
}

#[tokio::test]
async fn test_register_duplicate_username_redirects_with_error() {
    let app = TestApp::spawn().await;
    register_alice(&app).await;
    app.post_form("/logout", &[]).await;

    let response = app.post_form("/accounts/register", ALICE).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        "/accounts/register?error=username_taken"
    );
}

#[tokio::test]
async fn test_anonymous_account_routes() {
    let app = TestApp::spawn().await;

    assert_eq!(location(&app.get("/accounts").await), "/accounts/noAccount");

    let response = app.get("/accounts/noAccount").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await.unwrap().contains("/accounts/register"));

    let response = app
        .get("/accounts/00000000-0000-4000-8000-000000000000")
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/accounts/login");
}
