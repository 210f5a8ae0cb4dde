//! Recipe and review flows over HTTP.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use reqwest::StatusCode;

use recipe_book_core::RecipeId;
use recipe_book_integration_tests::{TestApp, location};
use recipe_book_web::db::{RecipeStore, ReviewStore};

const SOUP: &[(&str, &str)] = &[
    ("recipe[title]", "Tomato Soup"),
    ("recipe[image]", "https://img.example/soup.jpg"),
    ("recipe[author]", "Ana"),
    ("recipe[description]", "Bright and warming"),
    ("recipe[steps]", "1. Chop\n2. Simmer"),
];

async fn create_soup(app: &TestApp) -> RecipeId {
    let response = app.post_form("/recipes", SOUP).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/recipes");

    app.store
        .list_recipes()
        .await
        .unwrap()
        .last()
        .map(|r| r.id)
        .unwrap()
}

async fn add_review(app: &TestApp, id: RecipeId, rating: &str, body: &str) {
    let response = app
        .post_form(
            &format!("/recipes/{id}/review"),
            &[("review[rating]", rating), ("review[body]", body)],
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/recipes/{id}"));
}

#[tokio::test]
async fn test_create_recipe_then_list_and_show() {
    let app = TestApp::spawn().await;
    let id = create_soup(&app).await;

    assert_eq!(app.store.count_recipes().await.unwrap(), 1);

    let list = app.get("/recipes").await;
    assert_eq!(list.status(), StatusCode::OK);
    let body = list.text().await.unwrap();
    assert!(body.contains("Tomato Soup"));
    assert!(body.contains(&format!("/recipes/{id}")));

    let show = app.get(&format!("/recipes/{id}")).await;
    assert_eq!(show.status(), StatusCode::OK);
    let body = show.text().await.unwrap();
    assert!(body.contains("Tomato Soup"));
    assert!(body.contains("By Ana"));
}

#[tokio::test]
async fn test_home_lists_recipes() {
    let app = TestApp::spawn().await;
    create_soup(&app).await;

    let response = app.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await.unwrap().contains("Tomato Soup"));
}

#[tokio::test]
async fn test_create_recipe_missing_field_is_rejected() {
    let app = TestApp::spawn().await;

    for missing in ["title", "image", "author", "description"] {
        let key = format!("recipe[{missing}]");
        let form: Vec<(&str, &str)> = SOUP
            .iter()
            .copied()
            .filter(|(k, _)| *k != key)
            .collect();

        let response = app.post_form("/recipes", &form).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.text().await.unwrap(),
            format!("\"recipe.{missing}\" is required")
        );
    }

    assert_eq!(app.store.count_recipes().await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_recipe_unknown_field_is_rejected() {
    let app = TestApp::spawn().await;
    let mut form = SOUP.to_vec();
    form.push(("recipe[bogus]", "x"));

    let response = app.post_form("/recipes", &form).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.text().await.unwrap(),
        "\"recipe.bogus\" is not allowed"
    );
    assert_eq!(app.store.count_recipes().await.unwrap(), 0);
}

#[tokio::test]
async fn test_show_missing_recipe_is_404() {
    let app = TestApp::spawn().await;

    let response = app.get(&format!("/recipes/{}", RecipeId::generate())).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.text().await.unwrap(), "recipe not found");
}

#[tokio::test]
async fn test_show_malformed_id_is_400() {
    let app = TestApp::spawn().await;

    let response = app.get("/recipes/not-a-uuid").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_recipe_via_method_override() {
    let app = TestApp::spawn().await;
    let id = create_soup(&app).await;

    let response = app.delete_via_form(&format!("/recipes/{id}")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/recipes");

    assert_eq!(app.store.count_recipes().await.unwrap(), 0);
    let body = app.get("/recipes").await.text().await.unwrap();
    assert!(!body.contains(&format!("/recipes/{id}")));
}

#[tokio::test]
async fn test_delete_missing_recipe_still_redirects() {
    let app = TestApp::spawn().await;

    let response = app
        .delete_via_form(&format!("/recipes/{}", RecipeId::generate()))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_add_review_increments_count() {
    let app = TestApp::spawn().await;
    let id = create_soup(&app).await;

    add_review(&app, id, "5", "Perfect on a cold day").await;
    let before = app.store.get_recipe(id).await.unwrap().unwrap().comments.len();
    add_review(&app, id, "", "Needs salt").await;
    let after = app.store.get_recipe(id).await.unwrap().unwrap().comments.len();
    assert_eq!(after, before + 1);

    let body = app.get(&format!("/recipes/{id}")).await.text().await.unwrap();
    assert!(body.contains("Perfect on a cold day"));
    assert!(body.contains("Needs salt"));
    assert!(body.contains("Rating: 5/5"));
}

#[tokio::test]
async fn test_review_rejected_without_body() {
    let app = TestApp::spawn().await;
    let id = create_soup(&app).await;

    let response = app
        .post_form(&format!("/recipes/{id}/review"), &[("review[rating]", "abc")])
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.text().await.unwrap(),
        "\"review.rating\" must be a number,\"review.body\" is required"
    );
    assert_eq!(app.store.count_reviews().await.unwrap(), 0);
}

#[tokio::test]
async fn test_review_on_missing_recipe_is_404() {
    let app = TestApp::spawn().await;

    let response = app
        .post_form(
            &format!("/recipes/{}/review", RecipeId::generate()),
            &[("review[body]", "Lost")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.store.count_reviews().await.unwrap(), 0);
}

#[tokio::test]
async fn test_delete_review_via_method_override() {
    let app = TestApp::spawn().await;
    let id = create_soup(&app).await;
    add_review(&app, id, "2", "Too sour").await;
    let review_id = app.store.get_recipe(id).await.unwrap().unwrap().comments[0];

    let response = app
        .delete_via_form(&format!("/recipes/{id}/reviews/{review_id}"))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/recipes/{id}"));

    assert!(app.store.get_recipe(id).await.unwrap().unwrap().comments.is_empty());
    assert_eq!(app.store.count_reviews().await.unwrap(), 0);
}

#[tokio::test]
async fn test_delete_recipe_cascades_to_reviews() {
    let app = TestApp::spawn().await;
    let doomed = create_soup(&app).await;
    let kept = create_soup(&app).await;
    add_review(&app, doomed, "4", "First").await;
    add_review(&app, doomed, "3", "Second").await;
    add_review(&app, kept, "5", "Stays").await;

    app.delete_via_form(&format!("/recipes/{doomed}")).await;

    assert_eq!(app.store.count_reviews().await.unwrap(), 1);
    let body = app.get(&format!("/recipes/{kept}")).await.text().await.unwrap();
    assert!(body.contains("Stays"));
}
