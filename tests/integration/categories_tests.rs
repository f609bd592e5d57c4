use super::*;

#[tokio::test]
async fn create_requires_auth() {
    let (app, _pool) = test_app().await;

    let resp = post_json(
        app,
        "/categories",
        serde_json::json!({"title": "Fiction"}),
        None,
    )
    .await;
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn create_and_list() {
    let (app, pool) = test_app().await;
    let token = token_for(create_test_user(&pool, "librarian", "password123").await);

    let resp = post_json(
        app.clone(),
        "/categories",
        serde_json::json!({"title": "Fiction"}),
        Some(&token),
    )
    .await;
    assert_eq!(resp.status(), 201);
    let body = body_json(resp).await;
    assert!(body["id"].as_i64().unwrap() > 0);
    assert_eq!(body["title"], "Fiction");

    let resp = get(app, "/categories").await;
    assert_eq!(resp.status(), 200);
    let body = body_json(resp).await;
    assert_eq!(body["items"][0]["title"], "Fiction");
    assert_eq!(body["limit"], 10);
}

#[tokio::test]
async fn duplicate_title_rejected() {
    let (app, pool) = test_app().await;
    let token = token_for(create_test_user(&pool, "librarian", "password123").await);

    post_json(
        app.clone(),
        "/categories",
        serde_json::json!({"title": "Fiction"}),
        Some(&token),
    )
    .await;

    let resp = post_json(
        app,
        "/categories",
        serde_json::json!({"title": "Fiction"}),
        Some(&token),
    )
    .await;
    assert_eq!(resp.status(), 400);
    let body = body_json(resp).await;
    assert_eq!(body[0]["field"], "title");
    assert_eq!(body[0]["message"], "Category already exists");
}

#[tokio::test]
async fn empty_title_rejected() {
    let (app, pool) = test_app().await;
    let token = token_for(create_test_user(&pool, "librarian", "password123").await);

    let resp = post_json(
        app,
        "/categories",
        serde_json::json!({"title": ""}),
        Some(&token),
    )
    .await;
    assert_eq!(resp.status(), 400);
    let body = body_json(resp).await;
    assert_eq!(body[0]["message"], "Title must be a non-empty string");
}

#[tokio::test]
async fn listing_pages_with_links() {
    let (app, pool) = test_app().await;
    let token = token_for(create_test_user(&pool, "librarian", "password123").await);
    for i in 0..5 {
        post_json(
            app.clone(),
            "/categories",
            serde_json::json!({"title": format!("Cat {i}")}),
            Some(&token),
        )
        .await;
    }

    let resp = get(app.clone(), "/categories?limit=3").await;
    let body = body_json(resp).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 3);
    assert_eq!(body["next"]["href"], "/categories?offset=3&limit=3");

    let resp = get(app, "/categories?offset=3&limit=3").await;
    let body = body_json(resp).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["prev"]["href"], "/categories?offset=0&limit=3");
    assert!(body.get("next").is_none());
}
