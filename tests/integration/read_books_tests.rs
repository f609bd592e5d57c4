use super::*;

/// Helper: app with a user, a category and one book; returns the pieces.
async fn setup() -> (axum::Router, rbooks::db::DbPool, i64, String, i64) {
    let (app, pool) = test_app().await;
    let user_id = create_test_user(&pool, "alice", "password123").await;
    let token = token_for(user_id);

    let resp = post_json(
        app.clone(),
        "/categories",
        serde_json::json!({"title": "Fiction"}),
        Some(&token),
    )
    .await;
    let category_id = body_json(resp).await["id"].as_i64().unwrap();

    let resp = post_json(
        app.clone(),
        "/books",
        serde_json::json!({"title": "Dune", "isbn13": "9780441013593", "categoryId": category_id}),
        Some(&token),
    )
    .await;
    let book_id = body_json(resp).await["id"].as_i64().unwrap();

    (app, pool, user_id, token, book_id)
}

#[tokio::test]
async fn review_a_book() {
    let (app, _pool, user_id, token, book_id) = setup().await;

    let resp = post_json(
        app.clone(),
        "/users/me/read",
        serde_json::json!({"bookId": book_id, "grade": 5, "review": "a classic"}),
        Some(&token),
    )
    .await;
    assert_eq!(resp.status(), 201);
    let body = body_json(resp).await;
    assert_eq!(body["userId"], user_id);
    assert_eq!(body["bookId"], book_id);
    assert_eq!(body["grade"], 5);
    assert_eq!(body["review"], "a classic");

    let resp = get(app, &format!("/users/{user_id}/read")).await;
    assert_eq!(resp.status(), 200);
    let body = body_json(resp).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn review_missing_book_404() {
    let (app, _pool, _user_id, token, _book_id) = setup().await;

    let resp = post_json(
        app.clone(),
        "/users/me/read",
        serde_json::json!({"bookId": 999, "grade": 3}),
        Some(&token),
    )
    .await;
    assert_eq!(resp.status(), 404);

    // Missing bookId behaves the same
    let resp = post_json(
        app,
        "/users/me/read",
        serde_json::json!({"grade": 3}),
        Some(&token),
    )
    .await;
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn second_review_for_same_book_conflicts() {
    let (app, _pool, _user_id, token, book_id) = setup().await;

    let resp = post_json(
        app.clone(),
        "/users/me/read",
        serde_json::json!({"bookId": book_id, "grade": 3, "review": "first"}),
        Some(&token),
    )
    .await;
    assert_eq!(resp.status(), 201);

    let resp = post_json(
        app.clone(),
        "/users/me/read",
        serde_json::json!({"bookId": book_id, "grade": 5, "review": "second"}),
        Some(&token),
    )
    .await;
    assert_eq!(resp.status(), 405);
    assert_eq!(body_json(resp).await["error"], "Review already exists.");

    // The original review was not silently overwritten
    let resp = get_with_token(app, "/users/me/read", &token).await;
    assert_eq!(resp.status(), 200);
    let body = body_json(resp).await;
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["grade"], 3);
    assert_eq!(items[0]["review"], "first");
}

#[tokio::test]
async fn invalid_grade_rejected() {
    let (app, _pool, _user_id, token, book_id) = setup().await;

    for grade in [0, 6, -1] {
        let resp = post_json(
            app.clone(),
            "/users/me/read",
            serde_json::json!({"bookId": book_id, "grade": grade}),
            Some(&token),
        )
        .await;
        assert_eq!(resp.status(), 400, "grade {grade} should be rejected");
        let body = body_json(resp).await;
        assert_eq!(body[0]["field"], "grade");
    }
}

#[tokio::test]
async fn partial_update_keeps_stored_review() {
    let (app, _pool, _user_id, token, book_id) = setup().await;

    post_json(
        app.clone(),
        "/users/me/read",
        serde_json::json!({"bookId": book_id, "grade": 2, "review": "slow start"}),
        Some(&token),
    )
    .await;

    // Only the grade changes; the stored review text survives
    let resp = patch_json(
        app.clone(),
        "/users/me/read",
        serde_json::json!({"bookId": book_id, "grade": 4}),
        Some(&token),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let body = body_json(resp).await;
    assert_eq!(body["grade"], 4);
    assert_eq!(body["review"], "slow start");
}

#[tokio::test]
async fn update_without_existing_review_404() {
    let (app, _pool, _user_id, token, book_id) = setup().await;

    let resp = patch_json(
        app,
        "/users/me/read",
        serde_json::json!({"bookId": book_id, "grade": 4}),
        Some(&token),
    )
    .await;
    assert_eq!(resp.status(), 404);
    assert_eq!(body_json(resp).await["error"], "Review does not exist.");
}

#[tokio::test]
async fn delete_own_review() {
    let (app, _pool, user_id, token, book_id) = setup().await;

    let resp = post_json(
        app.clone(),
        "/users/me/read",
        serde_json::json!({"bookId": book_id, "grade": 3}),
        Some(&token),
    )
    .await;
    let review_id = body_json(resp).await["id"].as_i64().unwrap();

    let resp = delete(app.clone(), &format!("/users/me/read/{review_id}"), &token).await;
    assert_eq!(resp.status(), 200);

    let resp = get(app, &format!("/users/{user_id}/read")).await;
    assert!(body_json(resp).await["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn cannot_delete_someone_elses_review() {
    let (app, pool, _user_id, token, book_id) = setup().await;

    let resp = post_json(
        app.clone(),
        "/users/me/read",
        serde_json::json!({"bookId": book_id, "grade": 3}),
        Some(&token),
    )
    .await;
    let review_id = body_json(resp).await["id"].as_i64().unwrap();

    let other = token_for(create_test_user(&pool, "mallory", "password123").await);
    let resp = delete(app, &format!("/users/me/read/{review_id}"), &other).await;
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn read_listing_of_unknown_user_404() {
    let (app, _pool, _user_id, _token, _book_id) = setup().await;

    let resp = get(app, "/users/999/read").await;
    assert_eq!(resp.status(), 404);
    assert_eq!(body_json(resp).await["error"], "User not found");
}
