use super::*;

/// Full catalog walk-through: register, log in, create a category and a
/// book, read it back, and watch a duplicate ISBN get rejected.
#[tokio::test]
async fn catalog_end_to_end() {
    let (app, _pool) = test_app().await;

    // Register + login
    let resp = post_json(
        app.clone(),
        "/register",
        serde_json::json!({"username": "librarian", "password": "password123", "name": "Lib"}),
        None,
    )
    .await;
    assert_eq!(resp.status(), 201);

    let resp = post_json(
        app.clone(),
        "/login",
        serde_json::json!({"username": "librarian", "password": "password123"}),
        None,
    )
    .await;
    assert_eq!(resp.status(), 200);
    let token = body_json(resp).await["token"].as_str().unwrap().to_string();

    // Create category "Fiction"
    let resp = post_json(
        app.clone(),
        "/categories",
        serde_json::json!({"title": "Fiction"}),
        Some(&token),
    )
    .await;
    assert_eq!(resp.status(), 201);
    let fiction_id = body_json(resp).await["id"].as_i64().unwrap();

    // Create the book
    let resp = post_json(
        app.clone(),
        "/books",
        serde_json::json!({
            "title": "Dune",
            "isbn13": "9780441013593",
            "categoryId": fiction_id,
        }),
        Some(&token),
    )
    .await;
    assert_eq!(resp.status(), 201);
    let book_id = body_json(resp).await["id"].as_i64().unwrap();

    // Read it back with the category reference intact
    let resp = get(app.clone(), &format!("/books/{book_id}")).await;
    assert_eq!(resp.status(), 200);
    let body = body_json(resp).await;
    assert_eq!(body["title"], "Dune");
    assert_eq!(body["categoryId"], fiction_id);

    // A second book reusing the ISBN is rejected with a field error
    let resp = post_json(
        app,
        "/books",
        serde_json::json!({
            "title": "Dune Messiah",
            "isbn13": "9780441013593",
            "categoryId": fiction_id,
        }),
        Some(&token),
    )
    .await;
    assert_eq!(resp.status(), 400);
    let body = body_json(resp).await;
    assert_eq!(body[0]["field"], "isbn13");
    assert_eq!(body[0]["message"], "ISBN-13 already exists");
}
