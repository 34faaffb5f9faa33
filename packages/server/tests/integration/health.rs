use crate::common::{FilePart, TestApp, routes};

#[tokio::test]
async fn reports_database_state() {
    let app = TestApp::spawn().await;

    let res = app.get(routes::HEALTH).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["database"], "connected");
    assert!(res.body["message"].is_string());
}

#[tokio::test]
async fn openapi_document_lists_entity_routes() {
    let app = TestApp::spawn().await;

    let res = app.get("/api-docs/openapi.json").await;

    assert_eq!(res.status, 200);
    let paths = res.body["paths"].as_object().unwrap();
    assert!(paths.keys().any(|p| p.starts_with("/api/categories")));
    assert!(paths.keys().any(|p| p.starts_with("/api/restaurant-admins")));
}

#[tokio::test]
async fn assets_route_is_404_without_local_backend() {
    let app = TestApp::spawn().await;

    let res = app.get(&routes::asset("menu/products/x.png")).await;

    assert_eq!(res.status, 404);
}

#[tokio::test]
async fn local_backend_serves_uploaded_images() {
    let dir = tempfile::tempdir().unwrap();
    let app = TestApp::spawn_with_local_assets(dir.path()).await;

    let created = app
        .post_multipart(
            routes::CATEGORIES,
            &[("name", "Drinks"), ("restaurantId", "r1")],
            Some(FilePart::png("image", b"\x89PNG local")),
        )
        .await;
    assert_eq!(created.status, 201, "{}", created.text);
    let url = created.body["image"].as_str().unwrap();
    assert!(url.starts_with("/assets/menu/categories/"));

    let res = app.client.get(format!("http://{}{url}", app.addr)).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["content-type"], "image/png");
    assert_eq!(res.bytes().await.unwrap().as_ref(), b"\x89PNG local");

    let escape = app.get("/assets/..%2F..%2Fetc%2Fpasswd").await;
    assert_eq!(escape.status, 404);
}
