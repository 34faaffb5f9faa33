use bson::oid::ObjectId;
use serde_json::json;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn create_sets_created_at_and_keeps_password_as_sent() {
    let app = TestApp::spawn().await;

    let res = app
        .post_json(
            routes::RESTAURANT_ADMINS,
            &json!({
                "username": "owner",
                "password": "hunter2",
                "restaurantName": "Blue Door",
                "createdAt": "1999-01-01T00:00:00Z",
            }),
        )
        .await;

    assert_eq!(res.status, 201, "{}", res.text);
    assert_eq!(res.body["password"], "hunter2");
    let created_at = res.body["createdAt"].as_str().unwrap();
    assert!(!created_at.starts_with("1999"));
}

#[tokio::test]
async fn update_and_list() {
    let app = TestApp::spawn().await;
    let created = app
        .post_json(
            routes::RESTAURANT_ADMINS,
            &json!({ "username": "owner", "password": "p", "restaurantName": "Blue Door" }),
        )
        .await;
    let id = created.body["_id"].as_str().unwrap();

    let res = app
        .put_json(
            &routes::restaurant_admin(id),
            &json!({ "restaurantName": "Red Door" }),
        )
        .await;
    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["restaurantName"], "Red Door");
    assert_eq!(res.body["username"], "owner");
    assert_eq!(res.body["createdAt"], created.body["createdAt"]);

    let list = app.get(routes::RESTAURANT_ADMINS).await;
    assert_eq!(list.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn not_found_names_the_entity() {
    let app = TestApp::spawn().await;

    let res = app
        .get(&routes::restaurant_admin(&ObjectId::new().to_hex()))
        .await;

    assert_eq!(res.status, 404);
    assert_eq!(res.body["message"], "Restaurant admin not found");
}

#[tokio::test]
async fn delete_returns_message() {
    let app = TestApp::spawn().await;
    let created = app
        .post_json(
            routes::RESTAURANT_ADMINS,
            &json!({ "username": "owner", "password": "p", "restaurantName": "Blue Door" }),
        )
        .await;

    let res = app
        .delete(&routes::restaurant_admin(created.body["_id"].as_str().unwrap()))
        .await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body, json!({ "message": "Restaurant admin deleted" }));
}
