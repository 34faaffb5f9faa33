use ::common::storage::memory::AssetOp;
use serde_json::json;

use crate::common::{FilePart, TestApp, routes};

mod category_creation {
    use super::*;

    #[tokio::test]
    async fn without_file_stores_empty_image_fields() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(
                routes::CATEGORIES,
                &json!({ "name": "Drinks", "restaurantId": "r1", "order": 1 }),
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["image"], "");
        assert_eq!(res.body["imagePublicId"], "");
        assert_eq!(res.body["name"], "Drinks");
        assert_eq!(res.body["order"], 1);
        assert_eq!(res.body["_id"].as_str().unwrap().len(), 24);
        assert!(app.assets.operations().is_empty());
    }

    #[tokio::test]
    async fn with_file_stores_uploaded_asset() {
        let app = TestApp::spawn().await;

        let res = app
            .post_multipart(
                routes::CATEGORIES,
                &[("name", "Desserts"), ("restaurantId", "r1"), ("order", "2")],
                Some(FilePart::png("image", b"png bytes")),
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        let public_id = res.body["imagePublicId"].as_str().unwrap();
        assert!(public_id.starts_with("menu/categories/"));
        assert_eq!(res.body["image"], format!("memory://{public_id}"));
        assert_eq!(res.body["order"], 2);
        assert_eq!(app.assets.get(public_id).unwrap().as_ref(), b"png bytes");
    }

    #[tokio::test]
    async fn empty_file_part_counts_as_no_file() {
        let app = TestApp::spawn().await;

        let res = app
            .post_multipart(
                routes::CATEGORIES,
                &[("name", "Sides"), ("restaurantId", "r1")],
                Some(FilePart::png("image", b"")),
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["imagePublicId"], "");
        assert_eq!(res.body["order"], 0);
        assert!(app.assets.operations().is_empty());
    }

    #[tokio::test]
    async fn client_cannot_set_image_fields() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(
                routes::CATEGORIES,
                &json!({
                    "name": "Drinks",
                    "restaurantId": "r1",
                    "image": "https://evil.example/x.png",
                    "imagePublicId": "someone-elses-asset",
                    "_id": "665f1c2ab4d8e9a1c2f3b4d5",
                }),
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["image"], "");
        assert_eq!(res.body["imagePublicId"], "");
        assert_ne!(res.body["_id"], "665f1c2ab4d8e9a1c2f3b4d5");
    }

    #[tokio::test]
    async fn missing_required_field_is_a_500() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(routes::CATEGORIES, &json!({ "name": "Drinks" }))
            .await;

        assert_eq!(res.status, 500);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert!(res.body["message"].as_str().unwrap().contains("restaurantId"));
    }

    #[tokio::test]
    async fn invalid_payload_uploads_nothing() {
        let app = TestApp::spawn().await;

        let res = app
            .post_multipart(
                routes::CATEGORIES,
                &[("name", "Drinks")],
                Some(FilePart::png("image", b"png")),
            )
            .await;

        assert_eq!(res.status, 500);
        assert!(app.assets.operations().is_empty());
    }

    #[tokio::test]
    async fn upload_failure_writes_no_document() {
        let app = TestApp::spawn().await;
        app.assets.fail_uploads(true);

        let res = app
            .post_multipart(
                routes::CATEGORIES,
                &[("name", "Drinks"), ("restaurantId", "r1")],
                Some(FilePart::png("image", b"png")),
            )
            .await;

        assert_eq!(res.status, 500);
        assert_eq!(res.body["code"], "STORAGE_ERROR");
        assert_eq!(app.db.count("categories"), 0);
    }
}

mod category_lifecycle {
    use super::*;

    async fn create_with_image(app: &TestApp) -> (String, String) {
        let res = app
            .post_multipart(
                routes::CATEGORIES,
                &[("name", "Drinks"), ("restaurantId", "r1")],
                Some(FilePart::png("image", b"first")),
            )
            .await;
        assert_eq!(res.status, 201, "{}", res.text);
        (
            res.body["_id"].as_str().unwrap().to_string(),
            res.body["imagePublicId"].as_str().unwrap().to_string(),
        )
    }

    #[tokio::test]
    async fn list_returns_created_in_order() {
        let app = TestApp::spawn().await;
        for name in ["Drinks", "Mains", "Desserts"] {
            app.post_json(
                routes::CATEGORIES,
                &json!({ "name": name, "restaurantId": "r1" }),
            )
            .await;
        }

        let res = app.get(routes::CATEGORIES).await;

        assert_eq!(res.status, 200);
        let names: Vec<_> = res.body.as_array().unwrap().iter().map(|c| c["name"].clone()).collect();
        assert_eq!(names, vec![json!("Drinks"), json!("Mains"), json!("Desserts")]);
    }

    #[tokio::test]
    async fn update_without_file_keeps_image() {
        let app = TestApp::spawn().await;
        let (id, public_id) = create_with_image(&app).await;

        let res = app
            .put_multipart(&routes::category(&id), &[("name", "Beverages")], None)
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["name"], "Beverages");
        assert_eq!(res.body["imagePublicId"], public_id.as_str());
        assert_eq!(res.body["restaurantId"], "r1");
        assert!(app.assets.get(&public_id).is_some());
    }

    #[tokio::test]
    async fn update_with_file_replaces_asset() {
        let app = TestApp::spawn().await;
        let (id, old) = create_with_image(&app).await;

        let res = app
            .put_multipart(
                &routes::category(&id),
                &[],
                Some(FilePart::png("image", b"second")),
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        let new = res.body["imagePublicId"].as_str().unwrap();
        assert_ne!(new, old);
        assert!(app.assets.get(&old).is_none());
        assert_eq!(app.assets.get(new).unwrap().as_ref(), b"second");

        let fetched = app.get(&routes::category(&id)).await;
        assert_eq!(fetched.body["imagePublicId"], new);
    }

    #[tokio::test]
    async fn delete_removes_asset_before_document() {
        let app = TestApp::spawn().await;
        let (id, public_id) = create_with_image(&app).await;

        let res = app.delete(&routes::category(&id)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body, json!({ "message": "Category deleted" }));
        assert!(app.assets.get(&public_id).is_none());
        assert_eq!(
            app.assets.operations().last(),
            Some(&AssetOp::Delete { public_id })
        );
        assert_eq!(app.get(&routes::category(&id)).await.status, 404);
    }

    #[tokio::test]
    async fn unknown_id_is_404_for_every_operation() {
        let app = TestApp::spawn().await;
        let path = routes::category("665f1c2ab4d8e9a1c2f3b4d5");

        let get = app.get(&path).await;
        let put = app.put_json(&path, &json!({ "name": "x" })).await;
        let delete = app.delete(&path).await;

        for res in [get, put, delete] {
            assert_eq!(res.status, 404);
            assert_eq!(res.body["message"], "Category not found");
        }
        assert!(app.assets.operations().is_empty());
    }
}
