use ::common::storage::memory::AssetOp;
use bson::oid::ObjectId;
use menu_server::entity::product;
use menu_server::images::OrphanCause;
use serde_json::json;

use crate::common::{FilePart, TestApp, routes};

const PRODUCT_FIELDS: &[(&str, &str)] = &[
    ("restaurantId", "r1"),
    ("name", "Latte"),
    ("price", "3.75"),
    ("categoryId", "c1"),
    ("isAvailable", "false"),
];

/// A product whose image is already stored under `abc123`.
async fn seed_product_with_image(app: &TestApp) -> String {
    app.assets.seed("abc123", "old image");
    let model = product::Model {
        id: ObjectId::new(),
        restaurant_id: "r1".into(),
        name: "Espresso".into(),
        description: String::new(),
        price: 2.5,
        category_id: "c1".into(),
        image: "memory://abc123".into(),
        image_public_id: "abc123".into(),
        is_available: true,
    };
    app.seed(&model).await;
    model.id.to_hex()
}

mod product_creation {
    use super::*;

    #[tokio::test]
    async fn multipart_fields_are_typed() {
        let app = TestApp::spawn().await;

        let res = app
            .post_multipart(
                routes::PRODUCTS,
                PRODUCT_FIELDS,
                Some(FilePart::png("image", b"latte")),
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["price"], 3.75);
        assert_eq!(res.body["isAvailable"], false);
        assert_eq!(res.body["description"], "");
        assert_eq!(
            app.assets.operations(),
            vec![AssetOp::Upload {
                folder: "menu/products".into()
            }]
        );
    }

    #[tokio::test]
    async fn stored_asset_is_retrievable_by_returned_id() {
        let app = TestApp::spawn().await;

        let res = app
            .post_multipart(
                routes::PRODUCTS,
                PRODUCT_FIELDS,
                Some(FilePart::png("image", b"latte")),
            )
            .await;

        let public_id = res.body["imagePublicId"].as_str().unwrap();
        assert_eq!(app.assets.get(public_id).unwrap().as_ref(), b"latte");
    }

    #[tokio::test]
    async fn json_body_defaults_optional_fields() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(
                routes::PRODUCTS,
                &json!({ "restaurantId": "r1", "name": "Tea", "price": 2, "categoryId": "c1" }),
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["isAvailable"], true);
        assert_eq!(res.body["image"], "");
        assert_eq!(res.body["imagePublicId"], "");
    }

    #[tokio::test]
    async fn unparsable_price_is_a_500() {
        let app = TestApp::spawn().await;

        let res = app
            .post_multipart(
                routes::PRODUCTS,
                &[
                    ("restaurantId", "r1"),
                    ("name", "Tea"),
                    ("price", "cheap"),
                    ("categoryId", "c1"),
                ],
                None,
            )
            .await;

        assert_eq!(res.status, 500);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn failed_document_write_reports_uploaded_image() {
        let app = TestApp::spawn().await;
        app.db.fail_writes(true);

        let res = app
            .post_multipart(
                routes::PRODUCTS,
                PRODUCT_FIELDS,
                Some(FilePart::png("image", b"latte")),
            )
            .await;

        assert_eq!(res.status, 500);
        assert_eq!(res.body["code"], "DATABASE_ERROR");
        let reports = app.orphans.reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].cause, OrphanCause::DocumentWriteFailed);
        assert_eq!(reports[0].folder, "menu/products");
        // Not compensated: the asset stays in place.
        assert!(app.assets.get(&reports[0].public_id).is_some());
    }
}

mod product_update {
    use super::*;

    #[tokio::test]
    async fn new_file_deletes_old_asset_before_upload() {
        let app = TestApp::spawn().await;
        let id = seed_product_with_image(&app).await;

        let res = app
            .put_multipart(
                &routes::product(&id),
                &[],
                Some(FilePart::png("image", b"new image")),
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_ne!(res.body["imagePublicId"], "abc123");
        assert_eq!(
            app.assets.operations(),
            vec![
                AssetOp::Delete {
                    public_id: "abc123".into()
                },
                AssetOp::Upload {
                    folder: "menu/products".into()
                },
            ]
        );
        assert!(app.assets.get("abc123").is_none());
    }

    #[tokio::test]
    async fn no_file_keeps_image_while_other_fields_change() {
        let app = TestApp::spawn().await;
        let id = seed_product_with_image(&app).await;

        let res = app
            .put_json(
                &routes::product(&id),
                &json!({ "price": "4.25", "isAvailable": false, "name": "Doppio" }),
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["name"], "Doppio");
        assert_eq!(res.body["price"], 4.25);
        assert_eq!(res.body["isAvailable"], false);
        assert_eq!(res.body["image"], "memory://abc123");
        assert_eq!(res.body["imagePublicId"], "abc123");
        assert!(app.assets.operations().is_empty());
    }

    #[tokio::test]
    async fn failed_old_delete_is_reported_and_update_proceeds() {
        let app = TestApp::spawn().await;
        let id = seed_product_with_image(&app).await;
        app.assets.fail_deletes(true);

        let res = app
            .put_multipart(
                &routes::product(&id),
                &[],
                Some(FilePart::png("image", b"new image")),
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_ne!(res.body["imagePublicId"], "abc123");
        let reports = app.orphans.reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].public_id, "abc123");
        assert_eq!(reports[0].cause, OrphanCause::DeleteFailed);
    }

    #[tokio::test]
    async fn upload_failure_keeps_document_unchanged() {
        let app = TestApp::spawn().await;
        let id = seed_product_with_image(&app).await;
        app.assets.fail_uploads(true);

        let res = app
            .put_multipart(
                &routes::product(&id),
                &[("name", "Doppio")],
                Some(FilePart::png("image", b"new image")),
            )
            .await;

        assert_eq!(res.status, 500);
        assert_eq!(res.body["code"], "STORAGE_ERROR");
        let stored = app.get(&routes::product(&id)).await;
        assert_eq!(stored.body["name"], "Espresso");
        assert_eq!(stored.body["imagePublicId"], "abc123");
    }
}

mod product_lookup {
    use super::*;

    #[tokio::test]
    async fn empty_collection_lists_as_empty_array() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::PRODUCTS).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body, json!([]));
    }

    #[tokio::test]
    async fn unknown_id_is_404() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::product(&ObjectId::new().to_hex())).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["message"], "Product not found");
    }

    #[tokio::test]
    async fn malformed_id_is_a_500() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::product("not-an-object-id")).await;

        assert_eq!(res.status, 500);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn delete_releases_image() {
        let app = TestApp::spawn().await;
        let id = seed_product_with_image(&app).await;

        let res = app.delete(&routes::product(&id)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body, json!({ "message": "Product deleted" }));
        assert!(app.assets.get("abc123").is_none());
        assert_eq!(app.db.count("products"), 0);
    }

    #[tokio::test]
    async fn delete_proceeds_when_asset_delete_fails() {
        let app = TestApp::spawn().await;
        let id = seed_product_with_image(&app).await;
        app.assets.fail_deletes(true);

        let res = app.delete(&routes::product(&id)).await;

        assert_eq!(res.status, 200);
        assert_eq!(app.db.count("products"), 0);
        assert_eq!(app.orphans.reports()[0].cause, OrphanCause::DeleteFailed);
    }
}
