#[cfg(test)]
mod tests {
    use axum::http::{header, Method, StatusCode};
    use serde_json::json;

    use crate::tests::{create_contact, delete, get, send_json, setup_test_app};

    fn contact_body() -> serde_json::Value {
        json!({ "name": "My contact", "zipCode": "0000AA", "city": "Arnhem", "houseNumber": "12a" })
    }

    #[tokio::test]
    async fn test_create_contact() {
        let (app, _) = setup_test_app().await;

        let res = send_json(&app, Method::POST, "/api/contacts", contact_body()).await;

        assert_eq!(res.status, StatusCode::CREATED);
        assert!(res.content_type().starts_with("application/hal+json"));
        assert_eq!(res.headers.get(header::LOCATION).unwrap(), "http://localhost/api/contacts/1");
        assert_eq!(res.body["id"], 1);
        assert_eq!(res.body["name"], "My contact");
        assert_eq!(res.body["zipCode"], "0000AA");
        assert_eq!(res.body["city"], "Arnhem");
        assert_eq!(res.body["houseNumber"], "12a");
        assert_eq!(res.body["_links"]["self"]["href"], "http://localhost/api/contacts/1");
        assert_eq!(res.body["_links"]["contact"]["href"], "http://localhost/api/contacts/1");
    }

    #[tokio::test]
    async fn test_create_contact_reports_every_blank_field() {
        let (app, state) = setup_test_app().await;

        let res = send_json(&app, Method::POST, "/api/contacts", json!({ "name": " ", "city": "Arnhem" })).await;

        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert_eq!(res.body["status"], 400);
        assert_eq!(res.body["error"], "Bad Request");
        assert_eq!(
            res.body["problems"],
            json!([
                "Property \"name\": must not be blank.",
                "Property \"zipCode\": must not be blank.",
                "Property \"houseNumber\": must not be blank."
            ])
        );
        assert_eq!(state.metrics.get_snapshot().validation_failures, 1);

        let list = get(&app, "/api/contacts").await;
        assert_eq!(list.body["page"]["totalElements"], 0);
    }

    #[tokio::test]
    async fn test_get_contact() {
        let (app, _) = setup_test_app().await;
        create_contact(&app, "First").await;

        let res = get(&app, "/api/contacts/1").await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.body["name"], "First");

        let missing = get(&app, "/api/contacts/99").await;
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
        assert_eq!(missing.body["code"], "NOT_FOUND");

        let not_an_id = get(&app, "/api/contacts/abc").await;
        assert_eq!(not_an_id.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_contacts_paged() {
        let (app, _) = setup_test_app().await;
        for name in ["c", "a", "b"] {
            create_contact(&app, name).await;
        }

        let res = get(&app, "/api/contacts?size=2&sort=name,desc").await;
        assert_eq!(res.status, StatusCode::OK);
        let items = res.body["_embedded"]["contacts"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["name"], "c");
        assert_eq!(items[1]["name"], "b");
        assert_eq!(res.body["page"], json!({ "size": 2, "totalElements": 3, "totalPages": 2, "number": 0 }));
        assert_eq!(
            res.body["_links"]["next"]["href"],
            "http://localhost/api/contacts?page=1&size=2&sort=name%2Cdesc"
        );

        let second = get(&app, "/api/contacts?page=1&size=2&sort=name,desc").await;
        let items = second.body["_embedded"]["contacts"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["name"], "a");
    }

    #[tokio::test]
    async fn test_list_contacts_rejects_unknown_sort_property() {
        let (app, _) = setup_test_app().await;
        let res = get(&app, "/api/contacts?sort=secret").await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert_eq!(res.body["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_replace_contact() {
        let (app, state) = setup_test_app().await;
        create_contact(&app, "Old").await;

        let res = send_json(
            &app,
            Method::PUT,
            "/api/contacts/1",
            json!({ "name": "New", "zipCode": "1111BB", "city": "Utrecht", "houseNumber": "3" }),
        )
        .await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.body["name"], "New");
        assert_eq!(res.body["city"], "Utrecht");
        assert_eq!(state.metrics.get_snapshot().resources_updated, 1);

        // A full replace needs every field.
        let partial = send_json(&app, Method::PUT, "/api/contacts/1", json!({ "name": "Only" })).await;
        assert_eq!(partial.status, StatusCode::BAD_REQUEST);
        assert_eq!(partial.body["problems"].as_array().unwrap().len(), 3);

        let missing = send_json(&app, Method::PUT, "/api/contacts/42", contact_body()).await;
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_patch_contact_merges_fields() {
        let (app, _) = setup_test_app().await;
        create_contact(&app, "Keep").await;

        let res = send_json(&app, Method::PATCH, "/api/contacts/1", json!({ "city": "Utrecht" })).await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.body["name"], "Keep");
        assert_eq!(res.body["city"], "Utrecht");
        assert_eq!(res.body["zipCode"], "0000AA");

        let blank = send_json(&app, Method::PATCH, "/api/contacts/1", json!({ "name": "" })).await;
        assert_eq!(blank.status, StatusCode::BAD_REQUEST);
        assert_eq!(blank.body["problems"], json!(["Property \"name\": must not be blank."]));
    }

    #[tokio::test]
    async fn test_patch_contact_with_nulls_is_rejected() {
        let (app, _) = setup_test_app().await;
        create_contact(&app, "Keep").await;

        let res = send_json(
            &app,
            Method::PATCH,
            "/api/contacts/1",
            json!({ "name": null, "zipCode": null, "city": null, "houseNumber": null }),
        )
        .await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            res.body["problems"],
            json!([
                "Property \"name\": must not be blank.",
                "Property \"zipCode\": must not be blank.",
                "Property \"city\": must not be blank.",
                "Property \"houseNumber\": must not be blank."
            ])
        );

        let stored = get(&app, "/api/contacts/1").await;
        assert_eq!(stored.body["name"], "Keep");
    }

    #[tokio::test]
    async fn test_delete_contact() {
        let (app, _) = setup_test_app().await;
        create_contact(&app, "Gone").await;

        let res = delete(&app, "/api/contacts/1").await;
        assert_eq!(res.status, StatusCode::NO_CONTENT);
        assert_eq!(get(&app, "/api/contacts/1").await.status, StatusCode::NOT_FOUND);
        assert_eq!(delete(&app, "/api/contacts/1").await.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let (app, _) = setup_test_app().await;
        let request = axum::http::Request::builder()
            .method(Method::POST)
            .uri("/api/contacts")
            .header(header::CONTENT_TYPE, "application/json")
            .body(axum::body::Body::from("{\"name\": "))
            .unwrap();
        let res = crate::tests::send(&app, request).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert_eq!(res.body["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_hal_json_request_body_is_accepted() {
        let (app, _) = setup_test_app().await;
        let request = axum::http::Request::builder()
            .method(Method::POST)
            .uri("/api/contacts")
            .header(header::CONTENT_TYPE, "application/hal+json")
            .body(axum::body::Body::from(contact_body().to_string()))
            .unwrap();
        let res = crate::tests::send(&app, request).await;
        assert_eq!(res.status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_missing_content_type_is_unsupported() {
        let (app, _) = setup_test_app().await;
        let request = axum::http::Request::builder()
            .method(Method::POST)
            .uri("/api/contacts")
            .body(axum::body::Body::from(contact_body().to_string()))
            .unwrap();
        let res = crate::tests::send(&app, request).await;
        assert_eq!(res.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }
}
