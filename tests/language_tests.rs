
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};
use test_utils::*;

use portfolio_showcase::{auth::jwt::JwtService, settings::AppConfig};

#[actix_rt::test]
async fn creating_the_same_language_twice_conflicts() {
    let app = TestApp::spawn().await;

    let first = app.create_language(&rust_language()).await;
    assert_eq!(first.status(), StatusCode::CREATED);
    let body: Value = first.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["programmingLanguageName"], "Rust");

    let second = app.create_language(&rust_language()).await;
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    let body: Value = second.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "The language Rust already exists.");

    assert_eq!(app.catalogue.language_count().await, 1);
}

#[actix_rt::test]
async fn anonymous_mutation_is_unauthorized_and_has_no_effect() {
    let app = TestApp::spawn().await;

    let response = app
        .send_json(Method::POST, "/api/language", &rust_language(), None)
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(app.catalogue.language_count().await, 0);
}

#[actix_rt::test]
async fn non_admin_mutation_is_forbidden() {
    let app = TestApp::spawn().await;
    let token = app.visitor_token();

    for method in [Method::POST, Method::PUT, Method::DELETE] {
        let response = app
            .send_json(method.clone(), "/api/language", &json!({"id": 1, "name": "Go"}), Some(&token))
            .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{method}");

        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Admin access required");
    }
}

#[actix_rt::test]
async fn bad_or_expired_bearer_is_rejected() {
    let app = TestApp::spawn().await;

    let garbage = app.client
        .get(app.url("/api/language"))
        .bearer_auth("not-a-jwt")
        .send()
        .await
        .unwrap();
    assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);

    let expired_issuer = JwtService::new(&AppConfig {
        jwt_expiration_minutes: -5,
        ..app.config.clone()
    });
    let expired = expired_issuer.create_jwt("1", "admin@example.com", true).unwrap();

    let response = app
        .send_json(Method::POST, "/api/language", &rust_language(), Some(&expired))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Token has expired");
}

#[actix_rt::test]
async fn list_filters_by_ids_in_store_order() {
    let app = TestApp::spawn().await;
    for name in ["Rust", "Go", "Python"] {
        assert_eq!(app.create_language(&language_named(name)).await.status(), StatusCode::CREATED);
    }

    let body: Value = app.get("/api/language?ids=3,1,42").await.json().await.unwrap();
    let ids: Vec<i64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["programmingLanguageID"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 3]);

    let all: Value = app.get("/api/language").await.json().await.unwrap();
    assert_eq!(all["data"].as_array().unwrap().len(), 3);
}

#[actix_rt::test]
async fn ids_beyond_the_id_range_are_simply_absent() {
    let app = TestApp::spawn().await;
    app.create_language(&rust_language()).await;

    let response = app.get("/api/language?ids=1,3000000000").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["programmingLanguageID"], 1);
}

#[actix_rt::test]
async fn malformed_ids_are_a_bad_request() {
    let app = TestApp::spawn().await;

    let response = app.get("/api/language?ids=1,two").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[actix_rt::test]
async fn create_requires_all_fields_and_valid_urls() {
    let app = TestApp::spawn().await;

    let missing = app.create_language(&json!({"name": "Rust", "icon": "http://x.com/a.png"})).await;
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
    let body: Value = missing.json().await.unwrap();
    assert_eq!(body["error"], "Missing required fields.");

    let mut bad_url = rust_language();
    bad_url["url"] = json!("javascript:alert(1)");
    let invalid = app.create_language(&bad_url).await;
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
    let body: Value = invalid.json().await.unwrap();
    assert_eq!(body["details"][0]["field"], "url");

    assert_eq!(app.catalogue.language_count().await, 0);
}

#[actix_rt::test]
async fn update_of_unknown_id_is_not_found() {
    let app = TestApp::spawn().await;
    let token = app.admin_token();

    for body in [
        json!({"programmingLanguageID": 99}),
        json!({"programmingLanguageID": 99, "name": "Go"}),
        json!({"programmingLanguageID": 99, "programmingLanguageName": 5}),
        json!({"programmingLanguageID": "abc", "programmingLanguageURL": ["x"]}),
        json!({}),
    ] {
        let response = app.send_json(Method::PUT, "/api/language", &body, Some(&token)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Language not found.");
    }
}

#[actix_rt::test]
async fn renaming_onto_an_existing_name_conflicts() {
    let app = TestApp::spawn().await;
    app.create_language(&language_named("Rust")).await;
    app.create_language(&language_named("Go")).await;

    let response = app
        .send_json(Method::PUT, "/api/language", &json!({"id": 2, "name": "Rust"}), Some(&app.admin_token()))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "The language Rust already exists.");

    assert_eq!(app.catalogue.language(2).await.unwrap().programming_language_name, "Go");
}

#[actix_rt::test]
async fn badly_typed_field_of_a_known_language_is_a_field_error() {
    let app = TestApp::spawn().await;
    app.create_language(&rust_language()).await;
    let before = app.catalogue.language(1).await.unwrap();

    let response = app
        .send_json(
            Method::PUT,
            "/api/language",
            &json!({"programmingLanguageID": 1, "programmingLanguageName": 5}),
            Some(&app.admin_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["details"][0]["field"], "name");

    assert_eq!(app.catalogue.language(1).await.unwrap(), before);
}

#[actix_rt::test]
async fn update_without_fields_leaves_record_untouched() {
    let app = TestApp::spawn().await;
    app.create_language(&rust_language()).await;
    let before = app.catalogue.language(1).await.unwrap();

    let response = app
        .send_json(Method::PUT, "/api/language", &json!({"id": 1}), Some(&app.admin_token()))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(app.catalogue.language(1).await.unwrap(), before);
}

#[actix_rt::test]
async fn update_applies_only_provided_fields() {
    let app = TestApp::spawn().await;
    app.create_language(&rust_language()).await;

    let response = app
        .send_json(
            Method::PUT,
            "/api/language",
            &json!({"programmingLanguageID": "1", "programmingLanguageDescription": "Memory safe"}),
            Some(&app.admin_token()),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["programmingLanguageDescription"], "Memory safe");
    assert_eq!(body["data"]["programmingLanguageName"], "Rust");
    assert_eq!(body["data"]["programmingLanguageURL"], "http://rust-lang.org");
}

#[actix_rt::test]
async fn delete_reports_missing_and_unknown_ids() {
    let app = TestApp::spawn().await;
    let token = app.admin_token();
    app.create_language(&rust_language()).await;

    let missing = app.send_json(Method::DELETE, "/api/language", &json!({}), Some(&token)).await;
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
    let body: Value = missing.json().await.unwrap();
    assert_eq!(body["error"], "Please provide a programmingLanguageID");

    let unknown = app.send_json(Method::DELETE, "/api/language", &json!({"id": 7}), Some(&token)).await;
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);

    let deleted = app.send_json(Method::DELETE, "/api/language", &json!({"id": 1}), Some(&token)).await;
    assert_eq!(deleted.status(), StatusCode::OK);
    let body: Value = deleted.json().await.unwrap();
    assert_eq!(body["message"], "Language deleted");
    assert_eq!(app.catalogue.language_count().await, 0);
}

#[actix_rt::test]
async fn deleting_a_language_unlinks_it_from_projects() {
    let app = TestApp::spawn().await;
    let project_id = app.catalogue.seed_project("Showcase").await;
    app.create_language(&rust_language()).await;
    app.catalogue.link_language(project_id, 1).await;

    let body: Value = app.get("/api/project").await.json().await.unwrap();
    let languages = body["data"][0]["programmingLanguages"].as_array().unwrap();
    assert_eq!(languages.len(), 1);
    assert_eq!(languages[0]["programmingLanguageName"], "Rust");

    app.send_json(Method::DELETE, "/api/language", &json!({"id": 1}), Some(&app.admin_token()))
        .await;

    let body: Value = app.get("/api/project").await.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["programmingLanguages"], json!([]));
}

#[actix_rt::test]
async fn malformed_json_body_is_an_envelope() {
    let app = TestApp::spawn().await;

    let response = app.client
        .post(app.url("/api/language"))
        .bearer_auth(app.admin_token())
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
}
