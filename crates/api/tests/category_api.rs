//! HTTP-level integration tests for the category endpoints.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, delete, get, post_json, put_json, send};
use serde_json::json;
use sqlx::PgPool;

async fn create_category(app: axum::Router, name: &str) -> i64 {
    let response = post_json(app, "/api/categories", json!({ "name": name })).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

async fn create_project(app: axum::Router, title: &str, category: &str) -> i64 {
    let response = post_json(
        app,
        "/api/projects",
        json!({ "title": title, "category": category }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// List / create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_returns_seeded_categories_by_name(pool: PgPool) {
    let test = common::build_test_app(pool);
    let response = get(test.app(), "/api/categories").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Interior", "Komersial", "Landscape", "Perumahan"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_trims_name_and_returns_201(pool: PgPool) {
    let test = common::build_test_app(pool);
    let response = post_json(test.app(), "/api/categories", json!({"name": "  Renovasi  "})).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Renovasi");
    assert!(json["id"].is_number());
    assert!(json["created_at"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn blank_or_missing_name_is_rejected(pool: PgPool) {
    let test = common::build_test_app(pool);

    for body in [json!({"name": "   "}), json!({})] {
        let response = post_json(test.app(), "/api/categories", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Nama kategori tidak boleh kosong");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_name_is_rejected(pool: PgPool) {
    let test = common::build_test_app(pool);
    let response = post_json(test.app(), "/api/categories", json!({"name": "Interior"})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Kategori sudah ada");
    assert_eq!(json["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn creating_twice_yields_one_success(pool: PgPool) {
    let test = common::build_test_app(pool);

    let first = post_json(test.app(), "/api/categories", json!({"name": "Villa"})).await;
    let second = post_json(test.app(), "/api/categories", json!({"name": "Villa"})).await;

    assert_eq!(first.status(), StatusCode::CREATED);
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Rename
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn rename_updates_linked_projects(pool: PgPool) {
    let test = common::build_test_app(pool);
    let category_id = create_category(test.app(), "Gudang").await;
    let project_id = create_project(test.app(), "Gudang Logistik", "Gudang").await;

    let response = put_json(
        test.app(),
        &format!("/api/categories/{category_id}"),
        json!({"name": "Industri"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["name"], "Industri");

    let project = body_json(get(test.app(), &format!("/api/projects/{project_id}")).await).await;
    assert_eq!(project["category"], "Industri");
    assert_eq!(project["category_id"], category_id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rename_to_taken_name_is_rejected(pool: PgPool) {
    let test = common::build_test_app(pool);
    let category_id = create_category(test.app(), "Gudang").await;

    let response = put_json(
        test.app(),
        &format!("/api/categories/{category_id}"),
        json!({"name": "Interior"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Kategori sudah ada");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rename_missing_category_returns_404(pool: PgPool) {
    let test = common::build_test_app(pool);
    let response = put_json(test.app(), "/api/categories/999999", json!({"name": "X"})).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Kategori tidak ditemukan");
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_unused_category(pool: PgPool) {
    let test = common::build_test_app(pool);
    let category_id = create_category(test.app(), "Sementara").await;

    let response = delete(test.app(), &format!("/api/categories/{category_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "Kategori berhasil dihapus");

    let list = body_json(get(test.app(), "/api/categories").await).await;
    assert!(list
        .as_array()
        .unwrap()
        .iter()
        .all(|c| c["name"] != "Sementara"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_category_in_use_reports_count(pool: PgPool) {
    let test = common::build_test_app(pool);
    let category_id = create_category(test.app(), "Masjid").await;
    create_project(test.app(), "Masjid Raya", "Masjid").await;
    create_project(test.app(), "Masjid Kampus", "Masjid").await;

    let response = delete(test.app(), &format!("/api/categories/{category_id}")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "Tidak dapat menghapus kategori. 2 proyek masih menggunakan kategori ini."
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_missing_category_returns_404(pool: PgPool) {
    let test = common::build_test_app(pool);
    let response = delete(test.app(), "/api/categories/999999").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Kategori tidak ditemukan");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_bodies_get_json_errors(pool: PgPool) {
    let test = common::build_test_app(pool);

    let broken = Request::builder()
        .method(Method::POST)
        .uri("/api/categories")
        .header("content-type", "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    let response = send(test.app(), broken).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");

    let plain = Request::builder()
        .method(Method::PUT)
        .uri("/api/categories/1")
        .header("content-type", "text/plain")
        .body(Body::from("Interior"))
        .unwrap();
    let response = send(test.app(), plain).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["error"].is_string());
}
