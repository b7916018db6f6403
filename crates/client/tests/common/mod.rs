#![allow(dead_code)]

//! In-process stand-ins for the portfolio API and the media host.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use aidy_media::{MediaError, MediaStore, MediaUpload, StoredMedia};
use async_trait::async_trait;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Stub API
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct StubData {
    pub categories: Vec<(i64, String)>,
    pub projects: Vec<Value>,
    pub next_id: i64,
    pub fail_projects: bool,
    /// Bodies of every project create/update, in order.
    pub writes: Vec<Value>,
}

pub type Stub = Arc<Mutex<StubData>>;

type Reply = (StatusCode, Json<Value>);

fn error(status: StatusCode, message: &str) -> Reply {
    (status, Json(json!({ "error": message })))
}

fn category_json(id: i64, name: &str) -> Value {
    json!({ "id": id, "name": name, "created_at": "2025-01-01T00:00:00Z" })
}

async fn list_categories(State(stub): State<Stub>) -> Reply {
    let data = stub.lock().unwrap();
    let list: Vec<Value> = data
        .categories
        .iter()
        .map(|(id, name)| category_json(*id, name))
        .collect();
    (StatusCode::OK, Json(json!(list)))
}

async fn create_category(State(stub): State<Stub>, Json(body): Json<Value>) -> Reply {
    let mut data = stub.lock().unwrap();
    let name = body["name"].as_str().unwrap_or("").trim().to_string();
    if name.is_empty() {
        return error(StatusCode::BAD_REQUEST, "Nama kategori tidak boleh kosong");
    }
    if data.categories.iter().any(|(_, n)| *n == name) {
        return error(StatusCode::BAD_REQUEST, "Kategori sudah ada");
    }
    data.next_id += 1;
    let id = data.next_id;
    data.categories.push((id, name.clone()));
    data.categories.sort_by(|a, b| a.1.cmp(&b.1));
    (StatusCode::CREATED, Json(category_json(id, &name)))
}

async fn rename_category(
    State(stub): State<Stub>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Reply {
    let mut data = stub.lock().unwrap();
    let name = body["name"].as_str().unwrap_or("").to_string();
    let Some(pos) = data.categories.iter().position(|(cid, _)| *cid == id) else {
        return error(StatusCode::NOT_FOUND, "Kategori tidak ditemukan");
    };
    let old = std::mem::replace(&mut data.categories[pos].1, name.clone());
    for project in data.projects.iter_mut() {
        if project["category"] == old.as_str() {
            project["category"] = json!(name);
        }
    }
    (StatusCode::OK, Json(category_json(id, &name)))
}

async fn delete_category(State(stub): State<Stub>, Path(id): Path<i64>) -> Reply {
    let mut data = stub.lock().unwrap();
    let Some(pos) = data.categories.iter().position(|(cid, _)| *cid == id) else {
        return error(StatusCode::NOT_FOUND, "Kategori tidak ditemukan");
    };
    let name = data.categories[pos].1.clone();
    let in_use = data
        .projects
        .iter()
        .filter(|p| p["category"] == name.as_str())
        .count();
    if in_use > 0 {
        return error(
            StatusCode::BAD_REQUEST,
            &format!("Tidak dapat menghapus kategori. {in_use} proyek masih menggunakan kategori ini."),
        );
    }
    data.categories.remove(pos);
    (StatusCode::OK, Json(json!({ "message": "Kategori berhasil dihapus" })))
}

async fn list_projects(State(stub): State<Stub>) -> Reply {
    let data = stub.lock().unwrap();
    if data.fail_projects {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "An internal error occurred");
    }
    let mut list = data.projects.clone();
    list.reverse();
    (StatusCode::OK, Json(json!(list)))
}

fn project_row(id: i64, body: &Value) -> Value {
    let media = body["media_urls"].clone();
    json!({
        "id": id,
        "title": body["title"],
        "description": body["description"],
        "image_url": media.get(0).cloned().unwrap_or(Value::Null),
        "media": media,
        "category": body["category"],
    })
}

async fn create_project(State(stub): State<Stub>, Json(body): Json<Value>) -> Reply {
    let mut data = stub.lock().unwrap();
    data.writes.push(body.clone());
    data.next_id += 1;
    let row = project_row(data.next_id, &body);
    data.projects.push(row.clone());
    (StatusCode::CREATED, Json(row))
}

async fn update_project(
    State(stub): State<Stub>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Reply {
    let mut data = stub.lock().unwrap();
    data.writes.push(body.clone());
    let Some(existing) = data.projects.iter_mut().find(|p| p["id"] == id) else {
        return error(StatusCode::NOT_FOUND, "Project not found");
    };
    *existing = project_row(id, &body);
    (StatusCode::OK, Json(existing.clone()))
}

async fn delete_project(State(stub): State<Stub>, Path(id): Path<i64>) -> Reply {
    let mut data = stub.lock().unwrap();
    let before = data.projects.len();
    data.projects.retain(|p| p["id"] != id);
    if data.projects.len() == before {
        return error(StatusCode::NOT_FOUND, "Project not found");
    }
    (StatusCode::OK, Json(json!({ "message": "Project deleted successfully" })))
}

/// Start the stub API seeded with the given categories; returns its `/api` root.
pub async fn spawn_api(categories: &[&str]) -> (String, Stub) {
    let stub: Stub = Arc::default();
    {
        let mut data = stub.lock().unwrap();
        for name in categories {
            data.next_id += 1;
            let id = data.next_id;
            data.categories.push((id, name.to_string()));
        }
    }

    let app = Router::new()
        .route("/api/categories", get(list_categories).post(create_category))
        .route("/api/categories/{id}", put(rename_category).delete(delete_category))
        .route("/api/projects", get(list_projects).post(create_project))
        .route("/api/projects/{id}", put(update_project).delete(delete_project))
        .with_state(Arc::clone(&stub));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/api"), stub)
}

/// Seed a project row directly.
pub fn seed_project(stub: &Stub, title: &str, category: &str, media: &[&str]) -> i64 {
    let mut data = stub.lock().unwrap();
    data.next_id += 1;
    let id = data.next_id;
    let row = project_row(
        id,
        &json!({ "title": title, "description": null, "category": category, "media_urls": media }),
    );
    data.projects.push(row);
    id
}

// ---------------------------------------------------------------------------
// Media host
// ---------------------------------------------------------------------------

/// Accepts every file except those whose name contains "bad"; records removals.
#[derive(Default)]
pub struct FakeMediaHost {
    pub stored: Mutex<Vec<String>>,
    pub removed: Mutex<Vec<String>>,
}

#[async_trait]
impl MediaStore for FakeMediaHost {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn put(&self, upload: MediaUpload) -> Result<StoredMedia, MediaError> {
        if upload.file_name.contains("bad") {
            return Err(MediaError::HttpStatus {
                status: 400,
                message: "Invalid image file".into(),
            });
        }
        let url = format!("https://media.test/{}", upload.file_name);
        self.stored.lock().unwrap().push(url.clone());
        Ok(StoredMedia {
            url,
            kind: upload.kind(),
        })
    }

    async fn remove(&self, url: &str) -> Result<(), MediaError> {
        self.removed.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

pub fn file(name: &str) -> MediaUpload {
    MediaUpload::new(name, None, vec![0; 4])
}
