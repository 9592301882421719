use std::{collections::BTreeMap, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    routing::{any, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
}

#[derive(Deserialize)]
pub struct CreateUser {
    pub name: String,
}

#[derive(Deserialize)]
pub struct Page {
    #[serde(default = "first_page")]
    pub page: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn first_page() -> usize {
    1
}

fn default_limit() -> usize {
    10
}

/// Everything the server saw about a request sent to `/echo`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

pub type Db = Arc<RwLock<Vec<User>>>;

pub const SEEDED_USERS: usize = 25;

pub fn app() -> Router {
    let users = (1..=SEEDED_USERS)
        .map(|n| User {
            id: Uuid::new_v4(),
            name: format!("user-{n}"),
        })
        .collect();
    app_with_users(users)
}

pub fn app_with_users(users: Vec<User>) -> Router {
    let db: Db = Arc::new(RwLock::new(users));
    Router::new()
        .route("/users/userList", get(list_users))
        .route("/users", post(create_user))
        .route("/echo", any(echo))
        .route("/echo/{*rest}", any(echo))
        .route("/status/{code}", any(status))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// One page of users as a JSON object keyed by user id.
async fn list_users(
    State(db): State<Db>,
    Query(page): Query<Page>,
) -> Result<Json<BTreeMap<String, User>>, StatusCode> {
    if page.page == 0 {
        return Err(StatusCode::BAD_REQUEST);
    }
    let users = db.read().await;
    let listed = users
        .iter()
        .skip((page.page - 1) * page.limit)
        .take(page.limit)
        .map(|user| (user.id.to_string(), user.clone()))
        .collect();
    Ok(Json(listed))
}

async fn create_user(State(db): State<Db>, Json(input): Json<CreateUser>) -> Json<User> {
    let user = User {
        id: Uuid::new_v4(),
        name: input.name,
    };
    db.write().await.push(user.clone());
    tracing::debug!(id = %user.id, "created user");
    Json(user)
}

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Json<Echo> {
    let headers = headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    Json(Echo {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

async fn status(Path(code): Path<u16>) -> Result<(StatusCode, String), StatusCode> {
    let status = StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)?;
    Ok((status, format!("status {code}")))
}
