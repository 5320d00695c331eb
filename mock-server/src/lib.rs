//! In-memory job-board backend.
//!
//! Implements the REST surface the client talks to, with Django-REST style
//! JSON errors, so the client can be exercised end to end without a real
//! deployment. All state lives in one `Store` behind a tokio `RwLock`.

pub mod auth;
pub mod models;
mod routes;

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

use models::{Account, Application, Education, Experience, HiringFocus, Job, Message, Page, Review, Thread};

pub const PAGE_SIZE: usize = 10;

#[derive(Default)]
pub struct Store {
    pub accounts: HashMap<Uuid, Account>,
    pub tokens: HashMap<String, Uuid>,
    pub access_tokens: HashMap<String, Uuid>,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub hiring_focus: Vec<HiringFocus>,
    pub jobs: Vec<Job>,
    pub applications: Vec<Application>,
    pub reviews: Vec<Review>,
    pub threads: Vec<Thread>,
    pub messages: Vec<Message>,
}

pub type Db = Arc<RwLock<Store>>;

/// An error response: status plus a JSON body.
#[derive(Debug)]
pub struct ApiFailure {
    pub status: StatusCode,
    pub body: Value,
}

impl ApiFailure {
    pub fn detail(status: StatusCode, message: &str) -> Self {
        Self {
            status,
            body: json!({ "detail": message }),
        }
    }

    /// Field-level validation error, `{"field": ["message"]}`.
    pub fn field(field: &str, message: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: json!({ field: [message] }),
        }
    }

    pub fn not_found() -> Self {
        Self::detail(StatusCode::NOT_FOUND, "Not found.")
    }

    pub fn forbidden(message: &str) -> Self {
        Self::detail(StatusCode::FORBIDDEN, message)
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Slice `items` into one page. Page numbers start at 1; out of range is a 404.
pub fn paginate<T>(items: Vec<T>, page: Option<u32>) -> Result<Page<T>, ApiFailure> {
    let page = page.unwrap_or(1);
    let count = items.len();
    let pages = count.div_ceil(PAGE_SIZE).max(1);
    if page == 0 || page as usize > pages {
        return Err(ApiFailure::detail(StatusCode::NOT_FOUND, "Invalid page."));
    }
    let results = items
        .into_iter()
        .skip((page as usize - 1) * PAGE_SIZE)
        .take(PAGE_SIZE)
        .collect();
    Ok(Page {
        count,
        next: ((page as usize) < pages).then_some(page + 1),
        previous: (page > 1).then_some(page - 1),
        results,
    })
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/api/health/", get(routes::health))
        .route("/api/ping/", get(routes::ping))
        .route("/api/debug/error/", get(routes::debug_error))
        .route("/api/auth/signup/", post(routes::signup))
        .route("/api/auth/login/", post(routes::login))
        .route("/api/auth/logout/", post(routes::logout))
        .route("/api/profile/", get(routes::get_profile).patch(routes::update_profile))
        .route(
            "/api/profile/experience/",
            get(routes::list_experience).post(routes::create_experience),
        )
        .route(
            "/api/profile/experience/{id}/",
            patch(routes::update_experience).delete(routes::delete_experience),
        )
        .route(
            "/api/profile/education/",
            get(routes::list_education).post(routes::create_education),
        )
        .route(
            "/api/profile/education/{id}/",
            patch(routes::update_education).delete(routes::delete_education),
        )
        .route(
            "/api/profile/hiring-focus/",
            get(routes::list_hiring_focus).post(routes::create_hiring_focus),
        )
        .route(
            "/api/profile/hiring-focus/{id}/",
            patch(routes::update_hiring_focus).delete(routes::delete_hiring_focus),
        )
        .route("/api/jobs/", get(routes::my_jobs).post(routes::create_job))
        .route("/api/jobs/public/", get(routes::public_jobs))
        .route(
            "/api/jobs/{id}/",
            get(routes::get_job)
                .patch(routes::update_job)
                .delete(routes::delete_job),
        )
        .route("/api/jobs/{id}/apply/", post(routes::apply))
        .route("/api/search/workers/", get(routes::search_workers))
        .route("/api/search/companies/", get(routes::search_companies))
        .route("/api/reviews/", post(routes::create_review))
        .route("/api/users/{id}/reviews/", get(routes::user_reviews))
        .route("/api/messages/", post(routes::send_message))
        .route("/api/messages/conversations/", get(routes::list_conversations))
        .route("/api/messages/conversations/{id}/", get(routes::get_conversation))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}
