//! HTTP surface: REST endpoints, admin pages and their middleware.
//!
//! Every request that touches the database opens its own connection on the
//! blocking thread pool through [`AppState::with_db`]; SQLite serializes the
//! writers.

pub mod attendance;
pub mod error;
pub mod laborers;
pub mod materials;
pub mod middleware;
pub mod pages;
pub mod payments;
pub mod sites;

use crate::db::db::Db;
use crate::libs::auth::{AdminAuthenticator, Authenticator};
use crate::libs::config::Config;
use crate::libs::error::Result;
use crate::libs::messages::Message;
use crate::libs::session::SessionStore;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post, MethodRouter};
use axum::{Json, Router};
use rusqlite::Connection;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db_path: Arc<PathBuf>,
    pub frontend_dir: Arc<PathBuf>,
    pub sessions: SessionStore,
    pub auth: Arc<dyn Authenticator>,
}

impl AppState {
    pub fn new(db_path: PathBuf, frontend_dir: PathBuf, auth: Arc<dyn Authenticator>) -> Self {
        Self {
            db_path: Arc::new(db_path),
            frontend_dir: Arc::new(frontend_dir),
            sessions: SessionStore::new(),
            auth,
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let auth = Arc::new(AdminAuthenticator::new(config.admin.clone()));
        Ok(Self::new(config.database_path()?, config.server.frontend_dir.clone(), auth))
    }

    /// Runs `f` against a fresh connection on the blocking pool.
    pub async fn with_db<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let path = Arc::clone(&self.db_path);
        tokio::task::spawn_blocking(move || {
            let conn = Db::connect(&path)?;
            f(&conn)
        })
        .await?
    }
}

/// `{"message": "..."}` body for operations without a record to return.
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

pub fn message(msg: Message) -> Json<MessageBody> {
    Json(MessageBody { message: msg.to_string() })
}

/// Registers `path` both with and without its trailing slash.
fn route_both(router: Router<AppState>, path: &str, handler: MethodRouter<AppState>) -> Router<AppState> {
    let bare = path.trim_end_matches('/');
    if bare.is_empty() || bare == path {
        return router.route(path, handler);
    }
    router.route(path, handler.clone()).route(bare, handler)
}

pub fn build_router(state: AppState) -> Router {
    let gated = [
        ("/admin/dashboard/", get(pages::dashboard)),
        ("/labor-management/", get(pages::labor_management)),
    ]
    .into_iter()
    .fold(Router::new(), |router, (path, handler)| route_both(router, path, handler))
    .route_layer(from_fn_with_state(state.clone(), middleware::require_session));

    let routes: Vec<(&str, MethodRouter<AppState>)> = vec![
        ("/admin/login/", post(pages::login)),
        ("/admin/logout/", post(pages::logout)),
        ("/materials-management/", get(pages::materials_management)),
        ("/payment-management/", get(pages::payment_management)),
        ("/labours/", get(laborers::list_laborers).post(laborers::create_laborer)),
        ("/labours/search/", get(laborers::search_laborers)),
        (
            "/labours/:id",
            get(laborers::get_laborer).put(laborers::update_laborer).delete(laborers::delete_laborer),
        ),
        (
            "/labours/:id/attendance/",
            get(attendance::attendance_history).post(attendance::record_attendance),
        ),
        ("/attendance/", get(attendance::list_attendance)),
        (
            "/attendance/:id",
            get(attendance::get_attendance)
                .put(attendance::update_attendance)
                .delete(attendance::delete_attendance),
        ),
        ("/materials/", get(materials::list_materials).post(materials::create_material)),
        (
            "/materials/:id",
            get(materials::get_material).put(materials::update_material).delete(materials::delete_material),
        ),
        ("/sites/", get(sites::list_sites).post(sites::create_site)),
        ("/sites/:id", get(sites::get_site).put(sites::update_site).delete(sites::delete_site)),
        ("/payments/", get(payments::list_payments).post(payments::create_payment)),
        (
            "/payments/:id",
            get(payments::get_payment).put(payments::update_payment).delete(payments::delete_payment),
        ),
    ];

    routes
        .into_iter()
        .fold(Router::new(), |router, (path, handler)| route_both(router, path, handler))
        .route("/", get(pages::login_page))
        .route("/static/*path", get(pages::static_file))
        .merge(gated)
        .layer(from_fn(middleware::cors))
        .layer(from_fn(middleware::request_tracing))
        .with_state(state)
}
