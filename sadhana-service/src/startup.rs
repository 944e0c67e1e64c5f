use crate::config::SadhanaConfig;
use crate::handlers;
use crate::middleware::{auth_middleware, require_admin, require_counselor, require_counselor_or_admin};
use crate::services::{AuthService, JwtService, Stores};
use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::security_headers::security_headers_middleware;
use service_core::middleware::tracing::request_id_middleware;
use std::future::IntoFuture;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[derive(Clone)]
pub struct AppState {
    pub config: SadhanaConfig,
    pub stores: Stores,
    pub jwt: JwtService,
    pub auth: AuthService,
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
}

impl Application {
    /// Wire the router around the given stores and bind a listener. Stores
    /// are injected so tests can run against `MemoryStore` while `main`
    /// passes the Mongo-backed pair.
    pub async fn build(config: SadhanaConfig, stores: Stores) -> Result<Self, AppError> {
        let jwt = JwtService::new(&config.jwt);
        let auth = AuthService::new(stores.users.clone(), jwt.clone());

        let state = AppState {
            config: config.clone(),
            stores,
            jwt,
            auth,
        };

        let app = build_router(state.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app);

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

fn build_router(state: AppState) -> Router {
    // Every route group layers its gates innermost-last: with
    // `.layer(role).layer(auth)` the auth middleware runs first and the
    // role gate reads the claims it attached.
    let authed_routes = Router::new()
        .route("/sadhana", post(handlers::reports::submit_report))
        .route("/sadhana/my", get(handlers::reports::my_reports))
        .route("/sadhana/user/:user_id", get(handlers::reports::user_reports))
        .route("/users", get(handlers::users::list_users))
        .layer(from_fn_with_state(state.clone(), auth_middleware));

    let staff_routes = Router::new()
        .route("/auth/create-user", post(handlers::auth::create_user))
        .layer(from_fn(require_counselor_or_admin))
        .layer(from_fn_with_state(state.clone(), auth_middleware));

    let counselor_routes = Router::new()
        .route("/sadhana/my-users", get(handlers::reports::roster_reports))
        .layer(from_fn(require_counselor))
        .layer(from_fn_with_state(state.clone(), auth_middleware));

    let admin_routes = Router::new()
        .route("/auth/counselors", get(handlers::auth::list_counselors))
        .route("/users/:user_id", delete(handlers::users::delete_user))
        .route("/sadhana/all", get(handlers::reports::all_reports))
        .layer(from_fn(require_admin))
        .layer(from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .merge(authed_routes)
        .merge(staff_routes)
        .merge(counselor_routes)
        .merge(admin_routes)
        .with_state(state)
        .layer(from_fn(security_headers_middleware))
        .layer(CorsLayer::permissive())
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
}
