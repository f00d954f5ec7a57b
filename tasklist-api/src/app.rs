/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use tasklist_api::{app::{build_router, AppState}, config::Config};
/// use tasklist_shared::auth::clock::SystemClock;
/// use tasklist_shared::store::{PgAccountDirectory, PgTodoStore};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(
///     config,
///     Arc::new(PgAccountDirectory::new(pool.clone())),
///     Arc::new(PgTodoStore::new(pool)),
///     Arc::new(SystemClock),
/// )?;
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, routes};
use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::{sync::Arc, time::Duration};
use tasklist_shared::{
    auth::{
        clock::Clock,
        jwt::{SessionTokens, SigningKey},
        middleware::{require_auth, Authorizer},
        password::CredentialHasher,
        service::AccountService,
    },
    store::{AccountDirectory, TodoStore},
};
use tower_http::{
    cors::CorsLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Read-only after startup and cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,

    pub authorizer: Authorizer,

    pub todos: Arc<dyn TodoStore>,

    pub directory: Arc<dyn AccountDirectory>,

    pub config: Arc<Config>,
}

impl AppState {
    /// Wires the auth components from `config` over the given stores
    ///
    /// # Errors
    ///
    /// Returns an error if `config` fails validation or the signing secret
    /// is unusable
    pub fn new(
        config: Config,
        directory: Arc<dyn AccountDirectory>,
        todos: Arc<dyn TodoStore>,
        clock: Arc<dyn Clock>,
    ) -> anyhow::Result<Self> {
        config.validate()?;

        let key = SigningKey::new(config.jwt.secret.clone())?;
        let tokens = SessionTokens::new(key, config.jwt_validity(), clock);
        let hasher = CredentialHasher::new(config.hashing_policy());

        Ok(Self {
            accounts: AccountService::new(directory.clone(), hasher, tokens.clone()),
            authorizer: Authorizer::new(tokens, directory.clone()),
            todos,
            directory,
            config: Arc::new(config),
        })
    }
}

/// Builds the complete Axum router
///
/// ```text
/// /
/// ├── GET /health               # public
/// └── /v1/
///     ├── POST /sign_up         # public
///     ├── POST /sign_in         # public
///     └── /todos                # bearer token required
///         ├── GET    /          # ?all=true includes done todos
///         ├── POST   /
///         ├── GET    /:id
///         ├── PUT    /:id
///         └── DELETE /:id
/// ```
pub fn build_router(state: AppState) -> Router {
    let todo_routes = Router::new()
        .route("/", get(routes::todos::list_todos).post(routes::todos::create_todo))
        .route(
            "/:id",
            get(routes::todos::get_todo)
                .put(routes::todos::update_todo)
                .delete(routes::todos::delete_todo),
        )
        .route_layer(middleware::from_fn_with_state(
            state.authorizer.clone(),
            require_auth,
        ));

    let v1_routes = Router::new()
        .route("/sign_up", post(routes::auth::sign_up))
        .route("/sign_in", post(routes::auth::sign_in))
        .nest("/todos", todo_routes);

    let cors = cors_layer(&state.config.api.cors_origins);
    let timeout = Duration::from_secs(state.config.api.request_timeout_secs);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/v1", v1_routes)
        .layer(TimeoutLayer::new(timeout))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600))
}
