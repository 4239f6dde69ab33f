use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use madaris_api::{
    config::Config,
    db,
    middleware::auth::JwtSecret,
    routes,
    services::uploads::{Uploader, MAX_IMAGE_BYTES},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(Config::from_env()?);

    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;
    info!("Database connected and migrations applied");

    let seeded = db::seed::seed_if_empty(&pool).await?;
    if seeded > 0 {
        info!(schools = seeded, "loaded sample directory data");
    }

    let uploads_dir = config.uploads_dir.clone();
    std::fs::create_dir_all(&uploads_dir)?;

    let state = AppState {
        db: pool,
        config: config.clone(),
        uploader: Arc::new(Uploader::new(&config)),
    };

    // Browser clients come from the configured frontend origin; localhost is
    // always allowed for local development.
    let cors_origin = {
        let frontend = config.frontend_url.clone();
        AllowOrigin::predicate(move |origin: &HeaderValue, _| {
            let o = match origin.to_str() {
                Ok(s) => s,
                Err(_) => return false,
            };
            if o.starts_with("http://localhost") || o.starts_with("http://127.0.0.1") {
                return true;
            }
            o == frontend
        })
    };

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(AllowHeaders::list([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ]))
        .allow_origin(cors_origin);

    let jwt_secret = JwtSecret(config.jwt_secret.clone());

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        // Auth
        .route("/api/auth/register", post(routes::auth::register))
        .route("/api/auth/login", post(routes::auth::login))
        .route("/api/auth/me", get(routes::auth::me))
        // Public directory
        .route(
            "/api/schools",
            get(routes::schools::list_schools).post(routes::schools::create_school),
        )
        .route("/api/search", get(routes::schools::search_schools))
        .route(
            "/api/schools/{id}",
            get(routes::schools::get_school)
                .put(routes::schools::update_school)
                .delete(routes::schools::delete_school),
        )
        .route(
            "/api/schools/{id}/administration",
            get(routes::people::get_administration),
        )
        .route(
            "/api/schools/{id}/testimonials",
            post(routes::testimonials::add_testimonial),
        )
        // School-scoped management
        .route("/api/schools/{id}/users", get(routes::users::list_school_users))
        .route("/api/schools/{id}/gallery", post(routes::gallery::add_gallery_item))
        .route(
            "/api/schools/{id}/gallery/{item_id}",
            delete(routes::gallery::delete_gallery_item),
        )
        .route(
            "/api/schools/{id}/leadership",
            post(routes::leadership::add_leadership_member),
        )
        .route(
            "/api/schools/{id}/leadership/{member_id}",
            put(routes::leadership::update_leadership_member)
                .delete(routes::leadership::delete_leadership_member),
        )
        .route(
            "/api/schools/{id}/people",
            get(routes::people::list_people).post(routes::people::add_person),
        )
        .route(
            "/api/schools/{id}/people/{person_id}",
            put(routes::people::update_person).delete(routes::people::delete_person),
        )
        // Superadmin
        .route(
            "/api/superadmin/create-admin",
            post(routes::superadmin::create_admin),
        )
        .route("/api/superadmin/users", get(routes::superadmin::list_users))
        .route(
            "/api/superadmin/users/{id}",
            put(routes::superadmin::update_user).delete(routes::superadmin::deactivate_user),
        )
        // Locally stored images
        .nest_service("/data/uploads", ServeDir::new(uploads_dir))
        .layer(axum::Extension(jwt_secret))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES + 1024 * 1024))
        .with_state(state);

    let addr = format!("{}:{}", config.host, config.port);
    info!("madaris API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
