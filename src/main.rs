use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use anyhow::Context;
use dotenvy::dotenv;
use sqlx::SqlitePool;
use std::sync::Arc;

use leavetrack::auth::password::hash_password;
use leavetrack::config::Config;
use leavetrack::db::init_db;
use leavetrack::docs::ApiDoc;
use leavetrack::model::role::Role;
use leavetrack::routes;
use leavetrack::service::attachment::AttachmentStore;
use leavetrack::service::notify::{self, Notifier};
use leavetrack::store;

use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Leave tracker is running"
}

/// Seed the initial HR account from env, if configured and missing.
async fn bootstrap_admin(pool: &SqlitePool, config: &Config) -> anyhow::Result<()> {
    let (Some(username), Some(password)) = (
        config.bootstrap_admin_username.as_deref(),
        config.bootstrap_admin_password.as_deref(),
    ) else {
        return Ok(());
    };

    if store::users::get_by_username(pool, username).await?.is_some() {
        return Ok(());
    }

    let hashed = hash_password(password)
        .map_err(|e| anyhow::anyhow!("failed to hash bootstrap password: {e}"))?;
    let id = store::users::create(pool, username, username, Role::Hr, "HR", None, &hashed).await?;
    info!(user_id = id, username, "bootstrap admin created");

    Ok(())
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env();

    // Rolling daily log
    let file_appender = rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let pool = init_db(&config.database_url)
        .await
        .context("Failed to initialize database")?;

    bootstrap_admin(&pool, &config).await?;

    let notifier: Arc<dyn Notifier> = notify::from_config(&config);
    let attachments = AttachmentStore::new(&config.upload_dir);

    let server_addr = config.server_addr.clone();
    let config_data = config.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(pool.clone()))
            .app_data(Data::new(config.clone()))
            .app_data(Data::new(notifier.clone()))
            .app_data(Data::new(attachments.clone()))
            .service(index)
            .configure(|cfg| routes::configure(cfg, config_data.clone()))
    })
    .bind(server_addr)?
    .run()
    .await?;

    Ok(())
}
