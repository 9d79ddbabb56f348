use dotenvy::dotenv;
use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub access_token_ttl: usize,

    /// Max number of concurrently approved leave-takers per department.
    pub dept_max_on_leave: i64,

    /// Root directory of the attachment store.
    pub upload_dir: String,

    /// Optional webhook to deliver decision notifications to.
    /// Unset means notifications are disabled.
    pub notify_webhook_url: Option<String>,

    /// Optional initial HR account, created at startup if missing.
    pub bootstrap_admin_username: Option<String>,
    pub bootstrap_admin_password: Option<String>,

    pub api_prefix: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://leave.db?mode=rwc".to_string()),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            access_token_ttl: env::var("ACCESS_TOKEN_TTL")
                .unwrap_or_else(|_| "900".to_string()) // default 15 min
                .parse()
                .expect("ACCESS_TOKEN_TTL must be a number"),

            dept_max_on_leave: env::var("DEPT_MAX_ON_LEAVE")
                .unwrap_or_else(|_| "2".to_string())
                .parse()
                .expect("DEPT_MAX_ON_LEAVE must be a number"),

            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()),

            notify_webhook_url: env::var("NOTIFY_WEBHOOK_URL").ok(),

            bootstrap_admin_username: env::var("BOOTSTRAP_ADMIN_USERNAME").ok(),
            bootstrap_admin_password: env::var("BOOTSTRAP_ADMIN_PASSWORD").ok(),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api/v1".to_string()),
        }
    }
}
