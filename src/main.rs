use actix_web::{App, HttpServer, web};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{Layer, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod config;
mod db;
mod query;
mod shutdown;

use crate::api::{health::health_config, job::handlers::job_config, job::JobService, validation};
use crate::shutdown::ShutdownCoordinator;

#[derive(Parser, Debug)]
#[command(about = "Job application dashboard backend")]
struct Args {
    /// Override the bind address (host:port) from the environment
    #[arg(long)]
    bind: Option<String>,

    /// Run pending database migrations and exit
    #[arg(long)]
    migrate_only: bool,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    let config::Config {
        database_url,
        max_payload_size,
        max_db_connections,
        bind_addr,
        port,
        log_dir,
    } = config::Config::from_env().expect("Failed to load configuration");

    std::fs::create_dir_all(&log_dir).expect("Failed to create logs directory");

    // Console output plus daily-rotating info/error files under log_dir.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());

    let info_file = tracing_appender::rolling::daily(&log_dir, "info.log");
    let error_file = tracing_appender::rolling::daily(&log_dir, "error.log");

    let info_layer = tracing_subscriber::fmt::layer()
        .with_writer(info_file)
        .with_ansi(false)
        .with_filter(LevelFilter::INFO);

    let error_layer = tracing_subscriber::fmt::layer()
        .with_writer(error_file)
        .with_ansi(false)
        .with_filter(LevelFilter::ERROR);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(info_layer)
        .with(error_layer)
        .init();

    let pool = db::connection::get_connection(&database_url, max_db_connections)
        .await
        .expect("Failed to connect to database");

    info!("Starting job-dashboard application");
    info!("  - Max payload size: {} bytes", max_payload_size);
    info!("  - Max database connections: {}", max_db_connections);
    info!("Database connection pool established");

    db::migrations::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    if args.migrate_only {
        info!("Migrations applied, exiting (--migrate-only)");
        pool.close().await;
        return Ok(());
    }

    let bind_target = args
        .bind
        .unwrap_or_else(|| format!("{}:{}", bind_addr, port));

    let server_pool = pool.clone();

    let server = HttpServer::new(move || {
        let job_service = web::Data::new(JobService::new(server_pool.clone()));

        let payload_config = web::PayloadConfig::default().limit(max_payload_size);

        App::new()
            .app_data(web::Data::new(server_pool.clone())) // Share DB pool across workers
            .app_data(job_service)
            .app_data(payload_config)
            .app_data(validation::json_config())
            .configure(health_config)
            .configure(job_config)
    });

    info!("Server starting on http://{}", bind_target);

    let server = server.bind(bind_target)?.run();
    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    let coordinator = ShutdownCoordinator::new(server_handle, server_task, pool);
    coordinator.wait_for_shutdown().await
}
