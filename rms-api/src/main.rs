use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use dotenvy::dotenv;
use rms_api::config::AppConfig;
use rms_api::{configure_service, error, reconcile};
use rms_db::connection::create_connection_pool;
use rms_db::run_migrations;
use tracing::info;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = AppConfig::load()?;
    tracing_subscriber::fmt()
        .with_env_filter(config.log_level.as_str())
        .init();

    let pool = create_connection_pool(&config.database_url);
    run_migrations(&pool);
    info!("connected to database, migrations applied");

    reconcile::spawn_sweeper(pool.clone());

    let bind_addr = config.bind_addr.clone();
    info!(%bind_addr, "starting rms api");

    let pool = web::Data::new(pool);
    let config = web::Data::new(config);

    HttpServer::new(move || {
        App::new()
            .app_data(pool.clone())
            .app_data(config.clone())
            .app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
            .wrap(Cors::permissive())
            .configure(configure_service)
    })
    .bind(&bind_addr)?
    .run()
    .await?;

    Ok(())
}
