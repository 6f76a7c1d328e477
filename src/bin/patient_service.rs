use actix_cors::Cors;
use actix_web::{web, App, HttpServer};

use hospital_api::config::Config;
use hospital_api::{db, handlers};

const DEFAULT_PORT: u16 = 3000;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env(DEFAULT_PORT);
    hospital_api::init_tracing(&config.log_filter);

    let pool = db::build_pool(&config)?;
    db::ensure_schema(&pool, db::PATIENTS_DDL)?;
    tracing::info!(
        addr = %config.bind_addr,
        port = config.port,
        "patient service listening"
    );

    let bind = (config.bind_addr.clone(), config.port);
    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config.clone()))
            .app_data(handlers::json_config())
            .configure(handlers::patient_routes)
    })
    .bind(bind)?
    .run()
    .await?;
    Ok(())
}
