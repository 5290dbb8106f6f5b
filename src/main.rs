use std::io;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::web::{Data, PayloadConfig};
use actix_web::{App, HttpServer};
use dotenv::dotenv;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use services::db_utils::AppState;
use settings::Settings;

mod error;
mod schema;
mod services;
mod settings;
mod types;
#[cfg(test)]
mod test;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).init();
}

fn build_cors(settings: &Settings) -> Cors {
    match &settings.allowed_origin {
        Some(origin) => Cors::default()
            .allowed_origin(origin)
            .allow_any_method()
            .allow_any_header()
            .max_age(60 * 60),
        None => Cors::permissive(),
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    init_tracing();

    let settings = Settings::load().map_err(|err| {
        error!("Configuration rejected: {err}");
        io::Error::new(io::ErrorKind::InvalidInput, err)
    })?;

    let address = (settings.host.clone(), settings.port);
    let state = Data::new(AppState::new(settings).map_err(|err| {
        error!("Redis client rejected its uri: {err}");
        io::Error::new(io::ErrorKind::InvalidInput, err)
    })?);

    info!("Starting server on {}:{}", address.0, address.1);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(build_cors(&state.settings))
            .app_data(state.clone())
            .app_data(PayloadConfig::new(state.settings.max_image_bytes))
            .configure(services::configure)
    })
    .bind(address)?
    .run()
    .await?;

    info!("Server shut down");

    Ok(())
}
