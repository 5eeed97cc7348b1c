//! Serve the milestone pages.
#![allow(
    clippy::exit,
    clippy::unused_async,
    clippy::infinite_loop,
    clippy::module_name_repetitions
)]
use crate::db;
use crate::server::api::state::App as AppState;
use crate::utils::config::Config;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::{App, Error, HttpServer};
use tracing_actix_web::TracingLogger;

use std::{io, process};

use actix_http::body::MessageBody;
use actix_service::ServiceFactory;

use super::tracing::MilestonesRootSpanBuilder;
use crate::server::api::routes;

/// Serve the milestone pages until the server is stopped.
///
/// # Errors
/// Errors if the server cannot bind to the configured address.
#[actix_web::main]
pub async fn serve_milestones(config: Config) -> io::Result<()> {
    let bind = config.server.bind.clone();
    let port = config.server.port;
    tracing::info!("Running Milestones Server on http://{bind}:{port}.");

    let db = match db::init::connect(&config.database).await {
        Ok(db) => db,
        Err(err) => {
            tracing::error!(
                "error: could not connect to database. Confirm that DATABASE_URL env var or `database.url` is set correctly."
            );
            tracing::error!("Error: {:?}", err);
            process::exit(1);
        }
    };

    let state = AppState::new(db, config).unwrap_or_else(|err| {
        tracing::error!("Unable to compile templates.");
        tracing::error!("Error: {:?}", err);
        process::exit(1);
    });

    HttpServer::new(move || {
        init_app(&state).wrap(TracingLogger::<MilestonesRootSpanBuilder>::new())
    })
    .bind((bind.as_str(), port))?
    .run()
    .await
}

/// Initialize the application and all possible routing at start-up time.
///
/// # Arguments
/// * `state` - The application state
pub fn init_app(
    state: &AppState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Response = ServiceResponse<impl MessageBody>,
        Config = (),
        InitError = (),
        Error = Error,
    >,
> {
    routes::register_app(App::new(), state)
}
