//! A central place to register App routes.
use actix_service::ServiceFactory;
use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    web, App, Error,
};

use super::state::{App as AppState, Global as _};
use super::{article, batch, calendar, expand};

#[expect(
    clippy::literal_string_with_formatting_args,
    reason = "Actix Web resource path uses `{param}` syntax which is not formatting but route pattern matching"
)]
/// Central place to register all the App routing.
///
/// The article tab lives under `/article/{article_id}/_plugin/{slug}/`, every
/// other page under `/{slug}/`.
#[tracing::instrument(skip(app, state))]
pub fn register_app<
    U: MessageBody,
    V: ServiceFactory<
        ServiceRequest,
        Response = ServiceResponse<U>,
        Config = (),
        InitError = (),
        Error = Error,
    >,
>(
    app: App<V>,
    state: &AppState,
) -> App<V> {
    let slug = state.config().milestones.slug.clone();
    tracing::debug!(%slug, "Registering milestone routes");
    app.app_data(web::Data::new(state.clone()))
        .service(
            web::scope(&format!("/article/{{article_id}}/_plugin/{slug}"))
                .service(
                    web::resource("/")
                        .route(web::get().to(article::list))
                        .route(web::post().to(article::create)),
                )
                .service(
                    web::resource("/edit/{pk}/")
                        .route(web::get().to(article::edit_form))
                        .route(web::post().to(article::edit)),
                ),
        )
        .service(
            web::scope(&format!("/{slug}"))
                .service(
                    web::resource("/batch/")
                        .route(web::get().to(batch::list))
                        .route(web::post().to(batch::update)),
                )
                .service(web::resource("/calendar/").route(web::get().to(calendar::page)))
                .service(web::resource("/calendar/json/").route(web::get().to(calendar::events)))
                .service(web::resource("/expand/").route(web::post().to(expand::expand))),
        )
}
