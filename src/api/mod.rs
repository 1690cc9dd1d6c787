pub mod analysis;
pub mod auth;
pub mod health;
pub mod swagger;

#[cfg(test)]
pub mod test_support;

use crate::middleware::AuthMiddleware;
use crate::utils::AppError;
use actix_web::web;

/// Body parsing failures surface as validation errors in the standard envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        AppError::Validation(format!("Invalid JSON body: {}", err)).into()
    })
}

/// Public route table, shared by `main` and the handler tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/health", web::get().to(health::health_check))
        .route("/create-account", web::post().to(auth::create_account))
        .route("/login", web::post().to(auth::login))
        .route("/get-url", web::post().to(analysis::get_url))
        .service(
            web::resource("/get-user")
                .wrap(AuthMiddleware)
                .route(web::get().to(auth::get_user)),
        );
}
