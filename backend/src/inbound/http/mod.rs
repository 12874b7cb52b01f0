//! HTTP inbound adapter exposing the REST endpoints.

pub mod envelope;
pub mod error;
pub mod health;
pub mod history;
pub mod segments;
pub mod state;
pub mod users;

use actix_web::web;

pub use error::ApiResult;

/// Register the `/api` scope with envelope-producing extractor errors.
///
/// Callers provide [`state::HttpState`] as app data.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
            .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
            .route("/ping", web::to(health::ping))
            .service(segments::create_segment)
            .service(segments::delete_segment)
            .service(users::get_user_segments)
            .service(users::change_user_segments)
            .service(history::get_history),
    );
}
