use axum::Router;

pub mod records;
pub mod uploads;

pub fn create_router() -> Router {
    tracing::debug!("Creating application router");
    Router::new()
        .merge(records::router())
        .merge(uploads::router())
}
