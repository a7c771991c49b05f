//! Errors

use salvo::http::StatusError;
use tracing::error;

use elysian_app::domain::catalog::CatalogServiceError;

pub(crate) fn into_status_error(error: CatalogServiceError) -> StatusError {
    match error {
        CatalogServiceError::ProductNotFound => {
            StatusError::not_found().brief("Product not found or unavailable")
        }
        CatalogServiceError::VariantNotFound => StatusError::not_found().brief("Variant not found"),
        CatalogServiceError::Sql(source) => {
            error!("catalog storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
