//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, borrow, fines, health, readers};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Libris API",
        version = "1.0.0",
        description = "Library management REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api", description = "API")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        // Catalog
        books::list_books,
        books::get_book,
        books::create_book,
        books::list_publishers,
        books::list_categories,
        // Readers
        readers::list_readers,
        readers::get_reader,
        readers::create_reader,
        readers::update_reader,
        readers::delete_reader,
        readers::get_reader_borrows,
        // Borrow ledger
        borrow::create_borrow,
        borrow::return_book,
        borrow::get_borrow,
        // Fine ledger
        fines::get_reader_fines,
        fines::pay_fine,
        fines::assess_fines,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::AdminInfo,
            // Catalog
            crate::models::book::BookSummary,
            crate::models::book::CreateBook,
            crate::models::book::Publisher,
            crate::models::book::Category,
            // Readers
            crate::models::reader::Reader,
            crate::models::reader::CreateReader,
            crate::models::reader::UpdateReader,
            crate::models::reader::Pagination,
            crate::models::reader::ReaderPage,
            // Borrow ledger
            crate::models::borrow::BorrowRecord,
            crate::models::borrow::BorrowStatus,
            crate::models::borrow::CreateBorrow,
            borrow::BorrowResponse,
            borrow::ReturnResponse,
            // Fine ledger
            crate::models::fine::FineDetails,
            crate::models::fine::FinePayment,
            fines::PayFineResponse,
            fines::AssessResponse,
            // Common
            health::HealthResponse,
            super::MessageResponse,
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Administrator sessions"),
        (name = "books", description = "Catalog"),
        (name = "readers", description = "Reader directory"),
        (name = "borrow", description = "Borrow ledger"),
        (name = "fines", description = "Fine ledger")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
