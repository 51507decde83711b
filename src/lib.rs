pub mod application;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod identity;
pub mod infrastructure;
pub mod schema;

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::catalog_service::CatalogService;
use application::order_service::OrderService;
use application::prescription_service::PrescriptionService;
use application::user_service::UserService;
use infrastructure::audit::DieselAuditLog;
use infrastructure::catalog_repo::DieselCatalogRepository;
use infrastructure::order_repo::DieselOrderRepository;
use infrastructure::prescription_repo::DieselPrescriptionRepository;
use infrastructure::user_repo::DieselUserRepository;

pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) {
    let mut conn = pool.get().expect("Failed to get DB connection for migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run database migrations");
}

pub type AppOrderService =
    OrderService<DieselCatalogRepository, DieselPrescriptionRepository, DieselOrderRepository>;
pub type AppCatalogService = CatalogService<DieselCatalogRepository, DieselAuditLog>;
pub type AppPrescriptionService =
    PrescriptionService<DieselPrescriptionRepository, DieselCatalogRepository, DieselAuditLog>;
pub type AppUserService = UserService<DieselUserRepository, DieselAuditLog>;

/// Wired services shared across workers. Each service owns its repositories;
/// repositories only hold a pool handle, so construction is cheap.
#[derive(Clone)]
pub struct AppState {
    pub orders: Arc<AppOrderService>,
    pub catalog: Arc<AppCatalogService>,
    pub prescriptions: Arc<AppPrescriptionService>,
    pub users: Arc<AppUserService>,
}

pub fn build_state(pool: DbPool) -> AppState {
    AppState {
        orders: Arc::new(OrderService::new(
            DieselCatalogRepository::new(pool.clone()),
            DieselPrescriptionRepository::new(pool.clone()),
            DieselOrderRepository::new(pool.clone()),
        )),
        catalog: Arc::new(CatalogService::new(
            DieselCatalogRepository::new(pool.clone()),
            DieselAuditLog::new(pool.clone()),
        )),
        prescriptions: Arc::new(PrescriptionService::new(
            DieselPrescriptionRepository::new(pool.clone()),
            DieselCatalogRepository::new(pool.clone()),
            DieselAuditLog::new(pool.clone()),
        )),
        users: Arc::new(UserService::new(
            DieselUserRepository::new(pool.clone()),
            DieselAuditLog::new(pool),
        )),
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::orders::create_order,
        handlers::orders::get_order,
        handlers::orders::list_orders,
        handlers::orders::my_orders,
        handlers::products::create_product,
        handlers::products::update_product,
        handlers::products::delete_product,
        handlers::products::get_product,
        handlers::products::list_products,
        handlers::categories::create_category,
        handlers::categories::update_category,
        handlers::categories::delete_category,
        handlers::categories::get_category,
        handlers::categories::list_categories,
        handlers::prescriptions::create_prescription,
        handlers::prescriptions::my_prescriptions,
        handlers::prescriptions::list_prescriptions,
        handlers::prescriptions::approve_prescription,
        handlers::prescriptions::reject_prescription,
        handlers::users::create_user,
        handlers::users::get_user,
        handlers::users::list_users,
    ),
    components(schemas(
        handlers::orders::OrderItemRequest,
        handlers::orders::CreateOrderRequest,
        handlers::orders::OrderItemResponse,
        handlers::orders::OrderResponse,
        handlers::orders::ListOrdersResponse,
        handlers::products::VariantRequest,
        handlers::products::CreateProductRequest,
        handlers::products::UpdateProductRequest,
        handlers::products::VariantResponse,
        handlers::products::ProductResponse,
        handlers::products::ListProductsResponse,
        handlers::categories::CreateCategoryRequest,
        handlers::categories::UpdateCategoryRequest,
        handlers::categories::CategoryResponse,
        handlers::categories::CategoryDetailResponse,
        handlers::prescriptions::CreatePrescriptionRequest,
        handlers::prescriptions::PrescriptionResponse,
        handlers::prescriptions::MyPrescriptionResponse,
        handlers::prescriptions::PrescriptionDetailResponse,
        handlers::prescriptions::ListPrescriptionsResponse,
        handlers::users::CreateUserRequest,
        handlers::users::UserResponse,
        handlers::users::ListUsersResponse,
    ))
)]
struct ApiDoc;

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    pool: DbPool,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let state = build_state(pool);
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
            .route("/health", web::get().to(handlers::health))
            .service(
                web::scope("/orders")
                    .route("", web::post().to(handlers::orders::create_order))
                    .route("", web::get().to(handlers::orders::list_orders))
                    .route("/mine", web::get().to(handlers::orders::my_orders))
                    .route("/{id}", web::get().to(handlers::orders::get_order)),
            )
            .service(
                web::scope("/products")
                    .route("", web::post().to(handlers::products::create_product))
                    .route("", web::get().to(handlers::products::list_products))
                    .route("/{id}", web::get().to(handlers::products::get_product))
                    .route("/{id}", web::patch().to(handlers::products::update_product))
                    .route("/{id}", web::delete().to(handlers::products::delete_product)),
            )
            .service(
                web::scope("/categories")
                    .route("", web::post().to(handlers::categories::create_category))
                    .route("", web::get().to(handlers::categories::list_categories))
                    .route("/{id}", web::get().to(handlers::categories::get_category))
                    .route("/{id}", web::patch().to(handlers::categories::update_category))
                    .route(
                        "/{id}",
                        web::delete().to(handlers::categories::delete_category),
                    ),
            )
            .service(
                web::scope("/prescriptions")
                    .route("", web::post().to(handlers::prescriptions::create_prescription))
                    .route("", web::get().to(handlers::prescriptions::list_prescriptions))
                    .route("/mine", web::get().to(handlers::prescriptions::my_prescriptions))
                    .route(
                        "/{id}/approve",
                        web::post().to(handlers::prescriptions::approve_prescription),
                    )
                    .route(
                        "/{id}/reject",
                        web::post().to(handlers::prescriptions::reject_prescription),
                    ),
            )
            .service(
                web::scope("/users")
                    .route("", web::post().to(handlers::users::create_user))
                    .route("", web::get().to(handlers::users::list_users))
                    .route("/{id}", web::get().to(handlers::users::get_user)),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
