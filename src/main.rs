//! pos-live server.
//!
//! Wiring order: config → telemetry → stores → station router → bus →
//! subscriber manager → handlers → axum.

use std::sync::Arc;

use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;

use pos_live::adapters::events::InMemoryEventBus;
use pos_live::adapters::http::{build_app, ApiState, AuthState, CatalogHandlers, HealthState, OrderHandlers};
use pos_live::adapters::memory::{InMemoryCatalogStore, InMemoryOrderStore};
use pos_live::adapters::postgres::{PostgresCatalogStore, PostgresOrderStore};
use pos_live::adapters::realtime::{QueueSettings, RealtimeState, SubscriberManager, TransportSettings};
use pos_live::adapters::auth::TokenScopeResolver;
use pos_live::application::handlers::catalog::{
    AssignProductHandler, CreateProductHandler, CreateProductTypeHandler, CreateStationHandler,
    DiscontinueProductHandler, ListProductsHandler, ListStationsHandler, RemoveProductHandler,
    UpdateProductHandler,
};
use pos_live::application::handlers::{OrderLocks, ProductLocks};
use pos_live::application::handlers::order::{
    AnnounceOrderHandler, CancelOrderHandler, CreateOrderHandler, GetOrderHandler,
    MarkFulfilledHandler,
};
use pos_live::config::{AppConfig, AuthConfig, DatabaseConfig};
use pos_live::domain::foundation::UserId;
use pos_live::domain::routing::{AssignmentIndex, StationRouter};
use pos_live::domain::staff::User;
use pos_live::ports::{CatalogStore, EventPublisher, EventSubscriber, OrderStore};
use pos_live::telemetry;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    config.validate()?;
    telemetry::init(&config.server);

    tracing::info!(
        environment = ?config.server.environment,
        "starting pos-live"
    );

    let (catalog, orders) = open_stores(&config.database).await?;

    // Routing index is rebuilt from the store once, then kept current by the
    // assignment handlers.
    let stations = catalog.list_stations().await?;
    let router = Arc::new(StationRouter::new(AssignmentIndex::from_stations(&stations)));
    tracing::info!(stations = stations.len(), "station routing loaded");

    let bus = Arc::new(InMemoryEventBus::new(router.clone()));
    let publisher: Arc<dyn EventPublisher> = bus.clone();
    let subscriber: Arc<dyn EventSubscriber> = bus.clone();

    let realtime_config = &config.realtime;
    let manager = Arc::new(SubscriberManager::new(
        subscriber,
        QueueSettings::new(
            realtime_config.queue_capacity,
            realtime_config.stall_threshold(),
        ),
    ));

    let order_locks = OrderLocks::new();
    let product_locks = ProductLocks::new();

    let catalog_handlers = CatalogHandlers {
        create_product: Arc::new(CreateProductHandler::new(catalog.clone(), publisher.clone())),
        update_product: Arc::new(UpdateProductHandler::new(
            catalog.clone(),
            publisher.clone(),
            product_locks.clone(),
        )),
        discontinue_product: Arc::new(DiscontinueProductHandler::new(
            catalog.clone(),
            publisher.clone(),
            product_locks.clone(),
        )),
        list_products: Arc::new(ListProductsHandler::new(catalog.clone())),
        create_product_type: Arc::new(CreateProductTypeHandler::new(catalog.clone())),
        create_station: Arc::new(CreateStationHandler::new(catalog.clone())),
        list_stations: Arc::new(ListStationsHandler::new(catalog.clone())),
        assign_product: Arc::new(AssignProductHandler::new(catalog.clone(), router.clone())),
        remove_product: Arc::new(RemoveProductHandler::new(catalog.clone(), router.clone())),
    };

    let order_handlers = OrderHandlers {
        create: Arc::new(CreateOrderHandler::new(
            catalog.clone(),
            orders.clone(),
            publisher.clone(),
            product_locks,
        )),
        get: Arc::new(GetOrderHandler::new(orders.clone())),
        mark_fulfilled: Arc::new(MarkFulfilledHandler::new(
            orders.clone(),
            publisher.clone(),
            order_locks.clone(),
        )),
        cancel: Arc::new(CancelOrderHandler::new(
            orders.clone(),
            publisher.clone(),
            order_locks.clone(),
        )),
    };

    let realtime = RealtimeState::new(
        manager.clone(),
        Arc::new(AnnounceOrderHandler::new(
            orders.clone(),
            publisher.clone(),
            router.clone(),
            order_locks,
        )),
        TransportSettings {
            keep_alive: realtime_config.keep_alive(),
            push_timeout: realtime_config.push_timeout(),
        },
    );

    let state = ApiState {
        auth: scope_resolver(&config.auth)?,
        catalog: catalog_handlers,
        orders: order_handlers,
        realtime,
        health: HealthState {
            bus: bus.clone(),
            manager: manager.clone(),
        },
    };

    let app = build_app(state, config.server.request_timeout());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(manager))
        .await?;

    tracing::info!(last_sequence = bus.last_sequence(), "shut down");
    Ok(())
}

async fn open_stores(
    database: &DatabaseConfig,
) -> Result<(Arc<dyn CatalogStore>, Arc<dyn OrderStore>), BoxError> {
    let Some(url) = database.url.as_deref().filter(|u| !u.is_empty()) else {
        tracing::warn!("no database configured; using in-memory stores");
        return Ok((
            Arc::new(InMemoryCatalogStore::new()),
            Arc::new(InMemoryOrderStore::new()),
        ));
    };

    let pool = PgPoolOptions::new()
        .min_connections(database.min_connections)
        .max_connections(database.max_connections)
        .acquire_timeout(database.acquire_timeout())
        .connect(url)
        .await?;

    if database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("database migrations applied");
    }

    Ok((
        Arc::new(PostgresCatalogStore::new(pool.clone())),
        Arc::new(PostgresOrderStore::new(pool)),
    ))
}

fn scope_resolver(auth: &AuthConfig) -> Result<AuthState, BoxError> {
    let resolver = TokenScopeResolver::new(auth.admin_token.clone());
    for (n, staff) in auth.staff_tokens()?.into_iter().enumerate() {
        let id = n as i64 + 1;
        resolver.add_user(
            staff.token.expose_secret().as_str(),
            User::new(UserId::new(id), format!("staff-{}", id), staff.station_id),
        );
    }
    if auth.admin_token.is_none() {
        tracing::warn!("no admin token configured; catalog edits are disabled");
    }
    Ok(Arc::new(resolver))
}

/// Resolves on Ctrl-C after closing every subscriber queue, so open event
/// streams end and graceful shutdown does not wait on connected devices.
async fn shutdown_signal(manager: Arc<SubscriberManager>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
    manager.close_all();
}
