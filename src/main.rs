//! Salon booking service binary.
//!
//! Reads configuration from TOML file (~/.config/salon-booking/config.toml).

use std::sync::Arc;

use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use salon_booking::application::{
    BillingService, BookingLifecycle, FeeSchedule, NotificationOutbox, ReminderConfig,
    ReminderScheduler, ReservationCoordinator, ReservationPolicy,
};
use salon_booking::config::AppConfig;
use salon_booking::domain::catalog::{ServiceVariant, Stylist};
use salon_booking::domain::RepositoryProvider;
use salon_booking::infrastructure::database::migrator::Migrator;
use salon_booking::infrastructure::gateway::{PaymentGateway, SimulatedGateway};
use salon_booking::support::shutdown::ShutdownCoordinator;
use salon_booking::{
    create_api_router, create_event_bus, default_config_path, init_database, DatabaseConfig,
    SeaOrmRepositoryProvider,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("BOOKING_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            init_tracing(&cfg);
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            let cfg = AppConfig::default();
            init_tracing(&cfg);
            warn!("Failed to load config: {}. Using defaults.", e);
            cfg
        }
    };

    info!("Starting salon booking service...");

    // ── Prometheus metrics recorder (must be installed before any metrics calls) ──
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");
    info!("📊 Prometheus metrics recorder installed");

    // ── Database ───────────────────────────────────────────────
    let db_config = DatabaseConfig {
        url: app_cfg.database.connection_url(),
    };
    info!("Database: {}", db_config.url);

    let db = match init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }
    info!("Migrations completed");

    // ── Repositories & services ────────────────────────────────
    let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));

    seed_default_catalog(repos.as_ref()).await;

    // Real processor integrations implement PaymentGateway; the simulated
    // gateway keeps local and staging deployments self-contained.
    let gateway: Arc<dyn PaymentGateway> = Arc::new(SimulatedGateway::new());

    let event_bus = create_event_bus();
    info!("🔔 Event bus initialized for real-time notifications");

    let outbox = Arc::new(NotificationOutbox::new(repos.clone()));

    let coordinator = Arc::new(ReservationCoordinator::new(
        repos.clone(),
        gateway.clone(),
        outbox.clone(),
        event_bus.clone(),
        ReservationPolicy {
            deposit_minor: app_cfg.booking.deposit_minor,
            currency: app_cfg.booking.currency.clone(),
            refund_timeout_secs: app_cfg.booking.refund_timeout_secs,
        },
    ));

    let lifecycle = Arc::new(BookingLifecycle::new(
        repos.clone(),
        outbox.clone(),
        event_bus.clone(),
        app_cfg.booking.check_in_window_minutes,
    ));

    let billing = Arc::new(BillingService::new(
        repos.clone(),
        gateway.clone(),
        FeeSchedule {
            card_percent_bps: app_cfg.fees.card_percent_bps,
            card_fixed_minor: app_cfg.fees.card_fixed_minor,
        },
        app_cfg.booking.currency.clone(),
    ));

    // ── Shutdown coordinator ───────────────────────────────────
    let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
    let shutdown_signal = shutdown.signal();
    shutdown.start_signal_listener();

    // ── Reminder scheduler ─────────────────────────────────────
    let scheduler = ReminderScheduler::new(repos.clone(), outbox.clone(), event_bus.clone())
        .with_config(ReminderConfig {
            check_interval_secs: app_cfg.booking.reminder_interval_secs,
            lead_days: 1,
        });
    scheduler.start(shutdown_signal.clone());

    // ── REST API server ────────────────────────────────────────
    let api_router = create_api_router(
        repos,
        coordinator,
        lifecycle,
        billing,
        db.clone(),
        prometheus_handle,
    );

    let api_addr = format!("{}:{}", app_cfg.server.host, app_cfg.server.port);
    let listener = tokio::net::TcpListener::bind(&api_addr).await?;
    info!("REST API server listening on http://{}", api_addr);
    info!("Swagger UI available at http://{}/docs/", api_addr);

    let api_shutdown = shutdown_signal.clone();
    let api_server = axum::serve(listener, api_router).with_graceful_shutdown(async move {
        api_shutdown.wait().await;
        info!("🛑 REST API server received shutdown signal");
    });

    info!("🚀 Server started. Press Ctrl+C to shutdown gracefully.");

    if let Err(e) = api_server.await {
        error!("REST API server error: {}", e);
    }

    // ── Final cleanup ──────────────────────────────────────────
    info!("🧹 Performing final cleanup...");

    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    } else {
        info!("✅ Database connection closed");
    }

    info!("👋 Salon booking service shutdown complete");
    Ok(())
}

/// Seed a starter catalog if the database is empty, so a fresh install can
/// serve the booking flow immediately.
async fn seed_default_catalog(repos: &dyn RepositoryProvider) {
    let variants = match repos.catalog().list_service_variants().await {
        Ok(v) => v,
        Err(e) => {
            error!("Failed to inspect catalog: {}", e);
            return;
        }
    };

    if !variants.is_empty() {
        return;
    }

    info!("Seeding default catalog...");

    let defaults = [
        ServiceVariant::new("Knotless braids (medium)", "Braids", 18_000, 300),
        ServiceVariant::new("Box braids (small)", "Braids", 22_000, 360),
        ServiceVariant::new("Silk press", "Styling", 8_500, 120),
        ServiceVariant::new("Loc retwist", "Locs", 9_500, 150),
    ];
    for variant in defaults {
        if let Err(e) = repos.catalog().save_service_variant(variant).await {
            error!("Failed to seed service variant: {}", e);
        }
    }

    for stylist in [Stylist::new("Imani", 0), Stylist::new("Victoria", 2_500)] {
        if let Err(e) = repos.catalog().save_stylist(stylist).await {
            error!("Failed to seed stylist: {}", e);
        }
    }

    info!("Default catalog seeded");
}

/// Initialize tracing (logging) from the application config.
fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}
