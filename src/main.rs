//! Cardwise API server.
//!
//! Loads configuration from the environment, connects to PostgreSQL, wires
//! the adapters into the axum router and serves until SIGINT or SIGTERM.

use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cardwise::adapters::auth::SupabaseSessionValidator;
use cardwise::adapters::http::{app_router, AppState, AppUrls};
use cardwise::adapters::postgres::{
    run_migrations, PostgresAnalyticsStore, PostgresCardRepository, PostgresSubscriptionRepository,
};
use cardwise::adapters::stripe::{StripeConfig, StripePaymentAdapter};
use cardwise::adapters::wallet::{FileSystemPassAssetStore, JwtGoogleWalletSigner, OpenSslPassSigner};
use cardwise::config::{AppConfig, ConfigError, ServerConfig, ValidationError, WalletConfig};
use cardwise::domain::wallet::WalletError;
use cardwise::ports::{GoogleWalletSigner, PassAssetStore, PassSigner};

/// Reasons the server fails to start.
#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid listen address: {0}")]
    Address(#[from] std::net::AddrParseError),

    #[error("Database unavailable: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migrations failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Wallet signing material: {0}")]
    Wallet(#[from] WalletError),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

type PassSupport = (
    Option<Arc<dyn PassSigner>>,
    Option<Arc<dyn PassAssetStore>>,
    Option<Arc<dyn GoogleWalletSigner>>,
);

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    info!(environment = ?config.server.environment, "starting cardwise");

    let pool = config
        .database
        .pool_options()
        .connect_with(config.database.connect_options()?)
        .await?;
    if config.database.run_migrations {
        info!("running database migrations");
        run_migrations(&pool).await?;
    }

    let (pass_signer, pass_assets, google_signer) = load_wallet(&config.wallet, &config.server)?;
    let analytics = Arc::new(PostgresAnalyticsStore::new(pool.clone()));

    let state = AppState {
        cards: Arc::new(PostgresCardRepository::new(pool.clone())),
        analytics_recorder: analytics.clone(),
        analytics_reader: analytics,
        subscriptions: Arc::new(PostgresSubscriptionRepository::new(pool.clone())),
        payment_provider: Arc::new(StripePaymentAdapter::new(StripeConfig::from_payment_config(
            &config.payment,
        ))),
        session_validator: Arc::new(SupabaseSessionValidator::from_config(&config.auth)),
        pass_signer,
        pass_assets,
        google_signer,
        urls: AppUrls::from_config(&config),
    };

    let app = app_router(state, &config.server);

    let address = config.server.socket_addr()?;
    let listener = TcpListener::bind(address).await?;
    info!(%address, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    info!("server stopped");
    Ok(())
}

/// `RUST_LOG` wins over `server.log_level`. JSON lines in production.
fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&server.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if server.is_production() {
        builder.json().init();
    } else {
        builder.pretty().init();
    }
}

/// Loads the configured wallet signers. Missing sections leave the
/// matching endpoint answering with a configuration error; unreadable
/// credentials stop startup.
fn load_wallet(wallet: &WalletConfig, server: &ServerConfig) -> Result<PassSupport, WalletError> {
    let (pass_signer, pass_assets) = match &wallet.apple {
        Some(apple) => {
            let signer: Arc<dyn PassSigner> = Arc::new(OpenSslPassSigner::from_config(apple)?);
            let assets: Arc<dyn PassAssetStore> = Arc::new(FileSystemPassAssetStore::new(apple.model_dir.clone()));
            (Some(signer), Some(assets))
        }
        None => {
            tracing::warn!("Apple Wallet not configured; pass downloads are disabled");
            (None, None)
        }
    };

    let google_signer = match &wallet.google {
        Some(google) => {
            let origins = vec![server.public_base_url().to_string()];
            let signer: Arc<dyn GoogleWalletSigner> = Arc::new(JwtGoogleWalletSigner::from_config(google, origins)?);
            Some(signer)
        }
        None => {
            tracing::warn!("Google Wallet not configured; save links are disabled");
            None
        }
    };

    Ok((pass_signer, pass_assets, google_signer))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
