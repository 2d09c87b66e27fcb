#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::todo)]
#![warn(clippy::panic)]
#![warn(clippy::dbg_macro)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(unreachable_pub)]
#![warn(missing_debug_implementations)]
#![warn(unused_qualifications)]
#![deny(unused_must_use)]

use affinity_server::api::{AppState, MgmtState};
use affinity_server::config::Config;
use affinity_server::services::account_service::AccountService;
use affinity_server::services::chat_service::ChatService;
use affinity_server::services::gateway::GatewayService;
use affinity_server::services::health_service::HealthService;
use affinity_server::services::match_service::MatchService;
use affinity_server::services::presence::PresenceRegistry;
use affinity_server::services::rooms::RoomRelay;
use affinity_server::storage::match_repo::MatchRepository;
use affinity_server::storage::message_repo::MessageRepository;
use affinity_server::storage::user_repo::UserRepository;
use affinity_server::{storage, telemetry};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::Instrument;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load();
    telemetry::init_telemetry(&config.telemetry)?;

    let boot_span = tracing::info_span!("boot_server");
    let (api_listener, mgmt_listener, app_router, mgmt_app, shutdown_rx) = async {
        // Phase 1: Infrastructure Setup (Resources)
        let pool = storage::init_pool(&config.database_url).await?;
        storage::run_migrations(&pool).await?;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        affinity_server::spawn_signal_handler(shutdown_tx);

        // Phase 2: Component Wiring (Pure logic, no side effects)
        let user_repo = UserRepository::new(pool.clone());
        let match_repo = MatchRepository::new(pool.clone());
        let message_repo = MessageRepository::new(pool.clone());

        let presence = Arc::new(PresenceRegistry::new());
        let relay = Arc::new(RoomRelay::new());

        let account_service = AccountService::new(config.auth.clone(), user_repo.clone());
        let match_service =
            MatchService::new(config.matching.clone(), user_repo, match_repo, Arc::clone(&presence));
        let chat_service = ChatService::new(relay, message_repo, match_service.clone());
        let gateway_service = GatewayService::new(
            account_service.clone(),
            match_service.clone(),
            chat_service.clone(),
            presence,
            config.websocket.clone(),
        );
        let health_service = HealthService::new(pool);

        // Phase 3: Runtime Setup (Listeners and Routers)
        let state = AppState {
            config: config.clone(),
            account_service,
            match_service,
            chat_service,
            gateway_service,
            shutdown_rx: shutdown_rx.clone(),
        };
        let app_router = affinity_server::api::app_router(state);
        let mgmt_app = affinity_server::api::mgmt_router(MgmtState { health_service });

        let api_addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
        let mgmt_addr: SocketAddr = format!("{}:{}", config.server.host, config.server.mgmt_port).parse()?;

        tracing::info!(address = %api_addr, "listening");
        tracing::info!(address = %mgmt_addr, "management server listening");

        let api_listener = tokio::net::TcpListener::bind(api_addr).await?;
        let mgmt_listener = tokio::net::TcpListener::bind(mgmt_addr).await?;

        Ok::<
            (tokio::net::TcpListener, tokio::net::TcpListener, axum::Router, axum::Router, watch::Receiver<bool>),
            anyhow::Error,
        >((api_listener, mgmt_listener, app_router, mgmt_app, shutdown_rx))
    }
    .instrument(boot_span)
    .await?;

    // Phase 4: Start Runtime (Explicit Spawning and Listening)
    let mut api_rx = shutdown_rx.clone();
    let api_server = axum::serve(api_listener, app_router.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(async move {
            let _ = api_rx.wait_for(|&s| s).await;
        });

    let mut mgmt_rx = shutdown_rx.clone();
    let mgmt_server = axum::serve(mgmt_listener, mgmt_app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(async move {
            let _ = mgmt_rx.wait_for(|&s| s).await;
        });

    // Phase 5: Graceful Shutdown Orchestration
    // Drain is bounded: once the shutdown watch flips, open connections get
    // shutdown_timeout_secs to finish before the process exits anyway.
    let mut drain_rx = shutdown_rx;
    tokio::select! {
        result = async { tokio::try_join!(api_server, mgmt_server) } => {
            if let Err(e) = result {
                tracing::error!(error = %e, "Server error");
            }
        }
        () = async {
            let _ = drain_rx.wait_for(|&s| s).await;
            tokio::time::sleep(std::time::Duration::from_secs(config.server.shutdown_timeout_secs)).await;
        } => {
            tracing::warn!("Timeout draining open connections; exiting.");
        }
    }

    Ok(())
}
