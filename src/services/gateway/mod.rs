pub mod protocol;
pub(crate) mod session;

use crate::config::WsConfig;
use crate::services::account_service::AccountService;
use crate::services::chat_service::ChatService;
use crate::services::gateway::session::Session;
use crate::services::match_service::MatchService;
use crate::services::presence::PresenceRegistry;
use axum::extract::ws::WebSocket;
use std::sync::Arc;
use uuid::Uuid;

/// Owns the realtime side of the server: one [`Session`] per upgraded
/// WebSocket, coordinating presence, the match lifecycle and room fan-out.
#[derive(Clone, Debug)]
pub struct GatewayService {
    account_service: AccountService,
    match_service: MatchService,
    chat_service: ChatService,
    presence: Arc<PresenceRegistry>,
    config: WsConfig,
}

impl GatewayService {
    #[must_use]
    pub const fn new(
        account_service: AccountService,
        match_service: MatchService,
        chat_service: ChatService,
        presence: Arc<PresenceRegistry>,
        config: WsConfig,
    ) -> Self {
        Self { account_service, match_service, chat_service, presence, config }
    }

    pub async fn handle_socket(
        &self,
        socket: WebSocket,
        user_id: Uuid,
        request_id: String,
        shutdown_rx: tokio::sync::watch::Receiver<bool>,
    ) {
        // Connecting counts as activity; failing to record it is not worth
        // rejecting the connection over.
        if let Err(e) = self.account_service.touch_last_seen(user_id).await {
            tracing::warn!(error = %e, "Failed to update last-seen on connect");
        }

        let session = Session {
            user_id,
            conn_id: Uuid::new_v4(),
            request_id,
            socket,
            match_service: self.match_service.clone(),
            chat_service: self.chat_service.clone(),
            presence: Arc::clone(&self.presence),
            outbound_buffer_size: self.config.outbound_buffer_size,
            shutdown_rx,
        };

        session.run().await;
    }
}
