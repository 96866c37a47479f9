use async_trait::async_trait;
use proof_exchange::messages::AriesMessage;

use crate::error::AgentResult;

/// Outbound delivery of protocol messages. `connection_id` is `None` for connectionless
/// exchanges.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn send_message(
        &self,
        message: AriesMessage,
        connection_id: Option<String>,
    ) -> AgentResult<()>;
}
