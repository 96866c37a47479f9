pub mod in_memory;

use proof_exchange::protocols::proof_presentation::{
    exchange_record::ExchangeRecord, state::Role,
};

use self::in_memory::Keyed;

/// Correlation data of an exchange record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExchangeKey {
    pub thread_id: String,
    pub role: Role,
    pub connection_id: Option<String>,
}

impl ExchangeKey {
    /// Matches `thread_id` and the connection exactly, and `role` when given. A connectionless
    /// message only finds connectionless exchanges.
    pub fn matches(
        &self,
        thread_id: &str,
        role: Option<Role>,
        connection_id: Option<&str>,
    ) -> bool {
        self.thread_id == thread_id
            && role.map_or(true, |role| role == self.role)
            && self.connection_id.as_deref() == connection_id
    }
}

impl Keyed for ExchangeRecord {
    type Key = ExchangeKey;

    fn key(&self) -> ExchangeKey {
        ExchangeKey {
            thread_id: self.thread_id().to_owned(),
            role: self.role(),
            connection_id: self.connection_id().map(ToOwned::to_owned),
        }
    }
}
