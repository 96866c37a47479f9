use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::errors::error::VcxLedgerResult;

pub mod in_memory;

/// Storage for ledger responses that never change once written.
#[async_trait]
pub trait ResponseCacher: Send + Sync {
    async fn put<S, T>(&self, id: S, obj: &T) -> VcxLedgerResult<()>
    where
        S: ToString + Send,
        T: Serialize + Sync;

    async fn get<S, T>(&self, id: S) -> VcxLedgerResult<Option<T>>
    where
        S: ToString + Send,
        T: DeserializeOwned + Send;
}
