pub mod prover;
pub mod verifier;

use std::sync::Arc;

use proof_exchange::{
    aries_vcx_anoncreds::anoncreds::base_anoncreds::{BaseHolder, ZkpVerifier},
    aries_vcx_ledger::ledger::base_ledger::AnoncredsLedgerRead,
    handlers::util::thread_id_of,
    messages::{msg_fields::protocols::report_problem::ProblemReport, AriesMessage},
    protocols::{
        common::build_problem_report_msg,
        proof_presentation::{
            exchange_record::ExchangeRecord,
            state::{ExchangeState, Role},
        },
    },
};
use tokio::sync::OwnedMutexGuard;

use crate::{
    config::ExchangeConfig,
    error::*,
    responder::Responder,
    storage::in_memory::{Keyed, Lookup, ObjectCache},
};

/// Problem report code sent when an exchange is given up.
pub const ABANDONED_CODE: &str = "abandoned";

fn ensure_role(record: &ExchangeRecord, role: Role) -> AgentResult<()> {
    if record.role() != role {
        return Err(AgentError::from_msg(
            AgentErrorKind::InvalidState,
            &format!("Exchange {} is not kept by a {}", record.id(), role),
        ));
    }
    Ok(())
}

/// Checked before expensive work, the transition itself checks again.
fn ensure_can_move(record: &ExchangeRecord, next: ExchangeState) -> AgentResult<()> {
    if !record.state().can_transition(record.role(), next) {
        return Err(AgentError::from_msg(
            AgentErrorKind::InvalidState,
            &format!(
                "Exchange {} in state {} cannot move to {}",
                record.id(),
                record.state(),
                next
            ),
        ));
    }
    Ok(())
}

/// Result of correlating a first message of a thread with the stored exchanges.
enum Correlated {
    Existing(String),
    Created(ExchangeRecord),
}

fn shared_thread_error(thread_id: &str, count: usize) -> AgentError {
    AgentError::from_msg(
        AgentErrorKind::InvalidState,
        &format!("Thread {} is shared by {} exchanges", thread_id, count),
    )
}

/// Drives presentation exchanges for both roles and owns every record mutation.
///
/// Each operation takes the record's lock for its whole read-modify-write and works on a
/// copy, so a failing operation leaves the stored record untouched.
pub struct ExchangeManager<L, H, V> {
    ledger_read: Arc<L>,
    holder: Arc<H>,
    verifier: Arc<V>,
    responder: Option<Arc<dyn Responder>>,
    config: ExchangeConfig,
    records: ObjectCache<ExchangeRecord>,
}

impl<L, H, V> ExchangeManager<L, H, V>
where
    L: AnoncredsLedgerRead,
    H: BaseHolder,
    V: ZkpVerifier,
{
    pub fn new(
        ledger_read: Arc<L>,
        holder: Arc<H>,
        verifier: Arc<V>,
        config: ExchangeConfig,
    ) -> Self {
        Self {
            ledger_read,
            holder,
            verifier,
            responder: None,
            config,
            records: ObjectCache::new("presentation-exchanges"),
        }
    }

    pub fn with_responder(mut self, responder: Arc<dyn Responder>) -> Self {
        self.responder = Some(responder);
        self
    }

    pub fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    fn new_record_defaults(&self, mut record: ExchangeRecord) -> ExchangeRecord {
        record.auto_present = self.config.auto_present;
        record.auto_verify = self.config.auto_verify;
        record.auto_remove = self.config.auto_remove;
        record
    }

    fn insert_record(&self, record: ExchangeRecord) -> AgentResult<ExchangeRecord> {
        let record = self.new_record_defaults(record);
        self.records.insert(record.id(), record.clone())?;
        Ok(record)
    }

    /// Finds the exchange `record` would continue or stores `record` as a new one. Both happen
    /// under one store lock, so concurrent first messages of a thread create one exchange.
    fn correlate_or_insert(&self, record: ExchangeRecord) -> AgentResult<Correlated> {
        let record = self.new_record_defaults(record);
        let key = record.key();
        let lookup = self.records.find_or_insert(
            |stored| stored.matches(&key.thread_id, Some(key.role), key.connection_id.as_deref()),
            record.id(),
            record.clone(),
        )?;
        match lookup {
            Lookup::Inserted(_) => Ok(Correlated::Created(record)),
            Lookup::Found(mut ids) => match ids.pop() {
                Some(id) if ids.is_empty() => Ok(Correlated::Existing(id)),
                _ => Err(shared_thread_error(&key.thread_id, ids.len() + 1)),
            },
        }
    }

    /// Writes `updated` back under `guard`. Terminal records of `auto_remove` exchanges are
    /// dropped from storage instead.
    fn commit(
        &self,
        guard: &mut OwnedMutexGuard<ExchangeRecord>,
        updated: ExchangeRecord,
    ) -> AgentResult<ExchangeRecord> {
        **guard = updated.clone();
        if updated.auto_remove && updated.is_terminal() {
            debug!(
                "Removing exchange {} finished in state {}",
                updated.id(),
                updated.state()
            );
            self.records.remove(updated.id())?;
        }
        Ok(updated)
    }

    async fn send(&self, record: &ExchangeRecord, message: AriesMessage) -> AgentResult<()> {
        match &self.responder {
            Some(responder) => {
                responder
                    .send_message(message, record.connection_id().map(ToOwned::to_owned))
                    .await
            }
            None => {
                warn!(
                    "No responder configured, {} of exchange {} was not sent",
                    message.msg_type(),
                    record.id()
                );
                Ok(())
            }
        }
    }

    fn find_record_id(
        &self,
        thread_id: &str,
        role: Option<Role>,
        connection_id: Option<&str>,
    ) -> AgentResult<Option<String>> {
        let mut ids = self
            .records
            .find_by(|key| key.matches(thread_id, role, connection_id))?;
        if ids.len() > 1 {
            return Err(shared_thread_error(thread_id, ids.len()));
        }
        Ok(ids.pop())
    }

    fn require_record_id(
        &self,
        thread_id: &str,
        role: Option<Role>,
        connection_id: Option<&str>,
    ) -> AgentResult<String> {
        self.find_record_id(thread_id, role, connection_id)?
            .ok_or_else(|| {
                AgentError::from_msg(
                    AgentErrorKind::NotFound,
                    &format!("No exchange found for thread {}", thread_id),
                )
            })
    }

    pub async fn get_record(&self, record_id: &str) -> AgentResult<ExchangeRecord> {
        self.records.get_cloned(record_id).await
    }

    pub async fn find_by_thread(
        &self,
        thread_id: &str,
        role: Role,
        connection_id: Option<&str>,
    ) -> AgentResult<Option<ExchangeRecord>> {
        match self.find_record_id(thread_id, Some(role), connection_id)? {
            Some(id) => self.records.get_cloned(&id).await.map(Some),
            None => Ok(None),
        }
    }

    pub async fn list_records(&self) -> AgentResult<Vec<ExchangeRecord>> {
        let mut records = self.records.values_cloned().await?;
        records.sort_by_key(|record| record.created_at());
        Ok(records)
    }

    pub fn delete_record(&self, record_id: &str) -> AgentResult<()> {
        self.records.remove(record_id)
    }

    /// Abandons the exchange on the peer's problem report, keeping its text as the error.
    pub async fn receive_problem_report(
        &self,
        connection_id: Option<&str>,
        report: ProblemReport,
    ) -> AgentResult<ExchangeRecord> {
        let thread_id = thread_id_of(&report.clone().into());
        trace!("receive_problem_report >>> thread_id: {}", thread_id);
        let record_id = self.require_record_id(&thread_id, None, connection_id)?;

        let mut guard = self.records.lock(&record_id).await?;
        let mut record = guard.clone();
        let description = &report.content.description;
        record.abandon(description.en.clone().unwrap_or_else(|| description.code.clone()))?;
        self.commit(&mut guard, record)
    }

    /// Abandons the exchange and tells the peer why.
    pub async fn send_problem_report(
        &self,
        record_id: &str,
        description: &str,
    ) -> AgentResult<ExchangeRecord> {
        self.abandon_and_report(record_id, ABANDONED_CODE, description)
            .await
    }

    /// Abandons the exchange without notifying the peer.
    pub async fn abandon_exchange(
        &self,
        record_id: &str,
        reason: &str,
    ) -> AgentResult<ExchangeRecord> {
        let mut guard = self.records.lock(record_id).await?;
        let mut record = guard.clone();
        record.abandon(reason)?;
        self.commit(&mut guard, record)
    }

    async fn abandon_and_report(
        &self,
        record_id: &str,
        code: &str,
        description: &str,
    ) -> AgentResult<ExchangeRecord> {
        let mut guard = self.records.lock(record_id).await?;
        let mut record = guard.clone();
        record.abandon(description)?;
        let record = self.commit(&mut guard, record)?;

        let report = build_problem_report_msg(code, Some(description), record.thread_id());
        self.send(&record, report.into()).await?;
        Ok(record)
    }
}
