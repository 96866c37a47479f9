use std::sync::atomic::{AtomicUsize, Ordering};

use anoncreds_types::data_types::{
    identifiers::{
        cred_def_id::CredentialDefinitionId, rev_reg_def_id::RevocationRegistryDefinitionId,
        schema_id::SchemaId,
    },
    ledger::{
        cred_def::CredentialDefinition,
        rev_reg::RevocationRegistry,
        rev_reg_def::{RevocationRegistryDefinition, RevocationRegistryDefinitionMetadata},
        rev_reg_delta::RevocationRegistryDelta,
        schema::Schema,
    },
};
use aries_vcx_ledger::{
    errors::error::{VcxLedgerError, VcxLedgerResult},
    ledger::base_ledger::AnoncredsLedgerRead,
};
use async_trait::async_trait;

use super::{cred_def, rev_reg, rev_reg_def, rev_reg_delta, schema};
use crate::constants::{
    CRED_DEF_ID, REV_CRED_DEF_ID, REV_REG_DELTA_TIMESTAMP, REV_REG_ID, SCHEMA_ID,
};

/// Ledger publishing one schema, a plain and a revocable credential definition and the
/// registry of the latter. Counts the registry reads it serves.
#[derive(Debug, Default)]
pub struct MockLedger {
    revoked: Vec<u32>,
    delta_fetches: AtomicUsize,
    rev_reg_def_fetches: AtomicUsize,
    rev_reg_fetches: AtomicUsize,
}

impl MockLedger {
    /// Marks credential index `cred_rev_id` revoked in every delta served.
    pub fn with_revoked(mut self, cred_rev_id: u32) -> Self {
        self.revoked.push(cred_rev_id);
        self
    }

    pub fn delta_fetch_count(&self) -> usize {
        self.delta_fetches.load(Ordering::SeqCst)
    }

    pub fn rev_reg_def_fetch_count(&self) -> usize {
        self.rev_reg_def_fetches.load(Ordering::SeqCst)
    }

    pub fn rev_reg_fetch_count(&self) -> usize {
        self.rev_reg_fetches.load(Ordering::SeqCst)
    }

    fn check_registry(rev_reg_id: &RevocationRegistryDefinitionId) -> VcxLedgerResult<()> {
        if rev_reg_id.0 == REV_REG_ID {
            Ok(())
        } else {
            Err(VcxLedgerError::LedgerItemNotFound)
        }
    }
}

#[async_trait]
impl AnoncredsLedgerRead for MockLedger {
    async fn get_schema(&self, schema_id: &SchemaId) -> VcxLedgerResult<Schema> {
        match schema_id.0.as_str() {
            SCHEMA_ID => Ok(schema()),
            _ => Err(VcxLedgerError::LedgerItemNotFound),
        }
    }

    async fn get_cred_def(
        &self,
        cred_def_id: &CredentialDefinitionId,
    ) -> VcxLedgerResult<CredentialDefinition> {
        match cred_def_id.0.as_str() {
            CRED_DEF_ID | REV_CRED_DEF_ID => Ok(cred_def(&cred_def_id.0)),
            _ => Err(VcxLedgerError::LedgerItemNotFound),
        }
    }

    async fn get_rev_reg_def_json(
        &self,
        rev_reg_id: &RevocationRegistryDefinitionId,
    ) -> VcxLedgerResult<(
        RevocationRegistryDefinition,
        RevocationRegistryDefinitionMetadata,
    )> {
        Self::check_registry(rev_reg_id)?;
        self.rev_reg_def_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(rev_reg_def())
    }

    /// Resolves to the latest update, [REV_REG_DELTA_TIMESTAMP], unless the requested
    /// interval ends earlier.
    async fn get_rev_reg_delta_json(
        &self,
        rev_reg_id: &RevocationRegistryDefinitionId,
        _from: Option<u64>,
        to: Option<u64>,
    ) -> VcxLedgerResult<(RevocationRegistryDelta, u64)> {
        Self::check_registry(rev_reg_id)?;
        self.delta_fetches.fetch_add(1, Ordering::SeqCst);
        let timestamp = to.map_or(REV_REG_DELTA_TIMESTAMP, |to| {
            REV_REG_DELTA_TIMESTAMP.min(to.saturating_sub(1))
        });
        Ok((rev_reg_delta(&self.revoked), timestamp))
    }

    async fn get_rev_reg(
        &self,
        rev_reg_id: &RevocationRegistryDefinitionId,
        timestamp: u64,
    ) -> VcxLedgerResult<(RevocationRegistry, u64)> {
        Self::check_registry(rev_reg_id)?;
        self.rev_reg_fetches.fetch_add(1, Ordering::SeqCst);
        Ok((rev_reg(), timestamp))
    }
}
