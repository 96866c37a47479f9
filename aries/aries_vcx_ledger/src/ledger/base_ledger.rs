use std::fmt::Debug;

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
use async_trait::async_trait;

use crate::errors::error::VcxLedgerResult;

/// Read access to the anoncreds objects published on a ledger.
#[async_trait]
pub trait AnoncredsLedgerRead: Debug + Send + Sync {
    async fn get_schema(&self, schema_id: &SchemaId) -> VcxLedgerResult<Schema>;

    async fn get_cred_def(
        &self,
        cred_def_id: &CredentialDefinitionId,
    ) -> VcxLedgerResult<CredentialDefinition>;

    async fn get_rev_reg_def_json(
        &self,
        rev_reg_id: &RevocationRegistryDefinitionId,
    ) -> VcxLedgerResult<(
        RevocationRegistryDefinition,
        RevocationRegistryDefinitionMetadata,
    )>;

    /// Accumulator delta over `[from, to]` together with the ledger time it resolved to.
    async fn get_rev_reg_delta_json(
        &self,
        rev_reg_id: &RevocationRegistryDefinitionId,
        from: Option<u64>,
        to: Option<u64>,
    ) -> VcxLedgerResult<(RevocationRegistryDelta, u64)>;

    /// Accumulator entry in force at `timestamp` together with the ledger time it resolved to.
    async fn get_rev_reg(
        &self,
        rev_reg_id: &RevocationRegistryDefinitionId,
        timestamp: u64,
    ) -> VcxLedgerResult<(RevocationRegistry, u64)>;
}
