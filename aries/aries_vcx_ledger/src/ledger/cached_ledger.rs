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

use super::{base_ledger::AnoncredsLedgerRead, response_cacher::ResponseCacher};
use crate::errors::error::VcxLedgerResult;

/// Serves schemas, credential definitions and registry definitions from `cacher` once they
/// were read. Deltas and entries depend on time and always go to the ledger.
#[derive(Debug)]
pub struct CachedLedgerRead<T, C> {
    inner: T,
    cacher: C,
}

impl<T, C> CachedLedgerRead<T, C>
where
    T: AnoncredsLedgerRead,
    C: ResponseCacher,
{
    pub fn new(inner: T, cacher: C) -> Self {
        Self { inner, cacher }
    }
}

fn cache_key(kind: &str, id: &str) -> String {
    format!("{kind}:{id}")
}

#[async_trait]
impl<T, C> AnoncredsLedgerRead for CachedLedgerRead<T, C>
where
    T: AnoncredsLedgerRead,
    C: ResponseCacher + std::fmt::Debug,
{
    async fn get_schema(&self, schema_id: &SchemaId) -> VcxLedgerResult<Schema> {
        let key = cache_key("schema", &schema_id.0);
        if let Some(schema) = self.cacher.get(&key).await? {
            return Ok(schema);
        }
        let schema = self.inner.get_schema(schema_id).await?;
        self.cacher.put(key, &schema).await?;
        Ok(schema)
    }

    async fn get_cred_def(
        &self,
        cred_def_id: &CredentialDefinitionId,
    ) -> VcxLedgerResult<CredentialDefinition> {
        let key = cache_key("cred_def", &cred_def_id.0);
        if let Some(cred_def) = self.cacher.get(&key).await? {
            return Ok(cred_def);
        }
        let cred_def = self.inner.get_cred_def(cred_def_id).await?;
        self.cacher.put(key, &cred_def).await?;
        Ok(cred_def)
    }

    async fn get_rev_reg_def_json(
        &self,
        rev_reg_id: &RevocationRegistryDefinitionId,
    ) -> VcxLedgerResult<(
        RevocationRegistryDefinition,
        RevocationRegistryDefinitionMetadata,
    )> {
        let key = cache_key("rev_reg_def", &rev_reg_id.0);
        if let Some(rev_reg_def) = self.cacher.get(&key).await? {
            return Ok(rev_reg_def);
        }
        let rev_reg_def = self.inner.get_rev_reg_def_json(rev_reg_id).await?;
        self.cacher.put(key, &rev_reg_def).await?;
        Ok(rev_reg_def)
    }

    async fn get_rev_reg_delta_json(
        &self,
        rev_reg_id: &RevocationRegistryDefinitionId,
        from: Option<u64>,
        to: Option<u64>,
    ) -> VcxLedgerResult<(RevocationRegistryDelta, u64)> {
        self.inner.get_rev_reg_delta_json(rev_reg_id, from, to).await
    }

    async fn get_rev_reg(
        &self,
        rev_reg_id: &RevocationRegistryDefinitionId,
        timestamp: u64,
    ) -> VcxLedgerResult<(RevocationRegistry, u64)> {
        self.inner.get_rev_reg(rev_reg_id, timestamp).await
    }
}
