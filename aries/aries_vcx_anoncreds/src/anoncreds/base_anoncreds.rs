use std::{collections::HashMap, path::Path};

use anoncreds_types::data_types::{
    credential::{
        CredentialInfo, CredentialRevocationState, RequestedCredentials, RevocationStatesMap,
    },
    identifiers::{
        cred_def_id::CredentialDefinitionId, rev_reg_def_id::RevocationRegistryDefinitionId,
        schema_id::SchemaId,
    },
    ledger::{
        cred_def::CredentialDefinition, rev_reg::RevocationRegistry,
        rev_reg_def::RevocationRegistryDefinition, rev_reg_delta::RevocationRegistryDelta,
        schema::Schema,
    },
    messages::cred_selection::RetrievedCredentialForReferent,
    pres_request::PresentationRequest,
    presentation::Presentation,
};
use async_trait::async_trait;

use crate::errors::error::VcxAnoncredsResult;

pub type CredentialId = String;
pub type SchemasMap = HashMap<SchemaId, Schema>;
pub type CredentialDefinitionsMap = HashMap<CredentialDefinitionId, CredentialDefinition>;
pub type RevocationRegistryDefinitionsMap =
    HashMap<RevocationRegistryDefinitionId, RevocationRegistryDefinition>;
pub type RevocationRegistriesMap =
    HashMap<RevocationRegistryDefinitionId, HashMap<u64, RevocationRegistry>>;

/// Prover side wallet operations needed to answer a proof request. Input and output types
/// follow the indy Anoncreds API:
/// see: <https://github.com/hyperledger/indy-sdk/blob/main/libindy/src/api/anoncreds.rs>
#[async_trait]
pub trait BaseHolder: std::fmt::Debug + Send + Sync {
    /// Wallet credentials matching the restrictions of the given `referents`, paged by
    /// `start`/`count`.
    async fn get_credentials_for_presentation_request_by_referent(
        &self,
        presentation_request: &PresentationRequest,
        referents: &[&str],
        start: usize,
        count: usize,
    ) -> VcxAnoncredsResult<Vec<RetrievedCredentialForReferent>>;

    async fn get_credential(&self, cred_id: &str) -> VcxAnoncredsResult<CredentialInfo>;

    async fn create_presentation(
        &self,
        presentation_request: &PresentationRequest,
        requested_credentials: &RequestedCredentials,
        schemas: &SchemasMap,
        credential_defs: &CredentialDefinitionsMap,
        revocation_states: Option<&RevocationStatesMap>,
    ) -> VcxAnoncredsResult<Presentation>;

    /// Builds the accumulator witness of credential `cred_rev_id` against `rev_reg_delta`.
    /// Fails when the credential is revoked in the delta.
    async fn create_revocation_state(
        &self,
        cred_rev_id: u32,
        rev_reg_def: &RevocationRegistryDefinition,
        rev_reg_delta: &RevocationRegistryDelta,
        timestamp: u64,
        tails_path: &Path,
    ) -> VcxAnoncredsResult<CredentialRevocationState>;
}

/// Zero-knowledge verification primitive.
#[async_trait]
pub trait ZkpVerifier: std::fmt::Debug + Send + Sync {
    async fn verify(
        &self,
        presentation_request: &PresentationRequest,
        presentation: &Presentation,
        schemas: &SchemasMap,
        credential_defs: &CredentialDefinitionsMap,
        rev_reg_defs: &RevocationRegistryDefinitionsMap,
        rev_regs: &RevocationRegistriesMap,
    ) -> VcxAnoncredsResult<bool>;
}
