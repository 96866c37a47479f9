use std::sync::Mutex;

use anoncreds_types::data_types::{
    pres_request::PresentationRequest, presentation::Presentation,
};
use aries_vcx_anoncreds::{
    anoncreds::base_anoncreds::{
        CredentialDefinitionsMap, RevocationRegistriesMap, RevocationRegistryDefinitionsMap,
        SchemasMap, ZkpVerifier,
    },
    errors::error::{VcxAnoncredsError, VcxAnoncredsResult},
};
use async_trait::async_trait;

#[derive(Debug, Clone)]
enum Verdict {
    Accept,
    Reject,
    Fail(String),
}

/// Stand-in for the cryptographic check with a fixed verdict. Remembers what it was asked.
#[derive(Debug)]
pub struct MockZkpVerifier {
    verdict: Verdict,
    requests: Mutex<Vec<PresentationRequest>>,
}

impl MockZkpVerifier {
    fn new(verdict: Verdict) -> Self {
        Self {
            verdict,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn accepting() -> Self {
        Self::new(Verdict::Accept)
    }

    pub fn rejecting() -> Self {
        Self::new(Verdict::Reject)
    }

    pub fn failing(msg: &str) -> Self {
        Self::new(Verdict::Fail(msg.to_owned()))
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|requests| requests.len()).unwrap_or(0)
    }

    /// Proof request as it reached the last `verify` call.
    pub fn last_request(&self) -> Option<PresentationRequest> {
        self.requests
            .lock()
            .ok()
            .and_then(|requests| requests.last().cloned())
    }
}

#[async_trait]
impl ZkpVerifier for MockZkpVerifier {
    async fn verify(
        &self,
        presentation_request: &PresentationRequest,
        _presentation: &Presentation,
        _schemas: &SchemasMap,
        _credential_defs: &CredentialDefinitionsMap,
        _rev_reg_defs: &RevocationRegistryDefinitionsMap,
        _rev_regs: &RevocationRegistriesMap,
    ) -> VcxAnoncredsResult<bool> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(presentation_request.clone());
        }
        match &self.verdict {
            Verdict::Accept => Ok(true),
            Verdict::Reject => Ok(false),
            Verdict::Fail(msg) => Err(VcxAnoncredsError::ProofRejected(msg.clone())),
        }
    }
}
