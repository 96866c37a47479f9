pub mod pre_verification;
pub mod verifier_internal;

use std::{collections::HashMap, fmt, str::FromStr};

use anoncreds_types::data_types::{
    identifiers::rev_reg_def_id::RevocationRegistryDefinitionId,
    ledger::rev_reg_def::RevocationRegistryDefinitionMetadata, pres_request::PresentationRequest,
    presentation::Presentation,
};
use aries_vcx_anoncreds::anoncreds::base_anoncreds::{
    CredentialDefinitionsMap, RevocationRegistriesMap, RevocationRegistryDefinitionsMap,
    SchemasMap, ZkpVerifier,
};
use messages::msg_fields::protocols::present_proof::v1::propose::PresentationPreview;
use serde::{de::Error as DeError, Deserialize, Deserializer, Serialize, Serializer};
use typed_builder::TypedBuilder;

use self::pre_verification::{check_timestamps, pre_verify, reconcile_intervals};
use crate::{errors::error::prelude::*, handlers::util::preview_has_attr_spec};

/// Accepted distance of a presented timestamp into the future.
pub const DEFAULT_CLOCK_SKEW_SECS: u64 = 300;

/// Diagnostic attached to a verification result. Rendered as `CODE` or `CODE::detail`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VerificationMessage {
    /// `RMV_RFNT_NRI`: interval dropped from a referent backed by an irrevocable credential.
    RemovedReferentInterval(String),
    /// `RMV_GLB_NRI`: request level interval dropped, nothing presented is revocable.
    RemovedGlobalInterval,
    /// `TS_OUT_NRI`: timestamp outside the interval requested for the referent.
    TimestampOutOfInterval(String),
    /// `UNRVL_ATTR`: attribute proven without disclosing its value.
    UnrevealedAttribute(String),
    /// `VALUE_ERROR`: presentation rejected before the cryptographic check.
    ValueError(String),
    /// `VERIFY_ERROR`: the cryptographic check itself failed.
    VerifyError(String),
}

impl VerificationMessage {
    pub fn code(&self) -> &'static str {
        match self {
            Self::RemovedReferentInterval(_) => "RMV_RFNT_NRI",
            Self::RemovedGlobalInterval => "RMV_GLB_NRI",
            Self::TimestampOutOfInterval(_) => "TS_OUT_NRI",
            Self::UnrevealedAttribute(_) => "UNRVL_ATTR",
            Self::ValueError(_) => "VALUE_ERROR",
            Self::VerifyError(_) => "VERIFY_ERROR",
        }
    }

    fn detail(&self) -> Option<&str> {
        match self {
            Self::RemovedGlobalInterval => None,
            Self::RemovedReferentInterval(detail)
            | Self::TimestampOutOfInterval(detail)
            | Self::UnrevealedAttribute(detail)
            | Self::ValueError(detail)
            | Self::VerifyError(detail) => Some(detail),
        }
    }
}

impl fmt::Display for VerificationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.detail() {
            Some(detail) => write!(f, "{}::{}", self.code(), detail),
            None => f.write_str(self.code()),
        }
    }
}

impl FromStr for VerificationMessage {
    type Err = AriesVcxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (code, detail) = match s.split_once("::") {
            Some((code, detail)) => (code, detail.to_owned()),
            None => (s, String::new()),
        };
        Ok(match code {
            "RMV_RFNT_NRI" => Self::RemovedReferentInterval(detail),
            "RMV_GLB_NRI" => Self::RemovedGlobalInterval,
            "TS_OUT_NRI" => Self::TimestampOutOfInterval(detail),
            "UNRVL_ATTR" => Self::UnrevealedAttribute(detail),
            "VALUE_ERROR" => Self::ValueError(detail),
            "VERIFY_ERROR" => Self::VerifyError(detail),
            _ => {
                return Err(AriesVcxError::from_msg(
                    AriesVcxErrorKind::InvalidJson,
                    format!("Unknown verification message code: {}", code),
                ))
            }
        })
    }
}

impl Serialize for VerificationMessage {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VerificationMessage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(|err: AriesVcxError| D::Error::custom(err.msg()))
    }
}

/// Ledger objects a presentation is checked against.
#[derive(Clone, Debug, Default, TypedBuilder)]
pub struct VerificationInputs {
    #[builder(default)]
    pub schemas: SchemasMap,
    #[builder(default)]
    pub cred_defs: CredentialDefinitionsMap,
    #[builder(default)]
    pub rev_reg_defs: RevocationRegistryDefinitionsMap,
    /// Ledger bookkeeping of each entry in `rev_reg_defs`, carrying its creation time.
    #[builder(default)]
    pub rev_reg_defs_metadata:
        HashMap<RevocationRegistryDefinitionId, RevocationRegistryDefinitionMetadata>,
    #[builder(default)]
    pub rev_regs: RevocationRegistriesMap,
    /// Reference time of the checks, seconds since the unix epoch.
    #[builder(default = crate::utils::now_secs())]
    pub now: u64,
    #[builder(default = DEFAULT_CLOCK_SKEW_SECS)]
    pub clock_skew_secs: u64,
}

/// Outcome of a completed verification. A negative outcome is not an error.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationOutcome {
    pub verified: bool,
    pub messages: Vec<VerificationMessage>,
}

/// Checks `presentation` against `proof_req` and then asks `verifier` for the cryptographic
/// verdict.
///
/// Interval reconciliation only produces diagnostics. Timestamp and structural violations
/// are returned as errors and the cryptographic check is not reached. A failing
/// cryptographic check yields `verified = false` with a `VERIFY_ERROR` diagnostic.
pub async fn verify_presentation(
    verifier: &impl ZkpVerifier,
    proof_req: &PresentationRequest,
    presentation: &Presentation,
    inputs: &VerificationInputs,
) -> VcxResult<VerificationOutcome> {
    trace!(
        "verify_presentation >>> proof_req: {:?}, presentation: {:?}",
        proof_req,
        presentation
    );
    let mut proof_req = proof_req.clone();

    let mut messages = reconcile_intervals(&mut proof_req, presentation, &inputs.cred_defs)?;
    let checked = check_timestamps(&proof_req, presentation, inputs)
        .and_then(|timestamp_msgs| {
            messages.extend(timestamp_msgs);
            pre_verify(&proof_req, presentation)
        })
        .map(|structure_msgs| messages.extend(structure_msgs));
    if let Err(err) = checked {
        warn!("verify_presentation <<< presentation rejected: {}", err.msg());
        return Err(err);
    }

    let verified = match verifier
        .verify(
            &proof_req,
            presentation,
            &inputs.schemas,
            &inputs.cred_defs,
            &inputs.rev_reg_defs,
            &inputs.rev_regs,
        )
        .await
    {
        Ok(verified) => verified,
        Err(err) => {
            warn!("verify_presentation <<< cryptographic verification failed: {}", err);
            messages.push(VerificationMessage::VerifyError(err.to_string()));
            false
        }
    };

    if !messages.is_empty() {
        info!(
            "verify_presentation <<< verified: {}, diagnostics: {}",
            verified,
            messages
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    Ok(VerificationOutcome { verified, messages })
}

/// Makes sure every disclosed value of `presentation` was announced in `preview`, matching
/// credential definition, attribute name and raw value.
pub fn check_presentation_against_preview(
    proof_req: &PresentationRequest,
    presentation: &Presentation,
    preview: &PresentationPreview,
) -> VcxResult<()> {
    let requested_proof = &presentation.requested_proof;
    let cred_def_of = |referent: &str, sub_proof_index: u32| {
        presentation
            .identifier(sub_proof_index)
            .map(|identifier| &identifier.cred_def_id)
            .ok_or_else(|| {
                AriesVcxError::from_msg(
                    AriesVcxErrorKind::MalformedInput,
                    format!(
                        "Referent {} points at missing sub-proof #{}",
                        referent, sub_proof_index
                    ),
                )
            })
    };
    let mismatch = |name: &str, value: &str| {
        AriesVcxError::from_msg(
            AriesVcxErrorKind::TamperDetected,
            format!("Presentation {}={} mismatches proposal value", name, value),
        )
    };

    for (referent, attr_spec) in &requested_proof.revealed_attrs {
        let name = proof_req
            .requested_attributes
            .get(referent)
            .and_then(|attr| attr.name.as_deref())
            .ok_or_else(|| {
                AriesVcxError::from_msg(
                    AriesVcxErrorKind::MalformedInput,
                    format!("Revealed attribute {} was not requested by name", referent),
                )
            })?;
        let cred_def_id = cred_def_of(referent, attr_spec.sub_proof_index)?;
        if !preview_has_attr_spec(preview, cred_def_id, name, &attr_spec.raw) {
            return Err(mismatch(name, &attr_spec.raw));
        }
    }

    for (referent, group_spec) in &requested_proof.revealed_attr_groups {
        let cred_def_id = cred_def_of(referent, group_spec.sub_proof_index)?;
        for (name, value) in &group_spec.values {
            if !preview_has_attr_spec(preview, cred_def_id, name, &value.raw) {
                return Err(mismatch(name, &value.raw));
            }
        }
    }

    Ok(())
}
