use std::{
    collections::{BTreeMap, HashMap},
    path::{Path, PathBuf},
    sync::Mutex,
};

use anoncreds_types::{
    data_types::{
        credential::{
            CredentialInfo, CredentialRevocationState, RequestedCredentials, RevocationStatesMap,
        },
        ledger::{rev_reg_def::RevocationRegistryDefinition, rev_reg_delta::RevocationRegistryDelta},
        messages::cred_selection::RetrievedCredentialForReferent,
        pres_request::PresentationRequest,
        presentation::{
            AttributeValue, EqProof, GeProof, Identifier, Predicate, PrimaryProof, Proof,
            Presentation, RequestedProof, RevealedAttributeGroupInfo, RevealedAttributeInfo,
            SubProof, SubProofReferent,
        },
    },
    utils::encoding::{canon, encode},
};
use aries_vcx_anoncreds::{
    anoncreds::base_anoncreds::{BaseHolder, CredentialDefinitionsMap, SchemasMap},
    errors::error::{VcxAnoncredsError, VcxAnoncredsResult},
};
use async_trait::async_trait;
use serde_json::{Map, Value};

/// In-memory wallet. Presentations it creates are structurally faithful to the request
/// and the stored credentials; their cryptographic members are placeholders.
#[derive(Debug, Default)]
pub struct MockHolder {
    credentials: BTreeMap<String, CredentialInfo>,
    tails_paths: Mutex<Vec<PathBuf>>,
}

fn attr_value<'a>(cred_info: &'a CredentialInfo, name: &str) -> Option<&'a str> {
    let name = canon(name);
    cred_info
        .attributes
        .iter()
        .find(|(attr, _)| canon(attr) == name)
        .map(|(_, value)| value.as_str())
}

/// One wallet query filter; unknown keys do not constrain.
fn filter_matches(filter: &Map<String, Value>, cred_info: &CredentialInfo) -> bool {
    filter.iter().all(|(key, expected)| {
        let expected = expected.as_str().unwrap_or_default();
        match key.as_str() {
            "cred_def_id" => cred_info.cred_def_id.0 == expected,
            "schema_id" => cred_info.schema_id.0 == expected,
            _ => match key
                .strip_prefix("attr::")
                .and_then(|rest| rest.rsplit_once("::"))
            {
                Some((name, "marker")) => attr_value(cred_info, name).is_some(),
                Some((name, "value")) => attr_value(cred_info, name) == Some(expected),
                _ => true,
            },
        }
    })
}

fn restrictions_match(restrictions: Option<&Value>, cred_info: &CredentialInfo) -> bool {
    match restrictions {
        Some(Value::Array(alternatives)) if !alternatives.is_empty() => {
            alternatives.iter().any(|alternative| {
                alternative
                    .as_object()
                    .is_some_and(|filter| filter_matches(filter, cred_info))
            })
        }
        Some(Value::Object(filter)) => filter_matches(filter, cred_info),
        _ => true,
    }
}

impl MockHolder {
    pub fn with_credential(mut self, cred_info: CredentialInfo) -> Self {
        self.credentials.insert(cred_info.referent.clone(), cred_info);
        self
    }

    /// Tails files handed to every `create_revocation_state` call so far.
    pub fn revocation_state_tails_paths(&self) -> Vec<PathBuf> {
        self.tails_paths
            .lock()
            .map(|paths| paths.clone())
            .unwrap_or_default()
    }

    fn credential(&self, cred_id: &str) -> VcxAnoncredsResult<&CredentialInfo> {
        self.credentials.get(cred_id).ok_or_else(|| {
            VcxAnoncredsError::WalletItemNotFound(format!("No credential with id {}", cred_id))
        })
    }
}

#[derive(Default)]
struct SubProofBuilder {
    revealed: BTreeMap<String, String>,
    predicates: Vec<Predicate>,
}

#[async_trait]
impl BaseHolder for MockHolder {
    async fn get_credentials_for_presentation_request_by_referent(
        &self,
        presentation_request: &PresentationRequest,
        referents: &[&str],
        start: usize,
        count: usize,
    ) -> VcxAnoncredsResult<Vec<RetrievedCredentialForReferent>> {
        let mut rtn = Vec::new();
        for referent in referents {
            let (names, restrictions) =
                match presentation_request.requested_attributes.get(*referent) {
                    Some(attr) => (
                        attr.name
                            .iter()
                            .chain(attr.names.iter().flatten())
                            .cloned()
                            .collect::<Vec<_>>(),
                        attr.restrictions.as_ref(),
                    ),
                    None => match presentation_request.requested_predicates.get(*referent) {
                        Some(pred) => (vec![pred.name.clone()], pred.restrictions.as_ref()),
                        None => {
                            return Err(VcxAnoncredsError::InvalidProofRequest(format!(
                                "Unknown referent {}",
                                referent
                            )))
                        }
                    },
                };
            let interval = presentation_request.resolved_interval(referent).cloned();
            rtn.extend(
                self.credentials
                    .values()
                    .filter(|cred_info| {
                        names.iter().all(|name| attr_value(cred_info, name).is_some())
                            && restrictions_match(restrictions, cred_info)
                    })
                    .skip(start)
                    .take(count)
                    .map(|cred_info| RetrievedCredentialForReferent {
                        cred_info: cred_info.clone(),
                        interval: interval.clone(),
                    }),
            );
        }
        Ok(rtn)
    }

    async fn get_credential(&self, cred_id: &str) -> VcxAnoncredsResult<CredentialInfo> {
        self.credential(cred_id).cloned()
    }

    async fn create_presentation(
        &self,
        presentation_request: &PresentationRequest,
        requested_credentials: &RequestedCredentials,
        _schemas: &SchemasMap,
        _credential_defs: &CredentialDefinitionsMap,
        revocation_states: Option<&RevocationStatesMap>,
    ) -> VcxAnoncredsResult<Presentation> {
        let mut sub_proofs: BTreeMap<(String, Option<u64>), SubProofBuilder> = BTreeMap::new();
        for attr in requested_credentials.requested_attributes.values() {
            sub_proofs.entry((attr.cred_id.clone(), attr.timestamp)).or_default();
        }
        for pred in requested_credentials.requested_predicates.values() {
            sub_proofs.entry((pred.cred_id.clone(), pred.timestamp)).or_default();
        }
        let index_of = |cred_id: &str, timestamp: Option<u64>| {
            sub_proofs
                .keys()
                .position(|key| key.0 == cred_id && key.1 == timestamp)
                .unwrap_or_default() as u32
        };

        let mut requested_proof = RequestedProof {
            self_attested_attrs: requested_credentials.self_attested_attributes.clone(),
            ..Default::default()
        };
        let mut revealed_values: Vec<((String, Option<u64>), String, String)> = Vec::new();
        let mut predicates: Vec<((String, Option<u64>), Predicate)> = Vec::new();

        for (referent, attr) in &requested_credentials.requested_attributes {
            let attr_info = presentation_request
                .requested_attributes
                .get(referent)
                .ok_or_else(|| {
                    VcxAnoncredsError::InvalidProofRequest(format!("Unknown referent {}", referent))
                })?;
            let cred_info = self.credential(&attr.cred_id)?;
            let index = index_of(&attr.cred_id, attr.timestamp);
            let key = (attr.cred_id.clone(), attr.timestamp);
            let lookup = |name: &str| {
                attr_value(cred_info, name).map(str::to_owned).ok_or_else(|| {
                    VcxAnoncredsError::InvalidInput(format!(
                        "Credential {} has no attribute {}",
                        attr.cred_id, name
                    ))
                })
            };

            if let Some(names) = &attr_info.names {
                let mut values = HashMap::new();
                for name in names {
                    let raw = lookup(name)?;
                    revealed_values.push((key.clone(), name.clone(), raw.clone()));
                    values.insert(
                        name.clone(),
                        AttributeValue {
                            encoded: encode(&raw),
                            raw,
                        },
                    );
                }
                requested_proof.revealed_attr_groups.insert(
                    referent.clone(),
                    RevealedAttributeGroupInfo {
                        sub_proof_index: index,
                        values,
                    },
                );
            } else if let Some(name) = &attr_info.name {
                if attr.revealed {
                    let raw = lookup(name)?;
                    revealed_values.push((key, name.clone(), raw.clone()));
                    requested_proof.revealed_attrs.insert(
                        referent.clone(),
                        RevealedAttributeInfo {
                            sub_proof_index: index,
                            encoded: encode(&raw),
                            raw,
                        },
                    );
                } else {
                    requested_proof.unrevealed_attrs.insert(
                        referent.clone(),
                        SubProofReferent {
                            sub_proof_index: index,
                        },
                    );
                }
            }
        }

        for (referent, pred) in &requested_credentials.requested_predicates {
            let pred_info = presentation_request
                .requested_predicates
                .get(referent)
                .ok_or_else(|| {
                    VcxAnoncredsError::InvalidProofRequest(format!("Unknown referent {}", referent))
                })?;
            predicates.push((
                (pred.cred_id.clone(), pred.timestamp),
                Predicate {
                    attr_name: canon(&pred_info.name),
                    p_type: pred_info.p_type,
                    value: pred_info.p_value,
                },
            ));
            requested_proof.predicates.insert(
                referent.clone(),
                SubProofReferent {
                    sub_proof_index: index_of(&pred.cred_id, pred.timestamp),
                },
            );
        }

        for (key, name, raw) in revealed_values {
            if let Some(builder) = sub_proofs.get_mut(&key) {
                builder.revealed.insert(canon(&name), encode(&raw));
            }
        }
        for (key, predicate) in predicates {
            if let Some(builder) = sub_proofs.get_mut(&key) {
                builder.predicates.push(predicate);
            }
        }

        let mut proofs = Vec::new();
        let mut identifiers = Vec::new();
        for ((cred_id, timestamp), builder) in sub_proofs {
            let cred_info = self.credential(&cred_id)?;
            if let (Some(rev_reg_id), Some(timestamp)) = (&cred_info.rev_reg_id, timestamp) {
                let has_state = revocation_states
                    .and_then(|states| states.get(&rev_reg_id.0))
                    .is_some_and(|states| states.contains_key(&timestamp));
                if !has_state {
                    return Err(VcxAnoncredsError::InvalidInput(format!(
                        "No revocation state for {} at {}",
                        rev_reg_id, timestamp
                    )));
                }
            }
            proofs.push(SubProof {
                primary_proof: PrimaryProof {
                    eq_proof: EqProof {
                        revealed_attrs: builder.revealed.into_iter().collect(),
                        other: Map::from_iter([("a_prime".to_owned(), json!("1"))]),
                    },
                    ge_proofs: builder
                        .predicates
                        .into_iter()
                        .map(|predicate| GeProof {
                            predicate,
                            other: Map::from_iter([("alpha".to_owned(), json!("1"))]),
                        })
                        .collect(),
                },
                non_revoc_proof: timestamp.map(|_| json!({"x_list": {}, "c_list": {}})),
            });
            identifiers.push(Identifier {
                schema_id: cred_info.schema_id.clone(),
                cred_def_id: cred_info.cred_def_id.clone(),
                rev_reg_id: timestamp.and(cred_info.rev_reg_id.clone()),
                timestamp,
            });
        }

        Ok(Presentation {
            proof: Proof {
                proofs,
                aggregated_proof: json!({"c_hash": "1", "c_list": []}),
            },
            requested_proof,
            identifiers,
        })
    }

    async fn create_revocation_state(
        &self,
        cred_rev_id: u32,
        rev_reg_def: &RevocationRegistryDefinition,
        rev_reg_delta: &RevocationRegistryDelta,
        timestamp: u64,
        tails_path: &Path,
    ) -> VcxAnoncredsResult<CredentialRevocationState> {
        if rev_reg_delta.is_revoked(cred_rev_id) {
            return Err(VcxAnoncredsError::CredentialRevoked(format!(
                "Credential {} is revoked in registry {}",
                cred_rev_id, rev_reg_def.id
            )));
        }
        if let Ok(mut paths) = self.tails_paths.lock() {
            paths.push(tails_path.to_path_buf());
        }
        Ok(CredentialRevocationState {
            witness: json!({"omega": format!("{} {}", cred_rev_id, timestamp)}),
            rev_reg: rev_reg_delta.value.accum.clone(),
            timestamp,
        })
    }
}
