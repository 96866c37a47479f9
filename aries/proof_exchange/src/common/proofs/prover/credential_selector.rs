//! Picks, for every referent of a proof request, the wallet credential (or self-attested
//! value) that answers it. Selection is deterministic: ties are broken by credential id.

use std::collections::{BTreeMap, HashMap};

use anoncreds_types::{
    data_types::{
        credential::{CredentialInfo, RequestedAttribute, RequestedCredentials, RequestedPredicate},
        pres_request::PresentationRequest,
    },
    utils::encoding::canon,
};
use aries_vcx_anoncreds::anoncreds::base_anoncreds::BaseHolder;
use messages::msg_fields::protocols::present_proof::v1::propose::PresentationPreview;

use crate::{
    errors::error::prelude::*,
    handlers::util::{preview_has_attr_spec, preview_has_pred_spec},
};

/// Page size used when asking the holder for candidates of one referent.
const CANDIDATES_PAGE: usize = 100;

/// What a candidate credential has to satisfy.
enum Requirement<'a> {
    Attributes(Vec<&'a str>),
    Predicate(&'a str),
}

/// Value of attribute `name` in `cred_info`, matching names canonically.
pub fn credential_attr_value<'a>(cred_info: &'a CredentialInfo, name: &str) -> Option<&'a str> {
    if let Some(value) = cred_info.attributes.get(name) {
        return Some(value);
    }
    let name = canon(name);
    cred_info
        .attributes
        .iter()
        .find(|(attr, _)| canon(attr) == name)
        .map(|(_, value)| value.as_str())
}

fn matches_preview(
    cred_info: &CredentialInfo,
    requirement: &Requirement<'_>,
    preview: &PresentationPreview,
) -> bool {
    match requirement {
        Requirement::Attributes(names) => names.iter().all(|name| {
            credential_attr_value(cred_info, name).is_some_and(|value| {
                preview_has_attr_spec(preview, &cred_info.cred_def_id, name, value)
            })
        }),
        Requirement::Predicate(name) => {
            preview_has_pred_spec(preview, &cred_info.cred_def_id, name)
        }
    }
}

async fn choose_credential(
    holder: &impl BaseHolder,
    proof_req: &PresentationRequest,
    referent: &str,
    requirement: Requirement<'_>,
    preview: Option<&PresentationPreview>,
) -> VcxResult<CredentialInfo> {
    let mut candidates: Vec<CredentialInfo> = holder
        .get_credentials_for_presentation_request_by_referent(
            proof_req,
            &[referent],
            0,
            CANDIDATES_PAGE,
        )
        .await?
        .into_iter()
        .map(|retrieved| retrieved.cred_info)
        .collect();
    candidates.sort_by(|a, b| a.referent.cmp(&b.referent));

    if candidates.len() <= 1 {
        return candidates.pop().ok_or_else(|| {
            AriesVcxError::from_msg(
                AriesVcxErrorKind::SelectionFailure,
                format!("No credential in the wallet satisfies referent {}", referent),
            )
        });
    }

    let Some(preview) = preview else {
        return Ok(candidates.swap_remove(0));
    };

    candidates
        .into_iter()
        .find(|cred_info| matches_preview(cred_info, &requirement, preview))
        .ok_or_else(|| {
            AriesVcxError::from_msg(
                AriesVcxErrorKind::SelectionFailure,
                format!(
                    "None of the candidate credentials for referent {} matches the proposal",
                    referent
                ),
            )
        })
}

/// Answers `proof_req` from the holder's wallet.
///
/// Restricted attribute referents are disclosed from the chosen credential, unrestricted
/// ones are self-attested with the chosen credential's value. Attribute groups are always
/// disclosed. Predicates always reference a credential and take precedence over a
/// self-attested value under the same referent.
pub async fn select_credentials_for_request(
    holder: &impl BaseHolder,
    proof_req: &PresentationRequest,
    preview: Option<&PresentationPreview>,
) -> VcxResult<RequestedCredentials> {
    trace!(
        "select_credentials_for_request >>> proof_req: {:?}, preview: {:?}",
        proof_req,
        preview
    );
    let mut self_attested_attributes = HashMap::new();
    let mut requested_attributes = HashMap::new();
    let mut requested_predicates = HashMap::new();

    let attributes: BTreeMap<_, _> = proof_req.requested_attributes.iter().collect();
    for (referent, attr_info) in attributes {
        let (names, is_group): (Vec<&str>, bool) =
            match (attr_info.name.as_deref(), attr_info.names.as_deref()) {
                (Some(name), None) => (vec![name], false),
                (None, Some(names)) if !names.is_empty() => {
                    (names.iter().map(String::as_str).collect(), true)
                }
                _ => {
                    return Err(AriesVcxError::from_msg(
                        AriesVcxErrorKind::MalformedInput,
                        format!(
                            "Requested attribute {} needs exactly one of name or names",
                            referent
                        ),
                    ))
                }
            };

        let cred_info = choose_credential(
            holder,
            proof_req,
            referent,
            Requirement::Attributes(names.clone()),
            preview,
        )
        .await?;

        if is_group || attr_info.has_restrictions() {
            requested_attributes.insert(
                referent.clone(),
                RequestedAttribute {
                    cred_id: cred_info.referent,
                    revealed: true,
                    timestamp: None,
                },
            );
        } else {
            let value = credential_attr_value(&cred_info, names[0]).ok_or_else(|| {
                AriesVcxError::from_msg(
                    AriesVcxErrorKind::SelectionFailure,
                    format!(
                        "Credential {} has no value for attribute {} of referent {}",
                        cred_info.referent, names[0], referent
                    ),
                )
            })?;
            self_attested_attributes.insert(referent.clone(), value.to_owned());
        }
    }

    let predicates: BTreeMap<_, _> = proof_req.requested_predicates.iter().collect();
    for (referent, pred_info) in predicates {
        let cred_info = choose_credential(
            holder,
            proof_req,
            referent,
            Requirement::Predicate(&pred_info.name),
            preview,
        )
        .await?;

        requested_predicates.insert(
            referent.clone(),
            RequestedPredicate {
                cred_id: cred_info.referent,
                timestamp: None,
            },
        );
        self_attested_attributes.remove(referent);
    }

    Ok(RequestedCredentials {
        self_attested_attributes,
        requested_attributes,
        requested_predicates,
    })
}

#[cfg(test)]
pub mod unit_tests {
    use messages::msg_fields::protocols::present_proof::v1::propose::PresentationAttr;
    use test_utils::{
        constants::{CRED_DEF_ID, REV_CRED_DEF_ID},
        mockdata::{credential_info, mock_holder::MockHolder},
    };

    use super::*;

    fn proof_req(value: serde_json::Value) -> PresentationRequest {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_unrestricted_attribute_is_self_attested() {
        let holder = MockHolder::default().with_credential(credential_info(
            "cred_1",
            CRED_DEF_ID,
            &[("score", "42")],
        ));
        let req = proof_req(json!({
            "nonce": "1",
            "name": "proof",
            "version": "1.0",
            "requested_attributes": {"score_uuid": {"name": "score"}},
            "requested_predicates": {}
        }));

        let selected = select_credentials_for_request(&holder, &req, None)
            .await
            .unwrap();
        assert_eq!(
            selected.self_attested_attributes,
            HashMap::from([("score_uuid".to_owned(), "42".to_owned())])
        );
        assert!(selected.requested_attributes.is_empty());
        assert!(selected.requested_predicates.is_empty());
    }

    #[tokio::test]
    async fn test_restricted_attribute_references_credential() {
        let holder = MockHolder::default().with_credential(credential_info(
            "cred_1",
            CRED_DEF_ID,
            &[("name", "Alex")],
        ));
        let req = proof_req(json!({
            "nonce": "1",
            "name": "proof",
            "version": "1.0",
            "requested_attributes": {
                "attr_name": {"name": "name", "restrictions": [{"cred_def_id": CRED_DEF_ID}]}
            },
            "requested_predicates": {}
        }));

        let selected = select_credentials_for_request(&holder, &req, None)
            .await
            .unwrap();
        assert_eq!(
            selected.requested_attributes["attr_name"],
            RequestedAttribute {
                cred_id: "cred_1".to_owned(),
                revealed: true,
                timestamp: None
            }
        );
        assert!(selected.self_attested_attributes.is_empty());
    }

    #[tokio::test]
    async fn test_no_candidate_names_referent() {
        let holder = MockHolder::default();
        let req = proof_req(json!({
            "nonce": "1",
            "name": "proof",
            "version": "1.0",
            "requested_attributes": {"attr_missing": {"name": "missing"}},
            "requested_predicates": {}
        }));

        let err = select_credentials_for_request(&holder, &req, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), AriesVcxErrorKind::SelectionFailure);
        assert!(err.msg().contains("attr_missing"));
    }

    #[tokio::test]
    async fn test_several_candidates_without_preview_take_smallest_id() {
        let holder = MockHolder::default()
            .with_credential(credential_info("cred_b", CRED_DEF_ID, &[("name", "Bob")]))
            .with_credential(credential_info("cred_a", REV_CRED_DEF_ID, &[("name", "Alex")]));
        let req = proof_req(json!({
            "nonce": "1",
            "name": "proof",
            "version": "1.0",
            "requested_attributes": {
                "attr_name": {"name": "name", "restrictions": {"attr::name::marker": "1"}}
            },
            "requested_predicates": {}
        }));

        let selected = select_credentials_for_request(&holder, &req, None)
            .await
            .unwrap();
        assert_eq!(selected.requested_attributes["attr_name"].cred_id, "cred_a");
    }

    #[tokio::test]
    async fn test_preview_picks_matching_candidate() {
        let holder = MockHolder::default()
            .with_credential(credential_info("cred_a", CRED_DEF_ID, &[("name", "Alex")]))
            .with_credential(credential_info("cred_b", CRED_DEF_ID, &[("name", "Bob")]));
        let req = proof_req(json!({
            "nonce": "1",
            "name": "proof",
            "version": "1.0",
            "requested_attributes": {
                "attr_name": {"name": "name", "restrictions": [{"cred_def_id": CRED_DEF_ID}]}
            },
            "requested_predicates": {}
        }));
        let preview = PresentationPreview::new(
            vec![PresentationAttr::builder()
                .name("name")
                .cred_def_id(CRED_DEF_ID)
                .value("Bob")
                .build()],
            vec![],
        );

        let selected = select_credentials_for_request(&holder, &req, Some(&preview))
            .await
            .unwrap();
        assert_eq!(selected.requested_attributes["attr_name"].cred_id, "cred_b");

        let preview = PresentationPreview::new(
            vec![PresentationAttr::builder()
                .name("name")
                .cred_def_id(CRED_DEF_ID)
                .value("Carol")
                .build()],
            vec![],
        );
        let err = select_credentials_for_request(&holder, &req, Some(&preview))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), AriesVcxErrorKind::SelectionFailure);
    }

    #[tokio::test]
    async fn test_group_needs_every_name_to_match_preview() {
        let holder = MockHolder::default()
            .with_credential(credential_info(
                "cred_a",
                CRED_DEF_ID,
                &[("name", "Alex"), ("sex", "male")],
            ))
            .with_credential(credential_info(
                "cred_b",
                CRED_DEF_ID,
                &[("name", "Alex"), ("sex", "female")],
            ));
        let req = proof_req(json!({
            "nonce": "1",
            "name": "proof",
            "version": "1.0",
            "requested_attributes": {"attr_group": {"names": ["name", "sex"]}},
            "requested_predicates": {}
        }));
        let preview = PresentationPreview::new(
            vec![
                PresentationAttr::builder()
                    .name("name")
                    .cred_def_id(CRED_DEF_ID)
                    .value("Alex")
                    .build(),
                PresentationAttr::builder()
                    .name("sex")
                    .cred_def_id(CRED_DEF_ID)
                    .value("female")
                    .build(),
            ],
            vec![],
        );

        let selected = select_credentials_for_request(&holder, &req, Some(&preview))
            .await
            .unwrap();
        assert_eq!(
            selected.requested_attributes["attr_group"],
            RequestedAttribute {
                cred_id: "cred_b".to_owned(),
                revealed: true,
                timestamp: None
            }
        );
    }

    #[tokio::test]
    async fn test_predicate_overrides_self_attested_referent() {
        let holder = MockHolder::default().with_credential(credential_info(
            "cred_1",
            CRED_DEF_ID,
            &[("age", "28")],
        ));
        let req = proof_req(json!({
            "nonce": "1",
            "name": "proof",
            "version": "1.0",
            "requested_attributes": {"shared": {"name": "age"}},
            "requested_predicates": {
                "shared": {"name": "age", "p_type": ">=", "p_value": 18}
            }
        }));

        let selected = select_credentials_for_request(&holder, &req, None)
            .await
            .unwrap();
        assert!(selected.self_attested_attributes.is_empty());
        assert_eq!(selected.requested_predicates["shared"].cred_id, "cred_1");
    }

    #[test]
    fn test_credential_attr_value_matches_canonically() {
        let cred = credential_info("cred_1", CRED_DEF_ID, &[("First Name", "Alex")]);
        assert_eq!(credential_attr_value(&cred, "First Name"), Some("Alex"));
        assert_eq!(credential_attr_value(&cred, "firstname"), Some("Alex"));
        assert_eq!(credential_attr_value(&cred, "surname"), None);
    }
}
