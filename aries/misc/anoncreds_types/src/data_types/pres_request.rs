use std::{collections::HashMap, fmt};

use serde_json::Value;
use typed_builder::TypedBuilder;

use super::nonce::Nonce;
use crate::{error::Result, invalid, utils::validation::Validatable};

/// Proof request sent by a verifier. Both referent maps are required on the wire, an
/// absent map makes the request malformed.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, TypedBuilder)]
pub struct PresentationRequest {
    pub nonce: Nonce,
    #[builder(setter(into))]
    pub name: String,
    #[builder(setter(into))]
    pub version: String,
    #[builder(default)]
    pub requested_attributes: HashMap<String, AttributeInfo>,
    #[builder(default)]
    pub requested_predicates: HashMap<String, PredicateInfo>,
    #[builder(default, setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub non_revoked: Option<NonRevokedInterval>,
    #[builder(default, setter(strip_option, into))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ver: Option<String>,
}

impl PresentationRequest {
    /// Interval that applies to `referent`: its own override, else the request level one.
    /// Empty intervals count as absent.
    pub fn resolved_interval(&self, referent: &str) -> Option<&NonRevokedInterval> {
        let own = self
            .requested_attributes
            .get(referent)
            .map(|attr| attr.non_revoked.as_ref())
            .or_else(|| {
                self.requested_predicates
                    .get(referent)
                    .map(|pred| pred.non_revoked.as_ref())
            })?;
        own.or(self.non_revoked.as_ref())
            .filter(|interval| !interval.is_empty())
    }

    /// Resolved intervals of every referent that has one.
    pub fn non_revoc_intervals(&self) -> HashMap<String, NonRevokedInterval> {
        self.requested_attributes
            .keys()
            .chain(self.requested_predicates.keys())
            .filter_map(|referent| {
                self.resolved_interval(referent)
                    .map(|interval| (referent.clone(), interval.clone()))
            })
            .collect()
    }
}

#[derive(Clone, Default, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct NonRevokedInterval {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<u64>,
}

impl NonRevokedInterval {
    #[must_use]
    pub const fn new(from: Option<u64>, to: Option<u64>) -> Self {
        Self { from, to }
    }

    pub const fn is_empty(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Closed bounds, open ends fall back to `0` and `now`.
    pub fn bounds(&self, now: u64) -> (u64, u64) {
        (self.from.unwrap_or(0), self.to.unwrap_or(now))
    }

    /// Whether `timestamp` lies within `[from, to)`.
    pub fn contains(&self, timestamp: u64, now: u64) -> bool {
        let (from, to) = self.bounds(now);
        from <= timestamp && timestamp < to
    }
}

/// Attribute filter alternatives as understood by the holder's wallet query language.
pub type Restrictions = Value;

fn restrictions_present(restrictions: Option<&Restrictions>) -> bool {
    match restrictions {
        None | Some(Value::Null) => false,
        Some(Value::Array(alternatives)) => !alternatives.is_empty(),
        Some(Value::Object(filter)) => !filter.is_empty(),
        Some(_) => true,
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct AttributeInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub names: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restrictions: Option<Restrictions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub non_revoked: Option<NonRevokedInterval>,
}

impl AttributeInfo {
    pub fn has_restrictions(&self) -> bool {
        restrictions_present(self.restrictions.as_ref())
    }
}

pub type PredicateValue = i32;

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct PredicateInfo {
    pub name: String,
    pub p_type: PredicateTypes,
    pub p_value: PredicateValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restrictions: Option<Restrictions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub non_revoked: Option<NonRevokedInterval>,
}

impl PredicateInfo {
    pub fn has_restrictions(&self) -> bool {
        restrictions_present(self.restrictions.as_ref())
    }
}

/// Predicate operator. Requests use the symbolic form, proofs the mnemonic one; both parse.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub enum PredicateTypes {
    #[serde(rename = ">=", alias = "GE")]
    GE,
    #[serde(rename = "<=", alias = "LE")]
    LE,
    #[serde(rename = ">", alias = "GT")]
    GT,
    #[serde(rename = "<", alias = "LT")]
    LT,
}

impl fmt::Display for PredicateTypes {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::GE => write!(f, "GE"),
            Self::GT => write!(f, "GT"),
            Self::LE => write!(f, "LE"),
            Self::LT => write!(f, "LT"),
        }
    }
}

impl Validatable for PresentationRequest {
    fn validate(&self) -> Result<()> {
        if self.requested_attributes.is_empty() && self.requested_predicates.is_empty() {
            return Err(invalid!(
                "Presentation request validation failed: both `requested_attributes` and \
                 `requested_predicates` are empty"
            ));
        }

        for (referent, requested_attribute) in &self.requested_attributes {
            let has_name = !requested_attribute
                .name
                .as_ref()
                .map_or(true, String::is_empty);
            let has_names = !requested_attribute
                .names
                .as_ref()
                .map_or(true, Vec::is_empty);
            if !has_name && !has_names {
                return Err(invalid!(
                    "Presentation request validation failed: requested attribute {} has neither \
                     name nor names",
                    referent
                ));
            }
            if has_name && has_names {
                return Err(invalid!(
                    "Presentation request validation failed: requested attribute {} has both \
                     name and names",
                    referent
                ));
            }
        }

        for (referent, requested_predicate) in &self.requested_predicates {
            if requested_predicate.name.is_empty() {
                return Err(invalid!(
                    "Presentation request validation failed: requested predicate {} has an \
                     empty name",
                    referent
                ));
            }
        }

        Ok(())
    }
}
