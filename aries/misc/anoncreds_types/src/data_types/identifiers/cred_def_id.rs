use crate::impl_anoncreds_object_identifier;

impl_anoncreds_object_identifier!(CredentialDefinitionId, LEGACY_CRED_DEF_IDENTIFIER);
