use crate::impl_anoncreds_object_identifier;

impl_anoncreds_object_identifier!(RevocationRegistryDefinitionId, LEGACY_REV_REG_DEF_IDENTIFIER);
