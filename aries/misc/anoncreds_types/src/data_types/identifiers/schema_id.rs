use crate::impl_anoncreds_object_identifier;

impl_anoncreds_object_identifier!(SchemaId, LEGACY_SCHEMA_IDENTIFIER);

#[cfg(test)]
mod test_schema_validation {
    use super::*;

    #[test]
    fn should_validate_new_and_legacy_identifiers() {
        let valid_uri_identifier = "did:uri:new_identifier";
        let valid_legacy_identifier = "DXoTtQJNtXtiwWaZAK3rB1:2:example:1.0";
        let invalid_legacy_identifier = "DXoTtQJNtXtiwWaZAK3rB1:3:example:1.0";

        assert!(SchemaId::new(valid_uri_identifier).is_ok());
        assert!(SchemaId::new(valid_legacy_identifier).is_ok());
        assert!(SchemaId::new(invalid_legacy_identifier).is_err());
    }
}
