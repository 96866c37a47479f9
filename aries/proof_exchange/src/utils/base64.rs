use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};

/// A default [GeneralPurposeConfig] configuration with a [decode_padding_mode] of
/// [DecodePaddingMode::Indifferent]
pub const LENIENT_PAD: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);

/// Standard alphabet engine that accepts padded and unpadded input. Attachments written by
/// other agents are not consistent about padding.
pub const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT_PAD);

#[cfg(test)]
pub mod unit_tests {
    use base64::Engine;

    use super::*;

    #[test]
    fn test_decodes_with_and_without_padding() {
        assert_eq!(STANDARD_LENIENT.decode("e30=").unwrap(), b"{}");
        assert_eq!(STANDARD_LENIENT.decode("e30").unwrap(), b"{}");
    }
}
