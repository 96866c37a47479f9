use std::{fmt, ops::Deref};

use rand::Rng;
use serde::{de::Visitor, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// Bit length of freshly generated nonces.
const NONCE_BITS: u32 = 80;

/// Decimal string encoded nonce of a presentation request.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Nonce {
    strval: String,
}

impl Nonce {
    pub fn new() -> Result<Self, Error> {
        let value: u128 = rand::thread_rng().gen::<u128>() >> (128 - NONCE_BITS);
        Self::from_dec(value.to_string())
    }

    pub fn from_dec<S: Into<String>>(value: S) -> Result<Self, Error> {
        let strval = value.into();
        if strval.is_empty() {
            return Err(err_msg!(ConversionError, "Invalid bignum: empty value"));
        }
        if !strval.chars().all(|c| c.is_ascii_digit()) {
            return Err(err_msg!(ConversionError, "Invalid bignum value: {}", strval));
        }
        Ok(Self { strval })
    }
}

impl Deref for Nonce {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.strval
    }
}

impl fmt::Display for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.strval)
    }
}

impl TryFrom<&str> for Nonce {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_dec(value)
    }
}

impl TryFrom<u64> for Nonce {
    type Error = Error;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::from_dec(value.to_string())
    }
}

impl From<Nonce> for String {
    fn from(value: Nonce) -> Self {
        value.strval
    }
}

impl Serialize for Nonce {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.strval)
    }
}

impl<'a> Deserialize<'a> for Nonce {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'a>,
    {
        struct NonceVisitor;

        impl<'a> Visitor<'a> for NonceVisitor {
            type Value = Nonce;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("integer or string nonce")
            }

            fn visit_u64<E>(self, value: u64) -> Result<Nonce, E>
            where
                E: serde::de::Error,
            {
                Nonce::try_from(value).map_err(E::custom)
            }

            fn visit_str<E>(self, value: &str) -> Result<Nonce, E>
            where
                E: serde::de::Error,
            {
                Nonce::from_dec(value).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(NonceVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nonce_validate() {
        let nonce_str = "12345";
        let nonce = Nonce::from_dec(nonce_str).unwrap();
        assert_eq!(&*nonce, nonce_str);

        assert!(Nonce::from_dec("").is_err());
        assert!(Nonce::from_dec("123abc").is_err());
    }

    #[test]
    fn nonce_generated_is_decimal_and_fresh() {
        let first = Nonce::new().unwrap();
        let second = Nonce::new().unwrap();
        assert!(first.chars().all(|c| c.is_ascii_digit()));
        assert_ne!(first, second);
    }

    #[test]
    fn nonce_serde() {
        let nonce: Nonce = serde_json::from_str(r#""10000""#).unwrap();
        assert_eq!(serde_json::to_string(&nonce).unwrap(), r#""10000""#);

        let nonce: Nonce = serde_json::from_str("10000").unwrap();
        assert_eq!(&*nonce, "10000");

        serde_json::from_str::<Nonce>(r#""-10000""#).unwrap_err();
    }
}
