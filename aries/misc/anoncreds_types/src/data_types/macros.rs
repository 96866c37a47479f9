#[macro_export]
macro_rules! impl_anoncreds_object_identifier {
    ($i:ident, $legacy_regex:ident) => {
        use $crate::utils::validation::{Validatable, URI_IDENTIFIER, $legacy_regex};

        #[derive(
            Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize, Default,
        )]
        pub struct $i(pub String);

        impl $i {
            pub fn new_unchecked(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            pub fn new(s: impl Into<String>) -> $crate::Result<Self> {
                let s = Self(s.into());
                Validatable::validate(&s)?;
                Ok(s)
            }

            pub fn is_legacy(&self) -> bool {
                $legacy_regex.is_match(&self.0)
            }

            pub fn is_uri(&self) -> bool {
                URI_IDENTIFIER.is_match(&self.0)
            }
        }

        impl Validatable for $i {
            fn validate(&self) -> $crate::Result<()> {
                if self.is_uri() || self.is_legacy() {
                    return Ok(());
                }
                Err($crate::invalid!(
                    "type: {}, identifier: {} is invalid. It MUST be a URI or legacy identifier.",
                    stringify!($i),
                    self.0
                ))
            }
        }

        impl From<$i> for String {
            fn from(i: $i) -> Self {
                i.0
            }
        }

        impl TryFrom<String> for $i {
            type Error = $crate::Error;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                $i::new(value)
            }
        }

        impl TryFrom<&str> for $i {
            type Error = $crate::Error;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                $i::new(value.to_owned())
            }
        }

        impl std::fmt::Display for $i {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}
