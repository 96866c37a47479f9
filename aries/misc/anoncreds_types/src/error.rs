use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// JSON that does not deserialize into the expected type.
    Input,
    /// A string that does not parse into a nonce, identifier or enum value.
    ConversionError,
    /// A well-formed value breaking a proof request or identifier rule.
    ValidationError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Input => "Malformed input",
            Self::ConversionError => "Unparsable value",
            Self::ValidationError => "Validation error",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    message: String,
}

impl Error {
    pub fn from_msg<T: Into<String>>(kind: ErrorKind, msg: T) -> Self {
        Self {
            kind,
            message: msg.into(),
        }
    }

    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::from_msg(ErrorKind::Input, err.to_string())
    }
}

#[macro_export]
macro_rules! invalid {
    ($($args:tt)+) => {
        $crate::error::Error::from_msg(
            $crate::error::ErrorKind::ValidationError,
            format!($($args)+),
        )
    };
}

macro_rules! err_msg {
    ($kind:ident, $($args:tt)+) => {
        $crate::error::Error::from_msg($crate::error::ErrorKind::$kind, format!($($args)+))
    };
}
