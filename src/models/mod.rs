//! Request and response schemas of the HTTP API.
//!
//! Request types derive `Deserialize` + `Validate`; response types derive
//! `Serialize` and are built from collaborator rows through `TryFrom`, which
//! is where row-level invariants are checked.

pub mod activity;
pub mod category;
pub mod participant;
pub mod review;
pub mod search;
pub mod tag;

use std::str::FromStr;

use validator::ValidationError;

use crate::error::AppError;

/// A textual value that names no variant of the target enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Declares a closed enum that travels as a lowercase string on the wire and
/// in stored-procedure columns.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::models::UnknownVariant;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($text => Ok($name::$variant),)+
                    other => Err($crate::models::UnknownVariant {
                        kind: stringify!($name),
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub(crate) use string_enum;

/// A collaborator row is missing a column the response requires.
pub(crate) fn required<T>(value: Option<T>, column: &'static str) -> Result<T, AppError> {
    value.ok_or_else(|| malformed_row(column, "NULL"))
}

/// Parse an enum column returned as text.
pub(crate) fn parse_column<T>(value: &str, column: &'static str) -> Result<T, AppError>
where
    T: FromStr<Err = UnknownVariant>,
{
    value.parse().map_err(|_| malformed_row(column, value))
}

pub(crate) fn malformed_row(column: &'static str, value: &str) -> AppError {
    tracing::error!(column, value, "malformed_collaborator_row");
    AppError::internal("An internal error occurred")
}

/// Range checks compare false against NaN, so coordinates need their own guard.
pub(crate) fn validate_finite(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::new("finite").with_message("Coordinate must be a finite number".into()))
    }
}
