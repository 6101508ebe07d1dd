//! Macro for implementing Display and FromStr for wire-level enums
//!
//! Status and role enums travel as lowercase strings (query parameters,
//! environment variables, config files). This macro keeps both directions
//! of the conversion in one place with case-insensitive parsing.
//!
//! # Example
//!
//! ```rust
//! use inkpost_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Visibility {
//!     Public,
//!     Unlisted,
//! }
//!
//! impl_domain_status_conversions!(Visibility {
//!     Public => "public",
//!     Unlisted => "unlisted",
//! });
//!
//! assert_eq!(Visibility::Unlisted.to_string(), "unlisted");
//! assert_eq!("PUBLIC".parse::<Visibility>(), Ok(Visibility::Public));
//! ```

/// Implements Display and FromStr traits for status enums
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their lowercase
///   string representations
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
