//! Domain model: one module per configuration domain.
//!
//! Numeric fields arriving as form text are represented here as
//! range-checked newtypes, so a record that exists is a record that
//! passed validation.

pub mod acl;
pub mod device;
pub mod dhcp;
pub mod ip;
pub mod lacp;
pub mod mirror;
pub mod nat;
pub mod port;
pub mod port_security;
pub mod qos;
pub mod route;
pub mod snmp;
pub mod stp;
pub mod user;
pub mod vlan;

use crate::error::CoreError;

/// Declares a range-checked integer newtype with a fallible constructor,
/// a text parser carrying the operator-facing message, and `Display`.
macro_rules! bounded_int {
    ($(#[$meta:meta])* $name:ident($ty:ty), $min:literal ..= $max:literal, $label:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
            serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name($ty);

        impl $name {
            pub const MIN: $ty = $min;
            pub const MAX: $ty = $max;

            pub fn new(value: $ty) -> Result<Self, $crate::error::CoreError> {
                if ($min..=$max).contains(&value) {
                    Ok(Self(value))
                } else {
                    Err($crate::error::CoreError::validation(concat!(
                        $label, " must be a number between ",
                        stringify!($min), " and ", stringify!($max),
                    )))
                }
            }

            /// Parse from form text; non-numeric input gets the same
            /// range message as an out-of-range value.
            pub fn parse(text: &str) -> Result<Self, $crate::error::CoreError> {
                text.trim()
                    .parse::<$ty>()
                    .map_err(|_| {
                        $crate::error::CoreError::validation(concat!(
                            $label, " must be a number between ",
                            stringify!($min), " and ", stringify!($max),
                        ))
                    })
                    .and_then(Self::new)
            }

            pub fn get(self) -> $ty {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

pub(crate) use bounded_int;

/// Required-field check shared by every add/edit form.
pub fn require_nonempty(label: &str, value: &str) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(CoreError::validation(format!("{label} must not be empty")))
    } else {
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::require_nonempty;
    use crate::error::CoreError;

    #[test]
    fn require_nonempty_trims() {
        assert_eq!(require_nonempty("Name", "  office ").unwrap(), "office");
    }

    #[test]
    fn require_nonempty_rejects_blank() {
        let err = require_nonempty("Gateway", "   ").unwrap_err();
        assert_eq!(
            err,
            CoreError::validation("Gateway must not be empty")
        );
    }
}
