//! Opaque string identifiers passed across the repository boundary.
//!
//! These are thin newtypes rather than bare `String`s so that a caller can't
//! accidentally pass a `ScopeId` where an `AuthAccountId` is expected,
//! a mixup that bare string parameters couldn't catch at compile time.

use std::fmt;

macro_rules! opaque_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, sqlx::Type, serde::Serialize, serde::Deserialize)]
        #[sqlx(transparent)]
        pub struct $name(pub String);

        impl $name {
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

opaque_id!(PublicId);
opaque_id!(AuthAccountId);
opaque_id!(IamUserId);
opaque_id!(ScopeId);
opaque_id!(AuthMethodId);
opaque_id!(KeyId);
