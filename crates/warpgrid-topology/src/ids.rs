//! Opaque identifier types.
//!
//! `NodeId`, `StateId`, `OpId`, `CapId` and `ReqId` are all thin wrappers
//! around `Arc<str>`: cheap to clone, comparable, hashable, and distinct at
//! the type level so a capability id can't accidentally be compared against
//! a requirement id.

use std::fmt;
use std::sync::Arc;

macro_rules! opaque_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(Arc<str>);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(Arc::from(s))
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(Arc::from(s.as_str()))
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

opaque_id!(NodeId);
opaque_id!(StateId);
opaque_id!(OpId);
opaque_id!(CapId);
opaque_id!(ReqId);
