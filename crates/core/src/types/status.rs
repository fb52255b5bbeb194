//! Status enums shared by the storefront components.

use serde::{Deserialize, Serialize};

/// Which cart store is authoritative.
///
/// Selected solely by the presence of a session credential. The two stores
/// are never merged: a shopper who signs in does not see lines added to the
/// local cart while signed out, and the reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CartMode {
    /// No credential: the locally persisted mapping is the cart.
    #[default]
    Local,
    /// Credential present: the backend's cart is the cart.
    Server,
}

impl CartMode {
    /// Select the authoritative store from credential presence.
    #[must_use]
    pub const fn from_credential(has_credential: bool) -> Self {
        if has_credential { Self::Server } else { Self::Local }
    }
}

impl std::fmt::Display for CartMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Server => write!(f, "server"),
        }
    }
}
