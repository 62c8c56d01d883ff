//! Invitation token - opaque bearer credential for one invitation
//!
//! A token carries no claims. Everything it grants comes from the invitation
//! row it indexes, so changing that row's status revokes the token at once.

use std::fmt;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};

/// Random bytes behind each token
const TOKEN_BYTES: usize = 32;

/// Encoded length of [`TOKEN_BYTES`] in unpadded base64url
pub const TOKEN_LEN: usize = 43;

/// Opaque, URL-safe invitation token
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvitationToken(String);

impl InvitationToken {
    /// Issue a fresh token from the OS CSPRNG
    pub fn issue() -> Self {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Accept a caller-supplied token if it has the shape of an issued one.
    ///
    /// Returning `None` lets lookups answer "not found" without a database hit.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::is_well_formed(raw).then(|| Self(raw.to_owned()))
    }

    pub fn is_well_formed(raw: &str) -> bool {
        raw.len() == TOKEN_LEN
            && raw
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    }

    /// Rehydrate a token read back from storage
    pub fn from_stored(raw: String) -> Self {
        Self(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Short prefix suitable for logs
    pub fn redacted(&self) -> String {
        let prefix: String = self.0.chars().take(6).collect();
        format!("{prefix}...")
    }
}

// Never print the full credential through `{:?}`
impl fmt::Debug for InvitationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("InvitationToken")
            .field(&self.redacted())
            .finish()
    }
}
