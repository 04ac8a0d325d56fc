use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;

use crate::models::chat::SessionId;

type HmacSha256 = Hmac<Sha256>;

/// Signs session ids so clients cannot pick their own server-side keys.
///
/// Cookie value format: `<uuid>.<hex hmac-sha256(uuid)>`
#[derive(Clone)]
pub struct SessionCookieSigner {
    keyed: HmacSha256,
}

impl SessionCookieSigner {
    pub fn new(secret: &str) -> anyhow::Result<Self> {
        let keyed = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| anyhow::anyhow!("HMAC error: {}", e))?;
        Ok(Self { keyed })
    }

    fn mac(&self) -> HmacSha256 {
        self.keyed.clone()
    }

    /// Fresh random session id
    pub fn generate_id() -> SessionId {
        uuid::Uuid::new_v4().to_string()
    }

    pub fn sign(&self, session_id: &str) -> String {
        let mut mac = self.mac();
        mac.update(session_id.as_bytes());
        let tag = hex::encode(mac.finalize().into_bytes());
        format!("{}.{}", session_id, tag)
    }

    /// Returns the session id if the cookie value carries a valid signature
    pub fn verify(&self, cookie_value: &str) -> Option<SessionId> {
        let (session_id, tag) = cookie_value.rsplit_once('.')?;
        if session_id.is_empty() {
            return None;
        }

        let tag = hex::decode(tag).ok()?;
        let mut mac = self.mac();
        mac.update(session_id.as_bytes());

        match mac.verify_slice(&tag) {
            Ok(()) => Some(session_id.to_string()),
            Err(_) => {
                debug!("Rejected session cookie with invalid signature");
                None
            }
        }
    }
}
