//! Signed session tokens.
//!
//! A token is `base64url(claims json) "." hex(hmac-sha256(payload))`. The
//! claims carry everything route guards and pages need, so a request never
//! has to touch the database just to find out who is asking.

use base64::prelude::*;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::{
    constants::{Permissions, Role},
    models::User,
};

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// User id.
    pub sub: u64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub player_id: Option<u64>,
    pub cpf: Option<String>,
    /// Expiry, unix seconds.
    pub exp: i64,
}

impl Session {
    pub fn for_user(user: &User, player_id: Option<u64>, now: i64, ttl_secs: i64) -> Self {
        Self {
            sub: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role(),
            player_id,
            cpf: user.cpf.clone(),
            exp: now + ttl_secs,
        }
    }

    pub fn permissions(&self) -> Permissions {
        self.role.permissions()
    }

    pub fn is_committee(&self) -> bool {
        self.role == Role::Committee
    }
}

fn signature(secret: &str, payload: &str) -> Option<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(payload.as_bytes());
    Some(mac)
}

pub fn sign(session: &Session, secret: &str) -> Option<String> {
    let claims = serde_json::to_vec(session).ok()?;
    let payload = BASE64_URL_SAFE_NO_PAD.encode(claims);
    let mac = signature(secret, &payload)?;

    Some(format!(
        "{payload}.{}",
        hex::encode(mac.finalize().into_bytes())
    ))
}

/// Returns the session if the signature matches and it has not expired.
pub fn verify(token: &str, secret: &str, now: i64) -> Option<Session> {
    let (payload, sig) = token.split_once('.')?;
    let sig = hex::decode(sig).ok()?;

    signature(secret, payload)?.verify_slice(&sig).ok()?;

    let claims = BASE64_URL_SAFE_NO_PAD.decode(payload).ok()?;
    let session: Session = serde_json::from_slice(&claims).ok()?;

    if session.exp <= now {
        return None;
    }

    Some(session)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    fn session(role: Role, exp: i64) -> Session {
        Session {
            sub: 7,
            name: "João Silva".into(),
            email: "joao@example.com".into(),
            role,
            player_id: Some(3),
            cpf: Some("52998224725".into()),
            exp,
        }
    }

    #[test]
    fn round_trips_claims() {
        let original = session(Role::Committee, 2_000);
        let token = sign(&original, SECRET).unwrap();

        assert_eq!(verify(&token, SECRET, 1_000), Some(original));
    }

    #[test]
    fn rejects_expired() {
        let token = sign(&session(Role::Player, 1_000), SECRET).unwrap();

        assert_eq!(verify(&token, SECRET, 1_000), None);
        assert_eq!(verify(&token, SECRET, 5_000), None);
    }

    #[test]
    fn rejects_wrong_secret() {
        let token = sign(&session(Role::Player, 2_000), SECRET).unwrap();

        assert_eq!(verify(&token, "other-secret", 1_000), None);
    }

    #[test]
    fn rejects_role_escalation() {
        let token = sign(&session(Role::Player, 2_000), SECRET).unwrap();
        let (_, sig) = token.split_once('.').unwrap();

        let forged_claims = serde_json::to_vec(&session(Role::Committee, 2_000)).unwrap();
        let forged = format!("{}.{sig}", BASE64_URL_SAFE_NO_PAD.encode(forged_claims));

        assert_eq!(verify(&forged, SECRET, 1_000), None);
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(verify("", SECRET, 0), None);
        assert_eq!(verify("abc", SECRET, 0), None);
        assert_eq!(verify("abc.zz", SECRET, 0), None);
        assert_eq!(verify("abc.00", SECRET, 0), None);
    }
}
