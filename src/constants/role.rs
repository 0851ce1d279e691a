use bitflags::bitflags;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "comissao")]
    Committee,
    #[serde(rename = "jogador")]
    Player,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Committee => "comissao",
            Role::Player => "jogador",
        }
    }

    /// Unknown values fall back to the least privileged role.
    pub fn from_db(role: &str) -> Self {
        match role {
            "comissao" => Role::Committee,
            _ => Role::Player,
        }
    }

    pub fn parse(role: &str) -> Option<Self> {
        match role.trim() {
            "comissao" => Some(Role::Committee),
            "jogador" => Some(Role::Player),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Committee => "Comissão",
            Role::Player => "Jogador",
        }
    }

    pub fn permissions(&self) -> Permissions {
        match self {
            Role::Committee => Permissions::all(),
            Role::Player => Permissions::VIEW,
        }
    }
}

bitflags! {
    #[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct Permissions: u32 {
        const VIEW            = 1 << 0;
        const MANAGE_MEMBERS  = 1 << 1;
        const MANAGE_FINANCES = 1 << 2;
        const MANAGE_ACCESS   = 1 << 3;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn committee_holds_every_permission() {
        let perms = Role::Committee.permissions();

        assert!(perms.contains(Permissions::VIEW));
        assert!(perms.contains(Permissions::MANAGE_ACCESS | Permissions::MANAGE_FINANCES));
    }

    #[test]
    fn player_can_only_view() {
        let perms = Role::Player.permissions();

        assert!(perms.contains(Permissions::VIEW));
        assert!(!perms.intersects(
            Permissions::MANAGE_MEMBERS | Permissions::MANAGE_FINANCES | Permissions::MANAGE_ACCESS
        ));
    }

    #[test]
    fn role_strings() {
        assert_eq!(Role::from_db("comissao"), Role::Committee);
        assert_eq!(Role::from_db("admin"), Role::Player);
        assert_eq!(Role::parse("jogador"), Some(Role::Player));
        assert_eq!(Role::parse("admin"), None);
        assert_eq!(serde_json::to_string(&Role::Committee).unwrap(), "\"comissao\"");
    }
}
