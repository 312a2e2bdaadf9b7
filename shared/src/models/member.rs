//! Member Model

use serde::{Deserialize, Serialize};

/// Member role (admin vs. regular member)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Admin,
    #[default]
    Member,
}

/// Member entity — a person tracked by the roster, with or without
/// login credentials.
///
/// `id` is the identity; `email` is the login key and must stay unique
/// across the store (case-insensitive).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub email: String,
    #[serde(default)]
    pub role: MemberRole,
    /// Encoded avatar image (base64 data URL), produced by the avatar
    /// processing service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl Member {
    pub fn is_admin(&self) -> bool {
        self.role == MemberRole::Admin
    }

    /// Case-insensitive email match
    pub fn has_email(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email)
    }
}

/// Update member payload — `None` fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Member {
    /// Apply a partial update, returning the refreshed entity.
    pub fn apply_update(&self, update: &MemberUpdate) -> Member {
        Member {
            id: self.id.clone(),
            name: update.name.clone().unwrap_or_else(|| self.name.clone()),
            phone: update.phone.clone().or_else(|| self.phone.clone()),
            email: update.email.clone().unwrap_or_else(|| self.email.clone()),
            role: self.role,
            avatar: self.avatar.clone(),
        }
    }
}
