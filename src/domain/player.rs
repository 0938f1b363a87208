//! Player (team member / account holder).

use crate::domain::validation::Violations;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Player {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Body of `POST /api/Player` and `PUT /api/Player/{id}`.
///
/// `id` is only meaningful on update, where it must match the path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub photo_url: Option<String>,
}

impl PlayerInput {
    /// Trim text fields and turn a blank photo into `None`.
    pub fn normalized(mut self) -> Self {
        self.email = self.email.trim().to_string();
        self.first_name = self.first_name.trim().to_string();
        self.last_name = self.last_name.trim().to_string();
        self.position = self.position.trim().to_string();
        self.photo_url = self.photo_url.filter(|p| !p.trim().is_empty());
        self
    }

    /// # Errors
    /// Returns every violated constraint.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut v = Violations::new();
        v.required("Email", &self.email, 255);
        if !self.email.trim().is_empty() && !looks_like_email(&self.email) {
            v.push("Email must be a valid email address");
        }
        v.required("FirstName", &self.first_name, 50);
        v.required("LastName", &self.last_name, 50);
        v.required("Position", &self.position, 20);
        v.into_result()
    }
}

/// Player as the client keeps it in its roster and local store.
///
/// Ids are strings: server ids are stringified, and players created while
/// the API was unreachable get a millisecond timestamp instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterPlayer {
    pub id: String,
    pub name: String,
    pub position: String,
    #[serde(default)]
    pub photo: Option<String>,
}

impl From<&Player> for RosterPlayer {
    fn from(player: &Player) -> Self {
        RosterPlayer {
            id: player.id.to_string(),
            name: player.full_name(),
            position: player.position.clone(),
            photo: player.photo_url.clone(),
        }
    }
}

fn looks_like_email(s: &str) -> bool {
    match s.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}
