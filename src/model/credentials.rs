use std::fmt;

use serde::{Deserialize, Serialize};

/// Connection details for one organization and project.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Credentials {
    pub organization: String,
    pub project: String,
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub area_path: String,
    /// Personal access token
    pub token: String,
    /// The user's identity, used for "assigned to me" queries and notifications
    #[serde(default)]
    pub username: String,
}

impl Credentials {
    /// True when every field required to connect is present.
    pub fn is_complete(&self) -> bool {
        [&self.organization, &self.project, &self.token, &self.username]
            .iter()
            .all(|v| !v.trim().is_empty())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("organization", &self.organization)
            .field("project", &self.project)
            .field("team", &self.team)
            .field("area_path", &self.area_path)
            .field("token", &"<redacted>")
            .field("username", &self.username)
            .finish()
    }
}
