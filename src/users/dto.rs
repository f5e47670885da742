use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user_id: Uuid,
}

/// Multipart signup form after the upload filter has run.
#[derive(Debug, Default)]
pub struct SignupForm {
    pub full_name: Option<String>,
    pub email: String,
    pub password: String,
    pub username: Option<String>,
    pub brief: Option<String>,
    pub location: Option<String>,
    pub image: Option<Bytes>,
}

impl SignupForm {
    /// Stores a text part under its form name; unknown names are ignored.
    ///
    /// Emails are trimmed and lowercased, so `A@x.com` and `a@x.com` name the
    /// same account; login applies the same rule. Blank optional fields are
    /// stored as `None` rather than verbatim. The password is kept as sent.
    pub fn set_text(&mut self, name: &str, value: String) {
        match name {
            "fullName" => self.full_name = non_blank(value),
            "email" => self.email = value.trim().to_lowercase(),
            "password" => self.password = value,
            "username" => self.username = non_blank(value),
            "brief" => self.brief = non_blank(value),
            "location" => self.location = non_blank(value),
            _ => {}
        }
    }
}

fn non_blank(value: String) -> Option<String> {
    Some(value).filter(|v| !v.trim().is_empty())
}
