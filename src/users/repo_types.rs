use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Serialize, Serializer};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record as held by the store.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,                       // assigned by the store
    pub full_name: Option<String>,
    pub email: String,                  // unique across records
    #[serde(rename = "password")]
    pub password_hash: String,          // Argon2 PHC string, never plaintext
    pub username: Option<String>,
    pub brief: Option<String>,
    pub location: Option<String>,
    #[serde(serialize_with = "serialize_image")]
    pub image: Option<Vec<u8>>,         // PNG bytes
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Fields supplied on signup; the store fills in `id` and `created_at`.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub full_name: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub username: Option<String>,
    pub brief: Option<String>,
    pub location: Option<String>,
    pub image: Option<Vec<u8>>,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("email already registered")]
    Duplicate,
    #[error(transparent)]
    Backend(#[from] sqlx::Error),
}

fn serialize_image<S: Serializer>(image: &Option<Vec<u8>>, s: S) -> Result<S::Ok, S::Error> {
    match image {
        Some(bytes) => s.serialize_str(&STANDARD.encode(bytes)),
        None => s.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_serializes_with_public_field_names() {
        let user = User {
            id: Uuid::new_v4(),
            full_name: Some("A".into()),
            email: "a@x.com".into(),
            password_hash: "$argon2id$v=19$stub".into(),
            username: None,
            brief: None,
            location: Some("Oslo".into()),
            image: Some(vec![1, 2, 3]),
            created_at: OffsetDateTime::UNIX_EPOCH,
        };

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["fullName"], "A");
        assert_eq!(json["password"], "$argon2id$v=19$stub");
        assert_eq!(json["image"], "AQID");
        assert_eq!(json["username"], serde_json::Value::Null);
        assert_eq!(json["createdAt"], "1970-01-01T00:00:00Z");
        assert!(json.get("passwordHash").is_none());
    }
}
