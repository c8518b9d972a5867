use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Read-only projection of a row in `users`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub age: i32,
    pub country_code: String,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime, // listing order key
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn serializes_every_column() {
        let user = User {
            id: Uuid::parse_str("5f0c1c2e-8a8e-4b5e-9a43-2f0f8d2c8a11").unwrap(),
            email: "ada@example.com".into(),
            full_name: "Ada Lovelace".into(),
            age: 36,
            country_code: "GB".into(),
            is_active: true,
            created_at: datetime!(2024-03-01 12:30:00 UTC),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["id"], "5f0c1c2e-8a8e-4b5e-9a43-2f0f8d2c8a11");
        assert_eq!(json["email"], "ada@example.com");
        assert_eq!(json["full_name"], "Ada Lovelace");
        assert_eq!(json["age"], 36);
        assert_eq!(json["country_code"], "GB");
        assert_eq!(json["is_active"], true);
        assert_eq!(json["created_at"], "2024-03-01T12:30:00Z");
        assert_eq!(json.as_object().unwrap().len(), 7);
    }
}
