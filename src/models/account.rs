use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What the login endpoint reveals about the account.
#[derive(Debug, Clone, Serialize)]
pub struct AccountPublic {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_admin: bool,
}

impl From<Account> for AccountPublic {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            username: account.username,
            email: account.email,
            first_name: account.first_name,
            last_name: account.last_name,
            is_admin: account.is_admin,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SessionToken {
    pub token: String,
    pub account_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_projection_keeps_identity_fields() {
        let account = Account {
            id: Uuid::new_v4(),
            username: "admin".to_string(),
            email: "admin@example.com".to_string(),
            first_name: "Site".to_string(),
            last_name: "Admin".to_string(),
            is_admin: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let public = AccountPublic::from(account.clone());
        assert_eq!(public.id, account.id);
        assert_eq!(public.username, "admin");
        assert!(public.is_admin);

        // Timestamps are not part of the projection
        let json = serde_json::to_value(&public).unwrap();
        assert!(json.get("created_at").is_none());
        assert!(json.get("updated_at").is_none());
    }
}
