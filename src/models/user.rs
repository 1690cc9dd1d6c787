use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Stored account document (`users` collection).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub email: String,
    pub password: String, // bcrypt hash
}

impl User {
    pub fn id_hex(&self) -> Option<String> {
        self.id.map(|id| id.to_hex())
    }

    pub fn public(&self) -> PublicUser {
        PublicUser {
            full_name: self.full_name.clone(),
            email: self.email.clone(),
        }
    }
}

/// Fields of a user that are safe to return to clients.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, utoipa::ToSchema)]
pub struct PublicUser {
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_projection_hides_password() {
        let user = User {
            id: Some(ObjectId::new()),
            full_name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "$2b$10$hash".to_string(),
        };

        let json = serde_json::to_value(user.public()).unwrap();
        assert_eq!(json["fullName"], "Ada Lovelace");
        assert_eq!(json["email"], "ada@example.com");
        assert!(json.get("password").is_none());
    }
}
