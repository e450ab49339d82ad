use chrono::{DateTime, Utc};
use common::{ClientId, DocumentId, PhoneId, SocialAccountId};
use serde::{Deserialize, Serialize};

/// A client of the business.
///
/// Email is unique across all clients; uniqueness is checked by the domain
/// layer via [`crate::ClientStore::client_email_exists`] before writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub address: String,
    pub active: bool,
    /// Set once at creation, immutable thereafter.
    pub registered_at: DateTime<Utc>,
    pub notes: Option<String>,
}

impl Client {
    /// Creates a new active client with a fresh id and the registration
    /// timestamp stamped server-side.
    pub fn new(
        name: impl Into<String>,
        surname: impl Into<String>,
        email: impl Into<String>,
        address: impl Into<String>,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: ClientId::new(),
            name: name.into(),
            surname: surname.into(),
            email: email.into(),
            address: address.into(),
            active: true,
            registered_at: Utc::now(),
            notes,
        }
    }

    /// Returns "name surname" for display and substring search.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }
}

/// A phone number owned by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneNumber {
    pub id: PhoneId,
    pub client_id: ClientId,
    pub number: String,
    /// Free-text tag: "mobile", "work", etc.
    pub kind: String,
    pub active: bool,
}

impl PhoneNumber {
    pub fn new(client_id: ClientId, number: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: PhoneId::new(),
            client_id,
            number: number.into(),
            kind: kind.into(),
            active: true,
        }
    }
}

/// A social network account owned by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialAccount {
    pub id: SocialAccountId,
    pub client_id: ClientId,
    pub network: String,
    pub username: String,
    pub url: Option<String>,
    pub active: bool,
}

impl SocialAccount {
    pub fn new(
        client_id: ClientId,
        network: impl Into<String>,
        username: impl Into<String>,
        url: Option<String>,
    ) -> Self {
        Self {
            id: SocialAccountId::new(),
            client_id,
            network: network.into(),
            username: username.into(),
            url,
            active: true,
        }
    }
}

/// An identity document owned by a client.
///
/// The document number is unique across the whole client population.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityDocument {
    pub id: DocumentId,
    pub client_id: ClientId,
    /// Free-text tag: "national-id", "tax-id", etc.
    pub kind: String,
    pub number: String,
    pub active: bool,
}

impl IdentityDocument {
    pub fn new(client_id: ClientId, kind: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            id: DocumentId::new(),
            client_id,
            kind: kind.into(),
            number: number.into(),
            active: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_client_is_active_with_fresh_id() {
        let a = Client::new("Ana", "Pérez", "ana@example.com", "Av. Siempreviva 742", None);
        let b = Client::new("Ana", "Pérez", "ana2@example.com", "", None);
        assert!(a.active);
        assert_ne!(a.id, b.id);
        assert_eq!(a.full_name(), "Ana Pérez");
    }

    #[test]
    fn contacts_reference_their_owner() {
        let client = Client::new("Ana", "Pérez", "ana@example.com", "", None);
        let phone = PhoneNumber::new(client.id, "+54 11 1234-5678", "mobile");
        let doc = IdentityDocument::new(client.id, "national-id", "30123456");
        assert_eq!(phone.client_id, client.id);
        assert_eq!(doc.client_id, client.id);
        assert!(phone.active);
        assert!(doc.active);
    }
}
