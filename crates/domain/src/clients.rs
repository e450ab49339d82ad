//! Client service: validation, uniqueness and logical deletion.

use store::entities::{Client, IdentityDocument, PhoneNumber, SocialAccount};
use store::{ClientStore, ContactStore};
use common::ClientId;

use crate::contacts::{NewDocument, NewPhone, NewSocialAccount};
use crate::{DomainError, validate};

/// Input for creating a client, with optional owned contact collections
/// created alongside it.
#[derive(Debug, Clone, Default)]
pub struct NewClient {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub address: String,
    pub notes: Option<String>,
    pub phones: Vec<NewPhone>,
    pub social_accounts: Vec<NewSocialAccount>,
    pub documents: Vec<NewDocument>,
}

/// Scalar-field update for an existing client. Contacts are managed through
/// their own services.
#[derive(Debug, Clone)]
pub struct ClientUpdate {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub address: String,
    pub notes: Option<String>,
}

/// Service for managing clients.
#[derive(Clone)]
pub struct ClientService<S> {
    store: S,
}

impl<S: ClientStore + ContactStore> ClientService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Creates a client together with its contact collections.
    ///
    /// Email must be unique across all clients, and every supplied document
    /// number unique across all documents.
    #[tracing::instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create(&self, input: NewClient) -> Result<Client, DomainError> {
        validate::non_blank("name", &input.name)?;
        validate::non_blank("surname", &input.surname)?;
        validate::non_blank("email", &input.email)?;

        if self.store.client_email_exists(&input.email, None).await? {
            return Err(DomainError::Conflict(format!(
                "a client with email {} already exists",
                input.email
            )));
        }

        for phone in &input.phones {
            validate::phone_number(&phone.number)?;
        }
        for social in &input.social_accounts {
            validate::non_blank("network", &social.network)?;
            if let Some(url) = &social.url {
                validate::url(url)?;
            }
        }
        for document in &input.documents {
            validate::non_blank("document number", &document.number)?;
            if self
                .store
                .document_number_exists(&document.number, None)
                .await?
            {
                return Err(DomainError::Conflict(format!(
                    "a client with document {} already exists",
                    document.number
                )));
            }
        }

        let client = self
            .store
            .insert_client(Client::new(
                input.name,
                input.surname,
                input.email,
                input.address,
                input.notes,
            ))
            .await?;

        for phone in input.phones {
            self.store
                .insert_phone(PhoneNumber::new(client.id, phone.number, phone.kind))
                .await?;
        }
        for social in input.social_accounts {
            self.store
                .insert_social(SocialAccount::new(
                    client.id,
                    social.network,
                    social.username,
                    social.url,
                ))
                .await?;
        }
        for document in input.documents {
            self.store
                .insert_document(IdentityDocument::new(
                    client.id,
                    document.kind,
                    document.number,
                ))
                .await?;
        }

        Ok(client)
    }

    /// Updates a client's scalar fields.
    ///
    /// Email uniqueness is re-checked only when the email actually changes,
    /// so saving a client back with its own email never conflicts.
    #[tracing::instrument(skip(self, update))]
    pub async fn update(&self, id: ClientId, update: ClientUpdate) -> Result<Client, DomainError> {
        let existing = self.store.get_client(id).await?;

        validate::non_blank("name", &update.name)?;
        validate::non_blank("surname", &update.surname)?;
        validate::non_blank("email", &update.email)?;

        if !update.email.eq_ignore_ascii_case(&existing.email)
            && self
                .store
                .client_email_exists(&update.email, Some(id))
                .await?
        {
            return Err(DomainError::Conflict(format!(
                "a client with email {} already exists",
                update.email
            )));
        }

        let updated = Client {
            id: existing.id,
            name: update.name,
            surname: update.surname,
            email: update.email,
            address: update.address,
            active: existing.active,
            registered_at: existing.registered_at,
            notes: update.notes,
        };
        Ok(self.store.update_client(updated).await?)
    }

    pub async fn get(&self, id: ClientId) -> Result<Client, DomainError> {
        Ok(self.store.get_client(id).await?)
    }

    pub async fn list(&self, only_active: bool) -> Result<Vec<Client>, DomainError> {
        Ok(self.store.list_clients(only_active).await?)
    }

    pub async fn search(&self, needle: &str) -> Result<Vec<Client>, DomainError> {
        Ok(self.store.search_clients(needle).await?)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Client>, DomainError> {
        Ok(self.store.find_client_by_email(email).await?)
    }

    /// Looks up the client owning the document with the given number.
    pub async fn find_by_document(&self, number: &str) -> Result<Option<Client>, DomainError> {
        match self.store.find_document_by_number(number).await? {
            Some(document) => Ok(Some(self.store.get_client(document.client_id).await?)),
            None => Ok(None),
        }
    }

    /// Logical deletion: flips the active flag and cascades the
    /// deactivation to the client's phones, social accounts and documents.
    #[tracing::instrument(skip(self))]
    pub async fn deactivate(&self, id: ClientId) -> Result<Client, DomainError> {
        let mut client = self.store.get_client(id).await?;
        client.active = false;
        let client = self.store.update_client(client).await?;

        for mut phone in self.store.phones_for_client(id).await? {
            phone.active = false;
            self.store.update_phone(phone).await?;
        }
        for mut social in self.store.socials_for_client(id).await? {
            social.active = false;
            self.store.update_social(social).await?;
        }
        for mut document in self.store.documents_for_client(id).await? {
            document.active = false;
            self.store.update_document(document).await?;
        }

        Ok(client)
    }
}
