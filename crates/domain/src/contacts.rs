//! Services for client-owned contact records.

use store::entities::{IdentityDocument, PhoneNumber, SocialAccount};
use store::{ClientStore, ContactStore};
use common::{ClientId, DocumentId, PhoneId, SocialAccountId};

use crate::{DomainError, validate};

#[derive(Debug, Clone)]
pub struct NewPhone {
    pub number: String,
    pub kind: String,
}

#[derive(Debug, Clone)]
pub struct NewSocialAccount {
    pub network: String,
    pub username: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewDocument {
    pub kind: String,
    pub number: String,
}

/// Service for client phone numbers.
#[derive(Clone)]
pub struct PhoneService<S> {
    store: S,
}

impl<S: ClientStore + ContactStore> PhoneService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Attaches a phone number to an existing client.
    pub async fn create(
        &self,
        client_id: ClientId,
        input: NewPhone,
    ) -> Result<PhoneNumber, DomainError> {
        self.store.get_client(client_id).await?;
        validate::phone_number(&input.number)?;
        validate::non_blank("kind", &input.kind)?;
        Ok(self
            .store
            .insert_phone(PhoneNumber::new(client_id, input.number, input.kind))
            .await?)
    }

    pub async fn update(&self, id: PhoneId, input: NewPhone) -> Result<PhoneNumber, DomainError> {
        let existing = self.store.get_phone(id).await?;
        validate::phone_number(&input.number)?;
        validate::non_blank("kind", &input.kind)?;
        Ok(self
            .store
            .update_phone(PhoneNumber {
                number: input.number,
                kind: input.kind,
                ..existing
            })
            .await?)
    }

    pub async fn get(&self, id: PhoneId) -> Result<PhoneNumber, DomainError> {
        Ok(self.store.get_phone(id).await?)
    }

    pub async fn list(&self, only_active: bool) -> Result<Vec<PhoneNumber>, DomainError> {
        Ok(self.store.list_phones(only_active).await?)
    }

    pub async fn for_client(&self, client_id: ClientId) -> Result<Vec<PhoneNumber>, DomainError> {
        self.store.get_client(client_id).await?;
        Ok(self.store.phones_for_client(client_id).await?)
    }

    pub async fn search(&self, needle: &str) -> Result<Vec<PhoneNumber>, DomainError> {
        Ok(self.store.search_phones(needle).await?)
    }

    pub async fn deactivate(&self, id: PhoneId) -> Result<PhoneNumber, DomainError> {
        let mut phone = self.store.get_phone(id).await?;
        phone.active = false;
        Ok(self.store.update_phone(phone).await?)
    }
}

/// Service for client social network accounts.
#[derive(Clone)]
pub struct SocialAccountService<S> {
    store: S,
}

impl<S: ClientStore + ContactStore> SocialAccountService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        client_id: ClientId,
        input: NewSocialAccount,
    ) -> Result<SocialAccount, DomainError> {
        self.store.get_client(client_id).await?;
        validate::non_blank("network", &input.network)?;
        validate::non_blank("username", &input.username)?;
        if let Some(url) = &input.url {
            validate::url(url)?;
        }
        Ok(self
            .store
            .insert_social(SocialAccount::new(
                client_id,
                input.network,
                input.username,
                input.url,
            ))
            .await?)
    }

    pub async fn update(
        &self,
        id: SocialAccountId,
        input: NewSocialAccount,
    ) -> Result<SocialAccount, DomainError> {
        let existing = self.store.get_social(id).await?;
        validate::non_blank("network", &input.network)?;
        validate::non_blank("username", &input.username)?;
        if let Some(url) = &input.url {
            validate::url(url)?;
        }
        Ok(self
            .store
            .update_social(SocialAccount {
                network: input.network,
                username: input.username,
                url: input.url,
                ..existing
            })
            .await?)
    }

    pub async fn get(&self, id: SocialAccountId) -> Result<SocialAccount, DomainError> {
        Ok(self.store.get_social(id).await?)
    }

    pub async fn list(&self, only_active: bool) -> Result<Vec<SocialAccount>, DomainError> {
        Ok(self.store.list_socials(only_active).await?)
    }

    pub async fn for_client(&self, client_id: ClientId) -> Result<Vec<SocialAccount>, DomainError> {
        self.store.get_client(client_id).await?;
        Ok(self.store.socials_for_client(client_id).await?)
    }

    pub async fn by_network(&self, network: &str) -> Result<Vec<SocialAccount>, DomainError> {
        Ok(self.store.socials_by_network(network).await?)
    }

    pub async fn deactivate(&self, id: SocialAccountId) -> Result<SocialAccount, DomainError> {
        let mut social = self.store.get_social(id).await?;
        social.active = false;
        Ok(self.store.update_social(social).await?)
    }
}

/// Service for client identity documents.
#[derive(Clone)]
pub struct DocumentService<S> {
    store: S,
}

impl<S: ClientStore + ContactStore> DocumentService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Attaches an identity document to an existing client. The number must
    /// be unique across the whole client population.
    pub async fn create(
        &self,
        client_id: ClientId,
        input: NewDocument,
    ) -> Result<IdentityDocument, DomainError> {
        self.store.get_client(client_id).await?;
        validate::non_blank("kind", &input.kind)?;
        validate::non_blank("number", &input.number)?;
        if self.store.document_number_exists(&input.number, None).await? {
            return Err(DomainError::Conflict(format!(
                "a document with number {} already exists",
                input.number
            )));
        }
        Ok(self
            .store
            .insert_document(IdentityDocument::new(client_id, input.kind, input.number))
            .await?)
    }

    /// Updates a document, re-checking number uniqueness against every
    /// other document.
    pub async fn update(
        &self,
        id: DocumentId,
        input: NewDocument,
    ) -> Result<IdentityDocument, DomainError> {
        let existing = self.store.get_document(id).await?;
        validate::non_blank("kind", &input.kind)?;
        validate::non_blank("number", &input.number)?;
        if input.number != existing.number
            && self
                .store
                .document_number_exists(&input.number, Some(id))
                .await?
        {
            return Err(DomainError::Conflict(format!(
                "a document with number {} already exists",
                input.number
            )));
        }
        Ok(self
            .store
            .update_document(IdentityDocument {
                kind: input.kind,
                number: input.number,
                ..existing
            })
            .await?)
    }

    pub async fn get(&self, id: DocumentId) -> Result<IdentityDocument, DomainError> {
        Ok(self.store.get_document(id).await?)
    }

    pub async fn list(&self, only_active: bool) -> Result<Vec<IdentityDocument>, DomainError> {
        Ok(self.store.list_documents(only_active).await?)
    }

    pub async fn for_client(
        &self,
        client_id: ClientId,
    ) -> Result<Vec<IdentityDocument>, DomainError> {
        self.store.get_client(client_id).await?;
        Ok(self.store.documents_for_client(client_id).await?)
    }

    pub async fn find_by_number(
        &self,
        number: &str,
    ) -> Result<Option<IdentityDocument>, DomainError> {
        Ok(self.store.find_document_by_number(number).await?)
    }

    pub async fn deactivate(&self, id: DocumentId) -> Result<IdentityDocument, DomainError> {
        let mut document = self.store.get_document(id).await?;
        document.active = false;
        Ok(self.store.update_document(document).await?)
    }
}
