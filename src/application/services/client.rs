use std::sync::Arc;

use crate::domain::client::{Client, NewClient};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

/// Client registry used by the billing core
pub struct ClientService {
    repos: Arc<dyn RepositoryProvider>,
}

impl ClientService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn create_client(&self, client: NewClient) -> DomainResult<Client> {
        if client.name.trim().is_empty() {
            return Err(DomainError::Validation("client name is required".to_string()));
        }
        self.repos.clients().save(client).await
    }

    pub async fn get_client(&self, id: i32) -> DomainResult<Client> {
        self.repos
            .clients()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Client", id))
    }

    pub async fn list_clients(&self) -> DomainResult<Vec<Client>> {
        self.repos.clients().find_all().await
    }
}
