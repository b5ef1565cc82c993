//! Client repository interface
//!
//! Balance mutations are not exposed here: they happen inside the invoice
//! and payment units of work so they commit together with the invoice.

use async_trait::async_trait;

use super::model::{Client, NewClient};
use crate::domain::DomainResult;

#[async_trait]
pub trait ClientRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Client>>;
    async fn find_all(&self) -> DomainResult<Vec<Client>>;
    async fn save(&self, client: NewClient) -> DomainResult<Client>;
}
