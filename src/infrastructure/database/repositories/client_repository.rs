//! SeaORM implementation of ClientRepository

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, NotSet, QueryOrder, Set};
use tracing::info;

use super::db_err;
use crate::domain::client::{Client, ClientRepository, NewClient};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::client;
use crate::shared::money::{from_db, to_db};

pub(super) fn client_to_domain(m: client::Model) -> DomainResult<Client> {
    Ok(Client {
        id: m.id,
        account_balance: from_db("clients.account_balance", &m.account_balance)?,
        name: m.name,
        email: m.email,
        phone: m.phone,
        version: m.version,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

pub struct SeaOrmClientRepository {
    db: DatabaseConnection,
}

impl SeaOrmClientRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ClientRepository for SeaOrmClientRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Client>> {
        let model = client::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        model.map(client_to_domain).transpose()
    }

    async fn find_all(&self) -> DomainResult<Vec<Client>> {
        let models = client::Entity::find()
            .order_by_asc(client::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(client_to_domain).collect()
    }

    async fn save(&self, c: NewClient) -> DomainResult<Client> {
        let now = Utc::now();
        let model = client::ActiveModel {
            id: NotSet,
            name: Set(c.name),
            email: Set(c.email),
            phone: Set(c.phone),
            account_balance: Set(to_db(Decimal::ZERO)),
            version: Set(1),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let inserted = model.insert(&self.db).await.map_err(db_err)?;
        info!(client_id = inserted.id, "Client created");
        client_to_domain(inserted)
    }
}
