use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    IntoActiveModel, PrimaryKeyTrait, QueryOrder,
};
use uuid::Uuid;

use super::base_traits::{HasBaseColumns, HasIdActiveModel, TimestampedActiveModel};
use super::error::{DaoLayerError, DaoResult};

/// Inserts `active` on any connection, including an open transaction,
/// assigning a fresh id and both timestamps.
pub(crate) async fn insert_stamped<E, C>(conn: &C, mut active: E::ActiveModel) -> DaoResult<E::Model>
where
    E: EntityTrait,
    C: ConnectionTrait,
    E::Model: IntoActiveModel<E::ActiveModel>,
    E::ActiveModel: HasIdActiveModel + TimestampedActiveModel + Send,
{
    let now = Utc::now().fixed_offset();
    active.set_id(Uuid::new_v4());
    active.set_created_at(now);
    active.set_updated_at(now);
    active.insert(conn).await.map_err(DaoLayerError::Db)
}

/// Writes the changed columns of `active` and bumps `updated_at`.
/// `created_at` is never touched here.
pub(crate) async fn update_stamped<E, C>(conn: &C, mut active: E::ActiveModel) -> DaoResult<E::Model>
where
    E: EntityTrait,
    C: ConnectionTrait,
    E::Model: IntoActiveModel<E::ActiveModel>,
    E::ActiveModel: TimestampedActiveModel + Send,
{
    active.set_updated_at(Utc::now().fixed_offset());
    active.update(conn).await.map_err(DaoLayerError::Db)
}

#[async_trait::async_trait]
pub trait DaoBase: Clone + Send + Sync + Sized
where
    <Self::Entity as EntityTrait>::Model:
        FromQueryResult + IntoActiveModel<<Self::Entity as EntityTrait>::ActiveModel> + Send + Sync,
    <Self::Entity as EntityTrait>::ActiveModel:
        ActiveModelTrait<Entity = Self::Entity> + HasIdActiveModel + TimestampedActiveModel + Send,
    <<Self::Entity as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType:
        From<Uuid> + Send + Sync,
    Self::Entity: HasBaseColumns,
{
    type Entity: EntityTrait + Send + Sync;
    const ENTITY_NAME: &'static str;

    fn new(db: &DatabaseConnection) -> Self;

    fn db(&self) -> &DatabaseConnection;

    fn not_found(id: Uuid) -> DaoLayerError {
        DaoLayerError::NotFound {
            entity: Self::ENTITY_NAME,
            id,
        }
    }

    async fn create(
        &self,
        data: impl IntoActiveModel<<Self::Entity as EntityTrait>::ActiveModel> + Send,
    ) -> DaoResult<<Self::Entity as EntityTrait>::Model> {
        insert_stamped::<Self::Entity, _>(self.db(), data.into_active_model()).await
    }

    async fn find_by_id(&self, id: Uuid) -> DaoResult<<Self::Entity as EntityTrait>::Model> {
        let model = Self::Entity::find_by_id(id)
            .one(self.db())
            .await
            .map_err(DaoLayerError::Db)?;

        model.ok_or_else(|| Self::not_found(id))
    }

    /// Every row in one query, oldest first. Rows created in the same
    /// instant fall back to id order.
    async fn find_all(&self) -> DaoResult<Vec<<Self::Entity as EntityTrait>::Model>> {
        Self::Entity::find()
            .order_by_asc(Self::Entity::created_at_column())
            .order_by_asc(Self::Entity::id_column())
            .all(self.db())
            .await
            .map_err(DaoLayerError::Db)
    }

    async fn delete(&self, id: Uuid) -> DaoResult<Uuid> {
        let result = Self::Entity::delete_by_id(id)
            .exec(self.db())
            .await
            .map_err(DaoLayerError::Db)?;

        if result.rows_affected == 0 {
            return Err(Self::not_found(id));
        }

        Ok(id)
    }
}
