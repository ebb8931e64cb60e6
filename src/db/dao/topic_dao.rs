use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr,
};

use super::{DaoBase, DaoLayerError, DaoResult};
use crate::db::entities::{prelude::Topic, topic};

#[derive(Clone)]
pub struct TopicDao {
    db: DatabaseConnection,
}

impl DaoBase for TopicDao {
    type Entity = Topic;
    const ENTITY_NAME: &'static str = "Topic";

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl TopicDao {
    pub async fn list_topics(&self) -> DaoResult<Vec<topic::Model>> {
        self.find_all().await
    }

    pub async fn find_by_name(&self, name: &str) -> DaoResult<Option<topic::Model>> {
        find_topic_by_name(&self.db, name).await
    }

    /// Returns the topic and whether this call inserted it. A concurrent
    /// insert of the same name surfaces as a unique violation, which is
    /// absorbed by reading the winner's row.
    pub async fn find_or_create_by_name(&self, name: &str) -> DaoResult<(topic::Model, bool)> {
        if let Some(existing) = self.find_by_name(name).await? {
            return Ok((existing, false));
        }

        let active = topic::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        };
        match self.create(active).await {
            Ok(created) => Ok((created, true)),
            Err(DaoLayerError::Db(err))
                if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) =>
            {
                let existing = self.find_by_name(name).await?;
                existing
                    .map(|topic| (topic, false))
                    .ok_or_else(|| DaoLayerError::NotFoundByName {
                        entity: Self::ENTITY_NAME,
                        name: name.to_string(),
                    })
            }
            Err(err) => Err(err),
        }
    }
}

pub(crate) async fn find_topic_by_name<C>(conn: &C, name: &str) -> DaoResult<Option<topic::Model>>
where
    C: ConnectionTrait,
{
    Topic::find()
        .filter(topic::Column::Name.eq(name))
        .one(conn)
        .await
        .map_err(DaoLayerError::Db)
}
