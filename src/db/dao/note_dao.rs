use std::collections::HashMap;

use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbBackend,
    EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, Set, SqliteTransactionMode,
    TransactionOptions, TransactionTrait,
};
use tracing::{debug, warn};
use uuid::Uuid;

use super::base::{insert_stamped, update_stamped};
use super::owner_dao::find_or_create_owner;
use super::topic_dao::find_topic_by_name;
use super::{DaoBase, DaoLayerError, DaoResult};
use crate::db::entities::prelude::{Note, Owner, Topic};
use crate::db::entities::{note, owner, topic};
use crate::db::seed::DEFAULT_TOPICS;

/// A note together with the rows it references.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoteRecord {
    pub note: note::Model,
    pub owner: owner::Model,
    pub topic: topic::Model,
}

#[derive(Clone)]
pub struct NoteDao {
    db: DatabaseConnection,
}

impl DaoBase for NoteDao {
    type Entity = Note;
    const ENTITY_NAME: &'static str = "Note";

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl NoteDao {
    pub async fn list_notes(&self) -> DaoResult<Vec<NoteRecord>> {
        let notes = self.find_all().await?;
        if notes.is_empty() {
            return Ok(Vec::new());
        }

        let mut owner_ids: Vec<Uuid> = notes.iter().map(|note| note.owner_id).collect();
        owner_ids.sort_unstable();
        owner_ids.dedup();
        let mut topic_ids: Vec<Uuid> = notes.iter().map(|note| note.topic_id).collect();
        topic_ids.sort_unstable();
        topic_ids.dedup();

        let owners: HashMap<Uuid, owner::Model> = Owner::find()
            .filter(owner::Column::Id.is_in(owner_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|owner| (owner.id, owner))
            .collect();
        let topics: HashMap<Uuid, topic::Model> = Topic::find()
            .filter(topic::Column::Id.is_in(topic_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|topic| (topic.id, topic))
            .collect();

        let mut records = Vec::with_capacity(notes.len());
        for note in notes {
            let (Some(owner), Some(topic)) =
                (owners.get(&note.owner_id), topics.get(&note.topic_id))
            else {
                warn!(note_id = %note.id, "skipping note with dangling owner or topic");
                continue;
            };
            records.push(NoteRecord {
                owner: owner.clone(),
                topic: topic.clone(),
                note,
            });
        }
        Ok(records)
    }

    pub async fn find_note(&self, id: &Uuid) -> DaoResult<NoteRecord> {
        let note = self.find_by_id(*id).await?;
        load_relations(&self.db, note).await
    }

    pub async fn count_notes(&self) -> DaoResult<u64> {
        Note::find()
            .count(&self.db)
            .await
            .map_err(DaoLayerError::Db)
    }

    /// Resolves the owner and stores the note in one transaction. The note
    /// always lands in the first seeded topic.
    pub async fn create_note(
        &self,
        title: &str,
        content: &str,
        owner_name: &str,
    ) -> DaoResult<NoteRecord> {
        let txn = self.begin().await?;

        let default_topic = DEFAULT_TOPICS[0];
        let topic = find_topic_by_name(&txn, default_topic)
            .await?
            .ok_or_else(|| DaoLayerError::NotFoundByName {
                entity: "Topic",
                name: default_topic.to_string(),
            })?;
        let owner = find_or_create_owner(&txn, owner_name).await?;

        let active = note::ActiveModel {
            title: Set(title.to_string()),
            content: Set(content.to_string()),
            owner_id: Set(owner.id),
            topic_id: Set(topic.id),
            ..Default::default()
        };
        let note = insert_stamped::<Note, _>(&txn, active).await?;
        txn.commit().await?;

        debug!(note_id = %note.id, owner_id = %owner.id, topic = %topic.name, "stored note");
        Ok(NoteRecord { note, owner, topic })
    }

    /// Rewrites title, content and owner. Topic and `created_at` keep their
    /// stored values.
    pub async fn update_note(
        &self,
        id: &Uuid,
        title: &str,
        content: &str,
        owner_name: &str,
    ) -> DaoResult<NoteRecord> {
        let txn = self.begin().await?;

        let existing = Note::find_by_id(*id)
            .one(&txn)
            .await?
            .ok_or_else(|| Self::not_found(*id))?;
        let owner = find_or_create_owner(&txn, owner_name).await?;

        let mut active = existing.into_active_model();
        active.title = Set(title.to_string());
        active.content = Set(content.to_string());
        active.owner_id = Set(owner.id);
        let note = update_stamped::<Note, _>(&txn, active).await?;
        let topic = Topic::find_by_id(note.topic_id)
            .one(&txn)
            .await?
            .ok_or(DaoLayerError::NotFound {
                entity: "Topic",
                id: note.topic_id,
            })?;
        txn.commit().await?;

        debug!(note_id = %note.id, owner_id = %owner.id, "updated note");
        Ok(NoteRecord { note, owner, topic })
    }

    pub async fn delete_note(&self, id: &Uuid) -> DaoResult<Uuid> {
        self.delete(*id).await
    }

    // A deferred SQLite transaction reads first and then fails to upgrade
    // to a write lock while another writer holds it. IMMEDIATE takes the
    // lock up front, so writers queue on the busy timeout instead.
    async fn begin(&self) -> DaoResult<DatabaseTransaction> {
        let sqlite_transaction_mode = match self.db.get_database_backend() {
            DbBackend::Sqlite => Some(SqliteTransactionMode::Immediate),
            _ => None,
        };
        self.db
            .begin_with_options(TransactionOptions {
                sqlite_transaction_mode,
                ..Default::default()
            })
            .await
            .map_err(DaoLayerError::Db)
    }
}

async fn load_relations<C>(conn: &C, note: note::Model) -> DaoResult<NoteRecord>
where
    C: ConnectionTrait,
{
    let owner = Owner::find_by_id(note.owner_id)
        .one(conn)
        .await?
        .ok_or(DaoLayerError::NotFound {
            entity: "Owner",
            id: note.owner_id,
        })?;
    let topic = Topic::find_by_id(note.topic_id)
        .one(conn)
        .await?
        .ok_or(DaoLayerError::NotFound {
            entity: "Topic",
            id: note.topic_id,
        })?;
    Ok(NoteRecord { note, owner, topic })
}
