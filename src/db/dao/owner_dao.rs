use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, Statement,
};
use tracing::info;

use super::base::insert_stamped;
use super::{DaoBase, DaoLayerError, DaoResult};
use crate::db::entities::{owner, prelude::Owner};

#[derive(Clone)]
pub struct OwnerDao {
    db: DatabaseConnection,
}

impl DaoBase for OwnerDao {
    type Entity = Owner;
    const ENTITY_NAME: &'static str = "Owner";

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl OwnerDao {
    pub async fn count_owners(&self) -> DaoResult<u64> {
        Owner::find()
            .count(&self.db)
            .await
            .map_err(DaoLayerError::Db)
    }
}

pub(crate) async fn find_owner_by_name<C>(conn: &C, name: &str) -> DaoResult<Option<owner::Model>>
where
    C: ConnectionTrait,
{
    Owner::find()
        .filter(owner::Column::Name.eq(name))
        .order_by_asc(owner::Column::CreatedAt)
        .one(conn)
        .await
        .map_err(DaoLayerError::Db)
}

/// Exact, case-sensitive match on `name`. Must run inside the transaction
/// that writes the note, so the lookup and the insert commit together.
pub(crate) async fn find_or_create_owner<C>(conn: &C, name: &str) -> DaoResult<owner::Model>
where
    C: ConnectionTrait,
{
    lock_owner_name(conn, name).await?;
    if let Some(existing) = find_owner_by_name(conn, name).await? {
        return Ok(existing);
    }

    let active = owner::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    };
    let created = insert_stamped::<Owner, _>(conn, active).await?;
    info!(owner_id = %created.id, owner = %created.name, "created owner");
    Ok(created)
}

// Postgres only. Held until the surrounding transaction ends, so a second
// writer with the same name sees the first one's owner once it gets the
// lock. SQLite write transactions already run one at a time.
async fn lock_owner_name<C>(conn: &C, name: &str) -> DaoResult<()>
where
    C: ConnectionTrait,
{
    if conn.get_database_backend() != DbBackend::Postgres {
        return Ok(());
    }
    conn.execute_raw(Statement::from_sql_and_values(
        DbBackend::Postgres,
        "SELECT pg_advisory_xact_lock(hashtext($1)::bigint)",
        [name.into()],
    ))
    .await?;
    Ok(())
}
