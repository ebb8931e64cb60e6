use sea_orm::DatabaseConnection;

use super::{DaoBase, NoteDao, OwnerDao, TopicDao};

#[derive(Clone)]
pub struct DaoContext {
    db: DatabaseConnection,
}

impl DaoContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    pub fn note(&self) -> NoteDao {
        DaoBase::new(&self.db)
    }

    pub fn owner(&self) -> OwnerDao {
        DaoBase::new(&self.db)
    }

    pub fn topic(&self) -> TopicDao {
        DaoBase::new(&self.db)
    }
}
