use tracing::info;
use uuid::Uuid;

use crate::{
    db::dao::{NoteDao, NoteRecord},
    error::AppError,
    forms::ValidNote,
    services::crud_service::{CrudErrors, CrudOp, CrudService},
};

#[derive(Clone)]
pub struct NoteService {
    note_dao: NoteDao,
}

impl NoteService {
    pub fn new(note_dao: NoteDao) -> Self {
        Self { note_dao }
    }

    pub async fn list_notes(&self) -> Result<Vec<NoteRecord>, AppError> {
        self.note_dao
            .list_notes()
            .await
            .map_err(|err| self.map_error(CrudOp::List, err))
    }

    pub async fn require_note(&self, id: &Uuid) -> Result<NoteRecord, AppError> {
        self.note_dao
            .find_note(id)
            .await
            .map_err(|err| self.map_error(CrudOp::Find, err))
    }

    pub async fn create_note(&self, input: &ValidNote) -> Result<NoteRecord, AppError> {
        let record = self
            .note_dao
            .create_note(&input.title, &input.content, &input.owner_name)
            .await
            .map_err(|err| self.map_error(CrudOp::Create, err))?;
        info!(note_id = %record.note.id, owner = %record.owner.name, "note created");
        Ok(record)
    }

    pub async fn update_note(&self, id: &Uuid, input: &ValidNote) -> Result<NoteRecord, AppError> {
        let record = self
            .note_dao
            .update_note(id, &input.title, &input.content, &input.owner_name)
            .await
            .map_err(|err| self.map_error(CrudOp::Update, err))?;
        info!(note_id = %record.note.id, owner = %record.owner.name, "note updated");
        Ok(record)
    }

    pub async fn delete_note(&self, id: &Uuid) -> Result<(), AppError> {
        CrudService::delete(self, *id).await?;
        info!(note_id = %id, "note deleted");
        Ok(())
    }
}

impl CrudService for NoteService {
    type Dao = NoteDao;

    fn dao(&self) -> &Self::Dao {
        &self.note_dao
    }

    fn errors(&self) -> CrudErrors {
        CrudErrors {
            create_failed: "Could not save the note",
            find_failed: "Could not load notes",
            not_found: "Note not found",
            update_failed: "Could not update the note",
            delete_failed: "Could not delete the note",
        }
    }
}
