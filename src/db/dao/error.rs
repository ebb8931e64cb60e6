use sea_orm::DbErr;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum DaoLayerError {
    #[error("Database error: {0}")]
    Db(#[from] DbErr),
    #[error("{entity} not found (id={id})")]
    NotFound { entity: &'static str, id: Uuid },
    #[error("{entity} not found (name={name})")]
    NotFoundByName { entity: &'static str, name: String },
}

pub type DaoResult<T> = Result<T, DaoLayerError>;
