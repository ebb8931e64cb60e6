use uuid::Uuid;

use crate::db::dao::{DaoBase, DaoLayerError};
use crate::error::AppError;

/// Client-facing messages for each kind of failed operation.
#[derive(Clone, Copy)]
pub struct CrudErrors {
    pub create_failed: &'static str,
    pub find_failed: &'static str,
    pub not_found: &'static str,
    pub update_failed: &'static str,
    pub delete_failed: &'static str,
}

impl Default for CrudErrors {
    fn default() -> Self {
        Self {
            create_failed: "Create failed",
            find_failed: "Find failed",
            not_found: "Resource not found",
            update_failed: "Update failed",
            delete_failed: "Delete failed",
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub enum CrudOp {
    Create,
    Find,
    List,
    Update,
    Delete,
}

#[allow(async_fn_in_trait)]
pub trait CrudService {
    type Dao: DaoBase;

    fn dao(&self) -> &Self::Dao;

    fn errors(&self) -> CrudErrors {
        CrudErrors::default()
    }

    fn map_error(&self, op: CrudOp, err: DaoLayerError) -> AppError {
        let errors = self.errors();
        match err {
            DaoLayerError::NotFound { .. } => AppError::not_found(errors.not_found),
            DaoLayerError::Db(_) | DaoLayerError::NotFoundByName { .. } => {
                let context = match op {
                    CrudOp::Create => errors.create_failed,
                    CrudOp::Find | CrudOp::List => errors.find_failed,
                    CrudOp::Update => errors.update_failed,
                    CrudOp::Delete => errors.delete_failed,
                };
                let message = format!("{context}. Please check the logs for more details");
                AppError::internal_with_source(message, err)
            }
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.dao()
            .delete(id)
            .await
            .map(|_| ())
            .map_err(|err| self.map_error(CrudOp::Delete, err))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase};
    use uuid::Uuid;

    use super::{CrudErrors, CrudOp, CrudService};
    use crate::db::dao::{DaoBase, DaoLayerError, TopicDao};

    struct TopicCrud {
        dao: TopicDao,
    }

    impl CrudService for TopicCrud {
        type Dao = TopicDao;

        fn dao(&self) -> &Self::Dao {
            &self.dao
        }

        fn errors(&self) -> CrudErrors {
            CrudErrors {
                not_found: "Topic not found",
                ..CrudErrors::default()
            }
        }
    }

    fn service() -> TopicCrud {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        TopicCrud {
            dao: TopicDao::new(&db),
        }
    }

    #[test]
    fn not_found_uses_service_message() {
        let err = service().map_error(
            CrudOp::Find,
            DaoLayerError::NotFound {
                entity: "Topic",
                id: Uuid::new_v4(),
            },
        );
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "Topic not found");
    }

    #[test]
    fn database_errors_hide_driver_details() {
        let err = service().map_error(
            CrudOp::Update,
            DaoLayerError::Db(DbErr::Custom("constraint xyz".to_string())),
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.message().starts_with("Update failed"));
        assert!(!err.message().contains("xyz"));
    }
}
