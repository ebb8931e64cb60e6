pub mod base;
pub mod base_traits;
mod context;
pub mod error;
pub mod note_dao;
pub mod owner_dao;
pub mod topic_dao;

pub use base::DaoBase;
pub use base_traits::{HasBaseColumns, HasIdActiveModel, TimestampedActiveModel};
pub use context::DaoContext;
pub use error::{DaoLayerError, DaoResult};
pub use note_dao::{NoteDao, NoteRecord};
pub use owner_dao::OwnerDao;
pub use topic_dao::TopicDao;
