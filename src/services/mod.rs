pub mod context;
pub mod crud_service;
pub mod note_service;
pub mod topic_service;

pub use context::ServiceContext;
