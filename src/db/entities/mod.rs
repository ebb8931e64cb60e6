#[allow(unused_imports)]
pub mod prelude {
    pub use super::note::Entity as Note;
    pub use super::owner::Entity as Owner;
    pub use super::topic::Entity as Topic;
}

pub mod note;
pub mod owner;
pub mod topic;
