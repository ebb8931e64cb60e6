pub trait HasBaseColumns: sea_orm::EntityTrait {
    fn id_column() -> Self::Column;
    fn created_at_column() -> Self::Column;
}

pub trait HasIdActiveModel {
    fn set_id(&mut self, id: uuid::Uuid);
}

pub trait TimestampedActiveModel {
    fn set_created_at(&mut self, ts: sea_orm::entity::prelude::DateTimeWithTimeZone);
    fn set_updated_at(&mut self, ts: sea_orm::entity::prelude::DateTimeWithTimeZone);
}

/// Wires an entity module into the DAO layer.
///
/// Must be invoked inside the entity module, next to its `Model`, so that
/// `ActiveModel`, `Entity` and `Column` resolve to that entity. The module
/// is expected to declare `id`, `created_at` and `updated_at` columns.
macro_rules! base_entity {
    () => {
        impl $crate::db::dao::base_traits::HasIdActiveModel for ActiveModel {
            fn set_id(&mut self, id: uuid::Uuid) {
                self.id = sea_orm::ActiveValue::Set(id);
            }
        }

        impl $crate::db::dao::base_traits::TimestampedActiveModel for ActiveModel {
            fn set_created_at(&mut self, ts: sea_orm::entity::prelude::DateTimeWithTimeZone) {
                self.created_at = sea_orm::ActiveValue::Set(ts);
            }

            fn set_updated_at(&mut self, ts: sea_orm::entity::prelude::DateTimeWithTimeZone) {
                self.updated_at = sea_orm::ActiveValue::Set(ts);
            }
        }

        impl $crate::db::dao::base_traits::HasBaseColumns for Entity {
            fn id_column() -> Column {
                Column::Id
            }

            fn created_at_column() -> Column {
                Column::CreatedAt
            }
        }
    };
}

pub(crate) use base_entity;
