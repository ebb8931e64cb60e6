use sea_orm::entity::prelude::*;

use crate::db::dao::base_traits::base_entity;

pub const TITLE_MAX_CHARS: usize = 35;

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "notes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "String(StringLen::N(35))")]
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    #[sea_orm(indexed)]
    pub owner_id: Uuid,
    #[sea_orm(indexed)]
    pub topic_id: Uuid,
    #[sea_orm(default_expr = "Expr::current_timestamp()")]
    pub created_at: DateTimeWithTimeZone,
    #[sea_orm(default_expr = "Expr::current_timestamp()")]
    pub updated_at: DateTimeWithTimeZone,
    #[sea_orm(belongs_to, from = "owner_id", to = "id", on_delete = "Cascade")]
    pub owner: HasOne<super::owner::Entity>,
    #[sea_orm(belongs_to, from = "topic_id", to = "id", on_delete = "Cascade")]
    pub topic: HasOne<super::topic::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}

base_entity!();
