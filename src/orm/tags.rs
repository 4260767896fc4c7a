//! SeaORM Entity for tags table

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tags")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::review_tags::Entity")]
    ReviewTags,
}

impl Related<super::review_tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReviewTags.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
