//! SeaORM Entity for reports table
//!
//! `content_type` and `status` are stored as smallints whose values are part
//! of the API contract and must stay stable across releases.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Discriminator for the reported content. Wire values: 0 = Review,
/// 1 = Comment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "i16", db_type = "SmallInteger")]
pub enum ContentType {
    #[sea_orm(num_value = 0)]
    Review,
    #[sea_orm(num_value = 1)]
    Comment,
}

impl ContentType {
    /// Integer representation on the wire.
    pub fn as_wire(self) -> i16 {
        match self {
            ContentType::Review => 0,
            ContentType::Comment => 1,
        }
    }
}

impl TryFrom<i16> for ContentType {
    type Error = i16;

    fn try_from(value: i16) -> Result<Self, i16> {
        match value {
            0 => Ok(ContentType::Review),
            1 => Ok(ContentType::Comment),
            other => Err(other),
        }
    }
}

/// Report lifecycle status. Wire values: 0 = InProgress, 1 = Resolved,
/// 2 = Dismissed. There is no terminal state; moderators may move a report
/// between any two statuses, including back to InProgress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "i16", db_type = "SmallInteger")]
pub enum ReportStatus {
    #[sea_orm(num_value = 0)]
    InProgress,
    #[sea_orm(num_value = 1)]
    Resolved,
    #[sea_orm(num_value = 2)]
    Dismissed,
}

impl ReportStatus {
    pub fn as_wire(self) -> i16 {
        match self {
            ReportStatus::InProgress => 0,
            ReportStatus::Resolved => 1,
            ReportStatus::Dismissed => 2,
        }
    }
}

impl TryFrom<i16> for ReportStatus {
    type Error = i16;

    fn try_from(value: i16) -> Result<Self, i16> {
        match value {
            0 => Ok(ReportStatus::InProgress),
            1 => Ok(ReportStatus::Resolved),
            2 => Ok(ReportStatus::Dismissed),
            other => Err(other),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "reports")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub reporter_id: i32,
    /// Author of the reported content, resolved at creation time. Fixed for
    /// the life of the report even if the content is later deleted.
    pub reported_user_id: i32,
    pub content_id: i32,
    pub content_type: ContentType,
    pub reason: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub status: ReportStatus,
    pub moderator_id: Option<i32>,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ReporterId",
        to = "super::users::Column::Id"
    )]
    Reporter,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ReportedUserId",
        to = "super::users::Column::Id"
    )]
    ReportedUser,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ModeratorId",
        to = "super::users::Column::Id"
    )]
    Moderator,
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_values_are_stable() {
        assert_eq!(ContentType::Review.as_wire(), 0);
        assert_eq!(ContentType::Comment.as_wire(), 1);
        assert_eq!(ReportStatus::InProgress.as_wire(), 0);
        assert_eq!(ReportStatus::Resolved.as_wire(), 1);
        assert_eq!(ReportStatus::Dismissed.as_wire(), 2);
    }

    #[test]
    fn out_of_range_wire_values_are_rejected() {
        assert!(ContentType::try_from(2).is_err());
        assert!(ContentType::try_from(-1).is_err());
        assert!(ReportStatus::try_from(3).is_err());
    }
}
