//! Report lifecycle: creation, status transitions, filtered listing.
//!
//! The reported user is always derived from the content's author at
//! creation time and fixed thereafter; whatever the client claims for that
//! field is ignored. Status transitions are unrestricted — there is no
//! terminal state, and a moderator may re-open a resolved report.

use crate::content::resolve_author;
use crate::orm::reports::{self, ContentType, ReportStatus};
use crate::pagination::{Page, PageParams};
use crate::{Error, Result};
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};

/// Validated input for report creation. The web layer builds this from the
/// request body after decoding the content-type integer; any client-sent
/// "reported user" field never makes it into this struct.
#[derive(Clone, Debug)]
pub struct NewReport {
    pub content_id: i32,
    pub content_type: ContentType,
    pub reason: String,
    pub description: String,
}

/// Listing filter. All provided predicates are conjunctive.
#[derive(Clone, Debug, Default)]
pub struct ReportFilter {
    /// Restrict to reports filed by this user.
    pub reporter_id: Option<i32>,
    /// Case-sensitive substring match over reason OR description.
    pub search: Option<String>,
    pub status: Option<ReportStatus>,
    /// `createdat` or `status`, case-insensitive; anything else falls back
    /// to created_at.
    pub sort_by: Option<String>,
    /// Ascending unless explicitly `desc`.
    pub sort_direction: Option<String>,
    pub page: PageParams,
}

/// File a report. Resolves the content author synchronously so the stored
/// `reported_user_id` is trustworthy; fails with the content's NotFound kind
/// if the target does not exist, and with Validation on bad input.
pub async fn create_report(
    db: &DatabaseConnection,
    reporter_id: i32,
    new: NewReport,
) -> Result<reports::Model> {
    if new.reason.trim().is_empty() {
        return Err(Error::validation("Reason is required"));
    }

    if reporter_id <= 0 || new.content_id <= 0 {
        return Err(Error::validation("Invalid id"));
    }

    let reported_user_id = resolve_author(db, new.content_type, new.content_id).await?;

    let now = Utc::now().naive_utc();
    let report = reports::ActiveModel {
        reporter_id: Set(reporter_id),
        reported_user_id: Set(reported_user_id),
        content_id: Set(new.content_id),
        content_type: Set(new.content_type),
        reason: Set(new.reason),
        description: Set(new.description),
        status: Set(ReportStatus::InProgress),
        moderator_id: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    log::info!(
        "Created report {} by user {} on content {} ({:?}), reported user {}",
        report.id,
        reporter_id,
        report.content_id,
        report.content_type,
        reported_user_id
    );

    Ok(report)
}

/// Set a report's status and record the acting moderator.
///
/// Unconditional once the report is found: any status to any status is
/// accepted, repeating the same status is a no-op success, and the last
/// acting moderator wins the attribution. Moderator/Admin authority is
/// enforced at the web boundary, not here.
pub async fn update_status(
    db: &DatabaseConnection,
    report_id: i32,
    moderator_id: i32,
    new_status: ReportStatus,
) -> Result<i32> {
    let existing = reports::Entity::find_by_id(report_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Report"))?;

    let mut active: reports::ActiveModel = existing.into();
    active.status = Set(new_status);
    active.moderator_id = Set(Some(moderator_id));
    active.updated_at = Set(Utc::now().naive_utc());
    active.update(db).await?;

    log::info!(
        "Updated report {} to status {:?} by moderator {}",
        report_id,
        new_status,
        moderator_id
    );

    Ok(report_id)
}

/// Paged report listing with conjunctive filters.
pub async fn list_reports(
    db: &DatabaseConnection,
    filter: ReportFilter,
) -> Result<Page<reports::Model>> {
    let mut query = reports::Entity::find();

    if let Some(reporter_id) = filter.reporter_id {
        query = query.filter(reports::Column::ReporterId.eq(reporter_id));
    }

    if let Some(search) = filter.search.as_deref() {
        if !search.is_empty() {
            query = query.filter(
                reports::Column::Reason
                    .contains(search)
                    .or(reports::Column::Description.contains(search)),
            );
        }
    }

    if let Some(status) = filter.status {
        query = query.filter(reports::Column::Status.eq(status));
    }

    let descending = sort_descending(filter.sort_direction.as_deref());
    query = match sort_key(filter.sort_by.as_deref()) {
        SortKey::CreatedAt if descending => query.order_by_desc(reports::Column::CreatedAt),
        SortKey::CreatedAt => query.order_by_asc(reports::Column::CreatedAt),
        SortKey::Status if descending => query.order_by_desc(reports::Column::Status),
        SortKey::Status => query.order_by_asc(reports::Column::Status),
    };
    // Deterministic ordering for rows that compare equal on the sort key.
    query = query.order_by_asc(reports::Column::Id);

    let params = filter.page;
    let paginator = query.paginate(db, params.page_size() as usize);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(params.page_index() as usize).await?;

    Ok(Page::new(items, total as u64, params))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SortKey {
    CreatedAt,
    Status,
}

fn sort_key(sort_by: Option<&str>) -> SortKey {
    match sort_by.map(|s| s.to_lowercase()).as_deref() {
        Some("status") => SortKey::Status,
        // "createdat", absent, and anything unrecognized all sort by age.
        _ => SortKey::CreatedAt,
    }
}

fn sort_descending(direction: Option<&str>) -> bool {
    matches!(direction.map(|s| s.to_lowercase()).as_deref(), Some("desc"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_key_defaults_to_created_at() {
        assert_eq!(sort_key(None), SortKey::CreatedAt);
        assert_eq!(sort_key(Some("CreatedAt")), SortKey::CreatedAt);
        assert_eq!(sort_key(Some("createdat")), SortKey::CreatedAt);
        assert_eq!(sort_key(Some("garbage")), SortKey::CreatedAt);
        assert_eq!(sort_key(Some("Status")), SortKey::Status);
    }

    #[test]
    fn sort_direction_defaults_to_ascending() {
        assert!(!sort_descending(None));
        assert!(!sort_descending(Some("asc")));
        assert!(!sort_descending(Some("sideways")));
        assert!(sort_descending(Some("desc")));
        assert!(sort_descending(Some("DESC")));
    }
}
