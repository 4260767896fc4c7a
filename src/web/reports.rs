//! Report submission and moderation endpoints.
//!
//! Any authenticated user may file a report; the listing and status routes
//! under `/moderation` demand an elevated caller. The create form carries a
//! `reported_user_id` field for API compatibility, but it is advisory only —
//! the stored value always comes from resolving the content's author.

use crate::db::get_db_pool;
use crate::middleware::ClientCtx;
use crate::orm::reports::{self, ContentType, ReportStatus};
use crate::pagination::{Page, PageParams, DEFAULT_PAGE_SIZE};
use crate::reports::{self as report_ops, NewReport, ReportFilter};
use actix_web::{get, post, put, web, Error, HttpResponse};
use serde::{Deserialize, Serialize};
use validator::Validate;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(create_report)
        .service(my_reports)
        .service(list_reports)
        .service(update_report_status);
}

#[derive(Serialize)]
struct ReportResponse {
    id: i32,
    reporter_id: i32,
    reported_user_id: i32,
    content_id: i32,
    content_type: i16,
    reason: String,
    description: String,
    status: i16,
    moderator_id: Option<i32>,
    created_at: chrono::NaiveDateTime,
    updated_at: chrono::NaiveDateTime,
}

impl From<reports::Model> for ReportResponse {
    fn from(report: reports::Model) -> Self {
        Self {
            id: report.id,
            reporter_id: report.reporter_id,
            reported_user_id: report.reported_user_id,
            content_id: report.content_id,
            content_type: report.content_type.as_wire(),
            reason: report.reason,
            description: report.description,
            status: report.status.as_wire(),
            moderator_id: report.moderator_id,
            created_at: report.created_at,
            updated_at: report.updated_at,
        }
    }
}

#[derive(Deserialize, Validate)]
struct CreateReportForm {
    /// Advisory; ignored in favor of the resolved content author.
    #[serde(default)]
    #[allow(dead_code)]
    reported_user_id: Option<i32>,
    content_id: i32,
    content_type: i16,
    #[validate(length(min = 1, max = 200, message = "Reason must be 1-200 characters"))]
    reason: String,
    #[serde(default)]
    #[validate(length(max = 1000, message = "Description cannot exceed 1000 characters"))]
    description: String,
}

#[post("/api/reports")]
async fn create_report(
    client: ClientCtx,
    form: web::Json<CreateReportForm>,
) -> Result<HttpResponse, Error> {
    let caller = client.require_login()?;
    form.validate().map_err(crate::Error::from)?;

    let content_type = ContentType::try_from(form.content_type)
        .map_err(|v| crate::Error::validation(format!("Invalid content type: {}", v)))?;

    let report = report_ops::create_report(
        get_db_pool(),
        caller.id,
        NewReport {
            content_id: form.content_id,
            content_type,
            reason: form.reason.clone(),
            description: form.description.clone(),
        },
    )
    .await?;

    Ok(HttpResponse::Ok().json(report.id))
}

#[derive(Deserialize)]
struct ReportListQuery {
    search: Option<String>,
    /// Wire status value; absent means InProgress, matching the original
    /// moderation queue view.
    status: Option<i16>,
    sort_by: Option<String>,
    sort_direction: Option<String>,
    page: Option<u64>,
    page_size: Option<u64>,
}

impl ReportListQuery {
    fn into_filter(self, reporter_id: Option<i32>) -> Result<ReportFilter, crate::Error> {
        let status = ReportStatus::try_from(self.status.unwrap_or(0))
            .map_err(|v| crate::Error::validation(format!("Invalid status: {}", v)))?;

        Ok(ReportFilter {
            reporter_id,
            search: self.search,
            status: Some(status),
            sort_by: self.sort_by,
            sort_direction: self.sort_direction,
            page: PageParams::new(
                self.page.unwrap_or(1),
                self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            ),
        })
    }
}

/// The caller's own reports, whatever their role.
#[get("/api/reports/me")]
async fn my_reports(
    client: ClientCtx,
    query: web::Query<ReportListQuery>,
) -> Result<HttpResponse, Error> {
    let caller = client.require_login()?;
    let filter = query.into_inner().into_filter(Some(caller.id))?;
    let page = report_ops::list_reports(get_db_pool(), filter).await?;

    Ok(HttpResponse::Ok().json(to_response_page(page)))
}

/// Moderation queue.
#[get("/api/reports/moderation")]
async fn list_reports(
    client: ClientCtx,
    query: web::Query<ReportListQuery>,
) -> Result<HttpResponse, Error> {
    client.require_moderator()?;

    let filter = query.into_inner().into_filter(None)?;
    let page = report_ops::list_reports(get_db_pool(), filter).await?;

    Ok(HttpResponse::Ok().json(to_response_page(page)))
}

#[derive(Deserialize)]
struct UpdateStatusForm {
    status: i16,
}

#[put("/api/reports/moderation/{report_id}")]
async fn update_report_status(
    client: ClientCtx,
    path: web::Path<i32>,
    form: web::Json<UpdateStatusForm>,
) -> Result<HttpResponse, Error> {
    let caller = client.require_moderator()?;

    let status = ReportStatus::try_from(form.status)
        .map_err(|v| crate::Error::validation(format!("Invalid status: {}", v)))?;

    let id =
        report_ops::update_status(get_db_pool(), path.into_inner(), caller.id, status).await?;

    Ok(HttpResponse::Ok().json(id))
}

fn to_response_page(page: Page<reports::Model>) -> Page<ReportResponse> {
    page.map(ReportResponse::from)
}
