use axum::{
    http::StatusCode,
    response::{Html, Redirect},
};
use minijinja::context;

use crate::core::error::Result;
use crate::features::auth::model::RequestContext;
use crate::features::auth::policy::Action;
use crate::features::reports::models::ReportCategory;
use crate::shared::templates::render_page;

fn render_index(ctx: &RequestContext, heading: &str) -> Result<Html<String>> {
    render_page(
        "index.html",
        context! {
            heading => heading,
            email => ctx.email(),
            role => ctx.role().map(|r| r.as_str()),
            categories => ReportCategory::ALL.iter().map(|c| c.label()).collect::<Vec<_>>(),
        },
    )
}

pub async fn home() -> Redirect {
    Redirect::to("/index")
}

/// Public report map
pub async fn index_page(ctx: RequestContext) -> Result<Html<String>> {
    ctx.authorize(Action::ViewIndexPage)?;
    render_index(&ctx, "Citizen reports")
}

pub async fn dashboard_page(ctx: RequestContext) -> Result<Html<String>> {
    ctx.authorize(Action::ViewDashboardPage)?;
    render_index(&ctx, "Submit a report")
}

pub async fn admin_page(ctx: RequestContext) -> Result<Html<String>> {
    ctx.authorize(Action::ViewAdminPage)?;
    render_index(&ctx, "Report administration")
}

pub async fn health_check() -> StatusCode {
    StatusCode::OK
}
