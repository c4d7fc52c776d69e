use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use axum_extra::extract::cookie::CookieJar;
use minijinja::context;
use std::sync::Arc;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::dtos::{LoginFormDto, MeResponseDto, RegisterRequestDto};
use crate::features::auth::model::RequestContext;
use crate::features::auth::policy::Action;
use crate::features::auth::services::AuthService;
use crate::features::auth::session::SessionManager;
use crate::shared::templates::render_page;
use crate::shared::types::{ActionResponse, ErrorResponse};

/// Login page
pub async fn login_page(ctx: RequestContext) -> Result<Html<String>> {
    ctx.authorize(Action::ViewLoginPage)?;
    render_page("login.html", context! {})
}

/// Login form submission.
///
/// On success the session cookie is set and the caller is sent to the admin
/// page or the dashboard depending on role. On failure the form is shown again.
pub async fn login_submit(
    State(service): State<Arc<AuthService>>,
    jar: CookieJar,
    Form(form): Form<LoginFormDto>,
) -> Result<Response> {
    let email = form.email.trim();

    match service.login(email, &form.password).await? {
        Some((user, token)) => {
            let jar = jar.add(service.sessions().session_cookie(token));
            let target = if user.is_admin() { "/admin" } else { "/dashboard" };
            Ok((jar, Redirect::to(target)).into_response())
        }
        None => {
            let page = render_page(
                "login.html",
                context! { error => "Incorrect email or password.", submitted_email => email },
            )?;
            Ok(page.into_response())
        }
    }
}

/// Clear the session and return to the public page
pub async fn logout(ctx: RequestContext, jar: CookieJar) -> Result<(CookieJar, Redirect)> {
    ctx.authorize(Action::Logout)?;
    if let Some(email) = ctx.email() {
        tracing::info!("Logout: {}", email);
    }
    Ok((jar.remove(SessionManager::removal_cookie()), Redirect::to("/index")))
}

/// Register a citizen account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequestDto,
    responses(
        (status = 201, description = "Account created", body = ActionResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn register(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<RegisterRequestDto>,
) -> Result<(StatusCode, Json<ActionResponse>)> {
    dto.validate()?;

    let user = service.register(&dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ActionResponse::ok(format!("Account created for {}", user.email))),
    ))
}

/// Get the identity carried by the current session
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current session identity", body = MeResponseDto),
        (status = 303, description = "Not logged in, redirected to /login")
    ),
    tag = "auth"
)]
pub async fn get_me(ctx: RequestContext) -> Result<Json<MeResponseDto>> {
    ctx.authorize(Action::ViewOwnProfile)?;
    let user = ctx.user.ok_or(AppError::LoginRequired)?;
    Ok(Json(user.into()))
}
