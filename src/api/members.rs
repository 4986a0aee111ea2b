//! Member registry endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{Member, MemberInput},
    AppState,
};

/// List all members
#[utoipa::path(
    get,
    path = "/members",
    tag = "members",
    responses(
        (status = 200, description = "All members", body = Vec<Member>)
    )
)]
pub async fn list_members(State(state): State<AppState>) -> AppResult<Json<Vec<Member>>> {
    let members = state.services.members.list_members().await?;
    Ok(Json(members))
}

/// Get member details
#[utoipa::path(
    get,
    path = "/members/{id}",
    tag = "members",
    params(
        ("id" = i32, Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Member details", body = Member),
        (status = 404, description = "Member not found")
    )
)]
pub async fn get_member(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Json<Member>> {
    let member = state.services.members.get_member(id).await?;
    Ok(Json(member))
}

/// Register a member
#[utoipa::path(
    post,
    path = "/members",
    tag = "members",
    request_body = MemberInput,
    responses(
        (status = 201, description = "Member created", body = Member),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_member(
    State(state): State<AppState>,
    Json(input): Json<MemberInput>,
) -> AppResult<(StatusCode, Json<Member>)> {
    let member = state.services.members.create_member(input).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

/// Update a member's contact details
#[utoipa::path(
    put,
    path = "/members/{id}",
    tag = "members",
    params(
        ("id" = i32, Path, description = "Member ID")
    ),
    request_body = MemberInput,
    responses(
        (status = 200, description = "Member updated", body = Member),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Member not found")
    )
)]
pub async fn update_member(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<MemberInput>,
) -> AppResult<Json<Member>> {
    let member = state.services.members.update_member(id, input).await?;
    Ok(Json(member))
}

/// Delete a member
#[utoipa::path(
    delete,
    path = "/members/{id}",
    tag = "members",
    params(
        ("id" = i32, Path, description = "Member ID")
    ),
    responses(
        (status = 204, description = "Member deleted"),
        (status = 404, description = "Member not found"),
        (status = 409, description = "Member has transactions")
    )
)]
pub async fn delete_member(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<StatusCode> {
    state.services.members.delete_member(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
