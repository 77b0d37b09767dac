use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use application::services::{
    ChannelMessageRequest, ConversationMessageRequest, FriendRequestNotice, KickMemberRequest,
    UpdateRolesRequest, UpdateStatusRequest,
};
use domain::{DirectMessage, FriendRequestAction, PresenceSnapshot, PresenceStatus, UserId};

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Deserialize)]
struct ChannelMessagePayload {
    server_id: Uuid,
    sender_id: Uuid,
    message_id: Uuid,
}

#[derive(Debug, Deserialize)]
struct ConversationMessagePayload {
    sender_id: Uuid,
    recipient_id: Uuid,
    content: String,
}

#[derive(Debug, Deserialize)]
struct FriendRequestPayload {
    request_id: Uuid,
    sender_id: Uuid,
    sender_name: String,
    receiver_id: Uuid,
    action: FriendRequestAction,
}

#[derive(Debug, Deserialize)]
struct PresencePayload {
    user_id: Uuid,
    status: PresenceStatus,
}

#[derive(Debug, Deserialize)]
struct ActorPayload {
    actor_id: Uuid,
}

#[derive(Debug, Deserialize)]
struct PresenceQuery {
    /// 逗号分隔的用户 ID 列表
    user_ids: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/channels/{channel_id}/messages",
            post(notify_channel_message),
        )
        .route(
            "/conversations/{conversation_id}/messages",
            post(notify_conversation_message),
        )
        .route("/friend-requests", post(notify_friend_request))
        .route("/presence", post(update_presence).get(get_presence))
        .route(
            "/servers/{server_id}/members/{user_id}/kick",
            post(kick_member),
        )
        .route(
            "/servers/{server_id}/members/{user_id}/roles",
            post(notify_roles_updated),
        )
        .route(
            "/servers/{server_id}/members/{user_id}/joined",
            post(notify_member_joined),
        )
        .route(
            "/servers/{server_id}/members/{user_id}/left",
            post(notify_member_left),
        )
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn notify_channel_message(
    State(state): State<AppState>,
    Path(channel_id): Path<Uuid>,
    Json(payload): Json<ChannelMessagePayload>,
) -> Result<StatusCode, ApiError> {
    state
        .message_service
        .notify_channel_message(ChannelMessageRequest {
            server_id: payload.server_id,
            channel_id,
            sender_id: payload.sender_id,
            message_id: payload.message_id,
        })
        .await?;

    Ok(StatusCode::ACCEPTED)
}

async fn notify_conversation_message(
    State(state): State<AppState>,
    Path(conversation_id): Path<Uuid>,
    Json(payload): Json<ConversationMessagePayload>,
) -> Result<(StatusCode, Json<DirectMessage>), ApiError> {
    let message = state
        .message_service
        .notify_conversation_message(ConversationMessageRequest {
            conversation_id,
            sender_id: payload.sender_id,
            recipient_id: payload.recipient_id,
            content: payload.content,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(message)))
}

async fn notify_friend_request(
    State(state): State<AppState>,
    Json(payload): Json<FriendRequestPayload>,
) -> Result<StatusCode, ApiError> {
    state
        .friend_service
        .notify_friend_request(FriendRequestNotice {
            request_id: payload.request_id,
            sender_id: payload.sender_id,
            sender_name: payload.sender_name,
            receiver_id: payload.receiver_id,
            action: payload.action,
        })
        .await?;

    Ok(StatusCode::ACCEPTED)
}

async fn update_presence(
    State(state): State<AppState>,
    Json(payload): Json<PresencePayload>,
) -> Result<StatusCode, ApiError> {
    state
        .presence_service
        .update_status(UpdateStatusRequest {
            user_id: payload.user_id,
            status: payload.status,
        })
        .await?;

    Ok(StatusCode::ACCEPTED)
}

async fn get_presence(
    State(state): State<AppState>,
    Query(query): Query<PresenceQuery>,
) -> Result<Json<Vec<PresenceSnapshot>>, ApiError> {
    let mut user_ids = Vec::new();
    for raw in query.user_ids.split(',').filter(|raw| !raw.is_empty()) {
        let parsed = raw.parse::<Uuid>().map_err(|_| {
            tracing::debug!(raw = raw, "在线状态查询携带非法用户 ID");
            ApiError::bad_request(format!("invalid user id: {raw}"))
        })?;
        user_ids.push(UserId::new(parsed));
    }

    let snapshot = state.presence_service.snapshot(&user_ids).await?;
    Ok(Json(snapshot))
}

async fn kick_member(
    State(state): State<AppState>,
    Path((server_id, user_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<ActorPayload>,
) -> Result<StatusCode, ApiError> {
    state
        .membership_service
        .kick_member(KickMemberRequest {
            server_id,
            actor_id: payload.actor_id,
            target_user_id: user_id,
        })
        .await?;

    Ok(StatusCode::ACCEPTED)
}

async fn notify_roles_updated(
    State(state): State<AppState>,
    Path((server_id, user_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<ActorPayload>,
) -> Result<StatusCode, ApiError> {
    state
        .membership_service
        .update_roles(UpdateRolesRequest {
            server_id,
            actor_id: payload.actor_id,
            target_user_id: user_id,
        })
        .await?;

    Ok(StatusCode::ACCEPTED)
}

async fn notify_member_joined(
    State(state): State<AppState>,
    Path((server_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    state.membership_service.member_joined(server_id, user_id).await?;
    Ok(StatusCode::ACCEPTED)
}

async fn notify_member_left(
    State(state): State<AppState>,
    Path((server_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    state.membership_service.member_left(server_id, user_id).await?;
    Ok(StatusCode::ACCEPTED)
}
