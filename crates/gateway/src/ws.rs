//! WebSocket 升级入口

use axum::{
    extract::{Query, State, WebSocketUpgrade},
    response::Response,
};
use serde::Deserialize;
use uuid::Uuid;

use domain::UserId;

use crate::{connection, state::GatewayState};

/// 握手查询参数
///
/// 连接属主身份由前置的会话层校验后随握手注入，网关不再重复认证。
#[derive(Debug, Deserialize)]
pub(crate) struct WsQuery {
    user_id: Uuid,
}

pub(crate) async fn ws_upgrade(
    ws: WebSocketUpgrade,
    State(state): State<GatewayState>,
    Query(query): Query<WsQuery>,
) -> Response {
    let user_id = UserId::new(query.user_id);
    ws.on_upgrade(move |socket| connection::handle_socket(socket, state, user_id))
}
