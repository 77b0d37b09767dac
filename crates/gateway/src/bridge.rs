//! 通知桥接收端
//!
//! 生产端把每条实时事件 POST 到这里，请求体即事件的线缆格式
//! `{ "eventKind": "...", "payload": { ... } }`。事件在本进程总线上
//! 同步重放，送达处理器跑完后才返回 202，同一来源的事件因此保序。
//! 无法解析的请求体只影响当次请求，连接与其余订阅不受波及。

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use domain::RealtimeEvent;

use crate::state::GatewayState;

pub(crate) async fn ingest_event(
    State(state): State<GatewayState>,
    payload: Result<Json<RealtimeEvent>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(event)) => {
            tracing::debug!(event_kind = %event.kind(), "通知桥收到事件");
            state.bus.publish(&event);
            (StatusCode::ACCEPTED, Json(json!({ "accepted": true }))).into_response()
        }
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "通知桥收到无法解析的请求体");
            (
                rejection.status(),
                Json(json!({ "accepted": false, "error": rejection.body_text() })),
            )
                .into_response()
        }
    }
}
