//! 故障与降级行为测试
//!
//! 网关停机只影响通知投递，生产端的业务响应不受牵连。

use std::time::Duration;

use client::GatewayClient;
use domain::{ClientMessage, ServerMessage};
use serde_json::json;
use tokio::time::timeout;
use uuid::Uuid;

use tests::TestEnvironment;

async fn recv(client: &mut GatewayClient) -> ServerMessage {
    timeout(Duration::from_secs(2), client.next_message())
        .await
        .expect("等待网关推送超时")
        .expect("读取网关推送")
}

async fn expect_silence(client: &mut GatewayClient) {
    let outcome = timeout(Duration::from_millis(200), client.next_message()).await;
    assert!(outcome.is_err(), "不该收到任何推送: {outcome:?}");
}

#[tokio::test]
async fn producer_survives_gateway_outage() {
    let mut env = TestEnvironment::start().await;
    env.stop_gateway().await;

    let http = reqwest::Client::new();
    let url = env.api_url(&format!("/api/v1/channels/{}/messages", env.channel_id));
    for _ in 0..2 {
        let response = http
            .post(&url)
            .json(&json!({
                "server_id": env.server_id,
                "sender_id": env.speaker,
                "message_id": Uuid::new_v4(),
            }))
            .send()
            .await
            .expect("请求生产端");
        assert_eq!(
            response.status(),
            reqwest::StatusCode::ACCEPTED,
            "通知桥不可达不该影响业务响应"
        );
    }
}

#[tokio::test]
async fn outage_stops_delivery_but_keeps_connection() {
    let mut env = TestEnvironment::start().await;
    let mut subscriber = env.connect(env.watcher).await.expect("连接网关");

    subscriber
        .send(&ClientMessage::SubscribeChannel {
            server_id: env.server_id,
            channel_id: env.channel_id,
        })
        .await
        .expect("发送订阅请求");
    recv(&mut subscriber).await;

    let http = reqwest::Client::new();
    let url = env.api_url(&format!("/api/v1/channels/{}/messages", env.channel_id));
    let body = json!({
        "server_id": env.server_id,
        "sender_id": env.speaker,
        "message_id": Uuid::new_v4(),
    });
    let response = http.post(&url).json(&body).send().await.expect("请求生产端");
    assert_eq!(response.status(), reqwest::StatusCode::ACCEPTED);
    match recv(&mut subscriber).await {
        ServerMessage::Event { .. } => {}
        other => panic!("期望事件帧, 收到 {other:?}"),
    }

    env.stop_gateway().await;

    // 投递悄悄丢失，已建立的连接本身不受影响
    let response = http.post(&url).json(&body).send().await.expect("请求生产端");
    assert_eq!(response.status(), reqwest::StatusCode::ACCEPTED);
    expect_silence(&mut subscriber).await;

    subscriber
        .send(&ClientMessage::Ping)
        .await
        .expect("发送心跳");
    assert_eq!(recv(&mut subscriber).await, ServerMessage::Pong);
}
