//! 端到端流程测试
//!
//! 生产端 HTTP 入口到网关 WebSocket 出口的完整链路，
//! 事件经由真实的通知桥 POST 穿过两个服务。

use std::time::Duration;

use client::{GatewayClient, PresenceCache};
use domain::{
    ChannelRoleOverride, ClientMessage, ConversationId, Permissions, PresenceSnapshot,
    PresenceStatus, RealtimeEvent, ServerMessage, SubscriptionTarget, UserId,
};
use serde_json::json;
use tokio::time::timeout;
use uuid::Uuid;

use tests::TestEnvironment;

/// 两秒内必须等到下一帧
async fn recv(client: &mut GatewayClient) -> ServerMessage {
    timeout(Duration::from_secs(2), client.next_message())
        .await
        .expect("等待网关推送超时")
        .expect("读取网关推送")
}

/// 短窗口内不该有任何推送到达
async fn expect_silence(client: &mut GatewayClient) {
    let outcome = timeout(Duration::from_millis(200), client.next_message()).await;
    assert!(outcome.is_err(), "不该收到任何推送: {outcome:?}");
}

#[tokio::test]
async fn channel_message_reaches_subscriber() {
    let env = TestEnvironment::start().await;
    let mut subscriber = env.connect(env.watcher).await.expect("连接网关");

    subscriber
        .send(&ClientMessage::SubscribeChannel {
            server_id: env.server_id,
            channel_id: env.channel_id,
        })
        .await
        .expect("发送订阅请求");
    assert_eq!(
        recv(&mut subscriber).await,
        ServerMessage::Subscribed {
            target: SubscriptionTarget::Channel {
                channel_id: env.channel_id
            }
        }
    );

    let message_id = Uuid::new_v4();
    let response = reqwest::Client::new()
        .post(env.api_url(&format!("/api/v1/channels/{}/messages", env.channel_id)))
        .json(&json!({
            "server_id": env.server_id,
            "sender_id": env.speaker,
            "message_id": message_id,
        }))
        .send()
        .await
        .expect("请求生产端");
    assert_eq!(response.status(), reqwest::StatusCode::ACCEPTED);

    match recv(&mut subscriber).await {
        ServerMessage::Event {
            event: RealtimeEvent::ChannelMessage(event),
        } => {
            assert_eq!(event.channel_id, env.channel_id);
            assert_eq!(event.message_id.0, message_id, "事件只携带新消息的标识符");
        }
        other => panic!("期望频道消息事件, 收到 {other:?}"),
    }
}

#[tokio::test]
async fn conversation_message_carries_full_payload() {
    let env = TestEnvironment::start().await;
    let mut subscriber = env.connect(env.watcher).await.expect("连接网关");

    let conversation_id = Uuid::new_v4();
    subscriber
        .send(&ClientMessage::SubscribeConversation {
            conversation_id: ConversationId::new(conversation_id),
        })
        .await
        .expect("发送订阅请求");
    recv(&mut subscriber).await;

    let response = reqwest::Client::new()
        .post(env.api_url(&format!(
            "/api/v1/conversations/{conversation_id}/messages"
        )))
        .json(&json!({
            "sender_id": env.speaker,
            "recipient_id": env.watcher,
            "content": "晚上老地方见",
        }))
        .send()
        .await
        .expect("请求生产端");
    assert_eq!(response.status(), reqwest::StatusCode::CREATED);

    match recv(&mut subscriber).await {
        ServerMessage::Event {
            event: RealtimeEvent::ConversationMessage(message),
        } => {
            assert_eq!(message.conversation_id.0, conversation_id);
            assert_eq!(message.content, "晚上老地方见", "私信事件携带完整内容");
            assert_eq!(message.recipient_id, env.watcher);
        }
        other => panic!("期望私信消息事件, 收到 {other:?}"),
    }
}

#[tokio::test]
async fn friend_request_lands_in_recipient_inbox() {
    let env = TestEnvironment::start().await;
    let mut recipient = env.connect(env.watcher).await.expect("连接网关");
    let bystander_id = UserId::new(Uuid::new_v4());
    let mut bystander = env.connect(bystander_id).await.expect("连接网关");

    recipient
        .send(&ClientMessage::SubscribeInbox)
        .await
        .expect("发送订阅请求");
    recv(&mut recipient).await;
    bystander
        .send(&ClientMessage::SubscribeInbox)
        .await
        .expect("发送订阅请求");
    recv(&mut bystander).await;

    let response = reqwest::Client::new()
        .post(env.api_url("/api/v1/friend-requests"))
        .json(&json!({
            "request_id": Uuid::new_v4(),
            "sender_id": env.speaker,
            "sender_name": "小明",
            "receiver_id": env.watcher,
            "action": "created",
        }))
        .send()
        .await
        .expect("请求生产端");
    assert_eq!(response.status(), reqwest::StatusCode::ACCEPTED);

    match recv(&mut recipient).await {
        ServerMessage::Event {
            event: RealtimeEvent::FriendRequest(event),
        } => {
            assert_eq!(event.receiver_id, env.watcher);
            assert_eq!(event.sender_name, "小明");
        }
        other => panic!("期望好友请求事件, 收到 {other:?}"),
    }

    // 收件箱按连接属主路由，旁观者不该收到别人的请求
    expect_silence(&mut bystander).await;
}

#[tokio::test]
async fn presence_event_overrides_stale_batch() {
    let env = TestEnvironment::start().await;
    let mut watcher = env.connect(env.watcher).await.expect("连接网关");

    watcher
        .send(&ClientMessage::WatchPresence {
            user_ids: vec![env.speaker],
        })
        .await
        .expect("发送观察请求");
    assert_eq!(
        recv(&mut watcher).await,
        ServerMessage::PresenceWatchUpdated { watched: 1 }
    );

    let http = reqwest::Client::new();
    let response = http
        .post(env.api_url("/api/v1/presence"))
        .json(&json!({ "user_id": env.speaker, "status": "ONLINE" }))
        .send()
        .await
        .expect("上报在线");
    assert_eq!(response.status(), reqwest::StatusCode::ACCEPTED);
    recv(&mut watcher).await;

    // 先取整页快照，再让更新的事件到达，模拟批量读取落后于事件流
    let mut batch: Vec<PresenceSnapshot> = http
        .get(env.api_url(&format!("/api/v1/presence?user_ids={}", env.speaker)))
        .send()
        .await
        .expect("拉取快照")
        .json()
        .await
        .expect("解析快照");
    assert_eq!(batch[0].status, PresenceStatus::Online);

    let response = http
        .post(env.api_url("/api/v1/presence"))
        .json(&json!({ "user_id": env.speaker, "status": "IDLE" }))
        .send()
        .await
        .expect("上报离开");
    assert_eq!(response.status(), reqwest::StatusCode::ACCEPTED);

    let mut cache = PresenceCache::new();
    match recv(&mut watcher).await {
        ServerMessage::Event { event } => cache.apply(&event),
        other => panic!("期望在线状态事件, 收到 {other:?}"),
    }

    cache.overlay(&mut batch);
    assert_eq!(batch[0].status, PresenceStatus::Idle, "整页重拉不该回退已到达的事件");
    assert_eq!(
        cache.effective_status(env.speaker, PresenceStatus::Online),
        PresenceStatus::Idle
    );
}

#[tokio::test]
async fn permission_change_applies_without_restart() {
    let env = TestEnvironment::start().await;
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
    recv(&mut subscriber).await;

    // 目录镜像里的权限变化立即反映在下一次解析上
    env.store.set_role_override(ChannelRoleOverride::new(
        env.channel_id,
        env.speaker_role,
        Permissions::empty(),
        Permissions::SEND_MESSAGES,
    ));

    let response = http.post(&url).json(&body).send().await.expect("请求生产端");
    assert_eq!(response.status(), reqwest::StatusCode::FORBIDDEN);
    expect_silence(&mut subscriber).await;
}

#[tokio::test]
async fn rejected_publish_stays_silent() {
    let env = TestEnvironment::start().await;
    let mut subscriber = env.connect(env.speaker).await.expect("连接网关");

    subscriber
        .send(&ClientMessage::SubscribeChannel {
            server_id: env.server_id,
            channel_id: env.channel_id,
        })
        .await
        .expect("发送订阅请求");
    recv(&mut subscriber).await;

    // watcher 角色没有发言权限，生产端拒绝后不产生任何事件
    let response = reqwest::Client::new()
        .post(env.api_url(&format!("/api/v1/channels/{}/messages", env.channel_id)))
        .json(&json!({
            "server_id": env.server_id,
            "sender_id": env.watcher,
            "message_id": Uuid::new_v4(),
        }))
        .send()
        .await
        .expect("请求生产端");
    assert_eq!(response.status(), reqwest::StatusCode::FORBIDDEN);
    let body: serde_json::Value = response.json().await.expect("解析错误响应");
    assert_eq!(body["code"], "PERMISSION_DENIED");

    expect_silence(&mut subscriber).await;
}
