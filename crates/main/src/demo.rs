//! 演示目录快照
//!
//! 生产部署里两个进程读取主应用数据库的同一份目录镜像；演示环境
//! 没有数据库，改为向各进程的内存镜像灌入同一套固定 ID 的内容，
//! 保证两边的权限解析结果一致。`SEED_DEMO=1` 时启用。

use chrono::Utc;
use domain::{
    Channel, ChannelId, ChannelKind, Member, MemberId, Role, RoleId, Server, ServerId, UserId,
    DEFAULT_EVERYONE,
};
use infrastructure::MemoryStore;
use uuid::Uuid;

pub fn server_id() -> ServerId {
    ServerId::new(Uuid::from_u128(0xD000_0001))
}

pub fn owner() -> UserId {
    UserId::new(Uuid::from_u128(0xD000_0002))
}

pub fn lobby() -> ChannelId {
    ChannelId::new(Uuid::from_u128(0xD000_0003))
}

pub fn speaker() -> UserId {
    UserId::new(Uuid::from_u128(0xD000_0004))
}

fn everyone_role() -> RoleId {
    RoleId::new(Uuid::from_u128(0xD000_0005))
}

pub fn seed(store: &MemoryStore) {
    store.insert_server(Server {
        id: server_id(),
        name: "demo".to_string(),
        owner_id: owner(),
        created_at: Utc::now(),
    });
    store.insert_channel(Channel {
        id: lobby(),
        server_id: server_id(),
        name: "lobby".to_string(),
        kind: ChannelKind::Text,
        is_private: false,
        created_at: Utc::now(),
    });
    store.insert_role(Role {
        id: everyone_role(),
        server_id: server_id(),
        name: "everyone".to_string(),
        permissions: DEFAULT_EVERYONE,
        position: 0,
        created_at: Utc::now(),
    });
    store.insert_member(Member {
        id: MemberId::new(Uuid::from_u128(0xD000_0006)),
        server_id: server_id(),
        user_id: speaker(),
        role_ids: vec![everyone_role()],
        joined_at: Utc::now(),
    });

    tracing::info!(
        server_id = %server_id(),
        channel_id = %lobby(),
        owner = %owner(),
        speaker = %speaker(),
        "演示目录已灌入"
    );
}
