//! 权限位集与频道权限解析
//!
//! 权限以位集表示：每个能力占一个独立位，角色之间通过按位 OR 聚合，
//! 频道上可叠加角色覆写（allow/deny 对）与成员覆写（整体替换）。
//! `resolve_channel_permissions` 是纯函数，不访问存储，解析协议
//! （成员资格校验、服务器所有者旁路）由应用层统一执行。

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::value_objects::{ChannelId, MemberId, RoleId};

bitflags! {
    /// 服务器权限位集。
    ///
    /// 各位两两互斥；`ADMINISTRATOR` 一旦出现，其余所有位失效，
    /// 解析直接返回全集（全局覆盖，不是并集的简写）。
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Permissions: u64 {
        // 通用
        const VIEW_CHANNELS      = 1 << 0;
        const MANAGE_CHANNELS    = 1 << 1;
        const MANAGE_ROLES       = 1 << 2;
        const MANAGE_EXPRESSIONS = 1 << 3;
        const VIEW_AUDIT_LOG     = 1 << 4;
        const MANAGE_WEBHOOKS    = 1 << 5;
        const MANAGE_SERVER      = 1 << 6;
        const CREATE_INVITES     = 1 << 7;

        // 成员管理
        const CHANGE_NICKNAME    = 1 << 8;
        const MANAGE_NICKNAMES   = 1 << 9;
        const KICK_MEMBERS       = 1 << 10;
        const BAN_MEMBERS        = 1 << 11;
        const TIMEOUT_MEMBERS    = 1 << 12;

        // 文字频道
        const SEND_MESSAGES        = 1 << 13;
        const EMBED_LINKS          = 1 << 14;
        const ATTACH_FILES         = 1 << 15;
        const ADD_REACTIONS        = 1 << 16;
        const USE_EXTERNAL_EMOJI   = 1 << 17;
        const MENTION_EVERYONE     = 1 << 18;
        const MANAGE_MESSAGES      = 1 << 19;
        const READ_MESSAGE_HISTORY = 1 << 20;
        const SEND_TTS_MESSAGES    = 1 << 21;

        // 语音频道
        const CONNECT            = 1 << 22;
        const SPEAK              = 1 << 23;
        const VIDEO              = 1 << 24;
        const MUTE_MEMBERS       = 1 << 25;
        const DEAFEN_MEMBERS     = 1 << 26;
        const MOVE_MEMBERS       = 1 << 27;
        const USE_VOICE_ACTIVITY = 1 << 28;
        const PRIORITY_SPEAKER   = 1 << 29;

        // 管理员：使其余所有位失效
        const ADMINISTRATOR      = 1 << 30;
    }
}

/// `@everyone` 角色的默认权限。
pub const DEFAULT_EVERYONE: Permissions = Permissions::VIEW_CHANNELS
    .union(Permissions::SEND_MESSAGES)
    .union(Permissions::EMBED_LINKS)
    .union(Permissions::ATTACH_FILES)
    .union(Permissions::ADD_REACTIONS)
    .union(Permissions::READ_MESSAGE_HISTORY)
    .union(Permissions::CREATE_INVITES)
    .union(Permissions::CONNECT)
    .union(Permissions::SPEAK)
    .union(Permissions::USE_VOICE_ACTIVITY)
    .union(Permissions::CHANGE_NICKNAME);

/// 频道级角色覆写记录：(channel, role) -> (allow, deny)。
///
/// allow 与 deny 不要求互斥；合并时 deny 先减去、allow 再并入（见
/// [`resolve_channel_permissions`]），因此冲突位最终落在 "允许" 一侧。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRoleOverride {
    pub channel_id: ChannelId,
    pub role_id: RoleId,
    pub allow: Permissions,
    pub deny: Permissions,
}

impl ChannelRoleOverride {
    pub fn new(
        channel_id: ChannelId,
        role_id: RoleId,
        allow: Permissions,
        deny: Permissions,
    ) -> Self {
        Self {
            channel_id,
            role_id,
            allow,
            deny,
        }
    }
}

/// 频道级成员覆写记录：存在时整体替换角色推导出的位集，
/// 即便其值为空集（成员在该频道零权限）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelMemberOverride {
    pub channel_id: ChannelId,
    pub member_id: MemberId,
    pub permissions: Permissions,
}

impl ChannelMemberOverride {
    pub fn new(channel_id: ChannelId, member_id: MemberId, permissions: Permissions) -> Self {
        Self {
            channel_id,
            member_id,
            permissions,
        }
    }
}

/// 解析一个成员在单个频道上的有效权限位集。
///
/// 算法（顺序即语义，不可调换）：
/// 1. `base` = 所有角色位集的按位 OR（无角色则为空集）；
/// 2. `base` 含 `ADMINISTRATOR` 位 -> 立即返回全集，后续步骤不再适用
///    （服务器所有者旁路优先级更高，由调用方在进入本函数前处理）；
/// 3. 跨全部角色覆写累计 `deny_union` / `allow_union`；
/// 4. `base = (base & !deny_union) | allow_union`，先减 deny 再并 allow，
///    因此角色 A 的 deny 与角色 B 的 allow 冲突时 allow 胜出；
/// 5. 成员覆写存在 -> 丢弃上述结果，原样返回覆写值（绝对替换）。
///
/// # 参数
/// - `role_permissions`: 成员持有的各角色基础位集，顺序不影响结果
/// - `role_overrides`: 该频道上成员所持角色对应的覆写条目
/// - `member_override`: 该频道上成员覆写的绝对位集（如有）
///
/// # 返回
/// 有效权限位集；本函数不会失败，最低返回空集
pub fn resolve_channel_permissions(
    role_permissions: &[Permissions],
    role_overrides: &[ChannelRoleOverride],
    member_override: Option<Permissions>,
) -> Permissions {
    let base = role_permissions
        .iter()
        .fold(Permissions::empty(), |acc, p| acc | *p);

    if base.contains(Permissions::ADMINISTRATOR) {
        return Permissions::all();
    }

    let mut deny_union = Permissions::empty();
    let mut allow_union = Permissions::empty();
    for overwrite in role_overrides {
        deny_union |= overwrite.deny;
        allow_union |= overwrite.allow;
    }

    let resolved = (base & !deny_union) | allow_union;

    match member_override {
        Some(absolute) => absolute,
        None => resolved,
    }
}
