#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use application::{
    AccessControl, AccessControlDependencies, BusSubscription, EventBus, EventPublisher,
    FriendService, FriendServiceDependencies, MembershipService, MembershipServiceDependencies,
    MessageService, MessageServiceDependencies, NullEventForwarder, PresenceService,
    PresenceServiceDependencies,
};
use axum::Router;
use domain::{
    Channel, ChannelId, ChannelKind, EventKind, Member, Permissions, RealtimeEvent, Role, RoleId,
    Server, ServerId, UserId,
};
use infrastructure::MemoryStore;
use uuid::Uuid;
use web_api::{router, AppState};

/// 录制总线上全部事件，断言生产端发布行为用
pub struct EventRecorder {
    events: Arc<Mutex<Vec<RealtimeEvent>>>,
    _guards: Vec<BusSubscription>,
}

impl EventRecorder {
    fn attach(bus: Arc<EventBus>) -> Self {
        let events: Arc<Mutex<Vec<RealtimeEvent>>> = Arc::new(Mutex::new(Vec::new()));
        let guards = EventKind::ALL
            .into_iter()
            .map(|kind| {
                let sink = events.clone();
                BusSubscription::new(bus.clone(), kind, move |event: &RealtimeEvent| {
                    sink.lock().expect("录制锁").push(event.clone());
                })
            })
            .collect();
        Self {
            events,
            _guards: guards,
        }
    }

    pub fn recorded(&self) -> Vec<RealtimeEvent> {
        self.events.lock().expect("录制锁").clone()
    }
}

/// 一套已灌入目录快照的生产端：一座服务器、公开频道、
/// 发言成员与仅可见成员
pub struct TestWorld {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub recorder: EventRecorder,
    pub server_id: ServerId,
    pub owner_id: UserId,
    pub channel_id: ChannelId,
    pub speaker: UserId,
    pub lurker: UserId,
    pub speaker_role: RoleId,
}

pub fn build_world() -> TestWorld {
    let store = Arc::new(MemoryStore::new());

    let owner_id = UserId::new(Uuid::new_v4());
    let server = Server::new("general".to_string(), owner_id);
    let server_id = server.id;
    store.insert_server(server);

    let channel = Channel::new(server_id, "text".to_string(), ChannelKind::Text);
    let channel_id = channel.id;
    store.insert_channel(channel);

    let speaker_role = Role::new(
        server_id,
        "speaker".to_string(),
        Permissions::VIEW_CHANNELS | Permissions::SEND_MESSAGES,
        1,
    );
    let viewer_role = Role::new(
        server_id,
        "viewer".to_string(),
        Permissions::VIEW_CHANNELS,
        0,
    );

    let speaker = UserId::new(Uuid::new_v4());
    let lurker = UserId::new(Uuid::new_v4());
    store.insert_member(Member::with_roles(server_id, speaker, vec![speaker_role.id]));
    store.insert_member(Member::with_roles(server_id, lurker, vec![viewer_role.id]));

    let speaker_role_id = speaker_role.id;
    store.insert_role(speaker_role);
    store.insert_role(viewer_role);

    let bus = Arc::new(EventBus::new());
    let recorder = EventRecorder::attach(bus.clone());
    let publisher = Arc::new(EventPublisher::new(bus, Arc::new(NullEventForwarder)));

    let access_control = Arc::new(AccessControl::new(AccessControlDependencies {
        server_repository: store.clone(),
        member_repository: store.clone(),
        channel_repository: store.clone(),
    }));

    let message_service = Arc::new(MessageService::new(MessageServiceDependencies {
        access_control: access_control.clone(),
        publisher: publisher.clone(),
    }));
    let presence_service = Arc::new(PresenceService::new(PresenceServiceDependencies {
        presence_repository: store.clone(),
        publisher: publisher.clone(),
    }));
    let friend_service = Arc::new(FriendService::new(FriendServiceDependencies {
        publisher: publisher.clone(),
    }));
    let membership_service = Arc::new(MembershipService::new(MembershipServiceDependencies {
        access_control,
        server_repository: store.clone(),
        member_repository: store.clone(),
        publisher,
    }));

    let state = AppState::new(
        message_service,
        presence_service,
        friend_service,
        membership_service,
    );

    TestWorld {
        router: router(state),
        store,
        recorder,
        server_id,
        owner_id,
        channel_id,
        speaker,
        lurker,
        speaker_role: speaker_role_id,
    }
}
