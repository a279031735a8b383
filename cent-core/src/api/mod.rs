// Command protocol layer: typed commands, batching, reply correlation

pub mod batch;
pub mod command;
pub mod reply;

pub use batch::BatchDispatcher;
pub use command::{
    BroadcastRequest, ChannelsRequest, Command, DisconnectRequest, HistoryRequest, InfoRequest,
    PresenceRequest, PresenceStatsRequest, PublishRequest, StreamPosition, SubscribeRequest,
    UnsubscribeRequest,
};
pub use reply::{
    BroadcastResult, ChannelInfo, ChannelsResult, ClientInfo, CommandReply, ErrorInfo,
    HistoryResult, InfoResult, NodeInfo, PresenceResult, PresenceStatsResult, Publication,
    PublishResult,
};
