pub mod command_handler;
pub mod command_models;
pub mod command_registry;
pub mod dispatch_engine;
pub mod handlers;

#[cfg(test)]
pub mod test_support;

pub use command_handler::{
    CommandHandler, DeliveryError, DirectoryError, MemberDirectory, MemberProfile, MessageSink,
};
pub use command_models::{
    Card, Destination, InboundEvent, MembershipEvent, MessageEvent, OutboundMessage, Payload,
    ReplyTarget,
};
pub use command_registry::{default_descriptors, CommandRegistry, HandlerVariant};
pub use dispatch_engine::{DispatchEngine, DispatchSettings};
