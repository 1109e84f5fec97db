//! # Kernel/Actor Messaging
//!
//! This crate defines the messages exchanged between the kernel controller
//! and the workload actors.
//!
//! ## Philosophy
//!
//! - **Messages, not signals**: stop/continue/kill become typed commands
//! - **One inbox**: timer ticks, I/O requests and exit notifications share
//!   a single ordered channel, so the kernel never races with itself
//! - **Typed, not stringly-typed**: events carry the actor handle that
//!   raised them

pub mod channel;
pub mod message;

pub use channel::{event_channel, ChannelClosed, EventInbox, EventSender};
pub use message::{ActorCommand, KernelEvent};
