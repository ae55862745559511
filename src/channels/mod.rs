//! Typed publish/subscribe channels.
//!
//! This module groups the channel **data model** (identity, payload arity)
//! and the [`Channel`] fan-out itself.
//!
//! ## Contents
//! - [`Channel`] shared publish point; aliases [`Channel0`], [`Channel1`], [`Channel2`]
//! - [`Payload`] the closed set of arities: `()`, `(T,)`, `(T0, T1)`
//! - [`ChannelInfo`], [`ChannelId`] identity shared with trace entries
//! - [`SubscriptionId`], [`Handler`] subscription handles
//!
//! ## Quick reference
//! - **Producers**: any module holding a clone calls `raise`.
//! - **Consumers**: `subscribe` on activation, `unsubscribe` on teardown
//!   (unconditional unsubscribe is safe).

mod channel;
mod info;
mod payload;

pub use channel::{
    Channel, Channel0, Channel1, Channel2, ChannelBuilder, Handler, SubscriptionId,
};
pub use info::{ChannelId, ChannelInfo};
pub use payload::Payload;
