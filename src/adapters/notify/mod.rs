//! Notifier adapters.

mod channel_notifier;

pub use channel_notifier::ChannelNotifier;
