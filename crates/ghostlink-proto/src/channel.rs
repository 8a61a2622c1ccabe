use crate::label::DataLabel;

/// Logical channels multiplexed over a transport.
///
/// - `Text`: human-readable messages, FIFO, consumed one at a time.
/// - `Event`: one-shot structured messages, FIFO, consumed one at a time.
/// - `Snapshot`: latest-value-per-sender; a newer snapshot supersedes the
///   previous unconsumed one from the same sender, and consuming clears the
///   whole collection for that cycle.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    Text = 0,
    Event = 1,
    Snapshot = 2,
}

/// Map a data label to the channel its records are expected on.
pub const fn channel_for_label(label: DataLabel) -> ChannelKind {
    match label {
        DataLabel::PlayerSnapshot => ChannelKind::Snapshot,
        DataLabel::PlayerLevel => ChannelKind::Event,
    }
}
