//! Channel index to scan-mask bit mapping

/// Set of ADC channels, one bit per channel index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelMask(u32);

impl ChannelMask {
    /// Empty channel mask
    pub const EMPTY: Self = Self(0);

    /// Highest number of channels a mask can describe
    pub const CAPACITY: u8 = 32;

    /// Mask from raw register bits
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Mask holding a single channel.
    ///
    /// Returns `None` when `channel` is outside `0..channel_count` or beyond
    /// the mask width.
    pub const fn for_channel(channel: u8, channel_count: u8) -> Option<Self> {
        if channel < channel_count && channel < Self::CAPACITY {
            Some(Self(1 << channel))
        } else {
            None
        }
    }

    /// Raw register bits
    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, channel: u8) -> bool {
        channel < Self::CAPACITY && self.0 & (1 << channel) != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Iterate over the channel indices in ascending order
    pub fn iter(self) -> impl Iterator<Item = u8> {
        (0..Self::CAPACITY).filter(move |&ch| self.contains(ch))
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ChannelMask {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "ChannelMask({=u32:b})", self.0);
    }
}
