//! Programming-error faults and the policy used to report them
//!
//! Nothing in this crate returns a recoverable error. Operations either
//! succeed, no-op by documented policy, or raise a [`Fault`] through the
//! owning object's [`FaultPolicy`].

use core::fmt;

use crate::gpio::PinNumber;

/// Caller bugs detected by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Channel index outside `0..channel_count`
    InvalidChannel { channel: u8, channel_count: u8 },
    /// Operation requires an initialized device
    NotInitialized { operation: &'static str },
    /// Sample time of zero passed to `enable_channel`
    ZeroSampleTime,
    /// Conversion started while the previous sweep is still running
    ConversionInProgress,
    /// Pin number outside the board's pin range
    InvalidPin { pin: PinNumber, pin_count: PinNumber },
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidChannel {
                channel,
                channel_count,
            } => write!(
                f,
                "invalid channel id {} (device has {} channels)",
                channel, channel_count
            ),
            Self::NotInitialized { operation } => {
                write!(f, "ADC device not initialized (calling {})", operation)
            }
            Self::ZeroSampleTime => write!(f, "adc channel sample_time must be > 0"),
            Self::ConversionInProgress => write!(f, "conversion already in progress"),
            Self::InvalidPin { pin, pin_count } => {
                write!(f, "invalid pin {} (board has {} pins)", pin, pin_count)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Fault {}

#[cfg(feature = "defmt")]
impl defmt::Format for Fault {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Fault::InvalidChannel {
                channel,
                channel_count,
            } => defmt::write!(fmt, "InvalidChannel({}/{})", channel, channel_count),
            Fault::NotInitialized { operation } => {
                defmt::write!(fmt, "NotInitialized({})", operation)
            }
            Fault::ZeroSampleTime => defmt::write!(fmt, "ZeroSampleTime"),
            Fault::ConversionInProgress => defmt::write!(fmt, "ConversionInProgress"),
            Fault::InvalidPin { pin, pin_count } => {
                defmt::write!(fmt, "InvalidPin({}/{})", pin, pin_count)
            }
        }
    }
}

/// How a [`Fault`] is surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FaultPolicy {
    /// Always panic with the fault message
    Panic,
    /// Log at error level and let the operation bail out
    Report,
    /// Panic when `debug_assertions` are enabled, report otherwise
    #[default]
    DebugAssert,
}

impl FaultPolicy {
    /// Surface a fault. Returns only if the policy lets execution continue.
    pub fn raise(self, fault: Fault) {
        let fatal = match self {
            Self::Panic => true,
            Self::Report => false,
            Self::DebugAssert => cfg!(debug_assertions),
        };

        if fatal {
            panic!("{}", fault);
        }
        error!("{}", fault);
    }

    /// Raise `fault` unless `condition` holds.
    ///
    /// Returns `condition`, so callers can bail with `if !policy.check(..)`.
    #[inline]
    pub fn check(self, condition: bool, fault: impl FnOnce() -> Fault) -> bool {
        if !condition {
            self.raise(fault());
        }
        condition
    }
}
