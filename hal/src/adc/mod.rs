//! ADC (Analog-to-Digital Converter) device driver
//!
//! Conversions are started by software only. When a sweep finishes, the
//! converter's end-of-conversion event fires the paired DMA channel through
//! the trigger fabric, which copies every result register into the
//! platform's result buffer and raises the block-transfer-complete flag.
//! Completion is observed by polling that flag; no interrupt is involved.
//!
//! ```text
//! enable_channel ─► start_conversion ─► ADC sweep ─► DMA block copy ─► read_result
//! ```

use core::cell::Cell;
use core::convert::Infallible;

use critical_section::Mutex;

use crate::error::{Fault, FaultPolicy};
use crate::sched::Yield;

pub mod config;
mod mask;
mod platform;
#[cfg(any(test, feature = "sim"))]
pub mod sim;

pub use config::{
    AdcInitParams, AdcUnit, BlockTransfer, ClockGate, DataAlignment, DmaBinding, DmaFlag,
    EventSource, Resolution, ScanMode, Sequence, TransferWidth,
};
pub use mask::ChannelMask;
pub use platform::AdcPlatform;

/// Sample time used when a pin is switched to analog input
pub const DEFAULT_SAMPLE_TIME: u8 = 11;

/// Observable conversion lifecycle of a device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionState {
    /// No conversion pending, or the last result was read
    Idle,
    /// Started and the DMA block transfer has not completed yet
    Converting,
    /// DMA block transfer completed; results are in the buffer
    ResultReady,
}

#[derive(Debug, Clone, Copy)]
struct DeviceState {
    initialized: bool,
    in_flight: bool,
}

/// One ADC converter with its DMA channel
///
/// Devices are meant to be declared once by board configuration (usually as
/// `static` items) and are never torn down. All operations take `&self`.
pub struct AdcDevice<P> {
    unit: AdcUnit,
    dma: DmaBinding,
    params: AdcInitParams,
    policy: FaultPolicy,
    platform: P,
    state: Mutex<Cell<DeviceState>>,
}

impl<P: AdcPlatform> AdcDevice<P> {
    /// Create a device using the default fault policy
    pub const fn new(unit: AdcUnit, dma: DmaBinding, params: AdcInitParams, platform: P) -> Self {
        Self::with_fault_policy(unit, dma, params, platform, FaultPolicy::DebugAssert)
    }

    /// Create a device with an explicit fault policy.
    ///
    /// Panics (at compile time for `static` devices) when the unit has more
    /// channels than a [`ChannelMask`] can hold.
    pub const fn with_fault_policy(
        unit: AdcUnit,
        dma: DmaBinding,
        params: AdcInitParams,
        platform: P,
        policy: FaultPolicy,
    ) -> Self {
        assert!(
            unit.channel_count <= ChannelMask::CAPACITY,
            "channel_count exceeds the scan mask width"
        );
        Self {
            unit,
            dma,
            params,
            policy,
            platform,
            state: Mutex::new(Cell::new(DeviceState {
                initialized: false,
                in_flight: false,
            })),
        }
    }

    /// Hardware identity of the converter
    pub fn unit(&self) -> &AdcUnit {
        &self.unit
    }

    /// DMA channel paired with the converter
    pub fn dma(&self) -> &DmaBinding {
        &self.dma
    }

    /// Init parameters fixed at construction
    pub fn params(&self) -> &AdcInitParams {
        &self.params
    }

    /// Policy used to surface caller faults
    pub fn fault_policy(&self) -> FaultPolicy {
        self.policy
    }

    /// Register interface the device drives
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Whether [`init`](AdcDevice::init) has run. Never resets.
    pub fn is_initialized(&self) -> bool {
        self.state().initialized
    }

    fn state(&self) -> DeviceState {
        critical_section::with(|cs| self.state.borrow(cs).get())
    }

    fn update_state(&self, f: impl FnOnce(&mut DeviceState)) {
        critical_section::with(|cs| {
            let cell = self.state.borrow(cs);
            let mut state = cell.get();
            f(&mut state);
            cell.set(state);
        })
    }

    fn require_initialized(&self, operation: &'static str) -> bool {
        self.policy
            .check(self.is_initialized(), || Fault::NotInitialized { operation })
    }

    /// Scan-mask bit for `channel`, faulting on an out-of-range index
    fn channel_mask(&self, channel: u8) -> Option<ChannelMask> {
        let channel_count = self.unit.channel_count;
        let mask = ChannelMask::for_channel(channel, channel_count);
        self.policy.check(mask.is_some(), || Fault::InvalidChannel {
            channel,
            channel_count,
        });
        mask
    }

    //
    // Lifecycle
    //

    /// Bring up the converter and its DMA channel.
    ///
    /// Idempotent: a second call on an initialized device does nothing.
    pub fn init(&self) {
        if self.is_initialized() {
            return;
        }

        // software-triggered converter; the end-of-conversion event starts
        // the DMA copy through the trigger fabric
        self.init_adc();
        self.init_dma();

        self.update_state(|state| state.initialized = true);
        debug!("[{}] initialized device", self.unit.name);
    }

    fn init_adc(&self) {
        self.platform.enable_clock(self.unit.clock);
        self.platform.adc_init(&self.unit, &self.params);

        // conversions are started by software only
        self.platform.adc_disable_trigger(&self.unit);
    }

    fn init_dma(&self) {
        let transfer = BlockTransfer::result_registers(self.unit.channel_count);

        self.platform.enable_clock(self.dma.clock);
        self.platform.dma_init(&self.dma, &self.unit, &transfer);
        self.platform.dma_enable(&self.dma);

        self.platform.dma_clear_flag(&self.dma, DmaFlag::TransferComplete);
        self.platform.dma_clear_flag(&self.dma, DmaFlag::BlockTransferComplete);

        self.platform.enable_trigger_fabric();
        self.platform.dma_set_trigger(&self.dma, self.dma.event_source);
    }

    //
    // Channels
    //

    /// Add `channel` to the scan sequence. Previously enabled channels stay
    /// enabled.
    pub fn enable_channel(&self, channel: u8, sample_time: u8) {
        if !self.require_initialized("enable_channel") {
            return;
        }
        let Some(mask) = self.channel_mask(channel) else {
            return;
        };
        if !self.policy.check(sample_time > 0, || Fault::ZeroSampleTime) {
            return;
        }

        debug!(
            "[{}] enable channel {}, sample_time={}",
            self.unit.name,
            channel,
            sample_time
        );
        self.platform.adc_add_channels(&self.unit, mask, sample_time);
    }

    /// Remove `channel` from the scan sequence.
    ///
    /// On a device that was never initialized no channel can be enabled, so
    /// this returns without touching hardware.
    pub fn disable_channel(&self, channel: u8) {
        if !self.is_initialized() {
            return;
        }
        let Some(mask) = self.channel_mask(channel) else {
            return;
        };

        debug!("[{}] disable channel {}", self.unit.name, channel);
        self.platform.adc_remove_channels(&self.unit, mask);
    }

    /// Channels currently in the scan sequence
    pub fn enabled_channels(&self) -> ChannelMask {
        if !self.is_initialized() {
            return ChannelMask::EMPTY;
        }
        self.platform.adc_channel_mask(&self.unit)
    }

    pub fn is_channel_enabled(&self, channel: u8) -> bool {
        match self.channel_mask(channel) {
            Some(_) => self.enabled_channels().contains(channel),
            None => false,
        }
    }

    //
    // Conversion
    //

    /// Start a software-triggered sweep over the enabled channels.
    ///
    /// Starting again before the previous sweep completed is a caller error.
    pub fn start_conversion(&self) {
        if !self.require_initialized("start_conversion") {
            return;
        }
        if self.state().in_flight && !self.completion_flag() {
            self.policy.raise(Fault::ConversionInProgress);
        }

        self.platform.dma_clear_flag(&self.dma, DmaFlag::BlockTransferComplete);
        self.platform.adc_start(&self.unit);
        self.update_state(|state| state.in_flight = true);
        trace!("[{}] conversion started", self.unit.name);
    }

    /// Whether the DMA block transfer of the last sweep has completed.
    ///
    /// Pure query: repeated calls observe the same flag.
    pub fn is_conversion_completed(&self) -> bool {
        if !self.require_initialized("is_conversion_completed") {
            return false;
        }
        self.completion_flag()
    }

    fn completion_flag(&self) -> bool {
        self.platform.dma_flag(&self.dma, DmaFlag::BlockTransferComplete)
    }

    /// Poll for completion, yielding to `sched` between polls.
    ///
    /// There is no timeout; conversion time is bounded by hardware.
    pub fn await_conversion_completed<Y: Yield + ?Sized>(&self, sched: &mut Y) {
        if !self.require_initialized("await_conversion_completed") {
            return;
        }
        while !self.completion_flag() {
            sched.yield_now();
        }
    }

    /// Buffered raw sample for `channel`.
    ///
    /// Clears the completion flag, so [`is_conversion_completed`] reports
    /// `false` until the next sweep completes. The buffer itself is left
    /// alone: a channel that is not enabled reads whatever its slot holds.
    ///
    /// [`is_conversion_completed`]: AdcDevice::is_conversion_completed
    pub fn read_result(&self, channel: u8) -> u16 {
        if !self.require_initialized("read_result") {
            return 0;
        }
        if self.channel_mask(channel).is_none() {
            return 0;
        }

        self.platform.dma_clear_flag(&self.dma, DmaFlag::BlockTransferComplete);
        self.update_state(|state| state.in_flight = false);
        self.platform.read_result(usize::from(channel))
    }

    /// Non-blocking read: `WouldBlock` until the sweep has completed.
    pub fn try_read(&self, channel: u8) -> nb::Result<u16, Infallible> {
        if self.is_conversion_completed() {
            Ok(self.read_result(channel))
        } else {
            Err(nb::Error::WouldBlock)
        }
    }

    /// Run one sweep and return the sample for `channel`.
    pub fn read_blocking<Y: Yield + ?Sized>(&self, channel: u8, sched: &mut Y) -> u16 {
        self.start_conversion();
        self.await_conversion_completed(sched);
        self.read_result(channel)
    }

    /// Lifecycle state derived from the completion flag and whether a
    /// started sweep has not been read yet
    pub fn conversion_state(&self) -> ConversionState {
        let state = self.state();
        if !state.initialized {
            ConversionState::Idle
        } else if self.completion_flag() {
            ConversionState::ResultReady
        } else if state.in_flight {
            ConversionState::Converting
        } else {
            ConversionState::Idle
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConversionState {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            ConversionState::Idle => defmt::write!(fmt, "Idle"),
            ConversionState::Converting => defmt::write!(fmt, "Converting"),
            ConversionState::ResultReady => defmt::write!(fmt, "ResultReady"),
        }
    }
}
