//! Register interface the ADC driver is written against

use super::config::{
    AdcInitParams, AdcUnit, BlockTransfer, ClockGate, DmaBinding, DmaFlag, EventSource,
};
use super::mask::ChannelMask;

/// Named register operations for one ADC converter and its DMA channel.
///
/// An implementation owns the result buffer the DMA channel writes into;
/// [`read_result`](AdcPlatform::read_result) reads it back. Implementations
/// must tolerate being called through a shared reference, as register
/// blocks are.
pub trait AdcPlatform {
    /// Open a peripheral clock gate
    fn enable_clock(&self, gate: ClockGate);

    /// Open the trigger fabric clock gate
    fn enable_trigger_fabric(&self);

    /// Program resolution, alignment, auto-clear, scan mode and
    /// restart-on-trigger
    fn adc_init(&self, unit: &AdcUnit, params: &AdcInitParams);

    /// Disable hardware triggers for the unit's sequence
    fn adc_disable_trigger(&self, unit: &AdcUnit);

    /// Add channels to the unit's sequence with the given sample time
    fn adc_add_channels(&self, unit: &AdcUnit, mask: ChannelMask, sample_time: u8);

    /// Remove channels from the scan mask
    fn adc_remove_channels(&self, unit: &AdcUnit, mask: ChannelMask);

    /// Current scan mask of the unit's sequence
    fn adc_channel_mask(&self, unit: &AdcUnit) -> ChannelMask;

    /// Software start-convert
    fn adc_start(&self, unit: &AdcUnit);

    /// Program the DMA channel to copy `unit`'s result registers into the
    /// result buffer
    fn dma_init(&self, dma: &DmaBinding, unit: &AdcUnit, transfer: &BlockTransfer);

    /// Enable the DMA controller and the channel
    fn dma_enable(&self, dma: &DmaBinding);

    fn dma_clear_flag(&self, dma: &DmaBinding, flag: DmaFlag);

    fn dma_flag(&self, dma: &DmaBinding, flag: DmaFlag) -> bool;

    /// Bind the trigger fabric event that starts the DMA transfer
    fn dma_set_trigger(&self, dma: &DmaBinding, event: EventSource);

    /// One word of the result buffer
    fn read_result(&self, slot: usize) -> u16;
}

impl<P: AdcPlatform + ?Sized> AdcPlatform for &P {
    fn enable_clock(&self, gate: ClockGate) {
        (**self).enable_clock(gate)
    }

    fn enable_trigger_fabric(&self) {
        (**self).enable_trigger_fabric()
    }

    fn adc_init(&self, unit: &AdcUnit, params: &AdcInitParams) {
        (**self).adc_init(unit, params)
    }

    fn adc_disable_trigger(&self, unit: &AdcUnit) {
        (**self).adc_disable_trigger(unit)
    }

    fn adc_add_channels(&self, unit: &AdcUnit, mask: ChannelMask, sample_time: u8) {
        (**self).adc_add_channels(unit, mask, sample_time)
    }

    fn adc_remove_channels(&self, unit: &AdcUnit, mask: ChannelMask) {
        (**self).adc_remove_channels(unit, mask)
    }

    fn adc_channel_mask(&self, unit: &AdcUnit) -> ChannelMask {
        (**self).adc_channel_mask(unit)
    }

    fn adc_start(&self, unit: &AdcUnit) {
        (**self).adc_start(unit)
    }

    fn dma_init(&self, dma: &DmaBinding, unit: &AdcUnit, transfer: &BlockTransfer) {
        (**self).dma_init(dma, unit, transfer)
    }

    fn dma_enable(&self, dma: &DmaBinding) {
        (**self).dma_enable(dma)
    }

    fn dma_clear_flag(&self, dma: &DmaBinding, flag: DmaFlag) {
        (**self).dma_clear_flag(dma, flag)
    }

    fn dma_flag(&self, dma: &DmaBinding, flag: DmaFlag) -> bool {
        (**self).dma_flag(dma, flag)
    }

    fn dma_set_trigger(&self, dma: &DmaBinding, event: EventSource) {
        (**self).dma_set_trigger(dma, event)
    }

    fn read_result(&self, slot: usize) -> u16 {
        (**self).read_result(slot)
    }
}
