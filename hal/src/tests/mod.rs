mod adc;

use crate::adc::sim::SimAdc;
use crate::adc::{
    AdcDevice, AdcInitParams, AdcUnit, ClockGate, DmaBinding, EventSource, Sequence,
};
use crate::error::FaultPolicy;

pub(crate) const ADC_CLOCK: ClockGate = ClockGate::new(3, 0);
pub(crate) const DMA_CLOCK: ClockGate = ClockGate::new(0, 14);
pub(crate) const END_OF_CONVERSION: EventSource = EventSource(0x1C0);
pub(crate) const CHANNELS: u8 = 8;

pub(crate) const UNIT: AdcUnit = AdcUnit {
    name: "ADC1",
    base: 0x4004_0000,
    clock: ADC_CLOCK,
    channel_count: CHANNELS,
    sequence: Sequence::A,
};

pub(crate) const DMA: DmaBinding = DmaBinding {
    base: 0x4005_3000,
    channel: 0,
    clock: DMA_CLOCK,
    event_source: END_OF_CONVERSION,
};

pub(crate) fn sim() -> SimAdc {
    SimAdc::new(END_OF_CONVERSION)
}

pub(crate) fn device(sim: &SimAdc, policy: FaultPolicy) -> AdcDevice<&SimAdc> {
    AdcDevice::with_fault_policy(UNIT, DMA, AdcInitParams::default(), sim, policy)
}
