//! ADC device descriptors of the HC32F460

use bsp_hal::adc::{AdcDevice, AdcInitParams, AdcUnit, DmaBinding, Sequence};

use crate::adc::{Hc32Adc, ResultBuffer};
use crate::regs::base;

/// Function clock gates (FCG bank, bit)
pub mod clock {
    use bsp_hal::adc::ClockGate;

    pub const DMA1: ClockGate = ClockGate::new(0, 14);
    pub const DMA2: ClockGate = ClockGate::new(0, 15);
    pub const AOS: ClockGate = ClockGate::new(0, 17);
    pub const ADC1: ClockGate = ClockGate::new(3, 0);
    pub const ADC2: ClockGate = ClockGate::new(3, 1);
}

/// Trigger fabric event numbers
pub mod event {
    use bsp_hal::adc::EventSource;

    pub const ADC1_EOCA: EventSource = EventSource(0x1C0);
    pub const ADC2_EOCA: EventSource = EventSource(0x1C4);
}

pub const ADC1_CHANNELS: usize = 17;
pub const ADC2_CHANNELS: usize = 9;

pub const ADC1_UNIT: AdcUnit = AdcUnit {
    name: "ADC1",
    base: base::ADC1,
    clock: clock::ADC1,
    channel_count: ADC1_CHANNELS as u8,
    sequence: Sequence::A,
};

pub const ADC2_UNIT: AdcUnit = AdcUnit {
    name: "ADC2",
    base: base::ADC2,
    clock: clock::ADC2,
    channel_count: ADC2_CHANNELS as u8,
    sequence: Sequence::A,
};

pub const ADC1_DMA: DmaBinding = DmaBinding {
    base: base::DMA2,
    channel: 0,
    clock: clock::DMA2,
    event_source: event::ADC1_EOCA,
};

pub const ADC2_DMA: DmaBinding = DmaBinding {
    base: base::DMA2,
    channel: 1,
    clock: clock::DMA2,
    event_source: event::ADC2_EOCA,
};

/// ADC device on this part; ADC1 and ADC2 share the type so one pin map
/// can refer to both
pub type Hc32AdcDevice = AdcDevice<Hc32Adc>;

/// ADC1 with DMA2 channel 0 copying into `results`
pub const fn adc1(
    results: &'static ResultBuffer<ADC1_CHANNELS>,
    params: AdcInitParams,
) -> Hc32AdcDevice {
    AdcDevice::new(ADC1_UNIT, ADC1_DMA, params, Hc32Adc::new(&ADC1_UNIT, results))
}

/// ADC2 with DMA2 channel 1 copying into `results`
pub const fn adc2(
    results: &'static ResultBuffer<ADC2_CHANNELS>,
    params: AdcInitParams,
) -> Hc32AdcDevice {
    AdcDevice::new(ADC2_UNIT, ADC2_DMA, params, Hc32Adc::new(&ADC2_UNIT, results))
}
