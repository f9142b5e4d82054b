//! HDSC HC32F460 HAL implementation
//!
//! Register-level [`bsp_hal::adc::AdcPlatform`] for the HC32F460: ADC1/ADC2,
//! the DMA controllers that copy their result registers, the AOS trigger
//! fabric and the PWC function clock gates.
//!
//! ## Example
//! ```no_run
//! use bsp_hal::adc::AdcInitParams;
//! use hal_hc32::{adc1, Hc32AdcDevice, ResultBuffer, ADC1_CHANNELS};
//!
//! static ADC1_RESULTS: ResultBuffer<ADC1_CHANNELS> = ResultBuffer::new();
//! static ADC1: Hc32AdcDevice = adc1(&ADC1_RESULTS, AdcInitParams::new());
//!
//! ADC1.init();
//! ADC1.enable_channel(3, 11);
//! let value = ADC1.read_blocking(3, &mut bsp_hal::SpinYield);
//! ```

#![cfg_attr(not(test), no_std)]

pub mod adc;
pub mod devices;
mod regs;

// Re-export commonly used types
pub use adc::{Hc32Adc, ResultBuffer, ResultWord};
pub use devices::{
    adc1, adc2, clock, event, Hc32AdcDevice, ADC1_CHANNELS, ADC1_DMA, ADC1_UNIT, ADC2_CHANNELS,
    ADC2_DMA, ADC2_UNIT,
};
pub use regs::base;
