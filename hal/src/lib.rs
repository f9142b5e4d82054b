//! Board support Hardware Abstraction Layer (HAL)
//!
//! This crate provides the digital I/O and analog input layer that sits
//! between firmware and a microcontroller's register interface. The ADC
//! driver runs a DMA-backed, interrupt-free conversion pipeline; the wiring
//! layer maps board pins onto GPIO and ADC channels.
//!
//! Vendor crates (for example `hal-hc32`) implement [`adc::AdcPlatform`] and
//! boards supply a [`gpio::GpioPort`]; everything in this crate is free of
//! `unsafe`.

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![forbid(unsafe_code)]

// This must go first so the macros are visible to the rest of the crate.
mod fmt;

pub mod adc;
pub mod error;
pub mod gpio;
pub mod sched;
pub mod wiring;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use adc::{AdcDevice, AdcInitParams, AdcPlatform, ChannelMask, ConversionState};
pub use error::{Fault, FaultPolicy};
pub use gpio::{GpioPort, Level, PinMode};
pub use sched::{SpinYield, Yield};
pub use wiring::{PinInfo, Wiring};
