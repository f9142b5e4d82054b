//! Arduino-style digital and analog pin functions
//!
//! [`Wiring`] ties a [`GpioPort`] to the board's pin map. Pins that double
//! as ADC inputs are switched in and out of their converter's scan sequence
//! as their mode changes.

use core::convert::Infallible;

use crate::adc::{AdcDevice, AdcPlatform, DEFAULT_SAMPLE_TIME};
use crate::error::{Fault, FaultPolicy};
use crate::gpio::{GpioPort, Level, PinConfig, PinMode, PinNumber};
use crate::sched::Yield;

/// Pin map entry: the ADC channel a pin is wired to, if any
pub struct PinInfo<'a, P> {
    adc: Option<(&'a AdcDevice<P>, u8)>,
}

impl<'a, P> PinInfo<'a, P> {
    /// Pin without analog capability
    pub const fn digital() -> Self {
        Self { adc: None }
    }

    /// Pin wired to `channel` of `device`
    pub const fn analog(device: &'a AdcDevice<P>, channel: u8) -> Self {
        Self {
            adc: Some((device, channel)),
        }
    }

    pub fn adc(&self) -> Option<(&'a AdcDevice<P>, u8)> {
        self.adc
    }
}

impl<P> Clone for PinInfo<'_, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for PinInfo<'_, P> {}

/// Digital and analog pin layer for one board
pub struct Wiring<'a, G, P> {
    port: G,
    pins: &'a [PinInfo<'a, P>],
    policy: FaultPolicy,
}

impl<'a, G: GpioPort, P: AdcPlatform> Wiring<'a, G, P> {
    /// `pins` is indexed by pin number. Pins beyond its end have no analog
    /// capability.
    pub const fn new(port: G, pins: &'a [PinInfo<'a, P>]) -> Self {
        Self {
            port,
            pins,
            policy: FaultPolicy::DebugAssert,
        }
    }

    pub const fn with_fault_policy(
        port: G,
        pins: &'a [PinInfo<'a, P>],
        policy: FaultPolicy,
    ) -> Self {
        Self { port, pins, policy }
    }

    /// Underlying GPIO port
    pub fn port(&self) -> &G {
        &self.port
    }

    fn check_pin(&self, pin: PinNumber) -> bool {
        let pin_count = self.port.pin_count();
        self.policy
            .check(pin < pin_count, || Fault::InvalidPin { pin, pin_count })
    }

    fn analog_channel(&self, pin: PinNumber) -> Option<(&'a AdcDevice<P>, u8)> {
        self.pins.get(usize::from(pin)).and_then(PinInfo::adc)
    }

    /// Configure the electrical mode of a pin.
    ///
    /// For pins with an ADC channel, [`PinMode::InputAnalog`] initializes the
    /// converter (once) and enables the channel; every other mode disables
    /// it.
    pub fn pin_mode(&self, pin: PinNumber, mode: PinMode) {
        if !self.check_pin(pin) {
            return;
        }

        if let Some((device, channel)) = self.analog_channel(pin) {
            if mode == PinMode::InputAnalog {
                device.init();
                device.enable_channel(channel, DEFAULT_SAMPLE_TIME);
            } else {
                device.disable_channel(channel);
            }
        }

        self.port.set_gpio_function(pin);
        self.port.configure(pin, PinConfig::for_mode(mode));
        trace!("pin {} configured", pin);
    }

    /// Current electrical mode, or `None` for an invalid pin
    pub fn get_pin_mode(&self, pin: PinNumber) -> Option<PinMode> {
        if !self.check_pin(pin) {
            return None;
        }
        Some(self.port.config(pin).mode())
    }

    pub fn digital_write(&self, pin: PinNumber, level: Level) {
        if !self.check_pin(pin) {
            return;
        }
        match level {
            Level::High => self.port.set_high(pin),
            Level::Low => self.port.set_low(pin),
        }
    }

    /// Input level; invalid pins read [`Level::Low`]
    pub fn digital_read(&self, pin: PinNumber) -> Level {
        if !self.check_pin(pin) {
            return Level::Low;
        }
        Level::from(self.port.is_high(pin))
    }

    /// One blocking conversion on the pin's ADC channel.
    ///
    /// Returns `None` for invalid pins and pins without analog capability.
    /// The pin is expected to be in [`PinMode::InputAnalog`].
    pub fn analog_read<Y: Yield + ?Sized>(&self, pin: PinNumber, sched: &mut Y) -> Option<u16> {
        if !self.check_pin(pin) {
            return None;
        }
        let (device, channel) = self.analog_channel(pin)?;
        Some(device.read_blocking(channel, sched))
    }

    /// `embedded-hal` handle for a single pin
    pub fn pin(&self, pin: PinNumber) -> Option<DigitalPin<'_, 'a, G, P>> {
        if !self.check_pin(pin) {
            return None;
        }
        Some(DigitalPin { wiring: self, pin })
    }
}

/// Single pin borrowed from a [`Wiring`]
pub struct DigitalPin<'w, 'a, G, P> {
    wiring: &'w Wiring<'a, G, P>,
    pin: PinNumber,
}

impl<G, P> DigitalPin<'_, '_, G, P> {
    pub fn number(&self) -> PinNumber {
        self.pin
    }
}

impl<G: GpioPort, P: AdcPlatform> embedded_hal::digital::ErrorType for DigitalPin<'_, '_, G, P> {
    type Error = Infallible;
}

impl<G: GpioPort, P: AdcPlatform> embedded_hal::digital::InputPin for DigitalPin<'_, '_, G, P> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.wiring.digital_read(self.pin) == Level::High)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.wiring.digital_read(self.pin) == Level::Low)
    }
}

impl<G: GpioPort, P: AdcPlatform> embedded_hal::digital::OutputPin for DigitalPin<'_, '_, G, P> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.wiring.digital_write(self.pin, Level::Low);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.wiring.digital_write(self.pin, Level::High);
        Ok(())
    }
}

impl<G: GpioPort, P: AdcPlatform> embedded_hal::digital::StatefulOutputPin
    for DigitalPin<'_, '_, G, P>
{
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.wiring.digital_read(self.pin) == Level::High)
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.wiring.digital_read(self.pin) == Level::Low)
    }
}
