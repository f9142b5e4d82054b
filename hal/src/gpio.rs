//! GPIO (General Purpose Input/Output) abstraction
//!
//! [`GpioPort`] is the register-mapped collaborator the wiring layer drives.
//! Vendor crates implement it on top of their port controller.

/// Board pin number
pub type PinNumber = u16;

/// Electrical pin modes exposed to firmware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    /// Input (floating)
    Input,
    /// Input with pull-up resistor
    InputPullUp,
    /// Analog input, routed to the pin's ADC channel
    InputAnalog,
    /// Output (push-pull)
    Output,
}

/// GPIO pin levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Low level (0V)
    Low,
    /// High level (VCC)
    High,
}

impl From<bool> for Level {
    fn from(value: bool) -> Self {
        if value {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl From<Level> for bool {
    fn from(level: Level) -> Self {
        matches!(level, Level::High)
    }
}

/// Port controller direction setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PortDirection {
    #[default]
    In,
    Out,
    Analog,
}

/// Raw pin configuration as held by the port controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PinConfig {
    pub direction: PortDirection,
    pub pull_up: bool,
}

impl PinConfig {
    /// Port configuration for an electrical mode
    pub const fn for_mode(mode: PinMode) -> Self {
        match mode {
            PinMode::Input => Self {
                direction: PortDirection::In,
                pull_up: false,
            },
            PinMode::InputPullUp => Self {
                direction: PortDirection::In,
                pull_up: true,
            },
            PinMode::InputAnalog => Self {
                direction: PortDirection::Analog,
                pull_up: false,
            },
            PinMode::Output => Self {
                direction: PortDirection::Out,
                pull_up: false,
            },
        }
    }

    /// Electrical mode described by this configuration
    pub const fn mode(&self) -> PinMode {
        match self.direction {
            PortDirection::Out => PinMode::Output,
            PortDirection::In if self.pull_up => PinMode::InputPullUp,
            PortDirection::In => PinMode::Input,
            PortDirection::Analog => PinMode::InputAnalog,
        }
    }
}

/// GPIO port controller
///
/// Pin numbers passed in are already validated against [`pin_count`].
///
/// [`pin_count`]: GpioPort::pin_count
pub trait GpioPort {
    /// Number of pins on the board
    fn pin_count(&self) -> PinNumber;

    /// Route the pin to its GPIO function (away from any peripheral)
    fn set_gpio_function(&self, pin: PinNumber);

    /// Apply an electrical configuration
    fn configure(&self, pin: PinNumber, config: PinConfig);

    /// Read back the current configuration
    fn config(&self, pin: PinNumber) -> PinConfig;

    /// Drive the output latch high
    fn set_high(&self, pin: PinNumber);

    /// Drive the output latch low
    fn set_low(&self, pin: PinNumber);

    /// Sample the input level
    fn is_high(&self, pin: PinNumber) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_round_trips_every_mode() {
        for mode in [
            PinMode::Input,
            PinMode::InputPullUp,
            PinMode::InputAnalog,
            PinMode::Output,
        ] {
            assert_eq!(PinConfig::for_mode(mode).mode(), mode);
        }
    }

    #[test]
    fn level_from_bool() {
        assert_eq!(Level::from(true), Level::High);
        assert!(!bool::from(Level::Low));
    }
}
