//! ADC device descriptors and init parameters

/// Conversion resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Bits12,
    Bits10,
    Bits8,
}

/// Placement of the conversion result inside the 16-bit data register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataAlignment {
    Right,
    Left,
}

/// Scan sequence slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sequence {
    A,
    B,
}

/// Sequence scan mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// Sequence A, one sweep per start
    SequenceAOnce,
    /// Sequence A, sweeps back to back
    SequenceAContinuous,
    /// Sequences A and B, one sweep each
    SequenceAOnceBOnce,
    /// Sequence A continuous, sequence B one sweep
    SequenceAContinuousBOnce,
}

/// Caller-supplied conversion setup, fixed after construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdcInitParams {
    pub resolution: Resolution,
    pub data_alignment: DataAlignment,
    pub scan_mode: ScanMode,
}

impl AdcInitParams {
    pub const fn new() -> Self {
        Self {
            resolution: Resolution::Bits12,
            data_alignment: DataAlignment::Right,
            scan_mode: ScanMode::SequenceAOnce,
        }
    }
}

impl Default for AdcInitParams {
    fn default() -> Self {
        Self::new()
    }
}

/// Peripheral clock gate: a bank register and the bit inside it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockGate {
    pub bank: u8,
    pub bit: u8,
}

impl ClockGate {
    pub const fn new(bank: u8, bit: u8) -> Self {
        Self { bank, bit }
    }
}

/// Trigger fabric event number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventSource(pub u16);

/// Hardware identity of one ADC converter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdcUnit {
    /// Debug tag, e.g. `"ADC1"`
    pub name: &'static str,
    pub base: usize,
    pub clock: ClockGate,
    /// Result registers and channel inputs, at most
    /// [`ChannelMask::CAPACITY`](super::ChannelMask::CAPACITY)
    pub channel_count: u8,
    pub sequence: Sequence,
}

/// DMA channel paired with an ADC converter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DmaBinding {
    pub base: usize,
    pub channel: u8,
    pub clock: ClockGate,
    /// Event that starts the transfer (the converter's end-of-conversion)
    pub event_source: EventSource,
}

/// DMA status flags the driver polls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DmaFlag {
    TransferComplete,
    BlockTransferComplete,
}

/// DMA beat width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferWidth {
    Bits8,
    Bits16,
    Bits32,
}

/// DMA channel programming for the result-register copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockTransfer {
    /// Beats per block, one per result register
    pub block_size: u16,
    /// Blocks to move; zero keeps the channel running indefinitely
    pub transfer_count: u16,
    pub width: TransferWidth,
    pub increment_source: bool,
    pub increment_destination: bool,
    /// Reload addresses after each block
    pub repeat: bool,
    pub interrupts: bool,
}

impl BlockTransfer {
    /// Circular copy of `channel_count` 16-bit result registers with
    /// completion reported through status flags only.
    pub const fn result_registers(channel_count: u8) -> Self {
        Self {
            block_size: channel_count as u16,
            transfer_count: 0,
            width: TransferWidth::Bits16,
            increment_source: true,
            increment_destination: true,
            repeat: true,
            interrupts: false,
        }
    }
}
