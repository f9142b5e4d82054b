//! HC32F460 register map and field encodings used by the ADC platform
//!
//! Offsets follow the HC32F460 reference manual. Only the registers the ADC
//! pipeline touches are described.

use core::marker::PhantomData;
use core::ptr;

use bsp_hal::adc::{
    AdcInitParams, BlockTransfer, DataAlignment, Resolution, ScanMode, Sequence, TransferWidth,
};

/// Memory-mapped register at a fixed address
pub(crate) struct Reg<T> {
    addr: usize,
    _width: PhantomData<T>,
}

impl<T: Copy> Reg<T> {
    pub(crate) const fn at(addr: usize) -> Self {
        Self {
            addr,
            _width: PhantomData,
        }
    }

    pub(crate) fn read(&self) -> T {
        // SAFETY: addresses are built from the peripheral bases below and
        // point at device registers of width `T`.
        unsafe { ptr::read_volatile(self.addr as *const T) }
    }

    pub(crate) fn write(&self, value: T) {
        // SAFETY: see `read`.
        unsafe { ptr::write_volatile(self.addr as *mut T, value) }
    }

    pub(crate) fn modify(&self, f: impl FnOnce(T) -> T) {
        self.write(f(self.read()));
    }
}

pub mod base {
    pub const ADC1: usize = 0x4004_0000;
    pub const ADC2: usize = 0x4004_0400;
    pub const DMA1: usize = 0x4005_3000;
    pub const DMA2: usize = 0x4005_3400;
    pub const AOS: usize = 0x4001_0800;
    pub const PWC_FCG: usize = 0x4004_8000;
}

pub(crate) mod adc {
    pub const STR: usize = 0x00;
    pub const CR0: usize = 0x02;
    pub const CR1: usize = 0x04;
    pub const TRGSR: usize = 0x0A;
    pub const CHSELRA0: usize = 0x0C;
    pub const CHSELRA1: usize = 0x0E;
    pub const CHSELRB0: usize = 0x10;
    pub const CHSELRB1: usize = 0x12;
    /// SSTR0..SSTR15, one byte per channel
    pub const SSTR0: usize = 0x20;
    /// Sample time shared by channels 16 and up
    pub const SSTRL: usize = 0x30;
    /// DR0..DRn, contiguous 16-bit result registers
    pub const DR0: usize = 0x50;

    pub const STR_STRT: u8 = 1 << 0;
    pub const CR0_MS_MASK: u16 = 0b11;
    pub const CR0_ACCSEL_SHIFT: u16 = 4;
    pub const CR0_ACCSEL_MASK: u16 = 0b11 << CR0_ACCSEL_SHIFT;
    pub const CR0_CLREN: u16 = 1 << 6;
    pub const CR0_DFMT: u16 = 1 << 7;
    pub const CR1_RSCHSEL: u16 = 1 << 2;
    pub const TRGSR_TRGENA: u16 = 1 << 7;
    pub const TRGSR_TRGENB: u16 = 1 << 15;
}

pub(crate) mod dma {
    pub const EN: usize = 0x00;
    pub const INTSTAT1: usize = 0x08;
    pub const INTMASK1: usize = 0x10;
    pub const INTCLR1: usize = 0x18;
    pub const CHEN: usize = 0x1C;

    /// Per-channel register block
    pub const CH_BASE: usize = 0x40;
    pub const CH_STRIDE: usize = 0x40;
    pub const SAR: usize = 0x00;
    pub const DAR: usize = 0x04;
    pub const DTCTL: usize = 0x08;
    pub const RPT: usize = 0x0C;
    pub const SNSEQCTL: usize = 0x10;
    pub const DNSEQCTL: usize = 0x14;
    pub const LLP: usize = 0x18;
    pub const CHCTL: usize = 0x1C;

    /// Block-transfer-complete bits sit above the transfer-complete bits
    pub const BTC_SHIFT: u32 = 16;

    pub const CHCTL_SINC_INC: u32 = 0b01;
    pub const CHCTL_DINC_INC: u32 = 0b01 << 2;
    pub const CHCTL_SRPTEN: u32 = 1 << 4;
    pub const CHCTL_DRPTEN: u32 = 1 << 5;
    pub const CHCTL_HSIZE_SHIFT: u32 = 8;
    pub const CHCTL_IE: u32 = 1 << 12;
}

pub(crate) mod aos {
    pub const DMA1_TRGSEL0: usize = 0x14;
    pub const DMA2_TRGSEL0: usize = 0x24;
    pub const TRGSEL_MASK: u32 = 0x1FF;
}

pub(crate) mod pwc {
    /// FCG0PC unlock and lock keys
    pub const FCG0PC: usize = 0x10;
    pub const FCG0PC_UNLOCK: u32 = 0xA5A5_0001;
    pub const FCG0PC_LOCK: u32 = 0xA5A5_0000;
}

/// CR0 with mode, resolution, auto-clear and alignment applied
pub(crate) fn cr0_value(current: u16, params: &AdcInitParams) -> u16 {
    let mode: u16 = match params.scan_mode {
        ScanMode::SequenceAOnce => 0b00,
        ScanMode::SequenceAContinuous => 0b01,
        ScanMode::SequenceAOnceBOnce => 0b10,
        ScanMode::SequenceAContinuousBOnce => 0b11,
    };
    let accsel: u16 = match params.resolution {
        Resolution::Bits12 => 0b00,
        Resolution::Bits10 => 0b01,
        Resolution::Bits8 => 0b10,
    };

    let mut value = current & !(adc::CR0_MS_MASK | adc::CR0_ACCSEL_MASK | adc::CR0_DFMT);
    value |= mode | (accsel << adc::CR0_ACCSEL_SHIFT) | adc::CR0_CLREN;
    if params.data_alignment == DataAlignment::Left {
        value |= adc::CR0_DFMT;
    }
    value
}

pub(crate) fn trigger_enable_bit(sequence: Sequence) -> u16 {
    match sequence {
        Sequence::A => adc::TRGSR_TRGENA,
        Sequence::B => adc::TRGSR_TRGENB,
    }
}

/// Channel-select register pair of a sequence
pub(crate) fn channel_select(sequence: Sequence) -> (usize, usize) {
    match sequence {
        Sequence::A => (adc::CHSELRA0, adc::CHSELRA1),
        Sequence::B => (adc::CHSELRB0, adc::CHSELRB1),
    }
}

pub(crate) fn sample_time_offset(channel: u8) -> usize {
    if channel < 16 {
        adc::SSTR0 + usize::from(channel)
    } else {
        adc::SSTRL
    }
}

/// DTCTL: block size in [9:0], transfer count in [31:16]
pub(crate) fn dtctl_value(transfer: &BlockTransfer) -> u32 {
    (u32::from(transfer.transfer_count) << 16) | (u32::from(transfer.block_size) & 0x3FF)
}

/// RPT: source repeat size in [9:0], destination repeat size in [25:16]
pub(crate) fn rpt_value(transfer: &BlockTransfer) -> u32 {
    let size = u32::from(transfer.block_size) & 0x3FF;
    (size << 16) | size
}

pub(crate) fn chctl_value(transfer: &BlockTransfer) -> u32 {
    let hsize: u32 = match transfer.width {
        TransferWidth::Bits8 => 0b00,
        TransferWidth::Bits16 => 0b01,
        TransferWidth::Bits32 => 0b10,
    };

    let mut value = hsize << dma::CHCTL_HSIZE_SHIFT;
    if transfer.increment_source {
        value |= dma::CHCTL_SINC_INC;
    }
    if transfer.increment_destination {
        value |= dma::CHCTL_DINC_INC;
    }
    if transfer.repeat {
        value |= dma::CHCTL_SRPTEN | dma::CHCTL_DRPTEN;
    }
    if transfer.interrupts {
        value |= dma::CHCTL_IE;
    }
    value
}

pub(crate) fn dma_channel_reg(dma_base: usize, channel: u8, offset: usize) -> usize {
    dma_base + dma::CH_BASE + usize::from(channel) * dma::CH_STRIDE + offset
}

/// AOS trigger-select register of a DMA channel
pub(crate) fn trigger_select_reg(dma_base: usize, channel: u8) -> usize {
    let first = if dma_base == base::DMA1 {
        aos::DMA1_TRGSEL0
    } else {
        aos::DMA2_TRGSEL0
    };
    base::AOS + first + usize::from(channel) * 4
}
