//! HC32F460 ADC + DMA + AOS register platform

use core::cell::UnsafeCell;
use core::ptr;

use bsp_hal::adc::{
    AdcInitParams, AdcPlatform, AdcUnit, BlockTransfer, ChannelMask, ClockGate, DmaBinding,
    DmaFlag, EventSource,
};

use crate::clock;
use crate::regs::{self, adc, aos, base, dma, pwc, Reg};

/// One DMA-written result word
#[repr(transparent)]
pub struct ResultWord(UnsafeCell<u16>);

// SAFETY: only the DMA engine writes the word; the CPU side reads it with
// single aligned volatile loads.
unsafe impl Sync for ResultWord {}

impl ResultWord {
    fn read(&self) -> u16 {
        // SAFETY: the word lives for 'static and is only ever read by the CPU.
        unsafe { ptr::read_volatile(self.0.get()) }
    }
}

#[allow(clippy::declare_interior_mutable_const)]
const EMPTY_WORD: ResultWord = ResultWord(UnsafeCell::new(0));

/// DMA destination for one converter's result registers
pub struct ResultBuffer<const N: usize>([ResultWord; N]);

impl<const N: usize> ResultBuffer<N> {
    pub const fn new() -> Self {
        Self([EMPTY_WORD; N])
    }

    pub const fn words(&self) -> &[ResultWord] {
        &self.0
    }
}

impl<const N: usize> Default for ResultBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Register platform for one converter.
///
/// The buffer length is checked against the unit's channel count when the
/// platform is built, so every converter shares this one type.
pub struct Hc32Adc {
    results: &'static [ResultWord],
}

impl Hc32Adc {
    /// Panics (at compile time for `static` devices) when `results` cannot
    /// hold one word per channel of `unit`.
    pub const fn new<const N: usize>(unit: &AdcUnit, results: &'static ResultBuffer<N>) -> Self {
        assert!(
            buffer_fits(unit.channel_count as u16, N),
            "result buffer smaller than the unit's channel count"
        );
        Self {
            results: results.words(),
        }
    }

    fn buffer_address(&self) -> u32 {
        self.results.as_ptr() as usize as u32
    }
}

const fn buffer_fits(block_size: u16, words: usize) -> bool {
    block_size as usize <= words
}

/// `transfer` with its block size capped to the destination buffer
fn fit_to_buffer(transfer: &BlockTransfer, words: usize) -> BlockTransfer {
    let mut fitted = *transfer;
    if !buffer_fits(transfer.block_size, words) {
        fitted.block_size = u16::try_from(words).unwrap_or(u16::MAX);
    }
    fitted
}

fn adc_reg16(unit: &AdcUnit, offset: usize) -> Reg<u16> {
    Reg::at(unit.base + offset)
}

fn dma_reg(binding: &DmaBinding, offset: usize) -> Reg<u32> {
    Reg::at(binding.base + offset)
}

fn dma_channel(binding: &DmaBinding, offset: usize) -> Reg<u32> {
    Reg::at(regs::dma_channel_reg(binding.base, binding.channel, offset))
}

fn flag_bit(binding: &DmaBinding, flag: DmaFlag) -> u32 {
    let bit = 1 << binding.channel;
    match flag {
        DmaFlag::TransferComplete => bit,
        DmaFlag::BlockTransferComplete => bit << dma::BTC_SHIFT,
    }
}

/// Clear a function clock gate bit (a set bit stops the clock)
pub(crate) fn open_clock_gate(gate: ClockGate) {
    let fcg = Reg::<u32>::at(base::PWC_FCG + usize::from(gate.bank) * 4);
    let unlock = Reg::<u32>::at(base::PWC_FCG + pwc::FCG0PC);

    critical_section::with(|_| {
        if gate.bank == 0 {
            unlock.write(pwc::FCG0PC_UNLOCK);
        }
        fcg.modify(|value| value & !(1 << gate.bit));
        if gate.bank == 0 {
            unlock.write(pwc::FCG0PC_LOCK);
        }
    });
}

impl AdcPlatform for Hc32Adc {
    fn enable_clock(&self, gate: ClockGate) {
        open_clock_gate(gate);
    }

    fn enable_trigger_fabric(&self) {
        open_clock_gate(clock::AOS);
    }

    fn adc_init(&self, unit: &AdcUnit, params: &AdcInitParams) {
        adc_reg16(unit, adc::CR0).modify(|cr0| regs::cr0_value(cr0, params));
        adc_reg16(unit, adc::CR1).modify(|cr1| cr1 | adc::CR1_RSCHSEL);
    }

    fn adc_disable_trigger(&self, unit: &AdcUnit) {
        let bit = regs::trigger_enable_bit(unit.sequence);
        adc_reg16(unit, adc::TRGSR).modify(|trgsr| trgsr & !bit);
    }

    fn adc_add_channels(&self, unit: &AdcUnit, mask: ChannelMask, sample_time: u8) {
        let (low, high) = regs::channel_select(unit.sequence);
        let bits = mask.bits();
        adc_reg16(unit, low).modify(|sel| sel | bits as u16);
        adc_reg16(unit, high).modify(|sel| sel | (bits >> 16) as u16);

        for channel in mask.iter() {
            Reg::<u8>::at(unit.base + regs::sample_time_offset(channel)).write(sample_time);
        }
    }

    fn adc_remove_channels(&self, unit: &AdcUnit, mask: ChannelMask) {
        let bits = mask.bits();
        for (low, high) in [
            (adc::CHSELRA0, adc::CHSELRA1),
            (adc::CHSELRB0, adc::CHSELRB1),
        ] {
            adc_reg16(unit, low).modify(|sel| sel & !(bits as u16));
            adc_reg16(unit, high).modify(|sel| sel & !((bits >> 16) as u16));
        }
    }

    fn adc_channel_mask(&self, unit: &AdcUnit) -> ChannelMask {
        let (low, high) = regs::channel_select(unit.sequence);
        let low = u32::from(adc_reg16(unit, low).read());
        let high = u32::from(adc_reg16(unit, high).read());
        ChannelMask::from_bits(high << 16 | low)
    }

    fn adc_start(&self, unit: &AdcUnit) {
        Reg::<u8>::at(unit.base + adc::STR).write(adc::STR_STRT);
    }

    fn dma_init(&self, binding: &DmaBinding, unit: &AdcUnit, transfer: &BlockTransfer) {
        let source = (unit.base + adc::DR0) as u32;
        let transfer = &fit_to_buffer(transfer, self.results.len());

        dma_channel(binding, dma::SAR).write(source);
        dma_channel(binding, dma::DAR).write(self.buffer_address());
        dma_channel(binding, dma::DTCTL).write(regs::dtctl_value(transfer));
        dma_channel(binding, dma::RPT).write(regs::rpt_value(transfer));
        dma_channel(binding, dma::SNSEQCTL).write(0);
        dma_channel(binding, dma::DNSEQCTL).write(0);
        dma_channel(binding, dma::LLP).write(0);
        dma_channel(binding, dma::CHCTL).write(regs::chctl_value(transfer));

        let flags = flag_bit(binding, DmaFlag::TransferComplete)
            | flag_bit(binding, DmaFlag::BlockTransferComplete);
        dma_reg(binding, dma::INTMASK1).modify(|mask| {
            if transfer.interrupts {
                mask & !flags
            } else {
                mask | flags
            }
        });
    }

    fn dma_enable(&self, binding: &DmaBinding) {
        dma_reg(binding, dma::EN).write(1);
        dma_reg(binding, dma::CHEN).modify(|chen| chen | 1 << binding.channel);
    }

    fn dma_clear_flag(&self, binding: &DmaBinding, flag: DmaFlag) {
        dma_reg(binding, dma::INTCLR1).write(flag_bit(binding, flag));
    }

    fn dma_flag(&self, binding: &DmaBinding, flag: DmaFlag) -> bool {
        dma_reg(binding, dma::INTSTAT1).read() & flag_bit(binding, flag) != 0
    }

    fn dma_set_trigger(&self, binding: &DmaBinding, event: EventSource) {
        let trgsel = Reg::<u32>::at(regs::trigger_select_reg(binding.base, binding.channel));
        let event = u32::from(event.0) & aos::TRGSEL_MASK;
        trgsel.modify(|value| (value & !aos::TRGSEL_MASK) | event);
    }

    fn read_result(&self, slot: usize) -> u16 {
        self.results.get(slot).map_or(0, ResultWord::read)
    }
}
