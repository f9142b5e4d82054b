//! Host-side model of an ADC converter, its DMA channel and the trigger
//! fabric link between them.
//!
//! Time only advances through [`SimAdc::tick`], so tests decide exactly when
//! a sweep completes. Every register operation is appended to an operation
//! log for ordering checks.

use core::cell::RefCell;

use heapless::Vec;

use super::config::{
    AdcInitParams, AdcUnit, BlockTransfer, ClockGate, DmaBinding, DmaFlag, EventSource,
};
use super::mask::ChannelMask;
use super::platform::AdcPlatform;

const SLOTS: usize = ChannelMask::CAPACITY as usize;
const LOG_DEPTH: usize = 64;

/// Register operation recorded by [`SimAdc`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimOp {
    ClockEnabled(ClockGate),
    TriggerFabricEnabled,
    AdcInit(AdcInitParams),
    AdcTriggerDisabled,
    ChannelsAdded(ChannelMask, u8),
    ChannelsRemoved(ChannelMask),
    ConversionStarted,
    DmaInit(BlockTransfer),
    DmaEnabled,
    DmaFlagCleared(DmaFlag),
    DmaTriggerSet(EventSource),
}

struct SimState {
    end_of_conversion: EventSource,
    latency: u32,
    clocks: Vec<ClockGate, 8>,
    trigger_fabric_clock: bool,
    params: Option<AdcInitParams>,
    hw_trigger_enabled: bool,
    scan_mask: ChannelMask,
    sample_times: [u8; SLOTS],
    inputs: [u16; SLOTS],
    data_registers: [u16; SLOTS],
    remaining: Option<u32>,
    sweeps: u32,
    transfer: Option<BlockTransfer>,
    dma_enabled: bool,
    dma_trigger: Option<EventSource>,
    transfer_complete: bool,
    block_complete: bool,
    buffer: [u16; SLOTS],
    log: Vec<SimOp, LOG_DEPTH>,
}

impl SimState {
    fn record(&mut self, op: SimOp) {
        // oldest entries win once the log is full
        let _ = self.log.push(op);
    }

    fn clock_enabled(&self, gate: ClockGate) -> bool {
        self.clocks.contains(&gate)
    }

    fn finish_sweep(&mut self) {
        self.remaining = None;
        self.sweeps += 1;
        for channel in self.scan_mask.iter() {
            self.data_registers[usize::from(channel)] = self.inputs[usize::from(channel)];
        }

        let triggered = self.trigger_fabric_clock
            && self.dma_enabled
            && self.dma_trigger == Some(self.end_of_conversion);
        if let (true, Some(transfer)) = (triggered, self.transfer) {
            let len = usize::from(transfer.block_size).min(SLOTS);
            self.buffer[..len].copy_from_slice(&self.data_registers[..len]);
            self.transfer_complete = true;
            self.block_complete = true;
        }
    }
}

/// Simulated ADC + DMA platform
pub struct SimAdc {
    state: RefCell<SimState>,
}

impl SimAdc {
    /// `end_of_conversion` is the event number this converter raises when
    /// a sweep finishes; the DMA channel only fires if bound to it.
    pub fn new(end_of_conversion: EventSource) -> Self {
        Self {
            state: RefCell::new(SimState {
                end_of_conversion,
                latency: 1,
                clocks: Vec::new(),
                trigger_fabric_clock: false,
                params: None,
                hw_trigger_enabled: true,
                scan_mask: ChannelMask::EMPTY,
                sample_times: [0; SLOTS],
                inputs: [0; SLOTS],
                data_registers: [0; SLOTS],
                remaining: None,
                sweeps: 0,
                transfer: None,
                dma_enabled: false,
                dma_trigger: None,
                transfer_complete: false,
                block_complete: false,
                buffer: [0; SLOTS],
                log: Vec::new(),
            }),
        }
    }

    /// Ticks a sweep takes. Zero completes the sweep inside `adc_start`.
    pub fn with_latency(self, ticks: u32) -> Self {
        self.state.borrow_mut().latency = ticks;
        self
    }

    /// Analog level presented to `channel`, picked up by the next sweep
    pub fn set_input(&self, channel: u8, raw: u16) {
        self.state.borrow_mut().inputs[usize::from(channel)] = raw;
    }

    /// Advance time by one tick
    pub fn tick(&self) {
        let mut state = self.state.borrow_mut();
        match state.remaining {
            Some(0) | Some(1) => state.finish_sweep(),
            Some(n) => state.remaining = Some(n - 1),
            None => {}
        }
    }

    /// Overwrite a result buffer slot, as stale memory would look
    pub fn poke_result(&self, slot: usize, raw: u16) {
        self.state.borrow_mut().buffer[slot] = raw;
    }

    pub fn ops(&self) -> Vec<SimOp, LOG_DEPTH> {
        self.state.borrow().log.clone()
    }

    pub fn clear_ops(&self) {
        self.state.borrow_mut().log.clear();
    }

    pub fn is_clock_enabled(&self, gate: ClockGate) -> bool {
        self.state.borrow().clock_enabled(gate)
    }

    pub fn is_trigger_fabric_enabled(&self) -> bool {
        self.state.borrow().trigger_fabric_clock
    }

    pub fn is_hw_trigger_enabled(&self) -> bool {
        self.state.borrow().hw_trigger_enabled
    }

    pub fn params(&self) -> Option<AdcInitParams> {
        self.state.borrow().params
    }

    pub fn scan_mask(&self) -> ChannelMask {
        self.state.borrow().scan_mask
    }

    pub fn sample_time(&self, channel: u8) -> u8 {
        self.state.borrow().sample_times[usize::from(channel)]
    }

    pub fn transfer(&self) -> Option<BlockTransfer> {
        self.state.borrow().transfer
    }

    pub fn dma_trigger(&self) -> Option<EventSource> {
        self.state.borrow().dma_trigger
    }

    /// Completed sweeps
    pub fn sweeps(&self) -> u32 {
        self.state.borrow().sweeps
    }

    pub fn is_converting(&self) -> bool {
        self.state.borrow().remaining.is_some()
    }
}

impl AdcPlatform for SimAdc {
    fn enable_clock(&self, gate: ClockGate) {
        let mut state = self.state.borrow_mut();
        if !state.clock_enabled(gate) {
            let _ = state.clocks.push(gate);
        }
        state.record(SimOp::ClockEnabled(gate));
    }

    fn enable_trigger_fabric(&self) {
        let mut state = self.state.borrow_mut();
        state.trigger_fabric_clock = true;
        state.record(SimOp::TriggerFabricEnabled);
    }

    fn adc_init(&self, unit: &AdcUnit, params: &AdcInitParams) {
        let mut state = self.state.borrow_mut();
        if state.clock_enabled(unit.clock) {
            state.params = Some(*params);
        }
        state.record(SimOp::AdcInit(*params));
    }

    fn adc_disable_trigger(&self, _unit: &AdcUnit) {
        let mut state = self.state.borrow_mut();
        state.hw_trigger_enabled = false;
        state.record(SimOp::AdcTriggerDisabled);
    }

    fn adc_add_channels(&self, _unit: &AdcUnit, mask: ChannelMask, sample_time: u8) {
        let mut state = self.state.borrow_mut();
        state.scan_mask = state.scan_mask.union(mask);
        for channel in mask.iter() {
            state.sample_times[usize::from(channel)] = sample_time;
        }
        state.record(SimOp::ChannelsAdded(mask, sample_time));
    }

    fn adc_remove_channels(&self, _unit: &AdcUnit, mask: ChannelMask) {
        let mut state = self.state.borrow_mut();
        state.scan_mask = state.scan_mask.difference(mask);
        state.record(SimOp::ChannelsRemoved(mask));
    }

    fn adc_channel_mask(&self, _unit: &AdcUnit) -> ChannelMask {
        self.state.borrow().scan_mask
    }

    fn adc_start(&self, _unit: &AdcUnit) {
        let mut state = self.state.borrow_mut();
        state.record(SimOp::ConversionStarted);
        if state.params.is_none() {
            return;
        }
        // restart-on-trigger: a running sweep starts over
        if state.latency == 0 {
            state.finish_sweep();
        } else {
            state.remaining = Some(state.latency);
        }
    }

    fn dma_init(&self, dma: &DmaBinding, _unit: &AdcUnit, transfer: &BlockTransfer) {
        let mut state = self.state.borrow_mut();
        if state.clock_enabled(dma.clock) {
            state.transfer = Some(*transfer);
        }
        state.record(SimOp::DmaInit(*transfer));
    }

    fn dma_enable(&self, _dma: &DmaBinding) {
        let mut state = self.state.borrow_mut();
        state.dma_enabled = state.transfer.is_some();
        state.record(SimOp::DmaEnabled);
    }

    fn dma_clear_flag(&self, _dma: &DmaBinding, flag: DmaFlag) {
        let mut state = self.state.borrow_mut();
        match flag {
            DmaFlag::TransferComplete => state.transfer_complete = false,
            DmaFlag::BlockTransferComplete => state.block_complete = false,
        }
        state.record(SimOp::DmaFlagCleared(flag));
    }

    fn dma_flag(&self, _dma: &DmaBinding, flag: DmaFlag) -> bool {
        let state = self.state.borrow();
        match flag {
            DmaFlag::TransferComplete => state.transfer_complete,
            DmaFlag::BlockTransferComplete => state.block_complete,
        }
    }

    fn dma_set_trigger(&self, _dma: &DmaBinding, event: EventSource) {
        let mut state = self.state.borrow_mut();
        state.dma_trigger = Some(event);
        state.record(SimOp::DmaTriggerSet(event));
    }

    fn read_result(&self, slot: usize) -> u16 {
        self.state.borrow().buffer.get(slot).copied().unwrap_or(0)
    }
}
