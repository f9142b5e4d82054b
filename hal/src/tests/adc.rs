use super::{device, sim, ADC_CLOCK, CHANNELS, DMA, DMA_CLOCK, END_OF_CONVERSION, UNIT};
use crate::adc::sim::SimOp;
use crate::adc::{
    AdcDevice, AdcInitParams, AdcUnit, BlockTransfer, ChannelMask, ConversionState, DmaFlag,
    TransferWidth, DEFAULT_SAMPLE_TIME,
};
use crate::error::FaultPolicy;

fn position(ops: &[SimOp], op: SimOp) -> usize {
    ops.iter()
        .position(|recorded| *recorded == op)
        .unwrap_or_else(|| panic!("{:?} not recorded", op))
}

#[test]
fn init_is_idempotent() {
    let sim = sim();
    let adc = device(&sim, FaultPolicy::Panic);

    adc.init();
    let first = sim.ops();
    adc.init();

    assert!(adc.is_initialized());
    assert_eq!(sim.ops(), first);
}

#[test]
fn init_enables_clocks_before_touching_registers() {
    let sim = sim();
    let adc = device(&sim, FaultPolicy::Panic);
    adc.init();

    let ops = sim.ops();
    let params = AdcInitParams::default();
    let transfer = BlockTransfer::result_registers(CHANNELS);

    assert!(
        position(&ops, SimOp::ClockEnabled(ADC_CLOCK)) < position(&ops, SimOp::AdcInit(params))
    );
    assert!(position(&ops, SimOp::AdcInit(params)) < position(&ops, SimOp::DmaInit(transfer)));
    assert!(
        position(&ops, SimOp::ClockEnabled(DMA_CLOCK)) < position(&ops, SimOp::DmaInit(transfer))
    );
    assert!(
        position(&ops, SimOp::TriggerFabricEnabled)
            < position(&ops, SimOp::DmaTriggerSet(END_OF_CONVERSION))
    );
    assert!(sim.is_clock_enabled(ADC_CLOCK));
    assert!(sim.is_clock_enabled(DMA_CLOCK));
    assert!(sim.is_trigger_fabric_enabled());
}

#[test]
fn init_leaves_only_software_trigger() {
    let sim = sim();
    let adc = device(&sim, FaultPolicy::Panic);
    assert!(sim.is_hw_trigger_enabled());

    adc.init();

    assert!(!sim.is_hw_trigger_enabled());
    assert_eq!(sim.params(), Some(AdcInitParams::default()));
}

#[test]
fn init_programs_circular_block_transfer() {
    let sim = sim();
    let adc = device(&sim, FaultPolicy::Panic);
    adc.init();

    let transfer = sim.transfer().unwrap();
    assert_eq!(transfer.block_size, u16::from(CHANNELS));
    assert_eq!(transfer.width, TransferWidth::Bits16);
    assert!(transfer.repeat);
    assert!(transfer.increment_source && transfer.increment_destination);
    assert!(!transfer.interrupts);
    assert_eq!(sim.dma_trigger(), Some(END_OF_CONVERSION));

    let ops = sim.ops();
    position(&ops, SimOp::DmaFlagCleared(DmaFlag::TransferComplete));
    position(&ops, SimOp::DmaFlagCleared(DmaFlag::BlockTransferComplete));
}

#[test]
fn enable_then_disable_restores_mask() {
    for channel in 0..CHANNELS {
        let sim = sim();
        let adc = device(&sim, FaultPolicy::Panic);
        adc.init();

        let other = (channel + 1) % CHANNELS;
        adc.enable_channel(other, 5);
        let before = sim.scan_mask();

        adc.enable_channel(channel, 10);
        adc.disable_channel(channel);

        assert_eq!(sim.scan_mask(), before, "channel {}", channel);
    }
}

#[test]
fn enable_is_additive() {
    let sim = sim();
    let adc = device(&sim, FaultPolicy::Panic);
    adc.init();

    adc.enable_channel(1, 10);
    adc.enable_channel(4, 20);

    assert_eq!(sim.scan_mask(), ChannelMask::from_bits(0b1_0010));
    assert_eq!(sim.sample_time(1), 10);
    assert_eq!(sim.sample_time(4), 20);
    assert!(adc.is_channel_enabled(4));
    assert!(!adc.is_channel_enabled(2));
    assert_eq!(adc.enabled_channels(), sim.scan_mask());
}

#[test]
fn disable_never_enabled_channel_is_noop() {
    let sim = sim();
    let adc = device(&sim, FaultPolicy::Panic);
    adc.init();
    adc.enable_channel(3, DEFAULT_SAMPLE_TIME);

    adc.disable_channel(6);

    assert_eq!(sim.scan_mask(), ChannelMask::from_bits(1 << 3));
}

#[test]
fn disable_on_uninitialized_device_touches_nothing() {
    let sim = sim();
    let adc = device(&sim, FaultPolicy::Panic);

    adc.disable_channel(2);
    adc.disable_channel(CHANNELS + 10);

    assert!(sim.ops().is_empty());
    assert!(!adc.is_initialized());
    assert!(adc.enabled_channels().is_empty());
}

#[test]
#[should_panic(expected = "invalid channel id 8 (device has 8 channels)")]
fn enable_out_of_range_channel_faults() {
    let sim = sim();
    let adc = device(&sim, FaultPolicy::Panic);
    adc.init();
    adc.enable_channel(CHANNELS, 10);
}

#[test]
#[should_panic(expected = "invalid channel id")]
fn disable_out_of_range_channel_faults() {
    let sim = sim();
    let adc = device(&sim, FaultPolicy::Panic);
    adc.init();
    adc.disable_channel(200);
}

#[test]
#[should_panic(expected = "invalid channel id")]
fn read_out_of_range_channel_faults() {
    let sim = sim();
    let adc = device(&sim, FaultPolicy::Panic);
    adc.init();
    adc.read_result(CHANNELS);
}

#[test]
fn widest_unit_accepts_last_mask_channel() {
    let sim = sim();
    let unit = AdcUnit {
        channel_count: ChannelMask::CAPACITY,
        ..UNIT
    };
    let params = AdcInitParams::default();
    let adc = AdcDevice::with_fault_policy(unit, DMA, params, &sim, FaultPolicy::Panic);
    adc.init();

    adc.enable_channel(ChannelMask::CAPACITY - 1, 10);
    assert!(adc.is_channel_enabled(ChannelMask::CAPACITY - 1));
}

#[test]
#[should_panic(expected = "channel_count exceeds the scan mask width")]
fn unit_wider_than_mask_is_rejected() {
    let sim = sim();
    let unit = AdcUnit {
        channel_count: ChannelMask::CAPACITY + 1,
        ..UNIT
    };
    let _ = AdcDevice::new(unit, DMA, AdcInitParams::default(), &sim);
}

#[test]
#[should_panic(expected = "sample_time must be > 0")]
fn zero_sample_time_faults() {
    let sim = sim();
    let adc = device(&sim, FaultPolicy::Panic);
    adc.init();
    adc.enable_channel(0, 0);
}

#[test]
#[should_panic(expected = "not initialized (calling enable_channel)")]
fn enable_before_init_faults() {
    let sim = sim();
    let adc = device(&sim, FaultPolicy::Panic);
    adc.enable_channel(0, 10);
}

#[test]
#[should_panic(expected = "not initialized (calling start_conversion)")]
fn start_before_init_faults() {
    let sim = sim();
    let adc = device(&sim, FaultPolicy::Panic);
    adc.start_conversion();
}

#[test]
#[should_panic(expected = "not initialized (calling is_conversion_completed)")]
fn poll_before_init_faults() {
    let sim = sim();
    let adc = device(&sim, FaultPolicy::Panic);
    adc.is_conversion_completed();
}

#[test]
#[should_panic(expected = "not initialized (calling await_conversion_completed)")]
fn await_before_init_faults() {
    let sim = sim();
    let adc = device(&sim, FaultPolicy::Panic);
    adc.await_conversion_completed(&mut || sim.tick());
}

#[test]
#[should_panic(expected = "not initialized (calling read_result)")]
fn read_before_init_faults() {
    let sim = sim();
    let adc = device(&sim, FaultPolicy::Panic);
    adc.read_result(0);
}

#[test]
fn conversion_sequence_reads_buffered_sample() {
    let sim = sim().with_latency(2);
    let adc = device(&sim, FaultPolicy::Panic);
    sim.set_input(0, 0x0ABC);

    adc.init();
    adc.enable_channel(0, 10);
    adc.start_conversion();
    adc.await_conversion_completed(&mut || sim.tick());

    assert_eq!(adc.read_result(0), 0x0ABC);
    assert!(!adc.is_conversion_completed());
}

#[test]
fn read_clears_flag_but_keeps_data() {
    let sim = sim();
    let adc = device(&sim, FaultPolicy::Panic);
    sim.set_input(2, 777);
    adc.init();
    adc.enable_channel(2, 10);

    adc.start_conversion();
    sim.tick();
    assert!(adc.is_conversion_completed());

    assert_eq!(adc.read_result(2), 777);
    assert!(!adc.is_conversion_completed());
    assert_eq!(adc.read_result(2), 777);
}

#[test]
fn completion_poll_is_pure() {
    let sim = sim().with_latency(3);
    let adc = device(&sim, FaultPolicy::Panic);
    adc.init();
    adc.enable_channel(0, 10);
    adc.start_conversion();

    for _ in 0..5 {
        assert!(!adc.is_conversion_completed());
    }
    for _ in 0..3 {
        sim.tick();
    }
    for _ in 0..5 {
        assert!(adc.is_conversion_completed());
    }
    assert_eq!(sim.sweeps(), 1);
}

#[test]
fn await_yields_between_polls() {
    let sim = sim().with_latency(4);
    let adc = device(&sim, FaultPolicy::Panic);
    adc.init();
    adc.enable_channel(1, 10);
    adc.start_conversion();

    let mut yields = 0;
    adc.await_conversion_completed(&mut || {
        yields += 1;
        sim.tick();
    });

    assert_eq!(yields, 4);
    assert!(adc.is_conversion_completed());
}

#[test]
fn await_returns_at_once_when_already_complete() {
    let sim = sim().with_latency(0);
    let adc = device(&sim, FaultPolicy::Panic);
    adc.init();
    adc.start_conversion();

    let mut yields = 0;
    adc.await_conversion_completed(&mut || yields += 1);
    assert_eq!(yields, 0);
}

#[test]
fn unenabled_channel_reads_stale_slot() {
    let sim = sim();
    let adc = device(&sim, FaultPolicy::Panic);
    sim.poke_result(5, 0x1234);
    adc.init();

    assert_eq!(adc.read_result(5), 0x1234);
}

#[test]
fn conversion_state_follows_flag() {
    let sim = sim().with_latency(2);
    let adc = device(&sim, FaultPolicy::Panic);
    assert_eq!(adc.conversion_state(), ConversionState::Idle);

    adc.init();
    adc.enable_channel(0, 10);
    assert_eq!(adc.conversion_state(), ConversionState::Idle);

    adc.start_conversion();
    assert_eq!(adc.conversion_state(), ConversionState::Converting);
    sim.tick();
    assert_eq!(adc.conversion_state(), ConversionState::Converting);
    sim.tick();
    assert_eq!(adc.conversion_state(), ConversionState::ResultReady);

    adc.read_result(0);
    assert_eq!(adc.conversion_state(), ConversionState::Idle);
}

#[test]
#[should_panic(expected = "conversion already in progress")]
fn start_while_converting_faults() {
    let sim = sim().with_latency(5);
    let adc = device(&sim, FaultPolicy::Panic);
    adc.init();
    adc.start_conversion();
    adc.start_conversion();
}

#[test]
fn start_after_completion_without_read_is_allowed() {
    let sim = sim();
    let adc = device(&sim, FaultPolicy::Panic);
    adc.init();
    adc.enable_channel(0, 10);

    sim.set_input(0, 1);
    adc.start_conversion();
    sim.tick();
    assert!(adc.is_conversion_completed());

    sim.set_input(0, 2);
    adc.start_conversion();
    assert!(!adc.is_conversion_completed());
    sim.tick();
    assert_eq!(adc.read_result(0), 2);
    assert_eq!(sim.sweeps(), 2);
}

#[test]
fn report_policy_restarts_running_conversion() {
    let sim = sim().with_latency(2);
    let adc = device(&sim, FaultPolicy::Report);
    adc.init();
    adc.enable_channel(0, 10);

    adc.start_conversion();
    sim.tick();
    adc.start_conversion();
    sim.tick();
    assert!(!adc.is_conversion_completed());
    sim.tick();
    assert!(adc.is_conversion_completed());
    assert_eq!(sim.sweeps(), 1);
}

#[test]
fn report_policy_bails_without_touching_hardware() {
    let sim = sim();
    let adc = device(&sim, FaultPolicy::Report);

    adc.enable_channel(0, 10);
    adc.start_conversion();
    assert!(!adc.is_conversion_completed());
    assert_eq!(adc.read_result(0), 0);
    assert!(sim.ops().is_empty());

    adc.init();
    sim.clear_ops();
    adc.enable_channel(CHANNELS, 10);
    adc.enable_channel(0, 0);
    assert_eq!(adc.read_result(CHANNELS), 0);
    assert!(sim.ops().is_empty());
    assert!(sim.scan_mask().is_empty());
}

#[test]
fn try_read_would_block_until_complete() {
    let sim = sim();
    let adc = device(&sim, FaultPolicy::Panic);
    sim.set_input(3, 4095);
    adc.init();
    adc.enable_channel(3, 10);
    adc.start_conversion();

    assert_eq!(adc.try_read(3), Err(nb::Error::WouldBlock));
    sim.tick();
    assert_eq!(adc.try_read(3), Ok(4095));
    assert_eq!(adc.try_read(3), Err(nb::Error::WouldBlock));
}

#[test]
fn read_blocking_runs_one_sweep() {
    let sim = sim().with_latency(3);
    let adc = device(&sim, FaultPolicy::Panic);
    sim.set_input(7, 321);
    adc.init();
    adc.enable_channel(7, 10);

    let value = adc.read_blocking(7, &mut || sim.tick());

    assert_eq!(value, 321);
    assert_eq!(sim.sweeps(), 1);
    assert_eq!(adc.conversion_state(), ConversionState::Idle);
}

#[test]
fn disabled_channel_is_not_sampled() {
    let sim = sim();
    let adc = device(&sim, FaultPolicy::Panic);
    adc.init();
    adc.enable_channel(0, 10);
    adc.enable_channel(1, 10);
    sim.set_input(0, 100);
    sim.set_input(1, 200);
    adc.read_blocking(0, &mut || sim.tick());

    adc.disable_channel(1);
    sim.set_input(0, 101);
    sim.set_input(1, 201);

    assert_eq!(adc.read_blocking(0, &mut || sim.tick()), 101);
    assert_eq!(adc.read_result(1), 200);
}
