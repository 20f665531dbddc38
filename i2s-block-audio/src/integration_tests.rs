//! Integration tests exercising the driver end to end in software.
//!
//! The mock bus is a loopback wire: whatever `write_block` transmits is what
//! the next `read_block` receives.
//!
//! ```text
//! f32 channels → write_channel_f32 → write_block → [wire]
//!     → read_block → read_channel_f32 → f32 channels
//! ```

#[cfg(test)]
mod tests {
    use crate::config::{DriverConfig, PinAssignment};
    use crate::driver::{AudioDriver, DriverState};
    use crate::error::TransferError;
    use crate::mock::{MockBus, MockDelay, MockPin, Transfer};
    use crate::sample::to_fixed;

    const BLOCK: usize = 256;
    const STEP: f32 = 1.0 / 8_388_608.0;

    type Driver = AudioDriver<MockBus, MockPin, MockDelay, 512>;

    fn setup_driver() -> Driver {
        let mut d: Driver = AudioDriver::new(MockBus::new(), MockPin::new(), MockDelay::default());
        let cfg = DriverConfig::new(48_000, 2, PinAssignment::new(26, 25, 22, 35))
            .with_block_size(BLOCK);
        let report = d.setup(cfg);
        assert!(report.is_ok(), "setup failed: {:?}", report.first_failure());
        d
    }

    // ---------------------------------------------------------------
    // Enable, write a block of silence, read it back
    // ---------------------------------------------------------------
    #[test]
    fn silence_cycle() {
        let mut d = setup_driver();
        d.enable(true).unwrap();

        assert_eq!(d.write_buffer().len(), 512);
        assert!(d.write_buffer().iter().all(|&s| s == 0));
        assert_eq!(d.write_block(), Ok(()));
        assert_eq!(d.read_block(), Ok(()));

        assert!(d.read_buffer().iter().all(|&s| s == 0));
        let stats = d.stats();
        assert_eq!(stats.blocks_written, 1);
        assert_eq!(stats.blocks_read, 1);
        assert_eq!(stats.read_faults + stats.write_faults, 0);
        assert_eq!(d.state(), DriverState::Running);
    }

    // ---------------------------------------------------------------
    // Stereo float data survives the wire within one quantization step
    // ---------------------------------------------------------------
    #[test]
    fn stereo_float_loopback() {
        let mut d = setup_driver();
        d.enable(true).unwrap();

        let left: [f32; BLOCK] = core::array::from_fn(|i| (i as f32 / BLOCK as f32) - 0.5);
        let right: [f32; BLOCK] = core::array::from_fn(|i| 0.9 - (i as f32 * 0.007));

        d.write_channel_f32(0, &left);
        d.write_channel_f32(1, &right);
        d.write_block().unwrap();
        d.read_block().unwrap();

        let mut out_l = [0.0f32; BLOCK];
        let mut out_r = [0.0f32; BLOCK];
        assert_eq!(d.read_channel_f32(0, &mut out_l), BLOCK);
        assert_eq!(d.read_channel_f32(1, &mut out_r), BLOCK);

        for i in 0..BLOCK {
            assert!((out_l[i] - left[i]).abs() <= STEP, "left mismatch at frame {i}");
            assert!((out_r[i] - right[i]).abs() <= STEP, "right mismatch at frame {i}");
        }
    }

    // ---------------------------------------------------------------
    // Interleaving on the wire is ch0, ch1, ch0, ch1, …
    // ---------------------------------------------------------------
    #[test]
    fn wire_order_is_left_right() {
        let mut d = setup_driver();
        d.write_channel_f32(0, &[0.25; BLOCK]);
        d.write_channel_f32(1, &[-0.75; BLOCK]);
        d.write_block().unwrap();

        let (bus, _, _) = d.release();
        for frame in bus.wire.chunks_exact(2) {
            assert_eq!(frame[0], to_fixed(0.25));
            assert_eq!(frame[1], to_fixed(-0.75));
        }
    }

    // ---------------------------------------------------------------
    // Clipping saturates on the wire instead of wrapping
    // ---------------------------------------------------------------
    #[test]
    fn hot_signal_clips() {
        let mut d = setup_driver();
        d.write_channel_f32(0, &[4.0; BLOCK]);
        d.write_channel_f32(1, &[-4.0; BLOCK]);
        d.write_block().unwrap();
        d.read_block().unwrap();

        let mut l = [0.0f32; BLOCK];
        let mut r = [0.0f32; BLOCK];
        d.read_channel_f32(0, &mut l);
        d.read_channel_f32(1, &mut r);
        assert!(l.iter().all(|&s| s > 0.999 && s < 1.0));
        assert!(r.iter().all(|&s| s == -1.0));
    }

    // ---------------------------------------------------------------
    // A transient underrun does not disturb the following cycles
    // ---------------------------------------------------------------
    #[test]
    fn underrun_recovers_next_cycle() {
        let mut d = setup_driver();
        d.enable(true).unwrap();

        d.write_channel_f32(0, &[0.5; BLOCK]);
        d.write_block().unwrap();

        d.bus_mut().read_mode = Transfer::Bytes(64);
        assert!(matches!(d.read_block(), Err(TransferError::Short { .. })));

        d.bus_mut().read_mode = Transfer::Full;
        d.write_block().unwrap();
        d.read_block().unwrap();

        let mut l = [0.0f32; BLOCK];
        d.read_channel_f32(0, &mut l);
        assert!(l.iter().all(|&s| s == 0.5));
        assert_eq!(d.stats().read_faults, 1);
        assert_eq!(d.stats().blocks_read, 1);
        assert_eq!(d.state(), DriverState::Running);
    }

    // ---------------------------------------------------------------
    // Full lifecycle: setup → run → power off → run → teardown → setup
    // ---------------------------------------------------------------
    #[test]
    fn full_lifecycle() {
        let mut d = setup_driver();
        assert_eq!(d.state(), DriverState::Configured);

        d.enable(true).unwrap();
        d.write_block().unwrap();
        d.read_block().unwrap();

        d.enable(false).unwrap();
        assert_eq!(d.state(), DriverState::PoweredOff);
        assert!(d.write_block().is_ok());

        d.enable(true).unwrap();
        assert_eq!(d.state(), DriverState::Running);

        d.teardown().unwrap();
        assert_eq!(d.read_block(), Err(TransferError::NotConfigured));

        let cfg = DriverConfig::new(44_100, 1, PinAssignment::new(26, 25, 22, 35))
            .with_block_size(128);
        assert!(d.setup(cfg).is_ok());
        assert_eq!(d.read_buffer().len(), 128);
    }

    // ---------------------------------------------------------------
    // Codec strapping drives the MCLK ratio handed to the peripheral
    // ---------------------------------------------------------------
    #[cfg(feature = "ak4556")]
    #[test]
    fn ak4556_mode_configures_mclk() {
        use crate::codec::Ak4556Mode;

        let base = DriverConfig::new(48_000, 2, PinAssignment::new(26, 25, 22, 35))
            .with_block_size(BLOCK);
        let cfg = Ak4556Mode::new(6).and_then(|m| m.apply(base)).unwrap();

        let mut d: Driver = AudioDriver::new(MockBus::new(), MockPin::new(), MockDelay::default());
        assert!(d.setup(cfg).is_ok());

        let (bus, _, _) = d.release();
        assert_eq!(bus.installed.unwrap().mclk_hz, 48_000 * 512);
        assert_eq!(bus.master_clock, Some((0, 48_000 * 512)));
    }

    // ---------------------------------------------------------------
    // Codec-master strapping still gets MCLK from the MCU
    // ---------------------------------------------------------------
    #[cfg(feature = "ak4556")]
    #[test]
    fn ak4556_master_mode_still_outputs_mclk() {
        use crate::codec::Ak4556Mode;
        use crate::config::ClockRole;

        let base = DriverConfig::new(48_000, 2, PinAssignment::new(26, 25, 22, 35))
            .with_block_size(BLOCK);
        let cfg = Ak4556Mode::new(12).and_then(|m| m.apply(base)).unwrap();
        assert_eq!(cfg.clock_role, ClockRole::Slave);

        let mut d: Driver = AudioDriver::new(MockBus::new(), MockPin::new(), MockDelay::default());
        assert!(d.setup(cfg).is_ok());

        let (bus, _, _) = d.release();
        assert_eq!(bus.installed.unwrap().mclk_hz, 48_000 * 256);
        assert_eq!(bus.master_clock, Some((0, 48_000 * 256)));
    }
}
