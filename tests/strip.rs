mod tests {
    use embassy_time::Duration;
    use myrtio_led_strip::color::{BLACK, GREEN, RED, Rgb, Rgbw};
    use myrtio_led_strip::sim::{SimFaults, SimPeripheral, SimStats};
    use myrtio_led_strip::{
        ArgumentError, ChannelOrder, Error, LedStrip, PipelineSettings, RESET_SYMBOL,
        SmartLedsWrite, StripConfig, Symbol, TxState, encode,
    };

    type Sim = SimPeripheral<4, 512>;
    type Strip = LedStrip<Sim, 8>;

    fn strip(config: &StripConfig) -> Strip {
        LedStrip::init(Sim::new(), config).expect("strip init")
    }

    fn manual_strip(config: &StripConfig) -> Strip {
        LedStrip::init(Sim::new().with_manual_completion(), config).expect("strip init")
    }

    fn stats(strip: &Strip) -> SimStats {
        *strip.driver().provider().stats()
    }

    #[test]
    fn test_init_zero_length_acquires_nothing() {
        let mut sim = Sim::new();
        let error = LedStrip::<_, 8>::init(&mut sim, &StripConfig::new(0, 5)).err();
        assert_eq!(
            error,
            Some(Error::InvalidArgument(ArgumentError::ZeroLength))
        );
        assert_eq!(sim.stats().configured, 0);
        assert_eq!(sim.stats().live_channels(), 0);
    }

    #[test]
    fn test_init_over_capacity_acquires_nothing() {
        let mut sim = Sim::new();
        let error = LedStrip::<_, 8>::init(&mut sim, &StripConfig::new(9, 5)).err();
        assert_eq!(error, Some(Error::ResourceExhausted));
        assert_eq!(sim.stats().configured, 0);
    }

    #[test]
    fn test_init_configure_failure() {
        let mut sim = Sim::new().with_faults(SimFaults {
            configure: true,
            enable: false,
        });
        let error = LedStrip::<_, 8>::init(&mut sim, &StripConfig::new(3, 5)).err();
        assert_eq!(error, Some(Error::ResourceExhausted));
        assert_eq!(sim.stats().live_channels(), 0);
    }

    #[test]
    fn test_init_enable_failure_releases_channel() {
        let mut sim = Sim::new().with_faults(SimFaults {
            configure: false,
            enable: true,
        });
        let error = LedStrip::<_, 8>::init(&mut sim, &StripConfig::new(3, 5)).err();
        assert_eq!(error, Some(Error::ResourceExhausted));
        assert_eq!(sim.stats().configured, 1);
        assert_eq!(sim.stats().released, 1);
        assert_eq!(sim.stats().live_channels(), 0);
    }

    #[test]
    fn test_init_retry_with_borrowed_provider() {
        let mut sim = Sim::new().with_faults(SimFaults {
            configure: false,
            enable: true,
        });
        let config = StripConfig::new(3, 5);
        let error = LedStrip::<_, 8>::init(&mut sim, &config).err();
        assert_eq!(error, Some(Error::ResourceExhausted));

        sim.set_faults(SimFaults::default());
        let mut strip = LedStrip::<_, 8>::init(&mut sim, &config).expect("retry init");
        strip.fill(RED).unwrap();
        strip.free().unwrap();
        drop(strip);

        assert_eq!(sim.stats().configured, 2);
        assert_eq!(sim.stats().released, 2);
        assert_eq!(sim.stats().transmitted, 1);
        assert_eq!(sim.stats().live_channels(), 0);
    }

    #[test]
    fn test_init_defaults() {
        let strip = strip(&StripConfig::new(4, 5));
        assert_eq!(strip.len(), 4);
        assert_eq!(strip.state(), TxState::Ready);
        assert_eq!(strip.raw_buffer(), &[0u8; 12]);
        assert_eq!(strip.order(), ChannelOrder::Grb);
        assert_eq!(strip.brightness(), 255);
        assert!(!strip.gamma_enabled());
        assert_eq!(stats(&strip).enabled, 1);
    }

    #[test]
    fn test_config_defaults() {
        let config = StripConfig::new(4, 5).driver;
        assert_eq!(config.length, 4);
        assert_eq!(config.channel.pin, 5);
        assert_eq!(config.channel.resolution_hz, 10_000_000);
        assert_eq!(config.channel.mem_block_symbols, 64);
        assert_eq!(config.channel.queue_depth, 4);
        assert_eq!(config.timeout, None);
        assert!(config.busy_guard);
    }

    #[test]
    fn test_fill_scales_and_shows() {
        let config = StripConfig::new(3, 5)
            .with_order(ChannelOrder::Rgb)
            .with_brightness(128);
        let mut strip = strip(&config);

        strip.fill(RED).unwrap();

        for index in 0..3 {
            assert_eq!(strip.raw_pixel(index), Ok([128, 0, 0]));
        }
        assert_eq!(stats(&strip).transmitted, 1);
        assert!(!strip.is_busy());
        assert_eq!(strip.state(), TxState::Ready);

        strip.refresh().unwrap();
        assert!(!strip.is_busy());
        assert_eq!(stats(&strip).transmitted, 2);
    }

    #[test]
    fn test_fill_matches_set_pixel_loop() {
        let config = StripConfig::new(5, 5).with_brightness(77).with_gamma(true);
        let color = Rgb::new(200, 30, 90);

        let mut filled = strip(&config);
        filled.fill(color).unwrap();

        let mut looped = strip(&config);
        for index in 0..5 {
            looped.set_pixel(index, color).unwrap();
        }

        assert_eq!(filled.raw_buffer(), looped.raw_buffer());
    }

    #[test]
    fn test_transmitted_frame_is_encoded_buffer() {
        let mut strip = strip(&StripConfig::new(2, 5));
        strip.set_pixel(0, Rgb::new(1, 2, 3)).unwrap();
        strip.set_pixel(1, Rgb::new(0xFF, 0, 0x80)).unwrap();
        strip.refresh().unwrap();

        let expected: Vec<Symbol> = encode(strip.raw_buffer()).collect();
        let frame = strip.driver().provider().last_frame();
        assert_eq!(frame, expected.as_slice());
        assert_eq!(frame.len(), 2 * 24 + 1);
        assert_eq!(frame.last(), Some(&RESET_SYMBOL));
        assert_eq!(strip.driver().provider().last_loop_count(), 0);
    }

    #[test]
    fn test_set_pixel_reorders_for_grb() {
        let mut strip = strip(&StripConfig::new(3, 5));
        strip.set_pixel(1, Rgb::new(10, 20, 30)).unwrap();
        assert_eq!(strip.raw_pixel(1), Ok([20, 10, 30]));
        assert_eq!(strip.raw_pixel(0), Ok([0, 0, 0]));
        assert_eq!(stats(&strip).transmitted, 0);
    }

    #[test]
    fn test_set_pixel_out_of_range() {
        let mut strip = strip(&StripConfig::new(3, 5));
        assert_eq!(
            strip.set_pixel(3, RED),
            Err(Error::InvalidArgument(ArgumentError::IndexOutOfRange {
                index: 3,
                length: 3
            }))
        );
        assert_eq!(strip.raw_buffer(), &[0u8; 9]);
        assert!(strip.raw_pixel(3).is_err());
    }

    #[test]
    fn test_set_pixel_rgbw_folds_white() {
        let mut strip = strip(&StripConfig::new(2, 5).with_order(ChannelOrder::Rgb));
        strip.set_pixel_rgbw(0, Rgbw::new(10, 20, 30, 5)).unwrap();
        strip.set_pixel_rgbw(1, Rgbw::new(250, 0, 0, 10)).unwrap();
        assert_eq!(strip.raw_pixel(0), Ok([15, 25, 35]));
        assert_eq!(strip.raw_pixel(1), Ok([255, 10, 10]));
    }

    #[test]
    fn test_set_range() {
        let mut strip = strip(&StripConfig::new(5, 5).with_order(ChannelOrder::Brg));
        strip.set_range(1, 3, Rgb::new(1, 2, 3)).unwrap();
        assert_eq!(
            strip.raw_buffer(),
            &[0, 0, 0, 3, 1, 2, 3, 1, 2, 3, 1, 2, 0, 0, 0]
        );

        assert_eq!(
            strip.set_range(3, 3, RED),
            Err(Error::InvalidArgument(ArgumentError::RangeOutOfBounds {
                start: 3,
                len: 3,
                length: 5
            }))
        );
        assert!(strip.set_range(usize::MAX, 2, RED).is_err());
        assert_eq!(strip.raw_pixel(4), Ok([0, 0, 0]));
    }

    #[test]
    fn test_clear() {
        let mut strip = strip(&StripConfig::new(3, 5));
        strip.fill(GREEN).unwrap();
        assert_eq!(strip.raw_pixel(2), Ok([255, 0, 0]));

        strip.clear().unwrap();
        assert_eq!(strip.raw_buffer(), &[0u8; 9]);
        assert_eq!(stats(&strip).transmitted, 2);
    }

    #[test]
    fn test_brightness_and_gamma_are_per_strip() {
        let mut dim = strip(&StripConfig::new(1, 5).with_order(ChannelOrder::Rgb));
        let mut bright = strip(&StripConfig::new(1, 6).with_order(ChannelOrder::Rgb));

        dim.set_brightness(128);
        dim.enable_gamma(true);
        dim.set_pixel(0, Rgb::new(128, 128, 128)).unwrap();
        bright.set_pixel(0, Rgb::new(128, 128, 128)).unwrap();

        assert_eq!(dim.raw_pixel(0), Ok([28, 28, 28]));
        assert_eq!(bright.raw_pixel(0), Ok([128, 128, 128]));
        assert_eq!(bright.brightness(), 255);
        assert!(!bright.gamma_enabled());
    }

    #[test]
    fn test_brightness_applies_to_later_writes_only() {
        let mut strip = strip(&StripConfig::new(2, 5).with_order(ChannelOrder::Rgb));
        strip.set_pixel(0, RED).unwrap();
        strip.set_brightness(0);
        strip.set_pixel(1, RED).unwrap();
        assert_eq!(strip.raw_pixel(0), Ok([255, 0, 0]));
        assert_eq!(strip.raw_pixel(1), Ok([0, 0, 0]));
    }

    #[test]
    fn test_refresh_async_and_is_busy() {
        let mut strip = manual_strip(&StripConfig::new(3, 5));

        strip.refresh_async().unwrap();
        assert!(strip.is_busy());
        assert_eq!(strip.state(), TxState::Transmitting);

        strip.driver_mut().provider_mut().complete_all();
        assert!(!strip.is_busy());
        assert_eq!(strip.state(), TxState::Ready);
    }

    #[test]
    fn test_wait_finishes_in_flight_frame() {
        let mut strip = manual_strip(&StripConfig::new(3, 5));
        strip.refresh_async().unwrap();

        assert_eq!(strip.wait(Some(Duration::from_millis(1))), Err(Error::Timeout));
        assert_eq!(strip.state(), TxState::Transmitting);

        strip.wait(None).unwrap();
        assert_eq!(strip.state(), TxState::Ready);
        assert!(!strip.is_busy());
    }

    // Writes during an in-flight frame are refused while the busy guard is on.
    #[test]
    fn test_busy_guard_rejects_writes_in_flight() {
        let mut strip = manual_strip(&StripConfig::new(3, 5));
        strip.refresh_async().unwrap();

        assert_eq!(strip.set_pixel(0, RED), Err(Error::Busy));
        assert_eq!(strip.set_range(0, 2, RED), Err(Error::Busy));
        assert_eq!(strip.fill(RED), Err(Error::Busy));
        assert_eq!(strip.raw_buffer(), &[0u8; 9]);

        strip.driver_mut().provider_mut().complete_one();
        strip.set_pixel(0, RED).unwrap();
        assert_eq!(strip.raw_pixel(0), Ok([0, 255, 0]));
    }

    // Without the guard, the caller is responsible for polling `is_busy`.
    #[test]
    fn test_unguarded_writes_in_flight_are_caller_responsibility() {
        let mut config = StripConfig::new(3, 5);
        config.driver.busy_guard = false;
        let mut strip = manual_strip(&config);
        strip.refresh_async().unwrap();

        strip.set_pixel(0, RED).unwrap();
        assert_eq!(strip.raw_pixel(0), Ok([0, 255, 0]));
        assert!(strip.is_busy());
    }

    #[test]
    fn test_overlapping_async_refresh_follows_queue_depth() {
        let mut config = StripConfig::new(3, 5);
        config.driver.channel.queue_depth = 2;
        let mut strip = manual_strip(&config);

        strip.refresh_async().unwrap();
        strip.refresh_async().unwrap();
        assert_eq!(strip.refresh_async(), Err(Error::TransmitRejected));

        assert_eq!(strip.driver().provider().pending(), 2);
        assert_eq!(stats(&strip).rejected, 1);
        assert_eq!(strip.state(), TxState::Transmitting);
    }

    #[test]
    fn test_rejected_refresh_keeps_buffer() {
        let mut config = StripConfig::new(2, 5);
        config.driver.channel.queue_depth = 1;
        config.driver.busy_guard = false;
        let mut strip = manual_strip(&config);
        strip.set_pixel(0, RED).unwrap();
        strip.refresh_async().unwrap();

        assert_eq!(strip.refresh(), Err(Error::TransmitRejected));
        assert_eq!(strip.raw_pixel(0), Ok([0, 255, 0]));

        strip.wait(None).unwrap();
        strip.refresh().unwrap();
        assert_eq!(stats(&strip).transmitted, 2);
    }

    #[test]
    fn test_blocking_refresh_timeout() {
        let mut config = StripConfig::new(2, 5);
        config.driver.timeout = Some(Duration::from_millis(1));
        let mut strip = manual_strip(&config);

        assert_eq!(strip.refresh(), Err(Error::Timeout));
        assert_eq!(strip.state(), TxState::Transmitting);
        assert_eq!(strip.raw_buffer(), &[0u8; 6]);

        strip.driver_mut().provider_mut().complete_all();
        strip.refresh_async().unwrap();
        assert_eq!(stats(&strip).transmitted, 2);
    }

    #[test]
    fn test_free_is_idempotent() {
        let mut strip = strip(&StripConfig::new(3, 5));
        strip.free().unwrap();
        strip.free().unwrap();

        let stats = stats(&strip);
        assert_eq!(stats.disabled, 1);
        assert_eq!(stats.released, 1);
        assert_eq!(stats.live_channels(), 0);
        assert_eq!(strip.state(), TxState::Freed);
        assert!(strip.raw_buffer().is_empty());
        assert_eq!(strip.len(), 0);
        assert!(strip.is_empty());
    }

    #[test]
    fn test_operations_after_free() {
        let freed = Err(Error::InvalidArgument(ArgumentError::Freed));
        let mut strip = strip(&StripConfig::new(3, 5));
        strip.free().unwrap();

        assert_eq!(strip.set_pixel(0, RED), freed);
        assert_eq!(strip.fill(RED), freed);
        assert_eq!(strip.clear(), freed);
        assert_eq!(strip.refresh(), freed);
        assert_eq!(strip.refresh_async(), freed);
        assert_eq!(strip.wait(None), freed);
        assert_eq!(strip.raw_pixel(0), Err(Error::InvalidArgument(ArgumentError::Freed)));
        assert!(!strip.is_busy());
        assert_eq!(stats(&strip).transmitted, 0);
    }

    #[test]
    fn test_smart_leds_write() {
        let mut strip = strip(&StripConfig::new(3, 5));
        strip.write([RED, GREEN, BLACK, RED, RED]).unwrap();

        assert_eq!(strip.raw_pixel(0), Ok([0, 255, 0]));
        assert_eq!(strip.raw_pixel(1), Ok([255, 0, 0]));
        assert_eq!(strip.raw_pixel(2), Ok([0, 0, 0]));
        assert_eq!(stats(&strip).transmitted, 1);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::InvalidArgument(ArgumentError::IndexOutOfRange { index: 3, length: 3 })
                .to_string(),
            "invalid argument: pixel 3 is out of range for a strip of 3"
        );
        assert_eq!(Error::Busy.to_string(), "transmission in flight");
    }
}
