mod tests {
    use embassy_time::{Duration, Instant};
    use myrtio_strip_controller::{
        Button, ButtonAction, DriverConfig, FrameScheduler, PixelDriver, Rgb, StripConfig,
        StripEngine, TickOutcome,
    };

    struct NullDriver;

    impl PixelDriver for NullDriver {
        fn configure(&mut self, _config: &DriverConfig) {}
        fn write(&mut self, _index: u16, _color: Rgb) {}
        fn flush(&mut self) {}
    }

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    #[test]
    fn test_frame_scheduler_paces_frames() {
        let engine = StripEngine::<NullDriver, 8>::new(NullDriver, &StripConfig::default());
        let mut scheduler = FrameScheduler::new(&engine);

        let first = scheduler.tick(at(0));
        assert_eq!(first.outcome, TickOutcome::Rendered);
        assert_eq!(first.next_deadline, at(10));
        assert_eq!(first.sleep_duration, Duration::from_millis(10));

        let second = scheduler.tick(at(10));
        assert_eq!(second.outcome, TickOutcome::Rendered);
        assert_eq!(second.next_deadline, at(20));

        let late = scheduler.tick(at(100));
        assert_eq!(late.outcome, TickOutcome::Rendered);
        assert_eq!(late.next_deadline, at(110));
        assert_eq!(late.sleep_duration, Duration::from_millis(10));
    }

    #[test]
    fn test_button_fires_once_per_debounced_press() {
        let mut button = Button::with_debounce(ButtonAction::TogglePower, Duration::from_millis(30));
        assert_eq!(button.action(), ButtonAction::TogglePower);

        assert_eq!(button.poll(at(0), true), None);
        assert_eq!(button.poll(at(10), true), None);
        assert_eq!(button.poll(at(30), true), Some(ButtonAction::TogglePower));
        assert_eq!(button.poll(at(40), true), None);

        assert_eq!(button.poll(at(50), false), None);
        assert_eq!(button.poll(at(90), false), None);
    }

    #[test]
    fn test_button_ignores_bounce() {
        let mut button = Button::new(ButtonAction::BrightnessUp);
        assert_eq!(button.poll(at(0), true), None);
        assert_eq!(button.poll(at(5), false), None);
        assert_eq!(button.poll(at(50), false), None);
        assert_eq!(button.poll(at(60), true), None);
        assert_eq!(button.poll(at(100), true), Some(ButtonAction::BrightnessUp));
    }
}
