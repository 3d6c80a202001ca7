mod tests {
    use embassy_time::{Duration, Instant};
    use myrtio_strip_controller::{Mutation, PowerBrightness, PowerState, Rgb};

    const FADE: Duration = Duration::from_millis(100);

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    #[test]
    fn test_initial_level() {
        let on = PowerBrightness::new(FADE, 200, PowerState::On);
        assert_eq!(on.get_state(), PowerState::On);
        assert_eq!(on.level(at(0)), 200);
        assert_eq!(on.get_last_brightness(), 200);
        assert!(!on.is_transitioning(at(0)));

        let off = PowerBrightness::new(FADE, 200, PowerState::Off);
        assert_eq!(off.level(at(0)), 0);
        assert_eq!(off.get_last_brightness(), 200);
    }

    #[test]
    fn test_turn_off_reaches_zero_and_keeps_last_brightness() {
        let power = PowerBrightness::new(FADE, 200, PowerState::On);
        assert_eq!(power.turn_off(at(0)), Mutation::Applied);
        assert_eq!(power.get_state(), PowerState::Off);
        assert_eq!(power.level(at(50)), 100);
        assert_eq!(power.level(at(100)), 0);
        assert_eq!(power.dimmed(at(200), 255), 0);
        assert_eq!(power.dimmed_rgb(at(200), Rgb::new(255, 255, 255)), Rgb::new(0, 0, 0));
        assert_eq!(power.get_last_brightness(), 200);
        assert_eq!(power.turn_off(at(200)), Mutation::Redundant);
    }

    #[test]
    fn test_turn_on_restores_last_brightness() {
        let power = PowerBrightness::new(FADE, 180, PowerState::On);
        power.turn_off(at(0));
        power.level(at(150));

        assert_eq!(power.turn_on(at(200)), Mutation::Applied);
        assert_eq!(power.get_state(), PowerState::On);
        assert_eq!(power.get_target_brightness(), 180);
        assert_eq!(power.get_brightness(at(200)), 0);
        assert_eq!(power.get_brightness(at(300)), 180);
        assert_eq!(power.turn_on(at(300)), Mutation::Redundant);
    }

    #[test]
    fn test_power_reversal_continues_from_live_level() {
        let power = PowerBrightness::new(FADE, 200, PowerState::On);
        power.turn_off(at(0));
        assert_eq!(power.get_brightness(at(50)), 100);

        assert_eq!(power.turn_on(at(50)), Mutation::Applied);
        assert_eq!(power.get_brightness(at(50)), 100);
        assert_eq!(power.get_brightness(at(100)), 150);
        assert_eq!(power.get_brightness(at(150)), 200);
    }

    #[test]
    fn test_brightness_fade_rejects_new_level_while_active() {
        let power = PowerBrightness::new(FADE, 100, PowerState::On);
        assert_eq!(power.set_brightness(at(0), 200), Mutation::Applied);
        assert!(power.is_transitioning(at(10)));
        assert_eq!(power.set_brightness(at(10), 50), Mutation::Busy);
        assert_eq!(power.set_brightness(at(10), 200), Mutation::Redundant);
        assert_eq!(power.get_target_brightness(), 200);

        assert_eq!(power.set_brightness(at(150), 50), Mutation::Applied);
        assert_eq!(power.get_last_brightness(), 50);
        assert_eq!(power.get_brightness(at(300)), 50);
    }

    #[test]
    fn test_brightness_while_off_is_remembered() {
        let power = PowerBrightness::new(FADE, 200, PowerState::Off);
        assert_eq!(power.set_brightness(at(0), 80), Mutation::Applied);
        assert_eq!(power.set_brightness(at(0), 80), Mutation::Redundant);
        assert_eq!(power.set_brightness(at(0), 0), Mutation::Redundant);
        assert_eq!(power.level(at(0)), 0);
        assert_eq!(power.get_last_brightness(), 80);

        power.turn_on(at(10));
        assert_eq!(power.level(at(110)), 80);
    }

    #[test]
    fn test_dimming_truncates() {
        let power = PowerBrightness::new(FADE, 128, PowerState::On);
        assert_eq!(
            power.dimmed_rgb(at(0), Rgb::new(200, 100, 50)),
            Rgb::new(100, 50, 25)
        );
        assert_eq!(power.dimmed(at(0), 255), 128);
    }
}
