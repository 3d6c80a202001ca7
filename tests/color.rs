mod tests {
    use myrtio_strip_controller::color::{
        Hsv, Rgb, hsv_to_rgb, rgb_from_u32, rgb_to_hsv, rgb_to_u32,
    };

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < 0.01,
            "expected {expected}, got {actual}"
        );
    }

    fn channel_diff(a: u8, b: u8) -> u8 {
        a.abs_diff(b)
    }

    #[test]
    fn test_rgb_to_hsv_primaries() {
        let red = rgb_to_hsv(Rgb::new(255, 0, 0));
        assert_close(red.hue, 0.0);
        assert_close(red.saturation, 100.0);
        assert_close(red.value, 100.0);

        assert_close(rgb_to_hsv(Rgb::new(0, 255, 0)).hue, 120.0);
        assert_close(rgb_to_hsv(Rgb::new(0, 0, 255)).hue, 240.0);
        assert_close(rgb_to_hsv(Rgb::new(255, 0, 255)).hue, 300.0);

        let gray = rgb_to_hsv(Rgb::new(128, 128, 128));
        assert_close(gray.saturation, 0.0);
        assert_close(gray.value, 50.196);

        let black = rgb_to_hsv(Rgb::new(0, 0, 0));
        assert_eq!(black, Hsv::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_hsv_to_rgb() {
        assert_eq!(hsv_to_rgb(Hsv::new(0.0, 100.0, 100.0)), Rgb::new(255, 0, 0));
        assert_eq!(hsv_to_rgb(Hsv::new(60.0, 100.0, 100.0)), Rgb::new(255, 255, 0));
        assert_eq!(hsv_to_rgb(Hsv::new(240.0, 100.0, 100.0)), Rgb::new(0, 0, 255));
        assert_eq!(hsv_to_rgb(Hsv::new(0.0, 0.0, 100.0)), Rgb::new(255, 255, 255));
        assert_eq!(hsv_to_rgb(Hsv::new(120.0, 100.0, 0.0)), Rgb::new(0, 0, 0));
    }

    #[test]
    fn test_hsv_to_rgb_wraps_and_clamps() {
        assert_eq!(hsv_to_rgb(Hsv::new(360.0, 100.0, 100.0)), Rgb::new(255, 0, 0));
        assert_eq!(hsv_to_rgb(Hsv::new(-120.0, 100.0, 100.0)), Rgb::new(0, 0, 255));
        assert_eq!(hsv_to_rgb(Hsv::new(0.0, 250.0, 180.0)), Rgb::new(255, 0, 0));
    }

    #[test]
    fn test_hsv_round_trip() {
        for r in (0..=255u8).step_by(15) {
            for g in (0..=255u8).step_by(17) {
                for b in (0..=255u8).step_by(13) {
                    let rgb = Rgb::new(r, g, b);
                    let back = hsv_to_rgb(rgb_to_hsv(rgb));
                    assert!(
                        channel_diff(back.r, r) <= 1
                            && channel_diff(back.g, g) <= 1
                            && channel_diff(back.b, b) <= 1,
                        "{rgb:?} came back as {back:?}"
                    );
                }
            }
        }
        for rgb in [Rgb::new(1, 2, 3), Rgb::new(254, 1, 128), Rgb::new(7, 255, 254)] {
            let back = hsv_to_rgb(rgb_to_hsv(rgb));
            assert!(channel_diff(back.r, rgb.r) <= 1);
            assert!(channel_diff(back.g, rgb.g) <= 1);
            assert!(channel_diff(back.b, rgb.b) <= 1);
        }
    }

    #[test]
    fn test_u32_conversions() {
        assert_eq!(rgb_from_u32(0xFF8800), Rgb::new(255, 136, 0));
        assert_eq!(rgb_to_u32(Rgb::new(0x12, 0x34, 0x56)), 0x123456);
    }
}
