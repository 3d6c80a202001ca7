mod tests {
    use myrtio_strip_controller::math8::{dim8, lerp8, percent_to_u8, u8_to_percent};

    #[test]
    fn test_dim8_truncates() {
        assert_eq!(dim8(255, 255), 255);
        assert_eq!(dim8(255, 0), 0);
        assert_eq!(dim8(200, 128), 100);
        assert_eq!(dim8(100, 128), 50);
        assert_eq!(dim8(50, 128), 25);
        assert_eq!(dim8(1, 254), 0);
    }

    #[test]
    fn test_lerp8() {
        assert_eq!(lerp8(0, 255, 0.0), 0);
        assert_eq!(lerp8(0, 255, 1.0), 255);
        assert_eq!(lerp8(255, 0, 0.5), 128);
        assert_eq!(lerp8(10, 20, 0.25), 13);
        assert_eq!(lerp8(0, 100, 2.0), 100);
    }

    #[test]
    fn test_percent_conversions() {
        assert_eq!(percent_to_u8(0), 0);
        assert_eq!(percent_to_u8(50), 128);
        assert_eq!(percent_to_u8(100), 255);
        assert_eq!(percent_to_u8(150), 255);
        assert_eq!(u8_to_percent(255), 100);
        assert_eq!(u8_to_percent(128), 50);
        assert_eq!(u8_to_percent(0), 0);
    }
}
