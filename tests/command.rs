mod tests {
    use myrtio_strip_controller::{Command, CommandError, Hsv, ModeId, Rgb};

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(Command::parse("on"), Ok(Command::On));
        assert_eq!(Command::parse("off"), Ok(Command::Off));
        assert_eq!(Command::parse("  toggle  "), Ok(Command::Toggle));
        assert_eq!(Command::parse("status"), Ok(Command::Status));
        assert_eq!(Command::parse(""), Err(CommandError::Empty));
        assert_eq!(Command::parse("dance"), Err(CommandError::UnknownCommand));
        assert_eq!(Command::parse("on now"), Err(CommandError::TrailingArgument));
    }

    #[test]
    fn test_parse_brightness() {
        assert_eq!(Command::parse("brightness 128"), Ok(Command::Brightness(128)));
        assert_eq!(
            Command::parse("brightness"),
            Err(CommandError::MissingArgument("brightness"))
        );
        assert_eq!(
            Command::parse("brightness -1"),
            Err(CommandError::InvalidNumber("brightness"))
        );
        assert_eq!(
            Command::parse("brightness 300"),
            Err(CommandError::OutOfRange {
                name: "brightness",
                max: 255
            })
        );
    }

    #[test]
    fn test_parse_colors() {
        assert_eq!(
            Command::parse("rgb 255 0 10"),
            Ok(Command::Rgb(Rgb::new(255, 0, 10)))
        );
        assert_eq!(
            Command::parse("rgb 1 2"),
            Err(CommandError::MissingArgument("blue"))
        );
        assert_eq!(
            Command::parse("rgb 1 2 256"),
            Err(CommandError::OutOfRange {
                name: "blue",
                max: 255
            })
        );
        assert_eq!(
            Command::parse("hex #ff8800"),
            Ok(Command::Rgb(Rgb::new(255, 136, 0)))
        );
        assert_eq!(
            Command::parse("hex 00FF00"),
            Ok(Command::Rgb(Rgb::new(0, 255, 0)))
        );
        assert_eq!(
            Command::parse("hex ff88"),
            Err(CommandError::InvalidNumber("color"))
        );
        assert_eq!(
            Command::parse("hsv 120 50 100"),
            Ok(Command::Hsv(Hsv::new(120.0, 50.0, 100.0)))
        );
        assert_eq!(
            Command::parse("hsv 361 0 0"),
            Err(CommandError::OutOfRange {
                name: "hue",
                max: 360
            })
        );
        assert_eq!(
            Command::parse("hsv 10 nan 0"),
            Err(CommandError::OutOfRange {
                name: "saturation",
                max: 100
            })
        );
    }

    #[test]
    fn test_parse_mode_and_length() {
        assert_eq!(Command::parse("mode solid"), Ok(Command::Mode(ModeId::Solid)));
        assert_eq!(
            Command::parse("mode changing"),
            Ok(Command::Mode(ModeId::Changing))
        );
        assert_eq!(Command::parse("mode 1"), Ok(Command::Mode(ModeId::Changing)));
        assert_eq!(
            Command::parse("mode 7"),
            Err(CommandError::OutOfRange { name: "mode", max: 1 })
        );
        assert_eq!(Command::parse("length 144"), Ok(Command::Length(144)));
        assert_eq!(
            Command::parse("length 70000"),
            Err(CommandError::OutOfRange {
                name: "length",
                max: 65535
            })
        );
    }

    #[test]
    fn test_error_messages() {
        let err = CommandError::OutOfRange {
            name: "brightness",
            max: 255,
        };
        assert_eq!(err.to_string(), "brightness out of range (0-255)");
        assert_eq!(
            CommandError::MissingArgument("red").to_string(),
            "missing argument: red"
        );
    }

    #[test]
    fn test_mode_id_names() {
        assert_eq!(ModeId::parse_from_str("solid"), Some(ModeId::Solid));
        assert_eq!(ModeId::parse_from_str("rainbow"), None);
        assert_eq!(ModeId::from_raw(1), Some(ModeId::Changing));
        assert_eq!(ModeId::from_raw(2), None);
        assert_eq!(ModeId::Changing.as_str(), "changing");
        assert_eq!(ModeId::Solid.as_raw(), 0);
    }
}
