//! Text commands
//!
//! The validation boundary for the CLI and the web request handler: raw
//! tokens are parsed and range-checked here, so the engine only ever sees
//! valid values. Errors render as the diagnostic echoed back to the caller.

use crate::color::{Hsv, Rgb, rgb_from_u32};
use crate::mode::ModeId;
use crate::state::Mutation;

/// A validated request to change (or report) the light state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    On,
    Off,
    Toggle,
    Brightness(u8),
    Rgb(Rgb),
    Hsv(Hsv),
    Mode(ModeId),
    Length(u16),
    Status,
}

/// Why a command was not executed
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command")]
    UnknownCommand,
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),
    #[error("invalid number for {0}")]
    InvalidNumber(&'static str),
    #[error("{name} out of range (0-{max})")]
    OutOfRange { name: &'static str, max: u32 },
    #[error("unexpected trailing argument")]
    TrailingArgument,
    #[error("command rejected: {0:?}")]
    Rejected(Mutation),
}

impl Command {
    /// Parse a whitespace separated command line
    ///
    /// ```text
    /// on | off | toggle | status
    /// brightness <0-255>
    /// rgb <r> <g> <b>
    /// hex <#rrggbb>
    /// hsv <hue 0-360> <saturation 0-100> <value 0-100>
    /// mode <solid|changing|0|1>
    /// length <pixels>
    /// ```
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut tokens = line.split_whitespace();
        let name = tokens.next().ok_or(CommandError::Empty)?;

        let command = match name {
            "on" => Self::On,
            "off" => Self::Off,
            "toggle" => Self::Toggle,
            "status" => Self::Status,
            "brightness" => Self::Brightness(parse_u8(tokens.next(), "brightness")?),
            "rgb" => Self::Rgb(Rgb {
                r: parse_u8(tokens.next(), "red")?,
                g: parse_u8(tokens.next(), "green")?,
                b: parse_u8(tokens.next(), "blue")?,
            }),
            "hex" => Self::Rgb(parse_hex(tokens.next())?),
            "hsv" => Self::Hsv(Hsv {
                hue: parse_ranged(tokens.next(), "hue", 360)?,
                saturation: parse_ranged(tokens.next(), "saturation", 100)?,
                value: parse_ranged(tokens.next(), "value", 100)?,
            }),
            "mode" => Self::Mode(parse_mode(tokens.next())?),
            "length" => Self::Length(parse_length(tokens.next())?),
            _ => return Err(CommandError::UnknownCommand),
        };

        if tokens.next().is_some() {
            return Err(CommandError::TrailingArgument);
        }
        Ok(command)
    }
}

fn required<'t>(token: Option<&'t str>, name: &'static str) -> Result<&'t str, CommandError> {
    token.ok_or(CommandError::MissingArgument(name))
}

fn parse_u8(token: Option<&str>, name: &'static str) -> Result<u8, CommandError> {
    let value: u32 = required(token, name)?
        .parse()
        .map_err(|_| CommandError::InvalidNumber(name))?;
    u8::try_from(value).map_err(|_| CommandError::OutOfRange { name, max: 255 })
}

#[allow(clippy::cast_precision_loss)]
fn parse_ranged(token: Option<&str>, name: &'static str, max: u32) -> Result<f32, CommandError> {
    let value: f32 = required(token, name)?
        .parse()
        .map_err(|_| CommandError::InvalidNumber(name))?;
    if !value.is_finite() || value < 0.0 || value > max as f32 {
        return Err(CommandError::OutOfRange { name, max });
    }
    Ok(value)
}

fn parse_hex(token: Option<&str>) -> Result<Rgb, CommandError> {
    let raw = required(token, "color")?;
    let digits = raw.strip_prefix('#').unwrap_or(raw);
    if digits.len() != 6 {
        return Err(CommandError::InvalidNumber("color"));
    }
    let value = u32::from_str_radix(digits, 16).map_err(|_| CommandError::InvalidNumber("color"))?;
    Ok(rgb_from_u32(value))
}

fn parse_mode(token: Option<&str>) -> Result<ModeId, CommandError> {
    let raw = required(token, "mode")?;
    if let Some(mode) = ModeId::parse_from_str(raw) {
        return Ok(mode);
    }
    let id: u8 = raw.parse().map_err(|_| CommandError::InvalidNumber("mode"))?;
    ModeId::from_raw(id).ok_or(CommandError::OutOfRange {
        name: "mode",
        max: u32::from(ModeId::Changing.as_raw()),
    })
}

fn parse_length(token: Option<&str>) -> Result<u16, CommandError> {
    let value: u32 = required(token, "length")?
        .parse()
        .map_err(|_| CommandError::InvalidNumber("length"))?;
    u16::try_from(value).map_err(|_| CommandError::OutOfRange {
        name: "length",
        max: u32::from(u16::MAX),
    })
}
