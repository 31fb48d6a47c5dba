//! Line-oriented wire protocol.
//!
//! ## Client → Server
//!
//! ```text
//! NICK:<nickname>          mandatory first line
//! COLOR:<i32>              optional second line (packed ARGB, alpha ignored)
//! <text>                   every following line is one chat message
//! ```
//!
//! ## Server → Client
//!
//! ```text
//! <sender>|<rgb>|<text>
//! ```
//!
//! `<rgb>` is the 24-bit color value. In the sender field `\` is written as
//! `\\` and `|` as `\|`; the text is always the last field and is written
//! verbatim, so it may contain `|` freely.

use std::{fmt, str::FromStr};

use thiserror::Error;

/// Prefix of the mandatory nickname directive.
pub const NICK_PREFIX: &str = "NICK:";
/// Prefix of the optional color directive.
pub const COLOR_PREFIX: &str = "COLOR:";
/// Separator between the fields of a broadcast line.
pub const FIELD_SEPARATOR: char = '|';

const ESCAPE: char = '\\';
const RGB_MASK: u32 = 0x00FF_FFFF;

/// Errors raised while parsing protocol lines.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// The first line was not a `NICK:` directive
    #[error("expected a NICK: directive as the first line")]
    MissingNick,

    /// `NICK:` carried no usable nickname
    #[error("nickname must not be empty")]
    EmptyNickname,

    /// Color value is not a signed 32-bit integer (or `#RRGGBB` for CLI input)
    #[error("invalid color value '{0}'")]
    InvalidColor(String),

    /// Broadcast line does not have the `sender|rgb|text` shape
    #[error("malformed chat line: {0}")]
    MalformedLine(String),
}

/// 24-bit RGB color.
///
/// Stored as `0x00RRGGBB`. Packed ARGB integers are accepted with their alpha
/// byte discarded, so `-16776961` (opaque blue) and `255` name the same color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(u32);

impl Rgb {
    /// Color applied when a client skips the `COLOR:` directive.
    pub const DEFAULT: Rgb = Rgb(0x00_00_00);
    /// Color of server-originated notices.
    pub const ALERT: Rgb = Rgb(0xFF_00_00);
    /// Color the terminal client picks when none is given.
    pub const BLUE: Rgb = Rgb(0x00_00_FF);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self(((red as u32) << 16) | ((green as u32) << 8) | blue as u32)
    }

    /// Build a color from a packed ARGB integer, ignoring alpha.
    pub const fn from_packed(packed: i32) -> Self {
        Self(packed as u32 & RGB_MASK)
    }

    /// Parse the wire representation: a signed 32-bit decimal integer.
    pub fn parse_packed(value: &str) -> Result<Self, ProtocolError> {
        value
            .trim()
            .parse::<i32>()
            .map(Self::from_packed)
            .map_err(|_| ProtocolError::InvalidColor(value.to_string()))
    }

    pub const fn value(self) -> u32 {
        self.0
    }

    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn blue(self) -> u8 {
        self.0 as u8
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Accepts the wire integer form as well as `#RRGGBB` / `0xRRGGBB`.
impl FromStr for Rgb {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let hex = trimmed
            .strip_prefix('#')
            .or_else(|| trimmed.strip_prefix("0x"))
            .or_else(|| trimmed.strip_prefix("0X"));

        match hex {
            Some(digits) if digits.len() == 6 => u32::from_str_radix(digits, 16)
                .map(Rgb)
                .map_err(|_| ProtocolError::InvalidColor(s.to_string())),
            Some(_) => Err(ProtocolError::InvalidColor(s.to_string())),
            None => Self::parse_packed(trimmed),
        }
    }
}

/// Extract the nickname from the first handshake line.
///
/// The nickname is taken verbatim; a blank one is rejected.
pub fn parse_nick_directive(line: &str) -> Result<&str, ProtocolError> {
    let nickname = line
        .strip_prefix(NICK_PREFIX)
        .ok_or(ProtocolError::MissingNick)?;
    if nickname.trim().is_empty() {
        return Err(ProtocolError::EmptyNickname);
    }
    Ok(nickname)
}

/// Parse an optional color directive.
///
/// Returns `None` when `line` is not a `COLOR:` directive at all.
pub fn parse_color_directive(line: &str) -> Option<Result<Rgb, ProtocolError>> {
    line.strip_prefix(COLOR_PREFIX).map(Rgb::parse_packed)
}

pub fn nick_directive(nickname: &str) -> String {
    format!("{}{}", NICK_PREFIX, nickname)
}

pub fn color_directive(color: Rgb) -> String {
    format!("{}{}", COLOR_PREFIX, color)
}

/// One broadcast line as delivered to every client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLine {
    pub sender: String,
    pub color: Rgb,
    pub text: String,
}

impl ChatLine {
    pub fn new(sender: impl Into<String>, color: Rgb, text: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            color,
            text: text.into(),
        }
    }

    /// Encode as `<sender>|<rgb>|<text>` without a trailing newline.
    pub fn encode(&self) -> String {
        let mut line = escape_field(&self.sender);
        line.push(FIELD_SEPARATOR);
        line.push_str(&self.color.to_string());
        line.push(FIELD_SEPARATOR);
        line.push_str(&self.text);
        line
    }

    /// Decode a broadcast line, honouring escapes in the sender field.
    pub fn decode(line: &str) -> Result<Self, ProtocolError> {
        let mut sender = String::new();
        let mut color_start = None;
        let mut chars = line.char_indices();

        while let Some((index, c)) = chars.next() {
            match c {
                ESCAPE => match chars.next() {
                    Some((_, escaped)) => sender.push(escaped),
                    None => {
                        return Err(ProtocolError::MalformedLine(
                            "dangling escape in sender".to_string(),
                        ));
                    }
                },
                FIELD_SEPARATOR => {
                    color_start = Some(index + c.len_utf8());
                    break;
                }
                other => sender.push(other),
            }
        }

        let rest = color_start
            .map(|start| &line[start..])
            .ok_or_else(|| ProtocolError::MalformedLine("missing color field".to_string()))?;
        let (color, text) = rest
            .split_once(FIELD_SEPARATOR)
            .ok_or_else(|| ProtocolError::MalformedLine("missing text field".to_string()))?;

        Ok(Self {
            sender,
            color: Rgb::parse_packed(color)?,
            text: text.to_string(),
        })
    }
}

/// Escape the field separator and the escape character itself.
pub fn escape_field(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if c == ESCAPE || c == FIELD_SEPARATOR {
            escaped.push(ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}
