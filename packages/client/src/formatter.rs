//! Message formatting utilities for client display.

use chrono::{DateTime, TimeZone};
use tsudoi_shared::protocol::{ChatLine, Rgb};

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format a broadcast line
    ///
    /// # Arguments
    ///
    /// * `line` - The decoded broadcast line
    /// * `received_at` - When the line arrived
    ///
    /// # Returns
    ///
    /// `[HH:MM:SS] sender: text` with the sender drawn in its color
    pub fn format_chat_line<Tz: TimeZone>(line: &ChatLine, received_at: &DateTime<Tz>) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        format!(
            "\n[{}] {}: {}\n",
            received_at.format("%H:%M:%S"),
            Self::colorize(&line.sender, line.color),
            line.text
        )
    }

    /// Wrap `text` in a 24-bit ANSI foreground color
    pub fn colorize(text: &str, color: Rgb) -> String {
        format!(
            "\x1b[38;2;{};{};{}m{}\x1b[0m",
            color.red(),
            color.green(),
            color.blue(),
            text
        )
    }

    /// Format a notice generated by the client itself
    pub fn format_local_notice(text: &str) -> String {
        format!("\n{}: {}\n", Self::colorize("System", Rgb::ALERT), text)
    }

    /// Format a raw text line (when decoding fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}
