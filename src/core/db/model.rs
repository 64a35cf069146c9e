use time::{OffsetDateTime, format_description::well_known::Rfc3339, macros::format_description};

use crate::core::db::GatewayError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Avatar colors handed out to projects by id.
const PROJECT_PALETTE: [Color; 6] = [
    Color { r: 0x3b, g: 0x82, b: 0xf6 },
    Color { r: 0x8b, g: 0x5c, b: 0xf6 },
    Color { r: 0x10, g: 0xb9, b: 0x81 },
    Color { r: 0xf5, g: 0x9e, b: 0x0b },
    Color { r: 0xef, g: 0x44, b: 0x44 },
    Color { r: 0x06, g: 0xb6, b: 0xd4 },
];

impl Color {
    pub fn for_project(id: i64) -> Self {
        PROJECT_PALETTE[id.rem_euclid(PROJECT_PALETTE.len() as i64) as usize]
    }
}

pub(super) fn parse_timestamp(column: &'static str, value: &str) -> Result<OffsetDateTime, GatewayError> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|_| GatewayError::decode(column, value))
}

/// Short calendar date used in listings, e.g. `2026-03-14`.
pub fn format_date(at: OffsetDateTime) -> String {
    at.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| at.date().to_string())
}
