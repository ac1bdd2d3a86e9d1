//! Reply codes
//!
//! Defines reply codes and formatting.

pub const READY: u16 = 220;
pub const STATUS: u16 = 211;
pub const CREATED: u16 = 201;
pub const CLOSING: u16 = 221;
pub const LOGIN_SUCCESS: u16 = 230;
pub const SERVICE_UNAVAILABLE: u16 = 421;
pub const LOCAL_ERROR: u16 = 451;
pub const SYNTAX_ERROR: u16 = 500;
pub const ARGUMENT_ERROR: u16 = 501;
pub const CONFLICT: u16 = 409;
pub const NOT_LOGGED_IN: u16 = 530;

/// Format a single-line reply
pub fn format_response(code: u16, message: &str) -> String {
    format!("{} {}\r\n", code, message)
}

/// Format a multi-line reply: `code-line` for each line, then `code End`.
pub fn format_multiline(code: u16, lines: &[String]) -> String {
    let mut reply = String::new();
    for line in lines {
        reply.push_str(&format!("{}-{}\r\n", code, line));
    }
    reply.push_str(&format_response(code, "End"));
    reply
}
