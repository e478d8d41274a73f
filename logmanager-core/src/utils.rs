use chrono::Local;

use crate::level::MsgLevel;

/// Capacity of a formatted message, terminator slot included.
pub const MAX_MESSAGE_LEN: usize = 2048;

/// Formats one log line, newline included.
///
/// File, line and function are only written when a file is given and
/// `file_line_quiet` is off.
pub fn format_message(
    level: MsgLevel,
    file: Option<&str>,
    line: u32,
    function: &str,
    message: &str,
    file_line_quiet: bool,
) -> String {
    let tag = level.tag();
    match file {
        Some(file) if !file_line_quiet => {
            format!("{tag}: {file}({line}) - {function}: {message}\n")
        }
        _ => format!("{tag}: {message}\n"),
    }
}

/// Local calendar time in the classic `ctime` layout, kept on a single line.
pub fn timestamp() -> String {
    let raw = Local::now().format("%a %b %e %H:%M:%S %Y").to_string();
    sanitize_timestamp(&raw)
}

/// Replaces newlines, form feeds and any other control character with a space.
pub fn sanitize_timestamp(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

pub fn with_timestamp(timestamp: &str, line: &str) -> String {
    format!("[{timestamp}] {line}")
}

/// Caps a formatted line at `MAX_MESSAGE_LEN - 1` bytes.
///
/// The cut lands on a char boundary and the trailing newline is put back, so the
/// prefix and tag survive and the sink still sees one whole line.
pub fn truncate_message(mut line: String) -> String {
    if line.len() < MAX_MESSAGE_LEN {
        return line;
    }
    let mut cut = MAX_MESSAGE_LEN - 2;
    while !line.is_char_boundary(cut) {
        cut -= 1;
    }
    line.truncate(cut);
    line.push('\n');
    line
}
