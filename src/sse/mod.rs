//! SSE (Server-Sent Events) payload decoding
//!
//! Each chunk received from a streaming execution is treated as one event
//! block. Only `data:` lines are interpreted:
//! - `data: <content>` - one line of payload (a single leading space is dropped)
//! - multiple `data:` lines are joined with `\n`
//! - every other line (`event:`, `id:`, `retry:`, comments) is ignored

/// Extract the value of a `data:` line.
///
/// Only the first colon separates the field name from the value, so values
/// containing colons (URLs, timestamps) come back intact.
pub fn data_field(line: &str) -> Option<&str> {
    let value = line.strip_prefix("data:")?;
    Some(value.strip_prefix(' ').unwrap_or(value))
}

/// Reconstruct the data payload of a raw SSE block.
///
/// Returns an empty string when the block has no `data:` line.
///
/// # Example
///
/// ```
/// use queryflow::sse::parse_data;
///
/// assert_eq!(parse_data("event: message\ndata: a\ndata: b"), "a\nb");
/// assert_eq!(parse_data("data:https://example.com"), "https://example.com");
/// ```
pub fn parse_data(block: &str) -> String {
    let mut data = String::new();
    for value in block.lines().filter_map(data_field) {
        if !data.is_empty() {
            data.push('\n');
        }
        data.push_str(value);
    }
    data
}
