//! Header, footer and error-line formatting for bundles.

use crate::job::CommentStyle;

const SEPARATOR_WIDTH: usize = 80;

/// Wraps `text` in the style's delimiters.
///
/// Line style yields `"{start} {text}"`, block style `"{start} {text} {end}"`.
fn wrap(style: &CommentStyle, text: &str) -> String {
    if style.is_block() {
        format!("{} {} {}", style.start, text, style.end)
    } else {
        format!("{} {}", style.start, text)
    }
}

fn separator(style: &CommentStyle) -> String {
    wrap(style, &"-".repeat(SEPARATOR_WIDTH))
}

/// Builds the block written before a file's content.
#[must_use]
pub(crate) fn header(style: &CommentStyle, relative_path: &str) -> String {
    let separator = separator(style);
    let file_line = wrap(style, &format!("START OF FILE: {relative_path}"));
    format!("{separator}\n{file_line}\n{separator}\n\n")
}

/// Builds the block written after a file's content.
#[must_use]
pub(crate) fn footer(style: &CommentStyle) -> String {
    format!("\n{}\n\n\n", separator(style))
}

/// Builds the line written in place of content when a file can't be read.
///
/// Always padded on both sides, even for line-comment styles.
#[must_use]
pub(crate) fn error_line(style: &CommentStyle, message: &str) -> String {
    format!("{} ERROR: {} {}\n", style.start, message, style.end)
}
