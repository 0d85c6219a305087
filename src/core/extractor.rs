//! Document body extraction
//!
//! Project Gutenberg e-books wrap the actual text in licence boilerplate. This
//! module isolates the canonical body between the START and END marker lines.

/// Prefix of the line that precedes the body
pub const START_MARKER: &str = "*** START OF THIS PROJECT GUTENBERG EBOOK";

/// Prefix of the line that follows the body
pub const END_MARKER: &str = "*** END OF THIS PROJECT GUTENBERG EBOOK";

/// Extract the body from an ordered sequence of lines.
///
/// The body starts on the line after the last START marker seen and ends just
/// before the first END marker. Scanning stops at that END marker, so an END
/// that appears before any START yields no body even if a START follows.
///
/// # Arguments
///
/// * `lines` - Lines of the document, in order
///
/// # Returns
///
/// The lines between the markers concatenated verbatim, or `None` when either
/// marker is missing
pub fn extract<I, S>(lines: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut body: Option<String> = None;

    for line in lines {
        let line = line.as_ref();

        if line.starts_with(START_MARKER) {
            body = Some(String::new());
        } else if line.starts_with(END_MARKER) {
            return body;
        } else if let Some(text) = body.as_mut() {
            text.push_str(line);
        }
    }

    // START without a closing END
    None
}

/// Split text into lines ending in "\r\n", "\n" or a lone "\r".
///
/// Terminators stay attached to their line.
pub fn lines_inclusive(content: &str) -> impl Iterator<Item = &str> + '_ {
    let mut rest = content;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }

        let end = match rest.find(|c: char| c == '\r' || c == '\n') {
            Some(i) if rest[i..].starts_with("\r\n") => i + 2,
            Some(i) => i + 1,
            None => rest.len(),
        };

        let (line, tail) = rest.split_at(end);
        rest = tail;
        Some(line)
    })
}

/// Extract the body from a whole document, keeping line terminators intact.
pub fn extract_body(content: &str) -> Option<String> {
    extract(lines_inclusive(content))
}
