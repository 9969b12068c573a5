use memchr::memchr_iter;

/// Bounds `data` to at most `max_lines` newline-terminated records.
///
/// Returns the retained prefix and the number of `\n` it contains. When
/// `data` holds fewer than `max_lines` newlines it is returned unchanged,
/// including a trailing record without `\n`. Otherwise the prefix ends right
/// after the `max_lines`-th newline.
pub fn limit_lines(data: &[u8], max_lines: usize) -> (&[u8], usize) {
    if max_lines == 0 {
        return (&data[..0], 0);
    }

    let mut lines = 0;
    for pos in memchr_iter(b'\n', data) {
        lines += 1;
        if lines == max_lines {
            return (&data[..=pos], lines);
        }
    }
    (data, lines)
}
