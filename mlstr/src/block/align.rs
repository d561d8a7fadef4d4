/// Width of the widest row, in chars.
pub fn width(text: &str) -> usize {
    text.split('\n')
        .map(|row| row.chars().count())
        .max()
        .unwrap_or(0)
}

/// Right-pad every row with spaces so all rows share the width of the widest one.
pub fn align(text: &str) -> String {
    let width = width(text);
    let mut out = String::with_capacity(text.len());
    for (i, row) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(row);
        let pad = width - row.chars().count();
        out.extend(std::iter::repeat_n(' ', pad));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_short_rows() {
        assert_eq!(align("a\nbbb\ncc"), "a  \nbbb\ncc ");
    }

    #[test]
    fn equal_rows_unchanged() {
        assert_eq!(align("ab\ncd"), "ab\ncd");
        assert_eq!(align(""), "");
        assert_eq!(align("single"), "single");
    }

    #[test]
    fn blank_rows_become_spaces() {
        assert_eq!(align("xy\n\n"), "xy\n  \n  ");
    }

    #[test]
    fn width_counts_chars_not_bytes() {
        assert_eq!(width("héllo\nab"), 5);
        assert_eq!(align("é\nab"), "é \nab");
    }
}
