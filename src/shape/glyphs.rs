//! 5-row bitmap glyphs for dot wordmarks. `1` marks a lit cell.

pub(crate) const GLYPH_ROWS: usize = 5;

pub(crate) fn glyph(ch: char) -> Option<&'static [&'static str; GLYPH_ROWS]> {
    Some(match ch.to_ascii_uppercase() {
        'A' => &["0110", "1001", "1111", "1001", "1001"],
        'B' => &["1110", "1001", "1110", "1001", "1110"],
        'C' => &["1111", "1000", "1000", "1000", "1111"],
        'D' => &["1110", "1001", "1001", "1001", "1110"],
        'E' => &["1111", "1000", "1110", "1000", "1111"],
        'H' => &["1001", "1001", "1111", "1001", "1001"],
        'I' => &["111", "010", "010", "010", "111"],
        'L' => &["1000", "1000", "1000", "1000", "1111"],
        'M' => &["10001", "11011", "10101", "10001", "10001"],
        'N' => &["1001", "1101", "1011", "1001", "1001"],
        'O' => &["1111", "1001", "1001", "1001", "1111"],
        'P' => &["1110", "1001", "1110", "1000", "1000"],
        'R' => &["1110", "1001", "1110", "1010", "1001"],
        'S' => &["1111", "1000", "1110", "0001", "1110"],
        'T' => &["11111", "00100", "00100", "00100", "00100"],
        'U' => &["1001", "1001", "1001", "1001", "1111"],
        'Y' => &["10001", "01010", "00100", "00100", "00100"],
        ' ' => &["00", "00", "00", "00", "00"],
        _ => return None,
    })
}
