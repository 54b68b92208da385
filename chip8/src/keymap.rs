/// # Keymap
/// Chip-8 input is generated with a hexadecimal keypad.
///
/// The hexadecimal layout is mapped to the left 4 alphanumeric columns.
/// ```text
/// |1|2|3|C|      |1|2|3|4|
/// |4|5|6|D|  ->  |Q|W|E|R|
/// |7|8|9|E|  ->  |A|S|D|F|
/// |A|0|B|F|      |Z|X|C|V|
/// ```
pub fn keymap(key: char) -> Option<u8> {
    match key.to_ascii_lowercase() {
        'x' => Some(0x0),
        '1' => Some(0x1),
        '2' => Some(0x2),
        '3' => Some(0x3),
        'q' => Some(0x4),
        'w' => Some(0x5),
        'e' => Some(0x6),
        'a' => Some(0x7),
        's' => Some(0x8),
        'd' => Some(0x9),
        'z' => Some(0xA),
        'c' => Some(0xB),
        '4' => Some(0xC),
        'r' => Some(0xD),
        'f' => Some(0xE),
        'v' => Some(0xF),
        _ => None,
    }
}

/// Maps a typed script of keys, e.g. `"qwe1"`, onto keypad keys
pub fn parse_keys(script: &str) -> Result<Vec<u8>, String> {
    script
        .chars()
        .map(|c| keymap(c).ok_or_else(|| format!("'{}' is not on the keypad", c)))
        .collect()
}
