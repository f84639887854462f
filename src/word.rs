/// Number of memory cells, addressed `00` to `99`.
pub const MEMORY_SIZE: usize = 100;

/// Words are three decimal digits.
pub const WORD_MODULUS: i64 = 1000;

/// Largest value a memory cell may hold.
pub const WORD_MAX: u16 = 999;

/// Map any integer onto a memory word in `[0, 999]`.
///
/// Negative values wrap around, so `-1` becomes `999`.
pub fn normalize(value: i64) -> u16 {
    value.rem_euclid(WORD_MODULUS) as u16
}

/// Map any integer onto an accumulator value in `[-999, 999]`, keeping its sign.
pub fn wrap_signed(value: i64) -> i16 {
    (value % WORD_MODULUS) as i16
}

/// Wrap an address into `[0, 99]`.
pub fn wrap_address(address: usize) -> u8 {
    (address % MEMORY_SIZE) as u8
}

/// Three digit, zero padded rendering of a value as it would be stored in memory.
pub fn format_word(value: i64) -> String {
    format!("{:03}", normalize(value))
}
