/// Return the bit value for `value` at bit position `bit`
pub fn bv(value: u8, bit: u8) -> u8 {
    (value >> bit) & 1
}

/// Return the value from `value` between bit positions `major_bit` and
/// `minor_bit`
pub fn bvs(value: u8, major_bit: u8, minor_bit: u8) -> u8 {
    (value >> minor_bit) & ((1 << (major_bit - minor_bit + 1)) - 1)
}

/// Return `value` with bit `bit` set
pub fn set_bit(value: u8, bit: u8) -> u8 {
    value | (1 << bit)
}

/// Return `value` with bit `bit` cleared
pub fn clear_bit(value: u8, bit: u8) -> u8 {
    value & !(1 << bit)
}
