// MAX31855 conversion word layout (32 bits, MSB shifted out first).
// The chip has no addressable registers; every transfer clocks out the
// same fixed frame.
pub const PROBE_TEMP_SHIFT: u32 = 18; // Bits 31:18, thermocouple temperature
pub const PROBE_TEMP_BITS: u32 = 14; // Signed, 0.25 C per LSB
pub const FAULT_BIT: u32 = 1 << 17; // Any fault condition active
pub const CJ_TEMP_SHIFT: u32 = 4; // Bits 15:4, cold-junction temperature
pub const CJ_TEMP_BITS: u32 = 12; // Signed, 0.0625 C per LSB
pub const VCC_SHORT_BIT: u32 = 1 << 3; // Thermocouple shorted to VCC
pub const GND_SHORT_BIT: u32 = 1 << 2; // Thermocouple shorted to GND
pub const OPEN_CIRCUIT_BIT: u32 = 1 << 1; // Thermocouple open circuit

// Temperature resolution per LSB of each field.
pub const PROBE_TEMP_C_PER_LSB: f32 = 0.25;
pub const CJ_TEMP_C_PER_LSB: f32 = 0.0625;

/// Extract the probe temperature field (bits 31:18) from a conversion word.
pub fn probe_temp_field(word: u32) -> u32 {
    (word >> PROBE_TEMP_SHIFT) & ((1 << PROBE_TEMP_BITS) - 1)
}

/// Extract the cold-junction temperature field (bits 15:4) from a
/// conversion word.
pub fn cj_temp_field(word: u32) -> u32 {
    (word >> CJ_TEMP_SHIFT) & ((1 << CJ_TEMP_BITS) - 1)
}

/// Reinterpret the low `bits` bits of `value` as a two's-complement signed
/// integer.
///
/// Works uniformly for any field width in 1..=31; both temperature fields
/// of the conversion word go through this one routine.
pub fn sign_extend(value: u32, bits: u32) -> i32 {
    debug_assert!((1..32).contains(&bits));
    let mask = (1u32 << bits) - 1;
    let sign = 1u32 << (bits - 1);
    ((value & mask) ^ sign).wrapping_sub(sign) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_extend_maps_into_signed_range() {
        for bits in 1..=16u32 {
            let half = 1i32 << (bits - 1);
            for value in 0..(1u32 << bits) {
                let extended = sign_extend(value, bits);
                assert!(
                    (-half..half).contains(&extended),
                    "sign_extend({value}, {bits}) = {extended} out of range"
                );
                // Masking back to the field width must reproduce the input.
                let mask = (1u32 << bits) - 1;
                assert_eq!(extended as u32 & mask, value);
            }
        }
    }

    #[test]
    fn sign_extend_known_values() {
        assert_eq!(sign_extend(0, 14), 0);
        assert_eq!(sign_extend(100, 14), 100);
        assert_eq!(sign_extend(0x2000, 14), -8192);
        assert_eq!(sign_extend(0x3FFF, 14), -1);
        assert_eq!(sign_extend(0xFFF, 12), -1);
        assert_eq!(sign_extend(0x800, 12), -2048);
    }

    #[test]
    fn field_extraction() {
        let word = (100 << PROBE_TEMP_SHIFT) | (0xFFF << CJ_TEMP_SHIFT);
        assert_eq!(probe_temp_field(word), 100);
        assert_eq!(cj_temp_field(word), 0xFFF);

        // Neighbouring flag bits must not leak into the fields.
        let word = word | FAULT_BIT | OPEN_CIRCUIT_BIT | GND_SHORT_BIT | VCC_SHORT_BIT;
        assert_eq!(probe_temp_field(word), 100);
        assert_eq!(cj_temp_field(word), 0xFFF);
    }
}
