/// Number of digits in the short parcel identifier.
pub const PIN10_LENGTH: usize = 10;

/// Derive the 10-digit parcel identifier from a full PIN.
///
/// Only ASCII digits are kept, so `"17-10-100-100-0000"` becomes
/// `"1710100100"`. A PIN with fewer digits yields a shorter value.
pub fn derive_pin10(pin: &str) -> String {
    pin.chars()
        .filter(char::is_ascii_digit)
        .take(PIN10_LENGTH)
        .collect()
}
