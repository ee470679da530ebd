use crate::warn;

/// Decodes a hex string into `output`, returning how many bytes were written.
///
/// - Odd-length input is rejected and nothing is written.
/// - A non-hex character is rejected; `output` is left zeroed.
/// - Input longer than `output` is decoded up to `output.len()` bytes and the
///   remainder is ignored.
pub fn decode_into(input: &str, output: &mut [u8]) -> usize {
    if input.len() % 2 != 0 {
        warn!("Input string is in odd size");
        return 0;
    }

    output.fill(0);

    let count = (input.len() / 2).min(output.len());
    let consumed = &input.as_bytes()[..2 * count];
    if let Err(e) = ::hex::decode_to_slice(consumed, &mut output[..count]) {
        warn!("Input string has an illegal character: {e}");
        if let Some(first) = output.first_mut() {
            *first = 0;
        }
        return 0;
    }
    count
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{self, Suppressed};

    #[test]
    fn illegal_character_past_the_buffer_is_not_inspected() {
        let mut buf = [0u8; 2];
        assert_eq!(decode_into("a1b2zz", &mut buf), 2);
        assert_eq!(buf, [0xA1, 0xB2]);
    }

    #[test]
    fn non_ascii_input_is_rejected() {
        let _serial = logging::gate_lock();
        let _quiet = Suppressed::new();
        let mut buf = [0x55u8; 4];
        assert_eq!(decode_into("éé", &mut buf), 0);
        assert_eq!(buf[0], 0);
    }

    #[test]
    fn decodes_upper_and_lower_case() {
        let mut buf = [0u8; 4];
        assert_eq!(decode_into("AABB", &mut buf), 2);
        assert_eq!(&buf[..2], &[0xAA, 0xBB]);

        assert_eq!(decode_into("0a1B", &mut buf), 2);
        assert_eq!(&buf[..2], &[0x0A, 0x1B]);
    }

    #[test]
    fn odd_length_writes_nothing() {
        let _serial = logging::gate_lock();
        let _quiet = Suppressed::new();
        let mut buf = [0x55u8; 4];
        assert_eq!(decode_into("aab", &mut buf), 0);
        assert_eq!(buf, [0x55; 4]);
    }

    #[test]
    fn illegal_character_zeroes_output() {
        let _serial = logging::gate_lock();
        let _quiet = Suppressed::new();
        let mut buf = [0x55u8; 4];
        assert_eq!(decode_into("zzvv", &mut buf), 0);
        assert_eq!(buf[0], 0);

        let mut buf = [0x55u8; 4];
        assert_eq!(decode_into("aazz", &mut buf), 0);
        assert_eq!(buf[0], 0);
    }

    #[test]
    fn long_input_is_truncated_to_buffer() {
        let mut buf = [0u8; 4];
        assert_eq!(decode_into("0102030405", &mut buf), 4);
        assert_eq!(buf, [0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn empty_input_and_empty_buffer() {
        let mut buf = [0u8; 4];
        assert_eq!(decode_into("", &mut buf), 0);

        let mut empty: [u8; 0] = [];
        assert_eq!(decode_into("aabb", &mut empty), 0);
    }
}
