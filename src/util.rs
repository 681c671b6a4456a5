use ark_std::{vec, vec::Vec};

/// Little-endian digits of `value` in the given base, padded to `count`.
pub fn base_digits(mut value: u64, base: u64, count: usize) -> Vec<u64> {
    let mut res = Vec::with_capacity(count);
    for _ in 0..count {
        res.push(value % base);
        value /= base;
    }
    res
}

/// Occurrence count of every digit in `[0, base)`.
pub fn digit_multiplicities(digits: &[u64], base: u64) -> Vec<u64> {
    let mut res = vec![0u64; base as usize];
    for d in digits {
        res[*d as usize] += 1;
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_digits_of_known_value() {
        let digits = base_digits(0xab4f0540, 16, 8);
        assert_eq!(digits, vec![0, 4, 5, 0, 15, 4, 11, 10]);

        let m = digit_multiplicities(&digits, 16);
        assert_eq!(m, vec![2, 0, 0, 0, 2, 1, 0, 0, 0, 0, 1, 1, 0, 0, 0, 1]);
        assert_eq!(m.iter().sum::<u64>(), digits.len() as u64);
    }

    #[test]
    fn digits_recompose() {
        let value = 987_654_321u64;
        let digits = base_digits(value, 16, 8);
        let recomposed = digits
            .iter()
            .rev()
            .fold(0u64, |acc, d| acc * 16 + d);
        assert_eq!(recomposed, value);
    }
}
