use rand::Rng;

/// Reset codes are six digits, like the emails users already receive
pub const OTP_LENGTH: usize = 6;

/// Generates a numeric one-time code of the given length.
pub fn generate_otp(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_otp_shape() {
        for _ in 0..50 {
            let otp = generate_otp(OTP_LENGTH);
            assert_eq!(otp.len(), OTP_LENGTH);
            assert!(otp.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_otp_length_is_configurable() {
        assert_eq!(generate_otp(4).len(), 4);
        assert_eq!(generate_otp(0).len(), 0);
    }
}
