use base64::{engine::general_purpose::STANDARD, Engine};
use md5::{Digest, Md5};

/// Length of every generated short code.
pub const SHORT_CODE_LEN: usize = 7;

/// Derive the short code for `input`.
///
/// The code is the first [`SHORT_CODE_LEN`] characters of the standard base64
/// encoding of the input's MD5 digest, so the same bytes always map to the
/// same code. Distinct inputs can collide; callers that store by code get
/// last-write-wins for colliding inputs.
pub fn encode(input: &[u8]) -> String {
    let digest = Md5::digest(input);
    let mut code = STANDARD.encode(digest);
    code.truncate(SHORT_CODE_LEN);
    code
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_base64_char(c: char) -> bool {
        c.is_ascii_alphanumeric() || c == '+' || c == '/'
    }

    #[test]
    fn known_code() {
        assert_eq!(encode(b"test.com"), "yXwbNnH");
        assert_eq!(encode(b"https://example.com"), "yYTQaq+");
    }

    #[test]
    fn deterministic() {
        let input = b"https://example.com/some/long/path?with=query";
        assert_eq!(encode(input), encode(input));
    }

    #[test]
    fn fixed_length_and_alphabet() {
        let inputs: [&[u8]; 5] = [
            b"a",
            b"test.com",
            b"https://example.com/a/really/long/url/that/keeps/going",
            &[0xff, 0xfe, 0x00, 0x80],
            &[0u8; 4096],
        ];
        for input in inputs {
            let code = encode(input);
            assert_eq!(code.len(), SHORT_CODE_LEN, "input {input:?}");
            assert!(code.chars().all(is_base64_char), "code {code}");
        }
    }

    #[test]
    fn input_order_matters() {
        assert_ne!(encode(b"ab"), encode(b"ba"));
    }
}
