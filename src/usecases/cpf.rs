//! CPF (Cadastro de Pessoas Físicas) handling.
//!
//! A CPF is 11 digits: nine base digits followed by two mod-11 check
//! digits. Inputs may carry the usual `000.000.000-00` punctuation.

/// Strips everything but digits.
pub fn normalize(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

pub fn validate(input: &str) -> bool {
    let digits: Vec<u32> = normalize(input)
        .chars()
        .filter_map(|c| c.to_digit(10))
        .collect();

    if digits.len() != 11 {
        return false;
    }

    // 000.000.000-00, 111.111.111-11, ... pass the checksum but are not issued
    if digits.iter().all(|d| *d == digits[0]) {
        return false;
    }

    check_digit(&digits[..9]) == digits[9] && check_digit(&digits[..10]) == digits[10]
}

fn check_digit(digits: &[u32]) -> u32 {
    let weight_start = digits.len() as u32 + 1;

    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, d)| d * (weight_start - i as u32))
        .sum();

    match sum * 10 % 11 {
        10 => 0,
        r => r,
    }
}

/// `00000000000` → `000.000.000-00`. Anything that is not 11 digits is
/// returned untouched.
pub fn format(cpf: &str) -> String {
    let digits = normalize(cpf);
    if digits.len() != 11 {
        return cpf.to_string();
    }

    format!(
        "{}.{}.{}-{}",
        &digits[0..3],
        &digits[3..6],
        &digits[6..9],
        &digits[9..11]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_known_good() {
        for cpf in [
            "52998224725",
            "529.982.247-25",
            "111.444.777-35",
            "39053344705",
            "123.456.789-09",
            "98765432100",
        ] {
            assert!(validate(cpf), "{cpf} should be valid");
        }
    }

    #[test]
    fn rejects_known_bad() {
        for cpf in [
            "52998224724",
            "529.982.247-52",
            "12345678901",
            "11122233344",
            "11111111111",
            "000.000.000-00",
            "1234567890",
            "123456789012",
            "",
            "abc.def.ghi-jk",
        ] {
            assert!(!validate(cpf), "{cpf} should be invalid");
        }
    }

    #[test]
    fn normalizes_punctuation() {
        assert_eq!(normalize(" 529.982.247-25 "), "52998224725");
    }

    #[test]
    fn formats_for_display() {
        assert_eq!(format("52998224725"), "529.982.247-25");
        assert_eq!(format("123"), "123");
    }
}
