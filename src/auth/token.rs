use rand::RngCore;
use subtle::ConstantTimeEq;

/// Opaque bearer token handed to a user once: 16 random bytes as lowercase hex.
pub fn generate_user_token() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Shared-secret admin check. Empty input never matches.
pub fn admin_password_matches(candidate: &str, expected: &str) -> bool {
    if candidate.is_empty() {
        return false;
    }
    candidate.as_bytes().ct_eq(expected.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn tokens_are_32_hex_chars() {
        let token = generate_user_token();
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn tokens_do_not_repeat() {
        let tokens: HashSet<String> = (0..200).map(|_| generate_user_token()).collect();
        assert_eq!(tokens.len(), 200);
    }

    #[test]
    fn admin_password_check() {
        assert!(admin_password_matches("admin123", "admin123"));
        assert!(!admin_password_matches("admin124", "admin123"));
        assert!(!admin_password_matches("admin", "admin123"));
        assert!(!admin_password_matches("admin1234", "admin123"));
        assert!(!admin_password_matches("", ""));
    }
}
