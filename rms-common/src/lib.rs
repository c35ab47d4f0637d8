pub mod auth;
pub mod cap;
pub mod clock;
pub mod status;

use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};

/// Short one-time code used for account verification and password reset.
pub fn random_code() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect::<String>()
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_code_is_six_uppercase_alphanumerics() {
        let code = random_code();
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
        assert!(!code.chars().any(|c| c.is_ascii_lowercase()));
    }
}
