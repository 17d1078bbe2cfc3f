// Update authentication module
// Holds the shared secret behind a verify capability so the comparison
// strategy can change without touching handler contracts

/// Verifies the API key presented on update requests
pub struct Authenticator {
    secret: String,
}

impl Authenticator {
    pub const fn new(secret: String) -> Self {
        Self { secret }
    }

    /// Check a candidate key against the configured secret.
    ///
    /// Constant-time over the compared bytes so the match position leaks
    /// nothing; length still short-circuits.
    pub fn verify(&self, candidate: Option<&str>) -> bool {
        let Some(candidate) = candidate else {
            return false;
        };

        let secret = self.secret.as_bytes();
        let candidate = candidate.as_bytes();
        if secret.len() != candidate.len() {
            return false;
        }

        secret
            .iter()
            .zip(candidate)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}
