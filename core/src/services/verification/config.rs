//! Configuration for the verification service.

/// Configuration for the verification service.
///
/// All numeric knobs are injected here rather than hard-coded; the
/// cooldown in particular differs between deployment profiles (1 minute
/// for interactive signup flows, up to 15 for abuse-sensitive ones).
#[derive(Debug, Clone)]
pub struct VerificationConfig {
    /// Number of decimal digits in a verification code
    pub code_length: usize,
    /// Minutes before an issued code expires
    pub code_expiry_minutes: i64,
    /// Minimum minutes between successive issuances for one phone number
    pub cooldown_minutes: i64,
    /// Maximum failed check attempts before a record locks
    pub max_attempts: u32,
    /// Country calling code assumed for 10-digit national numbers
    pub default_country_code: String,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            code_length: 6,
            code_expiry_minutes: 5,
            cooldown_minutes: 1,
            max_attempts: 3,
            default_country_code: "52".to_string(),
        }
    }
}
