//! Booking code generation.
//!
//! Codes are a fixed prefix followed by random uppercase alphanumerics.
//! Randomness only keeps collisions rare; the store lookup (and the UNIQUE
//! column behind it) is what guarantees uniqueness.

use log::debug;
use rand::Rng;

use crate::config::BookingConfig;
use crate::error::{Error, Result};
use crate::reservation::ReservationCode;
use crate::store::ReservationStore;

/// Characters a generated suffix is drawn from.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Default code prefix.
pub const DEFAULT_CODE_PREFIX: &str = "HV-";

/// Default suffix length.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Default number of candidates tried before giving up.
pub const DEFAULT_MAX_CODE_ATTEMPTS: u32 = 32;

/// Generates booking codes that are unused in a store.
///
/// # Examples
///
/// ```
/// use haven::code::CodeGenerator;
///
/// let generator = CodeGenerator::default();
/// let code = generator.candidate(&mut rand::thread_rng());
/// assert!(code.as_str().starts_with("HV-"));
/// assert_eq!(code.as_str().len(), 9);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeGenerator {
    prefix: String,
    length: usize,
    max_attempts: u32,
}

impl CodeGenerator {
    /// Creates a generator.
    ///
    /// # Errors
    ///
    /// Returns an error if `length` is zero, `max_attempts` is zero, or the
    /// prefix contains characters not allowed in a booking code.
    pub fn new(prefix: impl Into<String>, length: usize, max_attempts: u32) -> Result<Self> {
        let prefix = prefix.into().to_ascii_uppercase();
        if length == 0 {
            return Err(Error::validation("booking.code_length", "must be at least 1"));
        }
        if max_attempts == 0 {
            return Err(Error::validation(
                "booking.max_code_attempts",
                "must be at least 1",
            ));
        }
        if !prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(Error::validation(
                "booking.code_prefix",
                format!("'{prefix}' may only contain letters, digits and '-'"),
            ));
        }
        Ok(Self {
            prefix,
            length,
            max_attempts,
        })
    }

    /// Creates a generator from the booking section of the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured values are invalid.
    pub fn from_config(config: &BookingConfig) -> Result<Self> {
        Self::new(
            config
                .code_prefix
                .clone()
                .unwrap_or_else(|| DEFAULT_CODE_PREFIX.to_string()),
            config.code_length.unwrap_or(DEFAULT_CODE_LENGTH),
            config.max_code_attempts.unwrap_or(DEFAULT_MAX_CODE_ATTEMPTS),
        )
    }

    /// Produces one random code without consulting any store.
    #[must_use]
    pub fn candidate<R: Rng + ?Sized>(&self, rng: &mut R) -> ReservationCode {
        let suffix: String = (0..self.length)
            .map(|_| char::from(CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())]))
            .collect();
        // Prefix and alphabet are both valid code characters
        ReservationCode::from_trusted(format!("{}{suffix}", self.prefix))
    }

    /// Generates a code not yet held by any reservation in `store`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CodeSpaceExhausted`] if every candidate was taken, or
    /// any store error.
    pub fn generate<S: ReservationStore + ?Sized>(&self, store: &S) -> Result<ReservationCode> {
        let mut rng = rand::thread_rng();
        for attempt in 1..=self.max_attempts {
            let code = self.candidate(&mut rng);
            if !store.code_exists(&code)? {
                return Ok(code);
            }
            debug!("booking code {code} already taken (attempt {attempt})");
        }
        Err(Error::CodeSpaceExhausted {
            attempts: self.max_attempts,
        })
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_CODE_PREFIX.to_string(),
            length: DEFAULT_CODE_LENGTH,
            max_attempts: DEFAULT_MAX_CODE_ATTEMPTS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::{create_test_database, insert_test_reservation};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_candidate_shape() {
        let generator = CodeGenerator::new("bk-", 8, 4).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let code = generator.candidate(&mut rng);
            let suffix = code.as_str().strip_prefix("BK-").unwrap();
            assert_eq!(suffix.len(), 8);
            assert!(suffix.bytes().all(|b| CODE_ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn test_invalid_settings_rejected() {
        assert!(CodeGenerator::new("HV-", 0, 4).is_err());
        assert!(CodeGenerator::new("HV-", 6, 0).is_err());
        assert!(CodeGenerator::new("H V", 6, 4).is_err());
    }

    #[test]
    fn test_generate_skips_taken_codes() {
        let db = create_test_database();
        // One-character space with a single free slot left
        let generator = CodeGenerator::new("X", 1, 500).unwrap();
        for c in CODE_ALPHABET.iter().skip(1) {
            insert_test_reservation(&db, &format!("X{}", char::from(*c)));
        }
        let code = generator.generate(db.connection()).unwrap();
        assert_eq!(code.as_str(), "XA");
    }

    #[test]
    fn test_generate_exhausted() {
        let db = create_test_database();
        let generator = CodeGenerator::new("Y", 1, 5).unwrap();
        for c in CODE_ALPHABET {
            insert_test_reservation(&db, &format!("Y{}", char::from(*c)));
        }
        let err = generator.generate(db.connection()).unwrap_err();
        assert!(matches!(err, Error::CodeSpaceExhausted { attempts: 5 }));
        assert!(err.is_retryable());
    }
}
