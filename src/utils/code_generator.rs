//! Candidate code generation.
//!
//! Candidates are random and roughly uniform; nothing here guarantees
//! uniqueness. That is the allocator's job, with the store's unique
//! constraint as the backstop.

use base64::Engine as _;

/// Length of random bytes before base64 encoding; 6 bytes encode to an
/// 8-character URL-safe code.
const CODE_LENGTH_BYTES: usize = 6;

/// Strategy for producing candidate short codes.
///
/// Kept behind a trait so the allocator can be driven with a deterministic
/// (or deliberately colliding) generator in tests.
#[cfg_attr(test, mockall::automock)]
pub trait CodeGenerator: Send + Sync {
    /// Produces one candidate code.
    fn generate(&self) -> String;
}

/// Default generator: OS entropy encoded as URL-safe base64.
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        generate_code()
    }
}

/// Generates a cryptographically secure random short code.
///
/// Uses `getrandom` for entropy and encodes the result as URL-safe base64
/// without padding, producing an 8-character code.
///
/// # Panics
///
/// Panics if the system random number generator fails (extremely rare).
pub fn generate_code() -> String {
    let mut buffer = [0u8; CODE_LENGTH_BYTES];

    getrandom::fill(&mut buffer).expect("Failed to generate random bytes");

    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer)
}
