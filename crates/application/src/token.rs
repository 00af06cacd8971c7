use data_encoding::HEXLOWER;
use domain::TokenKey;
use rand::RngCore;

/// Source of fresh token keys. Pulled out behind a trait so tests can issue
/// predictable keys.
pub trait TokenGenerator: Send + Sync {
    fn generate(&self) -> TokenKey;
}

/// 20 random bytes, hex-encoded: 40 lowercase hex characters.
#[derive(Debug, Default)]
pub struct RandomTokenGenerator;

impl TokenGenerator for RandomTokenGenerator {
    fn generate(&self) -> TokenKey {
        let mut bytes = [0u8; 20];
        rand::rng().fill_bytes(&mut bytes);
        let key = HEXLOWER.encode(&bytes);
        // 40 hex chars by construction, so parse cannot fail
        TokenKey::parse(key).expect("generated key is valid hex")
    }
}
