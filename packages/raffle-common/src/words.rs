use cosmwasm_std::Uint256;
use sha2::{Digest, Sha256};

/// Derive the `index`-th random word of a request from beacon randomness.
///
/// `word = sha256( randomness || request_id_u64_be || index_u32_be )`,
/// read as a big-endian 256-bit unsigned integer.
pub fn derive_random_word(randomness: &[u8], request_id: u64, index: u32) -> Uint256 {
    let mut hasher = Sha256::new();
    hasher.update(randomness);
    hasher.update(request_id.to_be_bytes());
    hasher.update(index.to_be_bytes());
    let digest: [u8; 32] = hasher.finalize().into();
    Uint256::from_be_bytes(digest)
}

/// Expand one beacon output into `num_words` independent words for a request.
pub fn expand_random_words(randomness: &[u8], request_id: u64, num_words: u32) -> Vec<Uint256> {
    (0..num_words)
        .map(|i| derive_random_word(randomness, request_id, i))
        .collect()
}
