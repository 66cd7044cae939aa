use rand::Rng;

const TOKEN_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const TOKEN_LEN: usize = 24;

/// Tokens shorter than this never reach the database.
pub const MIN_TOKEN_LEN: usize = 20;

/// Generates a 24-character lowercase-alphanumeric token from the thread-local
/// CSPRNG. 36^24 is roughly 124 bits of entropy.
pub fn generate() -> String {
    let mut rng = rand::thread_rng();
    (0..TOKEN_LEN)
        .map(|_| TOKEN_ALPHABET[rng.gen_range(0..TOKEN_ALPHABET.len())] as char)
        .collect()
}

/// Cheap format check performed before any datastore lookup. Expiry is
/// enforced separately, inside the query itself.
pub fn is_valid_format(token: &str) -> bool {
    token.len() >= MIN_TOKEN_LEN
        && token.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
}
