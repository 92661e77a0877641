use anyhow::Result;
use rand::rngs::{OsRng, StdRng};
use rand::{Rng, SeedableRng, TryRngCore};

const TICKET_CHARACTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub fn generate_random_string(length: usize) -> Result<String> {
    let mut seed = [0u8; 32];
    OsRng.try_fill_bytes(&mut seed)?;
    let mut rng = StdRng::from_seed(seed);

    let s = (0..length)
        .map(|_| {
            let idx = rng.random_range(0..TICKET_CHARACTERS.len());
            TICKET_CHARACTERS[idx] as char
        })
        .collect();

    Ok(s)
}

/// Short, prefixed ticket identifier such as `TKT-7QX2M9AB`.
pub fn generate_ticket_id(prefix: &str) -> Result<String> {
    Ok(format!("{prefix}-{}", generate_random_string(8)?))
}
