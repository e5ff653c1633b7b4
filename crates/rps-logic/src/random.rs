//! Seeded pseudo-random number generator
//!
//! Deterministic PRNG so a match can be replayed from its seed.
//! Uses a simple but effective xorshift algorithm, exposed to `rand`
//! through `RngCore` so its distributions can sample from it.

use rand::RngCore;

/// Seeded random number generator
///
/// Deterministic: same seed + stream = same sequence
#[derive(Clone, Debug)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    /// Create a new RNG from a 32-byte seed and a stream index (one per match)
    pub fn new(seed: &[u8; 32], stream: u32) -> Self {
        // Chained so identical chunks don't cancel out
        let mut state = 0u64;
        for chunk in seed.chunks(8) {
            let mut bytes = [0u8; 8];
            bytes[..chunk.len()].copy_from_slice(chunk);
            state = splitmix64(state ^ u64::from_le_bytes(bytes));
        }

        state = splitmix64(state ^ (stream as u64).wrapping_mul(0x517cc1b727220a95));

        // xorshift never leaves zero
        if state == 0 {
            state = 0x9e3779b97f4a7c15;
        }

        let mut rng = Self { state };
        for _ in 0..8 {
            rng.next_u64();
        }

        rng
    }

    /// Create RNG for a specific round within a match
    pub fn for_round(&self, round: u32) -> Self {
        let mut new_state = self.state;
        new_state ^= (round as u64).wrapping_mul(0x9e3779b97f4a7c15);
        if new_state == 0 {
            new_state = 0x517cc1b727220a95;
        }

        let mut rng = Self { state: new_state };
        rng.next_u64();
        rng
    }

    /// Generate next u64
    pub fn next_u64(&mut self) -> u64 {
        // xorshift64*
        self.state ^= self.state >> 12;
        self.state ^= self.state << 25;
        self.state ^= self.state >> 27;
        self.state.wrapping_mul(0x2545f4914f6cdd1d)
    }

    /// Generate next u32
    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }
}

/// splitmix64 finalizer
fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9e3779b97f4a7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

/// Expand a `u64` (e.g. from the command line) into a full 32-byte seed
pub fn expand_seed(seed: u64) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    for (i, chunk) in bytes.chunks_mut(8).enumerate() {
        chunk.copy_from_slice(&splitmix64(seed.wrapping_add(i as u64)).to_le_bytes());
    }
    bytes
}

impl RngCore for SeededRng {
    fn next_u32(&mut self) -> u32 {
        SeededRng::next_u32(self)
    }

    fn next_u64(&mut self) -> u64 {
        SeededRng::next_u64(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = SeededRng::next_u64(self).to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
