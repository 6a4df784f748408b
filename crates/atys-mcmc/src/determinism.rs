use atys_core::derive_substream_seed;

/// Derives the deterministic seed for the move proposed at an iteration.
pub fn move_seed(master_seed: u64, iteration: usize) -> u64 {
    derive_substream_seed(master_seed, iteration as u64)
}

/// Derives the deterministic master seed for an independent chain.
pub fn chain_seed(master_seed: u64, chain_index: usize) -> u64 {
    derive_substream_seed(master_seed ^ 0xA5A5_A5A5_A5A5_A5A5, chain_index as u64)
}
