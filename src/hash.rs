//! Shard-selection hashing.
//!
//! Devices are routed to workers by hashing the device id, so the mapping is
//! a pure function of the id bytes and the worker count, never of arrival
//! order. MurmurHash3 (32-bit, seed 0) avalanches well over short ASCII
//! keys; a collision between two devices on one shard only skews load
//! balance, never correctness.

/// MurmurHash3, 32-bit variant.
///
/// Processes the input as little-endian 4-byte blocks, folds the tail in,
/// and finishes with the avalanche mix.
#[must_use]
pub fn murmur3_32(data: &[u8], seed: u32) -> u32 {
    const C1: u32 = 0xcc9e_2d51;
    const C2: u32 = 0x1b87_3593;

    let mut h1 = seed;
    let mut blocks = data.chunks_exact(4);

    for block in &mut blocks {
        let mut k1 = u32::from_le_bytes([block[0], block[1], block[2], block[3]]);
        k1 = k1.wrapping_mul(C1);
        k1 = k1.rotate_left(15);
        k1 = k1.wrapping_mul(C2);
        h1 ^= k1;
        h1 = h1.rotate_left(13);
        h1 = h1.wrapping_mul(5).wrapping_add(0xe654_6b64);
    }

    let tail = blocks.remainder();
    if !tail.is_empty() {
        let mut k1 = 0u32;
        for (i, &byte) in tail.iter().enumerate() {
            k1 ^= u32::from(byte) << (8 * i);
        }
        k1 = k1.wrapping_mul(C1);
        k1 = k1.rotate_left(15);
        k1 = k1.wrapping_mul(C2);
        h1 ^= k1;
    }

    h1 ^= data.len() as u32;
    fmix32(h1)
}

/// Final avalanche step.
fn fmix32(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    h
}

/// Shard (worker) index for a device id.
///
/// Every observation for a fixed device id lands on the same worker for the
/// duration of a run: the index depends only on the id bytes and
/// `worker_count`.
#[must_use]
pub fn shard_index(device_id: &str, worker_count: usize) -> usize {
    murmur3_32(device_id.as_bytes(), 0) as usize % worker_count.max(1)
}
