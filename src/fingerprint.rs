//! Version strings for raw object pools.
//!
//! A terminal that already holds a pool with the same version can skip the transfer.

/// CRC-32 (IEEE) of the whole buffer as 8 upper-case hex digits.
pub fn hash_pool_to_version(buffer: &[u8]) -> String {
    format!("{:08X}", crc32fast::hash(buffer))
}
