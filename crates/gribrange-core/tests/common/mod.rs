pub mod range_server;

/// Deterministic archive body for tests.
pub fn body(len: usize) -> Vec<u8> {
    (0u8..251).cycle().take(len).collect()
}
