/// A deterministic corpus of `count` lowercase ASCII words, each between 1
/// and 12 bytes long.
///
/// The words come from a fixed linear congruential generator, so every run
/// benchmarks the same input.
pub fn words(count: usize) -> Vec<Vec<u8>> {
    let mut seed: u32 = 0x2545_F491;
    let mut next = move || {
        seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        seed >> 16
    };
    (0..count)
        .map(|_| {
            let len = 1 + (next() % 12) as usize;
            (0..len).map(|_| b'a' + (next() % 26) as u8).collect()
        })
        .collect()
}
