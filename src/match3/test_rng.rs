//! Scripted random source for cascade tests

use rand::RngCore;

use super::grid::TileKind;

/// Replays a fixed list of `u32` outputs, cycling when it runs out
pub struct ScriptedRng {
    values: Vec<u32>,
    pos: usize,
}

impl ScriptedRng {
    pub fn new(values: Vec<u32>) -> Self {
        assert!(!values.is_empty());
        Self { values, pos: 0 }
    }
}

impl RngCore for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        let value = self.values[self.pos % self.values.len()];
        self.pos += 1;
        value
    }

    fn next_u64(&mut self) -> u64 {
        (u64::from(self.next_u32()) << 32) | u64::from(self.next_u32())
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

/// Raw output that a five-way uniform draw maps to `kind`.
///
/// Integer ranges use a widening multiply: `(x * n) >> 32`. The smallest `x`
/// landing on index `k` is `ceil(k * 2^32 / n)`.
pub fn kind_value(kind: TileKind) -> u32 {
    let n = TileKind::ALL.len() as u64;
    let k = TileKind::ALL.iter().position(|t| *t == kind).unwrap_or(0) as u64;
    ((k * (1u64 << 32) + n - 1) / n) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_value_maps_back() {
        for kind in TileKind::ALL {
            let mut rng = ScriptedRng::new(vec![kind_value(kind)]);
            assert_eq!(TileKind::random(&mut rng), kind);
        }
    }
}
