//! Post-transform vertex cache

const CACHE_SIZE: usize = 16;

/// A tiny direct-mapped cache from input index to emitted-vertex index.
///
/// Keyed by `input_index mod 16`; collisions evict unconditionally. This
/// bounds assembly-time memory and still gets good reuse on locally
/// coherent index streams (strips, fans, consecutive faces).
pub struct VertexCache {
    input: [i32; CACHE_SIZE],
    output: [i32; CACHE_SIZE],
}

impl VertexCache {
    pub fn new() -> VertexCache {
        VertexCache {
            input: [-1; CACHE_SIZE],
            output: [0; CACHE_SIZE],
        }
    }

    pub fn clear(&mut self) {
        self.input = [-1; CACHE_SIZE];
    }

    pub fn insert(&mut self, input_idx: i32, output_idx: i32) {
        debug_assert!(input_idx >= 0);

        let slot = input_idx as usize % CACHE_SIZE;
        self.input[slot] = input_idx;
        self.output[slot] = output_idx;
    }

    pub fn lookup(&self, input_idx: i32) -> Option<i32> {
        debug_assert!(input_idx >= 0);

        let slot = input_idx as usize % CACHE_SIZE;
        if self.input[slot] == input_idx {
            Some(self.output[slot])
        } else {
            None
        }
    }
}
