//! Fixed-capacity history ring for the rolling chart
//!
//! Each display channel (temperature, humidity, sound) keeps the last
//! [`HISTORY_LEN`] samples for the line chart. The buffer is a ring with a
//! fixed size chosen at compile time: pushing onto a full buffer evicts the
//! oldest sample, iteration always runs oldest to newest, and there is no
//! heap allocation.
//!
//! Insertion order is the only meaningful order here. History feeds the
//! chart and nothing else - classification always works on the freshly
//! sampled value.
//!
//! ```rust
//! use envsense_core::buffer::HistoryBuffer;
//!
//! let mut history: HistoryBuffer<50> = HistoryBuffer::new();
//! history.push(22.5);
//! history.push(22.7);
//!
//! assert_eq!(history.last(), Some(22.7));
//! assert_eq!(history.min(), Some(22.5));
//! ```

/// Samples kept per display channel
pub const HISTORY_LEN: usize = 50;

/// Ring buffer of `f32` samples with oldest-first iteration
///
/// Invariants: `write_pos < N` and `len <= N`. When full, `write_pos` points
/// at the oldest sample, which is the one the next push replaces.
#[derive(Clone, Debug)]
pub struct HistoryBuffer<const N: usize> {
    data: [f32; N],
    write_pos: usize,
    len: usize,
}

impl<const N: usize> HistoryBuffer<N> {
    /// Creates an empty buffer; usable in const contexts
    pub const fn new() -> Self {
        Self {
            data: [0.0; N],
            write_pos: 0,
            len: 0,
        }
    }

    /// Appends a sample, evicting the oldest when full
    pub fn push(&mut self, sample: f32) {
        self.data[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % N;

        if self.len < N {
            self.len += 1;
        }
    }

    /// Number of stored samples
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when no sample has been pushed yet
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True once capacity is reached
    pub fn is_full(&self) -> bool {
        self.len == N
    }

    /// Most recently pushed sample
    pub fn last(&self) -> Option<f32> {
        if self.is_empty() {
            return None;
        }

        let idx = if self.write_pos == 0 { N - 1 } else { self.write_pos - 1 };
        Some(self.data[idx])
    }

    /// Smallest sample in the window
    pub fn min(&self) -> Option<f32> {
        self.iter().reduce(f32::min)
    }

    /// Largest sample in the window
    pub fn max(&self) -> Option<f32> {
        self.iter().reduce(f32::max)
    }

    /// Iterate from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        (0..self.len).filter_map(move |i| self.get(i))
    }

    /// Drop all samples
    pub fn clear(&mut self) {
        self.write_pos = 0;
        self.len = 0;
    }

    /// Sample by logical index (0 = oldest, len-1 = newest)
    ///
    /// While the buffer is filling, logical and physical indices match.
    /// Once full, the oldest sample sits at `write_pos` and the index is
    /// rotated from there.
    pub fn get(&self, index: usize) -> Option<f32> {
        if index >= self.len {
            return None;
        }

        let actual_index = if self.len < N {
            index
        } else {
            (self.write_pos + index) % N
        };

        Some(self.data[actual_index])
    }
}

impl<const N: usize> Default for HistoryBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_buffer() {
        let buffer: HistoryBuffer<5> = HistoryBuffer::new();
        assert!(buffer.is_empty());
        assert_eq!(buffer.len(), 0);
        assert!(buffer.last().is_none());
        assert!(buffer.min().is_none());
    }

    #[test]
    fn push_and_retrieve() {
        let mut buffer = HistoryBuffer::<5>::new();

        buffer.push(25.0);
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.last(), Some(25.0));
    }

    #[test]
    fn capacity_never_exceeded() {
        let mut buffer = HistoryBuffer::<50>::new();

        for i in 0..51 {
            buffer.push(i as f32);
        }

        // 51 pushes into capacity 50: the very first sample is gone and
        // the remaining 50 keep their insertion order.
        assert_eq!(buffer.len(), 50);
        let values: Vec<f32> = buffer.iter().collect();
        assert_eq!(values[0], 1.0);
        assert_eq!(values[49], 50.0);
        for w in values.windows(2) {
            assert_eq!(w[1] - w[0], 1.0);
        }
    }

    #[test]
    fn iterator_order_after_wrap() {
        let mut buffer = HistoryBuffer::<3>::new();

        for i in 0..5 {
            buffer.push(i as f32);
        }

        let values: Vec<f32> = buffer.iter().collect();
        assert_eq!(values, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn window_min_max() {
        let mut buffer = HistoryBuffer::<4>::new();
        for v in [3.0, -1.0, 7.5, 2.0] {
            buffer.push(v);
        }

        assert_eq!(buffer.min(), Some(-1.0));
        assert_eq!(buffer.max(), Some(7.5));

        // Evict the -1.0 and the window minimum moves
        buffer.push(4.0);
        assert_eq!(buffer.min(), Some(2.0));
    }
}
