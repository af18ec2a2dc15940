//! Rolling per-stream sample history.

use std::collections::VecDeque;

use crate::data::samples::SampleBlock;

/// The most recent rows of one probed stream, capped at `capacity` rows.
#[derive(Clone, Debug)]
pub struct StreamBuffer {
    capacity: usize,
    start_step: u64,
    step_size: f64,
    dims: usize,
    rows: VecDeque<Vec<f64>>,
}

impl StreamBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            start_step: 0,
            step_size: 0.0,
            dims: 0,
            rows: VecDeque::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Step of the oldest buffered row.
    pub fn start_step(&self) -> u64 {
        self.start_step
    }

    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    /// Step following the newest buffered row.
    pub fn end_step(&self) -> u64 {
        self.start_step + self.rows.len() as u64
    }

    /// Append a batch. A batch that does not continue the buffered steps, or
    /// changes shape or step size, restarts the history.
    pub fn push(&mut self, start_step: u64, step_size: f64, data: &SampleBlock) {
        let continues = !self.rows.is_empty()
            && start_step == self.end_step()
            && data.dimensions() == self.dims
            && step_size == self.step_size;
        if !continues {
            if !self.rows.is_empty() {
                log::debug!(
                    "stream restarted at step {} (buffered {}..{})",
                    start_step,
                    self.start_step,
                    self.end_step()
                );
            }
            self.rows.clear();
            self.start_step = start_step;
            self.step_size = step_size;
            self.dims = data.dimensions();
        }
        self.rows
            .extend((0..data.samples()).filter_map(|r| data.row(r)).map(<[f64]>::to_vec));
        while self.rows.len() > self.capacity {
            self.rows.pop_front();
            self.start_step += 1;
        }
    }

    /// The last `max_rows` rows with the step of the first one.
    pub fn window(&self, max_rows: usize) -> (u64, SampleBlock) {
        let n = self.rows.len().min(max_rows);
        let skip = self.rows.len() - n;
        let mut values = Vec::with_capacity(n * self.dims);
        for row in self.rows.iter().skip(skip) {
            values.extend_from_slice(row);
        }
        let block = SampleBlock::new(n, self.dims, values)
            .unwrap_or_else(|_| SampleBlock::zeros(0, self.dims));
        (self.start_step + skip as u64, block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(rows: &[[f64; 2]]) -> SampleBlock {
        SampleBlock::from_rows(rows).unwrap()
    }

    #[test]
    fn contiguous_batches_accumulate_and_cap() {
        let mut buf = StreamBuffer::new(3);
        buf.push(0, 0.1, &block(&[[0.0, 0.0], [1.0, 1.0]]));
        buf.push(2, 0.1, &block(&[[2.0, 2.0], [3.0, 3.0]]));
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.start_step(), 1);
        let (start, w) = buf.window(2);
        assert_eq!(start, 2);
        assert_eq!(w.column(0).collect::<Vec<_>>(), vec![2.0, 3.0]);
    }

    #[test]
    fn gap_restarts_history() {
        let mut buf = StreamBuffer::new(10);
        buf.push(0, 0.1, &block(&[[0.0, 0.0]]));
        buf.push(5, 0.1, &block(&[[5.0, 5.0]]));
        assert_eq!(buf.len(), 1);
        assert_eq!(buf.start_step(), 5);
    }
}
