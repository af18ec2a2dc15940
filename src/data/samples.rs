//! Row-major block of simulator samples, shaped `(samples × dimensions)`.

use crate::error::PlotError;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SampleBlock {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl SampleBlock {
    pub fn new(rows: usize, cols: usize, values: Vec<f64>) -> Result<Self, PlotError> {
        if values.len() != rows * cols {
            return Err(PlotError::Shape {
                expected: rows * cols,
                found: values.len(),
            });
        }
        Ok(Self { rows, cols, values })
    }

    /// Build from per-sample rows; every row must have the same length.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, PlotError> {
        let cols = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        let mut values = Vec::with_capacity(rows.len() * cols);
        for r in rows {
            let r = r.as_ref();
            if r.len() != cols {
                return Err(PlotError::Shape {
                    expected: cols,
                    found: r.len(),
                });
            }
            values.extend_from_slice(r);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            values,
        })
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            values: vec![0.0; rows * cols],
        }
    }

    /// `(samples, dimensions)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn samples(&self) -> usize {
        self.rows
    }

    pub fn dimensions(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.values[row * self.cols + col])
        } else {
            None
        }
    }

    pub fn set(&mut self, row: usize, col: usize, v: f64) {
        if row < self.rows && col < self.cols {
            self.values[row * self.cols + col] = v;
        }
    }

    pub fn row(&self, row: usize) -> Option<&[f64]> {
        if row < self.rows {
            let start = row * self.cols;
            Some(&self.values[start..start + self.cols])
        } else {
            None
        }
    }

    /// Values of dimension `col`, one per sample. Empty when `col` is out of range.
    pub fn column(&self, col: usize) -> impl Iterator<Item = f64> + '_ {
        let take = if col < self.cols { self.rows } else { 0 };
        self.values
            .iter()
            .skip(col)
            .step_by(self.cols.max(1))
            .take(take)
            .copied()
    }
}

/// `n` evenly spaced points over `[start, end]`, both ends included.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_walks_rows() {
        let b = SampleBlock::from_rows(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]).unwrap();
        assert_eq!(b.shape(), (3, 2));
        assert_eq!(b.column(1).collect::<Vec<_>>(), vec![2.0, 4.0, 6.0]);
        assert_eq!(b.row(2), Some(&[5.0, 6.0][..]));
        assert_eq!(b.get(3, 0), None);
    }

    #[test]
    fn out_of_range_row_and_column_are_empty() {
        let b = SampleBlock::from_rows(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]).unwrap();
        assert_eq!(b.column(2).count(), 0);
        assert_eq!(b.column(3).count(), 0);
        assert_eq!(b.row(3), None);
    }

    #[test]
    fn ragged_rows_rejected() {
        let rows: Vec<Vec<f64>> = vec![vec![1.0, 2.0], vec![3.0]];
        assert!(SampleBlock::from_rows(&rows).is_err());
        assert!(SampleBlock::new(2, 2, vec![0.0; 3]).is_err());
    }

    #[test]
    fn linspace_includes_both_ends() {
        assert_eq!(linspace(0.0, 1.0, 3), vec![0.0, 0.5, 1.0]);
        assert_eq!(linspace(2.0, 5.0, 1), vec![2.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }
}
