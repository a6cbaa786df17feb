use crate::core::{Result, StoreError};
use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

/// A `start:stop:step` selection over a sequence.
///
/// Bounds may be negative (counted from the end) or omitted. Out-of-range
/// bounds are clamped to the sequence, so resolving a slice never fails for
/// bounds alone; only a zero step is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Slice {
    pub start: Option<isize>,
    pub stop: Option<isize>,
    pub step: Option<isize>,
}

/// A slice resolved against a concrete length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Step of one. `start <= end`, both within `0..=len`.
    Contiguous(Range<usize>),
    /// Any other step. Positions are listed in slice order.
    Stepped(Vec<usize>),
}

impl Slice {
    pub fn new(start: isize, stop: isize) -> Self {
        Self {
            start: Some(start),
            stop: Some(stop),
            step: None,
        }
    }

    /// Selects every element.
    pub fn full() -> Self {
        Self::default()
    }

    pub fn starting_at(start: isize) -> Self {
        Self {
            start: Some(start),
            ..Self::default()
        }
    }

    pub fn ending_at(stop: isize) -> Self {
        Self {
            stop: Some(stop),
            ..Self::default()
        }
    }

    pub fn step(mut self, step: isize) -> Self {
        self.step = Some(step);
        self
    }

    /// Clamps the bounds against `len` and returns `(start, stop, step)`.
    pub fn indices(&self, len: usize) -> Result<(isize, isize, isize)> {
        let step = self.step.unwrap_or(1);
        if step == 0 {
            return Err(StoreError::InvalidSlice(
                "slice step cannot be zero".to_string(),
            ));
        }

        let len = len as isize;
        let (lower, upper) = if step > 0 { (0, len) } else { (-1, len - 1) };

        let clamp = |bound: Option<isize>, default: isize| match bound {
            None => default,
            Some(b) if b < 0 => (b + len).max(lower),
            Some(b) => b.min(upper),
        };

        let start = clamp(self.start, if step > 0 { lower } else { upper });
        let stop = clamp(self.stop, if step > 0 { upper } else { lower });
        Ok((start, stop, step))
    }

    pub fn select(&self, len: usize) -> Result<Selection> {
        let (start, stop, step) = self.indices(len)?;

        if step == 1 {
            let start = start as usize;
            let stop = (stop.max(start as isize)) as usize;
            return Ok(Selection::Contiguous(start..stop));
        }

        let mut positions = Vec::new();
        let mut index = start;
        while (step > 0 && index < stop) || (step < 0 && index > stop) {
            positions.push(index as usize);
            match index.checked_add(step) {
                Some(next) => index = next,
                None => break,
            }
        }
        Ok(Selection::Stepped(positions))
    }
}

impl Selection {
    pub fn len(&self) -> usize {
        match self {
            Selection::Contiguous(range) => range.len(),
            Selection::Stepped(positions) => positions.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Selected positions, highest first.
    pub fn descending(&self) -> Vec<usize> {
        match self {
            Selection::Contiguous(range) => range.clone().rev().collect(),
            Selection::Stepped(positions) => {
                let mut sorted = positions.clone();
                sorted.sort_unstable_by(|a, b| b.cmp(a));
                sorted
            }
        }
    }
}

impl From<Range<isize>> for Slice {
    fn from(range: Range<isize>) -> Self {
        Slice::new(range.start, range.end)
    }
}

impl From<RangeFrom<isize>> for Slice {
    fn from(range: RangeFrom<isize>) -> Self {
        Slice::starting_at(range.start)
    }
}

impl From<RangeTo<isize>> for Slice {
    fn from(range: RangeTo<isize>) -> Self {
        Slice::ending_at(range.end)
    }
}

impl From<RangeFull> for Slice {
    fn from(_: RangeFull) -> Self {
        Slice::full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contiguous_selection() {
        assert_eq!(
            Slice::new(1, 4).select(5).unwrap(),
            Selection::Contiguous(1..4)
        );
        assert_eq!(Slice::full().select(3).unwrap(), Selection::Contiguous(0..3));
    }

    #[test]
    fn test_negative_bounds_count_from_end() {
        assert_eq!(
            Slice::new(-3, -1).select(5).unwrap(),
            Selection::Contiguous(2..4)
        );
        assert_eq!(Slice::starting_at(-2).select(5).unwrap(), Selection::Contiguous(3..5));
    }

    #[test]
    fn test_bounds_are_clamped() {
        assert_eq!(
            Slice::new(-10, 10).select(4).unwrap(),
            Selection::Contiguous(0..4)
        );
        // stop before start selects nothing but keeps the insertion point
        assert_eq!(Slice::new(3, 1).select(5).unwrap(), Selection::Contiguous(3..3));
    }

    #[test]
    fn test_stepped_selection() {
        assert_eq!(
            Slice::full().step(2).select(5).unwrap(),
            Selection::Stepped(vec![0, 2, 4])
        );
        assert_eq!(
            Slice::full().step(-1).select(3).unwrap(),
            Selection::Stepped(vec![2, 1, 0])
        );
        assert_eq!(
            Slice::new(4, 0).step(-2).select(5).unwrap(),
            Selection::Stepped(vec![4, 2])
        );
    }

    #[test]
    fn test_extreme_steps_stop_after_first_position() {
        assert_eq!(
            Slice::starting_at(1).step(isize::MAX).select(3).unwrap(),
            Selection::Stepped(vec![1])
        );
        assert_eq!(
            Slice::full().step(isize::MIN).select(3).unwrap(),
            Selection::Stepped(vec![2])
        );
        assert_eq!(
            Slice::full().step(isize::MAX).select(0).unwrap(),
            Selection::Stepped(vec![])
        );
    }

    #[test]
    fn test_zero_step_rejected() {
        let err = Slice::full().step(0).select(3).unwrap_err();
        assert!(matches!(err, StoreError::InvalidSlice(_)));
    }

    #[test]
    fn test_descending_order() {
        let selection = Slice::new(1, 4).select(5).unwrap();
        assert_eq!(selection.descending(), vec![3, 2, 1]);

        let stepped = Slice::full().step(2).select(5).unwrap();
        assert_eq!(stepped.descending(), vec![4, 2, 0]);
    }
}
