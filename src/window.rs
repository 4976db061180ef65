use std::collections::VecDeque;

use crate::number::Number;

/// A fixed-capacity window of distinct numbers, oldest first.
#[derive(Debug, Clone)]
pub struct Window {
    values: VecDeque<Number>,
    capacity: usize,
}

impl Window {
    pub fn new(capacity: usize) -> Self {
        Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn snapshot(&self) -> Vec<Number> {
        self.values.iter().copied().collect()
    }

    /// Add numbers one at a time, in order. A number already in the window is
    /// skipped; otherwise the oldest number makes room for it if the window is
    /// full. Duplicates inside `numbers` collapse into their first occurrence.
    ///
    /// Returns how many numbers were inserted.
    pub fn merge<I>(&mut self, numbers: I) -> usize
    where
        I: IntoIterator<Item = Number>,
    {
        let mut inserted = 0;
        for number in numbers {
            if self.values.contains(&number) {
                continue;
            }
            if self.values.len() >= self.capacity {
                self.values.pop_front();
            }
            self.values.push_back(number);
            inserted += 1;
        }
        inserted
    }

    /// Mean of the window rounded to two decimals, or zero when empty.
    pub fn average(&self) -> Number {
        if self.is_empty() {
            return Number::default();
        }
        let sum: f64 = self.values.iter().map(|v| v.value()).sum();
        Number::new(sum / self.values.len() as f64).round2()
    }
}
