//! This module contains utility functionality needed for this crate. Most
//! prominently, it contains the definition of the [DigitSet] used for
//! tracking the legal digits of blank cells during solving.

/// A set of Sudoku digits in the range `1..=size`, implemented as a bit
/// vector. This generally has better performance than a `HashSet` and makes
/// the candidate bookkeeping of the solver cheap to copy and restore.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DigitSet {
    size: usize,
    len: usize,
    content: Vec<u64>
}

const BLOCK_BITS: usize = 64;

fn location(digit: usize) -> (usize, u64) {
    let bit = digit - 1;
    (bit / BLOCK_BITS, 1u64 << (bit % BLOCK_BITS))
}

impl DigitSet {

    /// Creates a new digit set that contains no digits. `size` is the highest
    /// digit the set can hold, i.e. the size of the grid in question.
    pub fn empty(size: usize) -> DigitSet {
        let blocks = (size + BLOCK_BITS - 1) / BLOCK_BITS;

        DigitSet {
            size,
            len: 0,
            content: vec![0; blocks]
        }
    }

    /// Creates a new digit set that contains every digit in `1..=size`.
    pub fn full(size: usize) -> DigitSet {
        let mut set = DigitSet::empty(size);

        for digit in 1..=size {
            set.insert(digit);
        }

        set
    }

    /// Indicates whether the given digit is contained in this set. Digits
    /// outside of `1..=size` are never contained.
    pub fn contains(&self, digit: usize) -> bool {
        if digit == 0 || digit > self.size {
            return false;
        }

        let (block, mask) = location(digit);
        self.content[block] & mask != 0
    }

    /// Inserts the given digit into this set. Returns `true` if the set
    /// changed, i.e. the digit is in range and was not yet contained.
    pub fn insert(&mut self, digit: usize) -> bool {
        if digit == 0 || digit > self.size {
            return false;
        }

        let (block, mask) = location(digit);

        if self.content[block] & mask == 0 {
            self.content[block] |= mask;
            self.len += 1;
            true
        }
        else {
            false
        }
    }

    /// Removes the given digit from this set. Returns `true` if the set
    /// changed, i.e. the digit was previously contained.
    pub fn remove(&mut self, digit: usize) -> bool {
        if digit == 0 || digit > self.size {
            return false;
        }

        let (block, mask) = location(digit);

        if self.content[block] & mask != 0 {
            self.content[block] &= !mask;
            self.len -= 1;
            true
        }
        else {
            false
        }
    }

    /// Gets the number of digits contained in this set.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Indicates whether this set contains no digits.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// An iterator over the digits in this set, in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (1..=self.size).filter(move |&digit| self.contains(digit))
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn empty_set_contains_nothing() {
        let set = DigitSet::empty(9);

        assert!(set.is_empty());
        assert_eq!(0, set.len());

        for digit in 0..=10 {
            assert!(!set.contains(digit));
        }
    }

    #[test]
    fn full_set_contains_all_digits_in_range() {
        let set = DigitSet::full(9);

        assert_eq!(9, set.len());
        assert!(!set.contains(0));
        assert!(!set.contains(10));

        for digit in 1..=9 {
            assert!(set.contains(digit));
        }
    }

    #[test]
    fn insert_and_remove_report_changes() {
        let mut set = DigitSet::empty(4);

        assert!(set.insert(3));
        assert!(!set.insert(3));
        assert_eq!(1, set.len());

        assert!(set.remove(3));
        assert!(!set.remove(3));
        assert!(set.is_empty());
    }

    #[test]
    fn out_of_range_digits_are_rejected() {
        let mut set = DigitSet::empty(4);

        assert!(!set.insert(0));
        assert!(!set.insert(5));
        assert!(set.is_empty());
    }

    #[test]
    fn iteration_is_ascending() {
        let mut set = DigitSet::empty(9);
        set.insert(7);
        set.insert(2);
        set.insert(5);

        let digits: Vec<usize> = set.iter().collect();
        assert_eq!(vec![2, 5, 7], digits);
    }

    #[test]
    fn sets_larger_than_one_block_work() {
        let mut set = DigitSet::empty(100);
        set.insert(1);
        set.insert(64);
        set.insert(65);
        set.insert(100);

        assert_eq!(4, set.len());
        assert_eq!(vec![1, 64, 65, 100], set.iter().collect::<Vec<usize>>());
    }
}
