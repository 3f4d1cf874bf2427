// src/model/attribute_set.rs
use std::fmt;

/// A subset of a schema's attributes, encoded as a fixed-width bitset.
///
/// Bit `i` is set iff attribute `i` of the owning [`Schema`](crate::model::Schema)
/// is part of the subset. Two sets with identical bits are the same subset,
/// regardless of how they were built. Ordering is by integer bitset value,
/// which gives the deterministic iteration order the selection engine
/// relies on.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttributeSet {
    bits: u64,
    width: u8,
}

impl AttributeSet {
    /// The empty subset over a universe of `width` attributes.
    ///
    /// Panics if `width > 64` (the bitset is a `u64`).
    pub fn empty(width: usize) -> Self {
        assert!(width <= 64, "attribute universe too large: {width} > 64");
        Self {
            bits: 0,
            width: width as u8,
        }
    }

    /// The full subset: every attribute in the universe.
    pub fn universe(width: usize) -> Self {
        let mut set = Self::empty(width);
        set.bits = if width == 64 {
            u64::MAX
        } else {
            (1u64 << width) - 1
        };
        set
    }

    /// Build a subset from explicit attribute indices.
    ///
    /// Panics if any index is outside `0..width`; a set referencing an
    /// attribute outside the schema's universe is a programming error.
    pub fn from_indices(width: usize, indices: &[usize]) -> Self {
        let mut set = Self::empty(width);
        for &index in indices {
            set.set(index);
        }
        set
    }

    /// Reconstruct a subset from its raw bitset value.
    ///
    /// Panics if `bits` has bits set outside `0..width`.
    pub fn from_bits(width: usize, bits: u64) -> Self {
        let universe = Self::universe(width);
        assert!(
            bits & !universe.bits == 0,
            "bitset {bits:#x} out of range for universe of {width} attributes"
        );
        Self {
            bits,
            width: width as u8,
        }
    }

    /// Set the bit for an attribute index. Panics if out of the universe.
    pub fn set(&mut self, index: usize) {
        assert!(
            index < self.width as usize,
            "attribute index {index} out of range for universe of {} attributes",
            self.width
        );
        self.bits |= 1u64 << index;
    }

    /// Clear the bit for an attribute index. Panics if out of the universe.
    pub fn clear(&mut self, index: usize) {
        assert!(
            index < self.width as usize,
            "attribute index {index} out of range for universe of {} attributes",
            self.width
        );
        self.bits &= !(1u64 << index);
    }

    /// Whether the attribute at `index` is in this subset.
    pub fn contains(&self, index: usize) -> bool {
        index < self.width as usize && self.bits & (1u64 << index) != 0
    }

    /// Number of attributes in the subset.
    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Width of the underlying universe.
    pub fn width(&self) -> usize {
        self.width as usize
    }

    /// Raw bitset value; stable identity of the subset within a schema.
    pub fn bits(&self) -> u64 {
        self.bits
    }

    /// `self ⊆ other`.
    pub fn is_subset_of(&self, other: &AttributeSet) -> bool {
        self.bits & !other.bits == 0
    }

    /// `self ⊇ other`.
    pub fn is_superset_of(&self, other: &AttributeSet) -> bool {
        other.is_subset_of(self)
    }

    pub fn intersect(&self, other: &AttributeSet) -> AttributeSet {
        AttributeSet {
            bits: self.bits & other.bits,
            width: self.width,
        }
    }

    pub fn union(&self, other: &AttributeSet) -> AttributeSet {
        AttributeSet {
            bits: self.bits | other.bits,
            width: self.width,
        }
    }

    /// Attribute indices in the subset, ascending.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.width as usize).filter(|&i| self.bits & (1u64 << i) != 0)
    }
}

impl fmt::Debug for AttributeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AttributeSet({:#b}/{})", self.bits, self.width)
    }
}
