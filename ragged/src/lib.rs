//! Crate for collections of rows with independent lengths sharing one flat buffer
#![deny(missing_docs)]

use serde::{Deserialize, Serialize};
use std::ops::Index;

/// Errors raised when assembling a `RaggedVec` from raw parts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RaggedError {
    /// The offsets table needs at least the leading zero.
    #[error("offsets table is empty")]
    EmptyOffsets,
    /// The offsets table must start at zero.
    #[error("offsets must start at 0, found {first}")]
    OffsetsDoNotStartAtZero {
        /// The first offset.
        first: usize,
    },
    /// The offsets table must be non-decreasing.
    #[error("offset {offset} at row {row} is smaller than the previous offset {previous}")]
    DecreasingOffset {
        /// Row whose end offset is out of order.
        row: usize,
        /// The out-of-order offset.
        offset: usize,
        /// The preceding offset.
        previous: usize,
    },
    /// The last offset must equal the size of the flat buffer.
    #[error("offsets end at {end} but the data buffer holds {len} elements")]
    LengthMismatch {
        /// The final offset.
        end: usize,
        /// Number of elements in the flat buffer.
        len: usize,
    },
}

/// Read only access to a collection of rows of possibly different lengths.
pub trait RaggedRows {
    /// Element type of every row.
    type Elem;

    /// Number of rows.
    fn num_rows(&self) -> usize;

    /// The elements of row `i`. Panics if `i >= num_rows()`.
    fn row(&self, i: usize) -> &[Self::Elem];

    /// Length of row `i`.
    fn row_len(&self, i: usize) -> usize {
        self.row(i).len()
    }
}

/// Rows stored back to back in one buffer, delimited by an offsets table.
///
/// Row `i` occupies `data[offsets[i]..offsets[i + 1]]`; `offsets` always has
/// `num_rows() + 1` entries and starts at zero.
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
#[serde(
    try_from = "RaggedParts<T>",
    bound(deserialize = "T: Deserialize<'de>")
)]
pub struct RaggedVec<T> {
    data: Vec<T>,
    offsets: Vec<usize>,
}

/// Serialized layout of a `RaggedVec`, checked by `from_parts` on the way in.
#[derive(Deserialize)]
struct RaggedParts<T> {
    data: Vec<T>,
    offsets: Vec<usize>,
}

impl<T> TryFrom<RaggedParts<T>> for RaggedVec<T> {
    type Error = RaggedError;

    fn try_from(parts: RaggedParts<T>) -> Result<Self, RaggedError> {
        RaggedVec::from_parts(parts.data, parts.offsets)
    }
}

impl<T> Default for RaggedVec<T> {
    fn default() -> Self {
        RaggedVec {
            data: Vec::new(),
            offsets: vec![0],
        }
    }
}

impl<T> RaggedVec<T> {
    /// An empty collection with no rows.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and wrap an existing flat buffer and offsets table.
    pub fn from_parts(data: Vec<T>, offsets: Vec<usize>) -> Result<Self, RaggedError> {
        let first = *offsets.first().ok_or(RaggedError::EmptyOffsets)?;
        if first != 0 {
            return Err(RaggedError::OffsetsDoNotStartAtZero { first });
        }
        for (row, w) in offsets.windows(2).enumerate() {
            if w[1] < w[0] {
                return Err(RaggedError::DecreasingOffset {
                    row,
                    offset: w[1],
                    previous: w[0],
                });
            }
        }
        let end = *offsets.last().ok_or(RaggedError::EmptyOffsets)?;
        if end != data.len() {
            return Err(RaggedError::LengthMismatch {
                end,
                len: data.len(),
            });
        }
        Ok(RaggedVec { data, offsets })
    }

    /// Build from a flat buffer and per-row lengths.
    pub fn from_lengths(data: Vec<T>, lengths: &[usize]) -> Result<Self, RaggedError> {
        let mut offsets = Vec::with_capacity(lengths.len() + 1);
        offsets.push(0);
        let mut end = 0;
        for &len in lengths {
            end += len;
            offsets.push(end);
        }
        Self::from_parts(data, offsets)
    }

    /// Append a row at the end.
    pub fn push_row(&mut self, row: impl IntoIterator<Item = T>) {
        self.data.extend(row);
        self.offsets.push(self.data.len());
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    /// True if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of elements across all rows.
    pub fn total_len(&self) -> usize {
        self.data.len()
    }

    /// The flat element buffer.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// The offsets table (`len() + 1` entries).
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Iterator over the per-row lengths.
    pub fn lengths(&self) -> impl ExactSizeIterator<Item = usize> + '_ {
        self.offsets.windows(2).map(|w| w[1] - w[0])
    }

    /// Row `i`, or `None` if out of range.
    pub fn get(&self, i: usize) -> Option<&[T]> {
        if i < self.len() {
            Some(&self.data[self.offsets[i]..self.offsets[i + 1]])
        } else {
            None
        }
    }

    /// Iterator over the rows.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &[T]> + '_ {
        self.offsets
            .windows(2)
            .map(move |w| &self.data[w[0]..w[1]])
    }

    /// Consume the collection, returning the flat buffer and offsets table.
    pub fn into_parts(self) -> (Vec<T>, Vec<usize>) {
        (self.data, self.offsets)
    }
}

impl<T: Clone> RaggedVec<T> {
    /// Copy a sequence of rows into a new collection.
    pub fn from_rows<R: AsRef<[T]>>(rows: impl IntoIterator<Item = R>) -> Self {
        let mut ragged = RaggedVec::new();
        for row in rows {
            ragged.push_row(row.as_ref().iter().cloned());
        }
        ragged
    }

    /// Copy the rows out into owned vectors.
    pub fn to_rows(&self) -> Vec<Vec<T>> {
        self.iter().map(<[T]>::to_vec).collect()
    }
}

impl<T> Index<usize> for RaggedVec<T> {
    type Output = [T];

    fn index(&self, i: usize) -> &[T] {
        &self.data[self.offsets[i]..self.offsets[i + 1]]
    }
}

impl<T> RaggedRows for RaggedVec<T> {
    type Elem = T;

    fn num_rows(&self) -> usize {
        self.len()
    }

    fn row(&self, i: usize) -> &[T] {
        &self[i]
    }

    fn row_len(&self, i: usize) -> usize {
        self.offsets[i + 1] - self.offsets[i]
    }
}

impl<T> RaggedRows for [Vec<T>] {
    type Elem = T;

    fn num_rows(&self) -> usize {
        self.len()
    }

    fn row(&self, i: usize) -> &[T] {
        &self[i]
    }
}

impl<T> RaggedRows for Vec<Vec<T>> {
    type Elem = T;

    fn num_rows(&self) -> usize {
        self.len()
    }

    fn row(&self, i: usize) -> &[T] {
        &self[i]
    }
}

impl<R: RaggedRows + ?Sized> RaggedRows for &R {
    type Elem = R::Elem;

    fn num_rows(&self) -> usize {
        (**self).num_rows()
    }

    fn row(&self, i: usize) -> &[Self::Elem] {
        (**self).row(i)
    }

    fn row_len(&self, i: usize) -> usize {
        (**self).row_len(i)
    }
}
