use std::borrow::Cow;
use std::cmp::Ordering;
use std::ops::{Add, AddAssign};

use crate::block::align::align;
use crate::block::{Block, height};

/// Fuse `right` onto the right edge of `left`, row by row.
///
/// The shorter operand gains blank rows at the bottom, then `left` is
/// aligned so `right` starts on a straight column. `right` keeps its own
/// ragged right edge.
fn fuse(left: &str, right: &str) -> String {
    let n = height(left);
    let m = height(right);
    let mut left = Cow::Borrowed(left);
    let mut right = Cow::Borrowed(right);
    match n.cmp(&m) {
        Ordering::Greater => right.to_mut().push_str(&"\n".repeat(n - m)),
        Ordering::Less => left.to_mut().push_str(&"\n".repeat(m - n)),
        Ordering::Equal => {}
    }
    if n != m {
        tracing::trace!(left = n, right = m, "equalized block heights");
    }

    let aligned = align(&left);
    let mut out = String::with_capacity(aligned.len() + right.len());
    for (i, (l, r)) in aligned.split('\n').zip(right.split('\n')).enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(l);
        out.push_str(r);
    }
    out
}

impl Block {
    /// Place `rhs` to the right of this block and return the result.
    pub fn concat(&self, rhs: impl AsRef<str>) -> Block {
        Block::new(fuse(&self.text, rhs.as_ref()))
    }

    /// Place `rhs` to the right of this block, storing the result in `self`.
    pub fn concat_in_place(&mut self, rhs: &str) -> &mut Self {
        self.text = fuse(&self.text, rhs);
        self
    }

    /// Build a block from `text` and place `rhs` to its right.
    pub fn reflected_concat(text: impl Into<String>, rhs: &Block) -> Block {
        Block::new(text).concat(rhs)
    }
}

impl<T: AsRef<str>> Add<T> for Block {
    type Output = Block;

    fn add(mut self, rhs: T) -> Block {
        self.concat_in_place(rhs.as_ref());
        self
    }
}

impl<T: AsRef<str>> Add<T> for &Block {
    type Output = Block;

    fn add(self, rhs: T) -> Block {
        self.concat(rhs)
    }
}

impl<T: AsRef<str>> AddAssign<T> for Block {
    fn add_assign(&mut self, rhs: T) {
        self.concat_in_place(rhs.as_ref());
    }
}

impl Add<Block> for &str {
    type Output = Block;

    fn add(self, rhs: Block) -> Block {
        Block::reflected_concat(self, &rhs)
    }
}

impl Add<&Block> for &str {
    type Output = Block;

    fn add(self, rhs: &Block) -> Block {
        Block::reflected_concat(self, rhs)
    }
}
