pub mod align;
mod concat;

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// A multi-line text value laid out as a grid of rows.
///
/// Rows are delimited by `\n` and may differ in width; widths are only
/// equalized while a block is being concatenated with another one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Block {
    text: String,
}

impl Block {
    /// Wrap `text` as a block. No alignment is applied.
    pub fn new(text: impl Into<String>) -> Self {
        Block { text: text.into() }
    }

    /// The underlying text.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    /// Number of rows. Always at least 1, the empty text being one empty row.
    pub fn height(&self) -> usize {
        height(&self.text)
    }

    /// Width of the widest row.
    pub fn width(&self) -> usize {
        align::width(&self.text)
    }

    pub fn rows(&self) -> std::str::Split<'_, char> {
        self.text.split('\n')
    }

    /// Split into rows. Only `"\n"` is accepted as a separator.
    pub fn split(&self, sep: &str) -> Result<Vec<&str>, Error> {
        if sep != "\n" {
            return Err(Error::UnsupportedSeparator(sep.to_string()));
        }
        Ok(self.rows().collect())
    }

    /// Join `items` with this block as the separator, fusing every step
    /// with block concatenation.
    pub fn join<I>(&self, items: I) -> Block
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut joined = Block::default();
        let mut count = 0usize;
        for item in items {
            if count > 0 {
                joined.concat_in_place(&self.text);
            }
            joined.concat_in_place(item.as_ref());
            count += 1;
        }
        tracing::debug!(items = count, height = joined.height(), "joined blocks");
        joined
    }
}

pub(crate) fn height(text: &str) -> usize {
    text.matches('\n').count() + 1
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for Block {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl From<&str> for Block {
    fn from(text: &str) -> Self {
        Block::new(text)
    }
}

impl From<String> for Block {
    fn from(text: String) -> Self {
        Block::new(text)
    }
}

impl From<Block> for String {
    fn from(block: Block) -> Self {
        block.text
    }
}

impl FromStr for Block {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Block::new(s))
    }
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;

    #[test]
    fn height_counts_rows() {
        assert_eq!(Block::default().height(), 1);
        assert_eq!(Block::new("a\nb\n").height(), 3);
        assert_eq!(Block::new("\n\n").height(), 3);
    }

    #[test]
    fn construction_does_not_align() {
        let block = Block::new("a\nbbb");
        assert_eq!(block.text(), "a\nbbb");
        assert_eq!(block.width(), 3);
    }

    #[test]
    fn split_rejects_other_separators() {
        let block = Block::new("a,b\nc");
        assert_eq!(block.split("\n").unwrap(), vec!["a,b", "c"]);
        assert_eq!(
            block.split(","),
            Err(Error::UnsupportedSeparator(",".to_string()))
        );
        assert!(block.split("").is_err());
        assert!(block.split("\r\n").is_err());
    }

    #[traced_test]
    #[test]
    fn join_logs_item_count() {
        let joined = Block::new("|").join(["a", "b", "c"]);
        assert_eq!(joined.text(), "a|b|c");
        assert!(logs_contain("joined blocks"));
        assert!(logs_contain("items=3"));
    }
}
