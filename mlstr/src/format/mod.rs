pub mod arg;
pub mod directive;

use crate::block::Block;
use crate::error::Error;
use crate::format::arg::FormatArg;
use crate::format::directive::{Segment, scan};

impl Block {
    /// Substitute `%s`, `%d` and `%f` directives with `args`, in order.
    ///
    /// Every literal run and every rendered argument is fused onto the
    /// result with block concatenation, so a multi-row argument stays a
    /// rectangle next to the template text around it. Extra arguments are
    /// ignored.
    pub fn format(&self, args: &[FormatArg]) -> Result<Block, Error> {
        let segments = scan(self.text());
        let directives = segments
            .iter()
            .filter(|s| matches!(s, Segment::Directive(_)))
            .count();
        tracing::debug!(directives, args = args.len(), "formatting block");

        let mut out = Block::default();
        let mut index = 0;
        for segment in &segments {
            match segment {
                Segment::Literal(text) => {
                    out.concat_in_place(text);
                }
                Segment::Directive(directive) => {
                    let arg = args.get(index).ok_or_else(|| Error::ArgumentOutOfRange {
                        index,
                        supplied: args.len(),
                        span: directive.span.clone(),
                    })?;
                    out.concat_in_place(&arg.render(directive)?);
                    index += 1;
                }
            }
        }
        Ok(out)
    }
}
