use std::ops::Range;

use crate::error::Error;

// ---------------------------------------------------------------------------
// Segments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// `%s`
    Str,
    /// `%d`
    Int,
    /// `%f`
    Float,
}

impl Conversion {
    fn from_byte(b: u8) -> Option<Self> {
        match b {
            b's' => Some(Conversion::Str),
            b'd' => Some(Conversion::Int),
            b'f' => Some(Conversion::Float),
            _ => None,
        }
    }
}

/// A `%` directive found in a template: `%`, a run of `.`/`0` flags, a conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive<'a> {
    /// Full directive text, e.g. `%.0f`.
    pub text: &'a str,
    /// The flag characters between `%` and the conversion.
    pub flags: &'a str,
    pub conversion: Conversion,
    /// Byte span within the template.
    pub span: Range<usize>,
}

/// Parsed flags. Only `0` digits can follow `.`, so a precision is always zero.
/// Leading `0` flags are accepted but there is no width for them to pad.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    pub precision: Option<usize>,
}

impl Directive<'_> {
    /// Interpret the flag run as `0*` then an optional `.` followed by `0*`.
    pub fn parse_flags(&self) -> Result<Flags, Error> {
        let mut flags = Flags::default();
        let mut rest = self.flags;

        rest = rest.trim_start_matches('0');

        if let Some(after_dot) = rest.strip_prefix('.') {
            flags.precision = Some(0);
            rest = after_dot.trim_start_matches('0');
        }

        if !rest.is_empty() {
            return Err(Error::MalformedDirective {
                directive: self.text.to_string(),
                reason: "precision may only be given once".to_string(),
                span: self.span.clone(),
            });
        }
        Ok(flags)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Literal(&'a str),
    Directive(Directive<'a>),
}

// ---------------------------------------------------------------------------
// Scanner
// ---------------------------------------------------------------------------

/// Split a template into literal text and directives, in order.
///
/// A `%` that does not start a well-formed directive stays in the literal
/// text. Empty literals are never produced.
pub fn scan(template: &str) -> Vec<Segment<'_>> {
    let bytes = template.as_bytes();
    let mut segments = Vec::new();
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'%' {
            i += 1;
            continue;
        }

        let start = i;
        let mut j = i + 1;
        while j < bytes.len() && matches!(bytes[j], b'.' | b'0') {
            j += 1;
        }
        let Some(conversion) = bytes.get(j).copied().and_then(Conversion::from_byte) else {
            // Not a directive; the `%` is literal and scanning resumes right after it.
            i += 1;
            continue;
        };

        if literal_start < start {
            segments.push(Segment::Literal(&template[literal_start..start]));
        }
        let end = j + 1;
        segments.push(Segment::Directive(Directive {
            text: &template[start..end],
            flags: &template[start + 1..j],
            conversion,
            span: start..end,
        }));
        literal_start = end;
        i = end;
    }

    if literal_start < bytes.len() {
        segments.push(Segment::Literal(&template[literal_start..]));
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directives(template: &str) -> Vec<&str> {
        scan(template)
            .into_iter()
            .filter_map(|s| match s {
                Segment::Directive(d) => Some(d.text),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    #[test]
    fn alternates_literals_and_directives() {
        let segments = scan("x=%d y=%s");
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[0], Segment::Literal("x="));
        assert!(matches!(&segments[1], Segment::Directive(d) if d.conversion == Conversion::Int && d.span == (2..4)));
        assert_eq!(segments[2], Segment::Literal(" y="));
        assert!(matches!(&segments[3], Segment::Directive(d) if d.conversion == Conversion::Str));
    }

    #[test]
    fn no_empty_literals() {
        let segments = scan("%s%d");
        assert_eq!(segments.len(), 2);
        assert!(segments.iter().all(|s| matches!(s, Segment::Directive(_))));
        assert!(scan("").is_empty());
    }

    #[test]
    fn flag_runs() {
        assert_eq!(directives("%.2f %05d %.f %0.0f %.s"), vec!["%.f", "%0.0f", "%.s"]);
        assert_eq!(directives("%.0.f"), vec!["%.0.f"]);
    }

    #[test]
    fn width_digits_are_not_directives() {
        assert!(directives("%5d %x %").is_empty());
        assert_eq!(
            scan("%5d"),
            vec![Segment::Literal("%5d")]
        );
    }

    #[test]
    fn percent_percent_is_not_an_escape() {
        let segments = scan("100%%s");
        assert_eq!(segments[0], Segment::Literal("100%"));
        assert!(matches!(&segments[1], Segment::Directive(d) if d.text == "%s" && d.span == (4..6)));
    }

    #[test]
    fn spans_are_byte_offsets() {
        let segments = scan("é%d");
        assert!(matches!(&segments[1], Segment::Directive(d) if d.span == (2..4)));
    }

    #[test]
    fn parse_flags() {
        let flags = |t: &'static str| match &scan(t)[0] {
            Segment::Directive(d) => d.parse_flags(),
            Segment::Literal(_) => panic!("not a directive"),
        };
        assert_eq!(flags("%d").unwrap(), Flags::default());
        assert_eq!(flags("%00d").unwrap(), Flags { precision: None });
        assert_eq!(flags("%0.00f").unwrap(), Flags { precision: Some(0) });
        assert_eq!(flags("%.f").unwrap(), Flags { precision: Some(0) });
        assert!(matches!(
            flags("%.0.f"),
            Err(Error::MalformedDirective { span, .. }) if span == (0..5)
        ));
        assert!(flags("%..s").is_err());
    }
}
