//! Lazy tag/value splitting over a single line.
//!
//! A tag runs up to the next tab; its value runs up to the following tab or
//! the end of the line. A trailing tag without a tab after it has no value
//! and is dropped.

/// One field of the telemetry protocol, borrowed from the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagValue<'a> {
    pub tag: &'a str,
    pub value: &'a str,
}

/// Iterator over the pairs of one line. Cloning restarts from the same
/// position; no state survives past the line.
#[derive(Debug, Clone)]
pub struct TagValuePairs<'a> {
    rest: Option<&'a str>,
}

impl<'a> TagValuePairs<'a> {
    pub fn new(line: &'a str) -> Self {
        Self { rest: Some(line) }
    }
}

impl<'a> Iterator for TagValuePairs<'a> {
    type Item = TagValue<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.rest.take()?;
        let (tag, after_tag) = rest.split_once('\t')?;
        let value = match after_tag.split_once('\t') {
            Some((value, next)) => {
                self.rest = Some(next);
                value
            }
            None => after_tag,
        };
        Some(TagValue { tag, value })
    }
}

impl core::iter::FusedIterator for TagValuePairs<'_> {}

/// Split `line` into its tag/value pairs.
pub fn decode_line(line: &str) -> TagValuePairs<'_> {
    TagValuePairs::new(line)
}
