use regex::RegexBuilder;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PatternError {
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// A structural precondition over the harness text.
///
/// Patterns are compiled with dot-matches-newline semantics so a single lazy
/// quantifier can bound a match to the smallest enclosing construct (e.g. the
/// shortest text from a known declaration to its closing delimiter). The
/// matching strategy lives entirely behind this type; patch definitions only
/// see [`Pattern::find`] and [`Pattern::is_match`].
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: regex::Regex,
}

impl Pattern {
    /// Compile a pattern.
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let regex = RegexBuilder::new(pattern)
            .dot_matches_new_line(true)
            .build()?;
        Ok(Self { regex })
    }

    /// Find the first leftmost match with its capture groups.
    ///
    /// Absence is not an error at this layer; the applier decides what a
    /// `None` means for the patch.
    pub fn find<'t>(&self, buffer: &'t str) -> Option<StructuralMatch<'t>> {
        self.regex
            .captures(buffer)
            .map(|captures| StructuralMatch { captures })
    }

    /// Check for presence without materializing a match.
    pub fn is_match(&self, buffer: &str) -> bool {
        self.regex.is_match(buffer)
    }

    /// The source text of the pattern.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

/// One match of a [`Pattern`]: the full byte span plus capture groups.
#[derive(Debug)]
pub struct StructuralMatch<'t> {
    captures: regex::Captures<'t>,
}

impl<'t> StructuralMatch<'t> {
    /// Starting byte offset of the whole match (inclusive).
    pub fn byte_start(&self) -> usize {
        self.whole().start()
    }

    /// Ending byte offset of the whole match (exclusive).
    pub fn byte_end(&self) -> usize {
        self.whole().end()
    }

    /// The matched text.
    pub fn text(&self) -> &'t str {
        self.whole().as_str()
    }

    /// Text captured by a positional group, if it participated in the match.
    pub fn group(&self, index: usize) -> Option<&'t str> {
        self.captures.get(index).map(|m| m.as_str())
    }

    /// Expand a replacement template, substituting `$1`/`${1}` group
    /// back-references with the captured text. A literal dollar is `$$`.
    pub fn expand(&self, template: &str) -> String {
        let mut expanded = String::with_capacity(template.len());
        self.captures.expand(template, &mut expanded);
        expanded
    }

    fn whole(&self) -> regex::Match<'t> {
        self.captures.get(0).expect("group 0 always participates")
    }
}
