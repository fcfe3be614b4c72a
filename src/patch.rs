use crate::matcher::{Pattern, PatternError};
use std::fmt;

/// Detects whether a patch's effect is already present in the buffer.
///
/// Checked strictly before the precondition: a successfully patched buffer may
/// still match the precondition redundantly, and the guard is what keeps a
/// second run from stacking the replacement.
#[derive(Debug, Clone)]
pub enum Guard {
    /// A literal marker unique to the already-patched state.
    Substring(String),
    /// A secondary pattern matching only the already-patched state.
    Pattern(Pattern),
}

impl Guard {
    pub fn substring(marker: impl Into<String>) -> Self {
        Guard::Substring(marker.into())
    }

    pub fn pattern(pattern: &str) -> Result<Self, PatternError> {
        Ok(Guard::Pattern(Pattern::new(pattern)?))
    }

    pub fn is_satisfied(&self, buffer: &str) -> bool {
        match self {
            Guard::Substring(marker) => buffer.contains(marker.as_str()),
            Guard::Pattern(pattern) => pattern.is_match(buffer),
        }
    }
}

/// Terminal outcome of attempting one patch against the current buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "PatchOutcome should be recorded for the run verdict"]
pub enum PatchOutcome {
    /// Precondition matched and the replacement was spliced in.
    Applied,
    /// Guard was satisfied; buffer untouched.
    AlreadyPresent,
    /// Precondition absent; buffer untouched. Non-fatal: the run continues.
    PreconditionNotFound,
}

impl fmt::Display for PatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchOutcome::Applied => write!(f, "applied"),
            PatchOutcome::AlreadyPresent => write!(f, "already present"),
            PatchOutcome::PreconditionNotFound => write!(f, "precondition not found"),
        }
    }
}

/// One named, atomic text modification.
///
/// The replacement is a template; `$1`/`${1}` reference the precondition's
/// capture groups positionally.
#[derive(Debug, Clone)]
pub struct Patch {
    pub name: String,
    pub precondition: Pattern,
    pub guard: Guard,
    pub replacement: String,
}

impl Patch {
    pub fn new(
        name: impl Into<String>,
        precondition: &str,
        guard: Guard,
        replacement: impl Into<String>,
    ) -> Result<Self, PatternError> {
        Ok(Self {
            name: name.into(),
            precondition: Pattern::new(precondition)?,
            guard,
            replacement: replacement.into(),
        })
    }

    /// Drive this patch through its state machine against the current buffer.
    ///
    /// 1. Guard satisfied: `AlreadyPresent`, buffer unchanged.
    /// 2. Precondition absent: `PreconditionNotFound`, buffer unchanged.
    /// 3. Otherwise: expand the template with the captured groups, replace the
    ///    matched span, `Applied`.
    pub fn apply(&self, buffer: &mut String) -> PatchOutcome {
        if self.guard.is_satisfied(buffer) {
            return PatchOutcome::AlreadyPresent;
        }

        let (byte_start, byte_end, expanded) = match self.precondition.find(buffer.as_str()) {
            Some(m) => (m.byte_start(), m.byte_end(), m.expand(&self.replacement)),
            None => return PatchOutcome::PreconditionNotFound,
        };

        buffer.replace_range(byte_start..byte_end, &expanded);
        PatchOutcome::Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert_after_import() -> Patch {
        Patch::new(
            "extra-import",
            r"(import base;)",
            Guard::substring("import extra;"),
            "${1}\nimport extra;",
        )
        .unwrap()
    }

    #[test]
    fn applies_and_splices_replacement() {
        let patch = insert_after_import();
        let mut buffer = String::from("import base;\nlet x = 1;");

        let outcome = patch.apply(&mut buffer);

        assert_eq!(outcome, PatchOutcome::Applied);
        assert_eq!(buffer, "import base;\nimport extra;\nlet x = 1;");
    }

    #[test]
    fn guard_checked_before_precondition() {
        // The precondition still matches, but the guard marker is present, so
        // the patch must not stack a second copy.
        let patch = insert_after_import();
        let mut buffer = String::from("import base;\nimport extra;\nlet x = 1;");

        let outcome = patch.apply(&mut buffer);

        assert_eq!(outcome, PatchOutcome::AlreadyPresent);
        assert_eq!(buffer, "import base;\nimport extra;\nlet x = 1;");
    }

    #[test]
    fn missing_precondition_leaves_buffer_untouched() {
        let patch = insert_after_import();
        let mut buffer = String::from("let x = 1;");

        let outcome = patch.apply(&mut buffer);

        assert_eq!(outcome, PatchOutcome::PreconditionNotFound);
        assert_eq!(buffer, "let x = 1;");
    }

    #[test]
    fn pattern_guard_scopes_marker_to_construct() {
        let patch = Patch::new(
            "branch-ctor",
            r"function build\(\) \{[\s\S]*?\}",
            Guard::pattern(r"function build\(\) \{[\s\S]*?mode === alt").unwrap(),
            "function build() {\n  if (mode === alt) { return alt(); }\n  return base();\n}",
        )
        .unwrap();

        // The marker text exists elsewhere in the file, but not inside the
        // constructor, so the patch still applies.
        let mut buffer =
            String::from("// mode === alt is handled below\nfunction build() {\n  return base();\n}");
        assert_eq!(patch.apply(&mut buffer), PatchOutcome::Applied);
        assert!(buffer.contains("if (mode === alt)"));

        assert_eq!(patch.apply(&mut buffer), PatchOutcome::AlreadyPresent);
    }

    #[test]
    fn whole_match_replaced_without_captures() {
        let patch = Patch::new(
            "rewrite-block",
            r"let PATH = old;[\s\S]*?\}",
            Guard::substring("NEW_PATH"),
            "let PATH = old;\nlet NEW_PATH = alt;",
        )
        .unwrap();

        let mut buffer = String::from("let PATH = old;\nif (x) {\n  PATH = other;\n}\nrest");
        assert_eq!(patch.apply(&mut buffer), PatchOutcome::Applied);
        assert_eq!(buffer, "let PATH = old;\nlet NEW_PATH = alt;\nrest");
    }
}
