use std::fmt;

/// Grammar tree handed to the speech-recognition engine.
///
/// Four node kinds cover everything the engine needs: bounded repetition,
/// optional groups, alternative choices, and phrase sets with an optional
/// semantic binding. Matching a phrase never yields the spoken wording;
/// the engine reports the bound semantic label instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarNode {
    /// Bounded repetition of an ordered child sequence.
    ///
    /// Children must match in declaration order, and the whole sequence may
    /// repeat between `min` and `max` times. A `[1, 1]` container is a plain
    /// sequence group.
    Repeat {
        /// Minimum number of repetitions.
        min: u32,
        /// Maximum number of repetitions.
        max: u32,
        /// Ordered children; all must match, in order, per repetition.
        children: Vec<GrammarNode>,
    },

    /// A `[0, 1]` group: the child may match once or be skipped entirely.
    Optional {
        /// The wrapped node.
        child: Box<GrammarNode>,
    },

    /// Exactly one of the alternatives must match.
    Choice {
        /// Alternatives in declaration order. Order matters where the
        /// engine resolves overlapping phrases by precedence.
        alternatives: Vec<GrammarNode>,
    },

    /// A set of interchangeable spoken phrases.
    Phrases {
        /// Spoken-word phrases that all mean the same thing.
        phrases: Vec<String>,
        /// Semantic label the engine reports when any phrase matches.
        /// `None` for decorative slots (prefixes/affixes) that emit nothing.
        semantic: Option<String>,
    },
}

impl GrammarNode {
    /// Repeat container over an ordered child sequence.
    #[must_use]
    pub const fn repeat(min: u32, max: u32, children: Vec<Self>) -> Self {
        Self::Repeat { min, max, children }
    }

    /// Plain `[1, 1]` sequence group.
    #[must_use]
    pub const fn sequence(children: Vec<Self>) -> Self {
        Self::Repeat {
            min: 1,
            max: 1,
            children,
        }
    }

    /// Optional (`[0, 1]`) wrapper around `child`.
    #[must_use]
    pub fn optional(child: Self) -> Self {
        Self::Optional {
            child: Box::new(child),
        }
    }

    /// Choice over `alternatives`.
    #[must_use]
    pub const fn choice(alternatives: Vec<Self>) -> Self {
        Self::Choice { alternatives }
    }

    /// Untagged phrase set. Matching one of `phrases` emits nothing.
    #[must_use]
    pub const fn phrases(phrases: Vec<String>) -> Self {
        Self::Phrases {
            phrases,
            semantic: None,
        }
    }

    /// Phrase set bound to a semantic label. Matching any of `phrases`
    /// yields exactly `semantic`, never the matched phrase text.
    #[must_use]
    pub fn tagged_phrases(phrases: Vec<String>, semantic: impl Into<String>) -> Self {
        Self::Phrases {
            phrases,
            semantic: Some(semantic.into()),
        }
    }

    /// All semantic labels bound anywhere in this subtree, in tree order.
    #[must_use]
    pub fn semantics(&self) -> Vec<&str> {
        let mut labels = Vec::new();
        self.collect_semantics(&mut labels);
        labels
    }

    fn collect_semantics<'a>(&'a self, labels: &mut Vec<&'a str>) {
        match self {
            Self::Repeat { children, .. } => {
                for child in children {
                    child.collect_semantics(labels);
                }
            }
            Self::Optional { child } => child.collect_semantics(labels),
            Self::Choice { alternatives } => {
                for alternative in alternatives {
                    alternative.collect_semantics(labels);
                }
            }
            Self::Phrases { semantic, .. } => {
                if let Some(label) = semantic {
                    labels.push(label);
                }
            }
        }
    }
}

/// Compact single-line rendering, for logs and the demo binary.
///
/// Not a wire format; the engine consumes the tree directly.
impl fmt::Display for GrammarNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Repeat { min, max, children } => {
                write!(f, "item<{min}..{max}>(")?;
                for (index, child) in children.iter().enumerate() {
                    if index > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{child}")?;
                }
                f.write_str(")")
            }
            Self::Optional { child } => write!(f, "opt({child})"),
            Self::Choice { alternatives } => {
                f.write_str("one-of(")?;
                for (index, alternative) in alternatives.iter().enumerate() {
                    if index > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{alternative}")?;
                }
                f.write_str(")")
            }
            Self::Phrases { phrases, semantic } => {
                for (index, phrase) in phrases.iter().enumerate() {
                    if index > 0 {
                        f.write_str("|")?;
                    }
                    write!(f, "\"{phrase}\"")?;
                }
                if let Some(label) = semantic {
                    write!(f, " => {label}")?;
                }
                Ok(())
            }
        }
    }
}
