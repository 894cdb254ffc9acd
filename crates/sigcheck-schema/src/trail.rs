//! # Diagnostic Trail
//!
//! The breadcrumb path taken through nested schemas. Each descent pushes a
//! [`Frame`] onto a parent-linked chain that lives on the recursion stack:
//! nothing is copied or formatted while checks pass, and the text is only
//! materialized when a violation is raised.
//!
//! A rendered trail is one line per frame, outermost first, each terminated
//! by a newline:
//!
//! ```text
//! list[2] check: (int, str)
//! tuple[1] check: #1 str
//! ```

use std::borrow::Cow;
use std::fmt;

use crate::schema::{Schema, SequenceKind};

/// One level of descent.
pub enum Frame<'a> {
    /// Element of a homogeneous sequence checked against its element schema.
    Element {
        kind: SequenceKind,
        index: usize,
        schema: &'a Schema,
    },
    /// Element of a fixed-arity sequence checked against the schema at the
    /// same position.
    Position {
        kind: SequenceKind,
        index: usize,
        schema: &'a Schema,
    },
    /// A dict key checked against the key schema.
    DictKey(&'a Schema),
    /// A dict value checked against the value schema.
    DictValue(&'a Schema),
    /// A sub-schema tried by an `AndChecker`.
    AndStep {
        schema: &'a Schema,
        checker: &'a dyn fmt::Display,
    },
    /// Free-form text from a user composite.
    Note(Cow<'a, str>),
}

impl fmt::Display for Frame<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Element { kind, index, schema } => {
                write!(f, "{kind}[{index}] check: {schema}")
            }
            Self::Position { kind, index, schema } => {
                write!(f, "{kind}[{index}] check: #{index} {schema}")
            }
            Self::DictKey(schema) => write!(f, "dict key check: {schema}"),
            Self::DictValue(schema) => write!(f, "dict value check: {schema}"),
            Self::AndStep { schema, checker } => {
                write!(f, "AndChecker check: {schema} while trying: {checker}")
            }
            Self::Note(text) => f.write_str(text),
        }
    }
}

/// Immutable, parent-linked chain of frames.
///
/// Extending a trail borrows it; the extension is dropped when the nested
/// check returns, so sibling checks never observe each other's frames.
pub struct Trail<'a> {
    frame: Option<Frame<'a>>,
    parent: Option<&'a Trail<'a>>,
    depth: usize,
}

impl Trail<'static> {
    /// The empty trail a top-level check starts from.
    pub fn root() -> Self {
        Self {
            frame: None,
            parent: None,
            depth: 0,
        }
    }
}

impl<'a> Trail<'a> {
    /// A new trail one level deeper than `self`.
    pub fn push<'b>(&'b self, frame: Frame<'b>) -> Trail<'b> {
        Trail {
            frame: Some(frame),
            parent: Some(self),
            depth: self.depth + 1,
        }
    }

    /// A trail one level deeper than `self` that renders no extra line.
    pub fn descend(&self) -> Trail<'_> {
        Trail {
            frame: None,
            parent: Some(self),
            depth: self.depth + 1,
        }
    }

    /// Nesting depth, silent levels included.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// True for the root trail.
    pub fn is_empty(&self) -> bool {
        self.depth == 0
    }

    /// Frames from the outermost to the innermost.
    pub fn frames(&self) -> Vec<&Frame<'a>> {
        let mut frames = Vec::with_capacity(self.depth);
        let mut current = Some(self);
        while let Some(trail) = current {
            if let Some(frame) = &trail.frame {
                frames.push(frame);
            }
            current = trail.parent;
        }
        frames.reverse();
        frames
    }
}

impl fmt::Display for Trail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for frame in self.frames() {
            writeln!(f, "{frame}")?;
        }
        Ok(())
    }
}
