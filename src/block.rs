/// Inline style of a run of reply text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleTag {
    Plain,
    Bold,
    InlineCode,
}

/// A contiguous span of text sharing one inline style
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledRun {
    pub text: String,
    pub style: StyleTag,
}

impl StyledRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: StyleTag::Plain,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: StyleTag::Bold,
        }
    }

    pub fn code(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: StyleTag::InlineCode,
        }
    }
}

/// Lexical category of a span of source code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword,
    TypeName,
    StringLiteral,
    NumberLiteral,
    Comment,
    Preprocessor,
    Operator,
    PlainText,
}

/// A classified span of code text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
}

impl Token {
    pub fn new(text: impl Into<String>, kind: TokenKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }
}

/// Tokenized body of a fenced code block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    pub tokens: Vec<Token>,
    /// Whether the renderer should draw the background/border wrapper.
    /// Has no effect on the tokens themselves.
    pub with_background: bool,
}

impl CodeBlock {
    /// Source text of the block, reassembled from its tokens.
    pub fn source(&self) -> String {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }
}

/// Block-level elements of a rendered reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph {
        runs: Vec<StyledRun>,
    },
    Header {
        text: String,
    },
    Separator,
    Code(CodeBlock),
    OrderedListItem {
        /// Taken verbatim from the source, never renumbered
        number: u64,
        runs: Vec<StyledRun>,
        continuation: Vec<Vec<StyledRun>>,
    },
    UnorderedListItem {
        runs: Vec<StyledRun>,
        continuation: Vec<Vec<StyledRun>>,
    },
}

impl Block {
    /// Text of the block with all styling discarded.
    ///
    /// Continuation lines of list items are placed on their own lines.
    pub fn plain_text(&self) -> String {
        match self {
            Block::Paragraph { runs } => runs_text(runs),
            Block::Header { text } => text.clone(),
            Block::Separator => String::new(),
            Block::Code(code) => code.source(),
            Block::OrderedListItem {
                runs, continuation, ..
            }
            | Block::UnorderedListItem { runs, continuation } => {
                let mut out = runs_text(runs);
                for line in continuation {
                    out.push('\n');
                    out.push_str(&runs_text(line));
                }
                out
            }
        }
    }
}

fn runs_text(runs: &[StyledRun]) -> String {
    runs.iter().map(|r| r.text.as_str()).collect()
}

/// An ordered, append-only sequence of blocks for one reply
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Clipboard text: every block's plain text, one block per line.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(Block::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
