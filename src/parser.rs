use std::sync::OnceLock;

use regex::Regex;

use crate::block::{Block, Document, StyledRun};
use crate::highlight;
use crate::inline::format_line;

fn re_fence() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^```[^`\s]*$").expect("re_fence: pattern is valid and should always compile")
    })
}

fn re_ordered_item() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([0-9]+)\.\s+(.+)$")
            .expect("re_ordered_item: pattern is valid and should always compile")
    })
}

fn re_header() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^###\s+(.+)$").expect("re_header: pattern is valid and should always compile")
    })
}

const SEPARATOR: &str = "---";
const BULLET_MARKERS: [&str; 3] = ["* ", "- ", "+ "];

/// Parse a chat reply into a document of blocks.
///
/// Single forward pass over the lines. Never fails: any line no other rule
/// claims becomes paragraph text.
pub fn parse(reply: &str) -> Document {
    let lines = split_lines(reply);
    let mut state = ParseState::default();

    let mut i = 0;
    while i < lines.len() {
        i = state.process_line(&lines, i);
    }

    state.finish()
}

/// Split on `\r\n`, `\n` and lone `\r`.
fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .flat_map(|line| line.split('\r'))
        .collect()
}

#[derive(Default)]
enum Mode {
    #[default]
    Default,
    InCodeFence {
        body: Vec<String>,
    },
}

#[derive(Default)]
struct ParseState {
    blocks: Vec<Block>,
    // Runs of the open paragraph
    paragraph: Vec<StyledRun>,
    mode: Mode,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum ListKind {
    Ordered,
    Unordered,
}

/// A recognised list item line
struct ListLine<'a> {
    kind: ListKind,
    number: u64,
    text: &'a str,
}

impl<'a> ListLine<'a> {
    /// Ordered items take priority over bullets.
    fn parse(line: &'a str) -> Option<Self> {
        let trimmed = line.trim();
        ordered_item(trimmed).or_else(|| bullet_item(trimmed))
    }

    fn into_block(self, continuation: Vec<Vec<StyledRun>>) -> Block {
        let runs = format_line(self.text);
        match self.kind {
            ListKind::Ordered => Block::OrderedListItem {
                number: self.number,
                runs,
                continuation,
            },
            ListKind::Unordered => Block::UnorderedListItem { runs, continuation },
        }
    }
}

fn ordered_item(trimmed: &str) -> Option<ListLine<'_>> {
    let caps = re_ordered_item().captures(trimmed)?;
    // Numbers too large for u64 leave the line as ordinary text
    let number = caps.get(1)?.as_str().parse().ok()?;
    Some(ListLine {
        kind: ListKind::Ordered,
        number,
        text: caps.get(2)?.as_str(),
    })
}

fn bullet_item(trimmed: &str) -> Option<ListLine<'_>> {
    let marker = BULLET_MARKERS
        .iter()
        .find(|marker| trimmed.starts_with(**marker))?;
    // A `* ` line carrying bold markup reads as a bold-led paragraph
    if *marker == "* " && trimmed.contains("**") {
        return None;
    }
    Some(ListLine {
        kind: ListKind::Unordered,
        number: 0,
        text: trimmed[marker.len()..].trim(),
    })
}

fn is_list_item(line: &str, kind: ListKind) -> bool {
    ListLine::parse(line).is_some_and(|item| item.kind == kind)
}

impl ParseState {
    /// Handle the line at `i` and return the index of the next unhandled line.
    fn process_line(&mut self, lines: &[&str], i: usize) -> usize {
        let line = lines[i];
        let trimmed = line.trim();

        if re_fence().is_match(trimmed) {
            self.toggle_fence();
            return i + 1;
        }

        if let Mode::InCodeFence { body } = &mut self.mode {
            body.push(line.to_string());
            return i + 1;
        }

        if let Some(item) = ListLine::parse(line) {
            self.flush_paragraph();
            return self.consume_list(lines, i, item.kind);
        }

        if let Some(caps) = re_header().captures(trimmed) {
            self.flush_paragraph();
            let text = caps.get(1).map_or("", |m| m.as_str()).to_string();
            self.blocks.push(Block::Header { text });
        } else if trimmed == SEPARATOR {
            self.flush_paragraph();
            self.blocks.push(Block::Separator);
        } else if trimmed.is_empty() {
            self.flush_paragraph();
        } else {
            if !self.paragraph.is_empty() {
                self.paragraph.push(StyledRun::plain(" "));
            }
            self.paragraph.extend(format_line(line));
        }

        i + 1
    }

    fn toggle_fence(&mut self) {
        match std::mem::take(&mut self.mode) {
            Mode::Default => {
                log::trace!("entering code fence");
                self.flush_paragraph();
                self.mode = Mode::InCodeFence { body: Vec::new() };
            }
            Mode::InCodeFence { body } => {
                log::trace!("leaving code fence after {} lines", body.len());
                self.close_code_block(&body);
            }
        }
    }

    /// A fence that collected no lines yields no block. Any other body, even
    /// one that trims to nothing, becomes a code block.
    fn close_code_block(&mut self, body: &[String]) {
        if body.is_empty() {
            return;
        }
        let joined = body.join("\n");
        self.blocks
            .push(Block::Code(highlight::highlight(joined.trim(), true)));
    }

    /// Consume list items of `kind` starting at `start`, each followed by its
    /// continuation lines. A blank line ends the list unless the next line is
    /// another item of the same kind.
    fn consume_list(&mut self, lines: &[&str], start: usize, kind: ListKind) -> usize {
        let mut i = start;
        while i < lines.len() {
            let line = lines[i];
            match ListLine::parse(line) {
                Some(item) if item.kind == kind => {
                    i += 1;
                    let mut continuation = Vec::new();
                    while let Some(next) = lines.get(i) {
                        let next = next.trim();
                        if next.is_empty() || ListLine::parse(next).is_some() {
                            break;
                        }
                        continuation.push(format_line(next));
                        i += 1;
                    }
                    self.blocks.push(item.into_block(continuation));
                }
                Some(_) => break,
                None => {
                    let blank_before_item = line.trim().is_empty()
                        && lines.get(i + 1).is_some_and(|next| is_list_item(next, kind));
                    if !blank_before_item {
                        break;
                    }
                    i += 1;
                }
            }
        }
        log::trace!("consumed {:?} list lines {}..{}", kind, start, i);
        i
    }

    fn flush_paragraph(&mut self) {
        if !self.paragraph.is_empty() {
            let runs = std::mem::take(&mut self.paragraph);
            self.blocks.push(Block::Paragraph { runs });
        }
    }

    fn finish(mut self) -> Document {
        // An unterminated fence closes at end of input
        if let Mode::InCodeFence { body } = std::mem::take(&mut self.mode) {
            self.close_code_block(&body);
        }
        self.flush_paragraph();
        Document {
            blocks: self.blocks,
        }
    }
}
