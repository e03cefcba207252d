use std::sync::OnceLock;

use regex::Regex;

use crate::block::StyledRun;

fn re_inline_code() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"`([^`]+)`").expect("re_inline_code: pattern is valid and should always compile")
    })
}

fn re_bold() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\*\*([^*]+)\*\*").expect("re_bold: pattern is valid and should always compile")
    })
}

/// Resolve inline markup in a single line into styled runs.
///
/// Inline code spans are extracted first; only the text between them is
/// scanned for bold markers, so `**` inside backticks stays literal.
/// Unmatched delimiters are kept as plain text.
pub fn format_line(line: &str) -> Vec<StyledRun> {
    let mut runs = Vec::new();
    if line.contains('`') {
        let mut last = 0;
        for caps in re_inline_code().captures_iter(line) {
            let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            format_bold(&line[last..whole.start()], &mut runs);
            runs.push(StyledRun::code(inner.as_str()));
            last = whole.end();
        }
        format_bold(&line[last..], &mut runs);
    } else {
        format_bold(line, &mut runs);
    }
    runs
}

fn format_bold(text: &str, runs: &mut Vec<StyledRun>) {
    if text.is_empty() {
        return;
    }
    if !text.contains("**") {
        runs.push(StyledRun::plain(text));
        return;
    }

    let mut last = 0;
    for caps in re_bold().captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            runs.push(StyledRun::plain(&text[last..whole.start()]));
        }
        runs.push(StyledRun::bold(inner.as_str()));
        last = whole.end();
    }
    if last < text.len() {
        runs.push(StyledRun::plain(&text[last..]));
    }
}
