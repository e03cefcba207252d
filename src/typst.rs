use crate::block::{Block, CodeBlock, Document, StyleTag, StyledRun};
use crate::config::{Config, TextStyle};

const LIST_INDENT_PT: u32 = 20;
const CONTINUATION_INDENT_PT: u32 = 35;

/// Convert a rendered reply to Typst markup
pub fn document_to_typst(doc: &Document, config: &Config) -> String {
    let mut out = String::new();
    emit_preamble(config, &mut out);

    for block in &doc.blocks {
        emit_block(block, config, &mut out);
    }

    out
}

fn emit_preamble(config: &Config, out: &mut String) {
    out.push_str(&format!("#set text(size: {}pt)\n", config.font.size));
    out.push_str("#show raw: set text(font: ");
    push_str_literal(&config.font.code_family, out);
    out.push_str(&format!(", size: {}pt)\n", config.font.code_size));
    if config.page.numbers {
        out.push_str("#set page(numbering: \"1\")\n");
    }
    out.push('\n');
}

fn emit_block(block: &Block, config: &Config, out: &mut String) {
    match block {
        Block::Paragraph { runs } => {
            runs_to_typst(runs, config, out);
            out.push_str("\n\n");
        }
        Block::Header { text } => {
            out.push_str(&format!(
                "#block(above: 10pt, below: 8pt, text(size: {}pt, weight: \"bold\", fill: rgb(",
                config.header.size
            ));
            push_str_literal(&config.header.color, out);
            out.push_str("), ");
            push_str_literal(text, out);
            out.push_str("))\n\n");
        }
        Block::Separator => {
            out.push_str("#line(length: 100%, stroke: 1pt + rgb(");
            push_str_literal(&config.separator.color, out);
            out.push_str("))\n\n");
        }
        Block::Code(code) => {
            code_block_to_typst(code, config, out);
        }
        Block::OrderedListItem {
            number,
            runs,
            continuation,
        } => {
            list_item_to_typst(&format!("{number}. "), runs, continuation, config, out);
        }
        Block::UnorderedListItem { runs, continuation } => {
            list_item_to_typst("• ", runs, continuation, config, out);
        }
    }
}

fn list_item_to_typst(
    marker: &str,
    runs: &[StyledRun],
    continuation: &[Vec<StyledRun>],
    config: &Config,
    out: &mut String,
) {
    out.push_str(&format!("#pad(left: {LIST_INDENT_PT}pt)["));
    styled_text(marker, &config.run_style(StyleTag::Bold), out);
    runs_to_typst(runs, config, out);
    out.push_str("]\n");

    for line in continuation {
        out.push_str(&format!("#pad(left: {CONTINUATION_INDENT_PT}pt)["));
        runs_to_typst(line, config, out);
        out.push_str("]\n");
    }
    out.push('\n');
}

fn code_block_to_typst(code: &CodeBlock, config: &Config, out: &mut String) {
    // Keep code blocks together when possible
    if code.with_background {
        out.push_str("#block(fill: rgb(");
        push_str_literal(&config.code_block.background, out);
        out.push_str("), stroke: 1pt + rgb(");
        push_str_literal(&config.code_block.border, out);
        out.push_str(&format!(
            "), inset: {}pt, width: 100%, breakable: false)[\n",
            config.code_block.inset
        ));
    } else {
        out.push_str("#block(breakable: false)[\n");
    }

    for token in &code.tokens {
        let style = config.theme.style_of(token.kind);
        let text = token.text.replace("\r\n", "\n");
        for (i, piece) in text.split(['\n', '\r']).enumerate() {
            if i > 0 {
                out.push_str("#linebreak()");
            }
            if !piece.is_empty() {
                styled_raw(piece, style, out);
            }
        }
    }

    out.push_str("\n]\n\n");
}

fn runs_to_typst(runs: &[StyledRun], config: &Config, out: &mut String) {
    for run in runs {
        match run.style {
            StyleTag::Plain => {
                out.push('#');
                push_str_literal(&run.text, out);
            }
            StyleTag::Bold => {
                styled_text(&run.text, &config.run_style(StyleTag::Bold), out);
            }
            StyleTag::InlineCode => {
                out.push_str("#box(fill: rgb(");
                push_str_literal(&config.inline.code_background, out);
                out.push_str("), outset: (y: 2pt), ");
                styled_raw_expr(&run.text, &config.run_style(StyleTag::InlineCode), out);
                out.push(')');
            }
        }
    }
}

fn styled_text(text: &str, style: &TextStyle, out: &mut String) {
    out.push('#');
    text_call(text, style, "", out);
}

fn styled_raw(text: &str, style: &TextStyle, out: &mut String) {
    out.push('#');
    styled_raw_expr(text, style, out);
}

fn styled_raw_expr(text: &str, style: &TextStyle, out: &mut String) {
    text_call(text, style, "raw", out);
}

/// `text(fill: .., weight: .., body)` where the body is a string literal,
/// optionally wrapped in a call to `wrapper`.
fn text_call(text: &str, style: &TextStyle, wrapper: &str, out: &mut String) {
    out.push_str("text(fill: rgb(");
    push_str_literal(&style.color, out);
    out.push_str(&format!("), weight: \"{}\", ", style.weight.as_typst()));
    if wrapper.is_empty() {
        push_str_literal(text, out);
    } else {
        out.push_str(wrapper);
        out.push('(');
        push_str_literal(text, out);
        out.push(')');
    }
    out.push(')');
}

/// Write `text` as a Typst string literal, so no markup inside it is interpreted.
fn push_str_literal(text: &str, out: &mut String) {
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::{reply_to_typst, reply_to_typst_with_config};
    use pretty_assertions::assert_eq;

    const PREAMBLE: &str = "#set text(size: 13pt)\n#show raw: set text(font: \"DejaVu Sans Mono\", size: 11.5pt)\n\n";

    #[test]
    fn empty_reply_is_preamble_only() {
        assert_eq!(reply_to_typst(""), PREAMBLE);
    }

    #[test]
    fn paragraph() {
        assert_eq!(
            reply_to_typst("Hello world"),
            format!("{PREAMBLE}#\"Hello world\"\n\n")
        );
    }

    #[test]
    fn soft_wrapped_paragraph() {
        assert_eq!(
            reply_to_typst("one\ntwo"),
            format!("{PREAMBLE}#\"one\"#\" \"#\"two\"\n\n")
        );
    }

    #[test]
    fn bold() {
        assert_eq!(
            reply_to_typst("a **b**"),
            format!(
                "{PREAMBLE}#\"a \"#text(fill: rgb(\"#2f4f4f\"), weight: \"bold\", \"b\")\n\n"
            )
        );
    }

    #[test]
    fn inline_code() {
        assert_eq!(
            reply_to_typst("`x`"),
            format!(
                "{PREAMBLE}#box(fill: rgb(\"#ffffe0\"), outset: (y: 2pt), text(fill: rgb(\"#8b0000\"), weight: \"regular\", raw(\"x\")))\n\n"
            )
        );
    }

    #[test]
    fn header() {
        assert_eq!(
            reply_to_typst("### Title"),
            format!(
                "{PREAMBLE}#block(above: 10pt, below: 8pt, text(size: 14pt, weight: \"bold\", fill: rgb(\"#00008b\"), \"Title\"))\n\n"
            )
        );
    }

    #[test]
    fn separator() {
        assert_eq!(
            reply_to_typst("---"),
            format!("{PREAMBLE}#line(length: 100%, stroke: 1pt + rgb(\"#d3d3d3\"))\n\n")
        );
    }

    #[test]
    fn ordered_item_with_continuation() {
        assert_eq!(
            reply_to_typst("4. four\nmore"),
            format!(
                "{PREAMBLE}#pad(left: 20pt)[#text(fill: rgb(\"#2f4f4f\"), weight: \"bold\", \"4. \")#\"four\"]\n#pad(left: 35pt)[#\"more\"]\n\n"
            )
        );
    }

    #[test]
    fn unordered_item() {
        assert_eq!(
            reply_to_typst("- item"),
            format!(
                "{PREAMBLE}#pad(left: 20pt)[#text(fill: rgb(\"#2f4f4f\"), weight: \"bold\", \"• \")#\"item\"]\n\n"
            )
        );
    }

    #[test]
    fn code_block_with_background() {
        assert_eq!(
            reply_to_typst("```\nint x\n```"),
            format!(
                "{PREAMBLE}#block(fill: rgb(\"#f0f0f51e\"), stroke: 1pt + rgb(\"#d3d3d3\"), inset: 12pt, width: 100%, breakable: false)[\n\
                 #text(fill: rgb(\"#0000ff\"), weight: \"bold\", raw(\"int\"))\
                 #text(fill: rgb(\"#a9a9a9\"), weight: \"regular\", raw(\" \"))\
                 #text(fill: rgb(\"#000000\"), weight: \"regular\", raw(\"x\"))\n]\n\n"
            )
        );
    }

    #[test]
    fn code_block_without_background_keeps_line_breaks() {
        let doc = crate::block::Document {
            blocks: vec![crate::block::Block::Code(crate::tokenize_code("a\nb", false))],
        };
        assert_eq!(
            super::document_to_typst(&doc, &Config::default()),
            format!(
                "{PREAMBLE}#block(breakable: false)[\n\
                 #text(fill: rgb(\"#000000\"), weight: \"regular\", raw(\"a\"))#linebreak()\
                 #text(fill: rgb(\"#000000\"), weight: \"regular\", raw(\"b\"))\n]\n\n"
            )
        );
    }

    #[test]
    fn lone_cr_breaks_code_lines_like_lf() {
        let render = |code: &str| {
            let doc = crate::block::Document {
                blocks: vec![crate::block::Block::Code(crate::tokenize_code(code, false))],
            };
            super::document_to_typst(&doc, &Config::default())
        };
        assert_eq!(render("a\rb"), render("a\nb"));
        assert_eq!(render("a\r\nb"), render("a\nb"));
    }

    #[test]
    fn blank_code_block_renders_empty_wrapper() {
        assert_eq!(
            reply_to_typst("```\n   \n```"),
            format!(
                "{PREAMBLE}#block(fill: rgb(\"#f0f0f51e\"), stroke: 1pt + rgb(\"#d3d3d3\"), inset: 12pt, width: 100%, breakable: false)[\n\n]\n\n"
            )
        );
    }

    #[test]
    fn escapes_string_literals() {
        assert_eq!(
            reply_to_typst("say \"hi\" \\ #x"),
            format!("{PREAMBLE}#\"say \\\"hi\\\" \\\\ #x\"\n\n")
        );
    }

    #[test]
    fn page_numbers_from_config() {
        let mut config = Config::default();
        config.page.numbers = true;
        assert!(
            reply_to_typst_with_config("x", &config)
                .contains("#set page(numbering: \"1\")\n")
        );
    }
}
