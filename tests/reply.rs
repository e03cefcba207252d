use pretty_assertions::assert_eq;
use replydoc::{Block, StyledRun, Token, TokenKind, render_reply, tokenize_code};
use rstest::rstest;

const SAMPLE_REPLY: &str = "\
### Overview
Here is how to **print** a value
using `Console.WriteLine`.

1. Create the project
run it from the terminal
2. Add the code:

3. Build it

---
- first point
- second with `code`

```csharp
// entry point
static void Main() {
    Console.WriteLine(\"Hi\");
}
```
Done.";

#[test]
fn sample_reply_structure() {
    let doc = render_reply(SAMPLE_REPLY);
    let kinds: Vec<&str> = doc
        .blocks
        .iter()
        .map(|b| match b {
            Block::Paragraph { .. } => "paragraph",
            Block::Header { .. } => "header",
            Block::Separator => "separator",
            Block::Code(_) => "code",
            Block::OrderedListItem { .. } => "ordered",
            Block::UnorderedListItem { .. } => "unordered",
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            "header",
            "paragraph",
            "ordered",
            "ordered",
            "ordered",
            "separator",
            "unordered",
            "unordered",
            "code",
            "paragraph",
        ]
    );

    assert_eq!(
        doc.blocks[1],
        Block::Paragraph {
            runs: vec![
                StyledRun::plain("Here is how to "),
                StyledRun::bold("print"),
                StyledRun::plain(" a value"),
                StyledRun::plain(" "),
                StyledRun::plain("using "),
                StyledRun::code("Console.WriteLine"),
                StyledRun::plain("."),
            ],
        }
    );

    assert_eq!(
        doc.blocks[2],
        Block::OrderedListItem {
            number: 1,
            runs: vec![StyledRun::plain("Create the project")],
            continuation: vec![vec![StyledRun::plain("run it from the terminal")]],
        }
    );

    let Block::Code(code) = &doc.blocks[8] else {
        panic!("expected code block, got {:?}", doc.blocks[8]);
    };
    assert!(code.source().starts_with("// entry point\nstatic void Main()"));
    assert_eq!(
        code.tokens[0],
        Token::new("// entry point", TokenKind::Comment)
    );
    assert!(code.tokens.contains(&Token::new("Console", TokenKind::TypeName)));
    assert!(code.tokens.contains(&Token::new("\"Hi\"", TokenKind::StringLiteral)));
}

#[test]
fn fence_round_trip() {
    let doc = render_reply("```\nint x = 1;\n```");
    assert_eq!(doc.len(), 1);
    let Block::Code(code) = &doc.blocks[0] else {
        panic!("expected code block");
    };
    assert_eq!(
        code.tokens,
        vec![
            Token::new("int", TokenKind::Keyword),
            Token::new(" ", TokenKind::Operator),
            Token::new("x", TokenKind::PlainText),
            Token::new(" = ", TokenKind::Operator),
            Token::new("1", TokenKind::NumberLiteral),
            Token::new(";", TokenKind::Operator),
        ]
    );
}

#[rstest]
#[case(SAMPLE_REPLY)]
#[case("### Title\n1. First\n- item **bold**\n\n---\nPara `code`")]
#[case("plain\ntext\n\nmore")]
fn plain_text_reparses_to_paragraphs(#[case] reply: &str) {
    let plain = render_reply(reply).plain_text();
    let reparsed = render_reply(&plain);
    assert!(
        reparsed
            .blocks
            .iter()
            .all(|b| matches!(b, Block::Paragraph { .. })),
        "{reparsed:#?}"
    );
}

#[test]
fn tokenize_code_is_independent_of_background() {
    let code = "#region X\nvar s = \"a\"; // c\n#endregion";
    assert_eq!(
        tokenize_code(code, true).tokens,
        tokenize_code(code, false).tokens
    );
    assert_eq!(tokenize_code(code, true).source(), code);
}

#[test]
fn repeated_renders_are_independent() {
    let first = render_reply("- a");
    let second = render_reply("- a");
    assert_eq!(first, second);
    assert_eq!(render_reply("").blocks, Vec::<Block>::new());
}
