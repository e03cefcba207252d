mod block;
mod config;
mod error;
mod highlight;
mod inline;
mod parser;
mod typst;

pub use block::{Block, CodeBlock, Document, StyleTag, StyledRun, Token, TokenKind};
pub use config::{Config, ConfigError, FontWeight, TextStyle, ThemeConfig};
pub use error::RenderError;
pub use inline::format_line;

use typst_as_lib::TypstEngine;
use typst_as_lib::typst_kit_options::TypstKitFontOptions;
use typst_pdf::PdfOptions;

/// Parse a chat reply into a styled document.
///
/// Total over all inputs; each call builds a fresh document.
pub fn render_reply(text: &str) -> Document {
    let doc = parser::parse(text);
    log::debug!(
        "rendered reply of {} bytes into {} blocks",
        text.len(),
        doc.len()
    );
    doc
}

/// Classify a code snippet into highlighting tokens.
pub fn tokenize(code: &str) -> Vec<Token> {
    highlight::tokenize(code)
}

/// Tokenize a code snippet into a code block. `with_background` only tells
/// the renderer whether to draw the background wrapper.
pub fn tokenize_code(code: &str, with_background: bool) -> CodeBlock {
    highlight::highlight(code, with_background)
}

/// Convert a reply to Typst markup using default config.
pub fn reply_to_typst(text: &str) -> String {
    reply_to_typst_with_config(text, &Config::compiled_default())
}

/// Convert a reply to Typst markup with custom config.
pub fn reply_to_typst_with_config(text: &str, config: &Config) -> String {
    let doc = render_reply(text);
    document_to_typst(&doc, config)
}

/// Convert an already rendered document to Typst markup.
pub fn document_to_typst(doc: &Document, config: &Config) -> String {
    typst::document_to_typst(doc, config)
}

/// Convert a reply to PDF bytes using default config.
pub fn reply_to_pdf(text: &str) -> Result<Vec<u8>, RenderError> {
    document_to_pdf(&render_reply(text), &Config::compiled_default())
}

/// Convert a reply to PDF bytes with custom config.
pub fn reply_to_pdf_with_config(text: &str, config: &Config) -> Result<Vec<u8>, RenderError> {
    document_to_pdf(&render_reply(text), config)
}

/// Convert a rendered document to PDF bytes.
pub fn document_to_pdf(doc: &Document, config: &Config) -> Result<Vec<u8>, RenderError> {
    let compiled = compile_document(doc, config)?;

    typst_pdf::pdf(&compiled, &PdfOptions::default())
        .map_err(|e| RenderError::Export(format!("{:?}", e)))
}

/// Compile a rendered document to a paged Typst document.
fn compile_document(
    doc: &Document,
    config: &Config,
) -> Result<typst_library::layout::PagedDocument, RenderError> {
    let typst_content = document_to_typst(doc, config);

    let font_options = TypstKitFontOptions::new()
        .include_embedded_fonts(true)
        .include_system_fonts(false);

    let engine = TypstEngine::builder()
        .main_file(typst_content)
        .search_fonts_with(font_options)
        .build();

    engine
        .compile()
        .output
        .map_err(|e| RenderError::Compile(format!("{:?}", e)))
}

/// Result of rendering a reply to SVG pages.
pub struct SvgDocument {
    pub pages: Vec<String>,
    pub width_pt: f64,
    pub height_pt: f64,
}

/// Convert a reply to SVG pages using default config.
pub fn reply_to_svg(text: &str) -> Result<SvgDocument, RenderError> {
    document_to_svg(&render_reply(text), &Config::compiled_default())
}

/// Convert a reply to SVG pages with custom config.
pub fn reply_to_svg_with_config(text: &str, config: &Config) -> Result<SvgDocument, RenderError> {
    document_to_svg(&render_reply(text), config)
}

/// Convert a rendered document to SVG pages.
pub fn document_to_svg(doc: &Document, config: &Config) -> Result<SvgDocument, RenderError> {
    let compiled = compile_document(doc, config)?;

    let pages: Vec<String> = compiled.pages.iter().map(|page| typst_svg::svg(page)).collect();

    // Get dimensions from first page (assuming all pages same size)
    let (width_pt, height_pt) = if let Some(first_page) = compiled.pages.first() {
        let size = first_page.frame.size();
        (size.x.to_pt(), size.y.to_pt())
    } else {
        (595.0, 842.0) // A4 default
    };

    Ok(SvgDocument {
        pages,
        width_pt,
        height_pt,
    })
}
