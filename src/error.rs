use thiserror::Error;

/// Failures while turning a rendered reply into a PDF or SVG document
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Typst compilation failed: {0}")]
    Compile(String),

    #[error("PDF generation failed: {0}")]
    Export(String),
}
