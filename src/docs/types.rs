use serde::{Deserialize, Serialize};

/// A contiguous page-range chunk of a paginated document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub content: String,
    #[serde(default)]
    pub start_page: u32,
    #[serde(default)]
    pub end_page: u32,
}

/// Document text: one flat string, or ordered sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Text {
    Flat(String),
    Sections(Vec<Section>),
}

/// A fetched document. Immutable once loaded; replaced wholesale when the
/// reader navigates elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub title: String,
    pub author: Option<String>,
    pub filename: String,
    pub body: Text,
}

/// `pdf_data` payload of `GET get_pdf`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PdfData {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub text_content: Option<String>,
    #[serde(default)]
    pub sections: Option<Vec<Section>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PdfResponse {
    pub pdf_data: PdfData,
}

/// Successful `GET askquestion` body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Answer {
    /// Markdown answer text.
    pub answer: String,
    /// Verbatim span of the document the answer is based on; may be empty.
    #[serde(default)]
    pub annotations: String,
}

/// Body returned with non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
