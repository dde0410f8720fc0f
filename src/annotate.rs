//! Highlighting of the answer span returned by the answering service.

use crate::docs::Text;

/// Stable anchor of the single highlighted annotation span.
pub const ANNOTATION_ANCHOR: &str = "annotation-0";

/// One unit of the body after annotation splitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderedUnit<'a> {
    Verbatim(&'a str),
    Highlighted {
        before: &'a str,
        highlighted: &'a str,
        after: &'a str,
        /// Scroll anchor of the highlighted span, always [`ANNOTATION_ANCHOR`].
        anchor: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTree<'a> {
    pub units: Vec<RenderedUnit<'a>>,
}

impl<'a> RenderTree<'a> {
    /// Index of the unit holding the highlighted span. The view scrolls it
    /// into view (centered); `None` means no scroll.
    pub fn scroll_target(&self) -> Option<usize> {
        self.units
            .iter()
            .position(|unit| matches!(unit, RenderedUnit::Highlighted { .. }))
    }

    pub fn highlighted_count(&self) -> usize {
        self.units
            .iter()
            .filter(|unit| matches!(unit, RenderedUnit::Highlighted { .. }))
            .count()
    }
}

/// Holds the single active annotation. Setting a new one always replaces
/// the old; nothing accumulates.
#[derive(Debug, Clone, Default)]
pub struct AnnotationHighlighter {
    annotation: String,
}

impl AnnotationHighlighter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the active annotation. An empty string disables highlighting.
    pub fn set_annotation(&mut self, text: impl Into<String>) {
        self.annotation = text.into();
    }

    pub fn annotation(&self) -> &str {
        &self.annotation
    }

    pub fn is_active(&self) -> bool {
        !self.annotation.is_empty()
    }

    /// Split `body` around the first exact occurrence of the annotation.
    /// Only the first unit that contains it is split; every other unit is
    /// rendered verbatim. A missing annotation is not an error.
    pub fn render<'a>(&self, body: &'a Text) -> RenderTree<'a> {
        let mut found = false;
        let units = body
            .units()
            .into_iter()
            .map(|content| {
                if found || !self.is_active() {
                    return RenderedUnit::Verbatim(content);
                }
                match content.find(self.annotation.as_str()) {
                    Some(start) => {
                        found = true;
                        let end = start + self.annotation.len();
                        RenderedUnit::Highlighted {
                            before: &content[..start],
                            highlighted: &content[start..end],
                            after: &content[end..],
                            anchor: ANNOTATION_ANCHOR,
                        }
                    }
                    None => RenderedUnit::Verbatim(content),
                }
            })
            .collect();

        RenderTree { units }
    }
}
