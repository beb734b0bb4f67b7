/// Block-level node of a rendered note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    Document,
    Heading(u8),
    Paragraph,
    List,
    ListItem,
    CodeBlock,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub kind: ElementKind,
    /// The element's own inline text, markup left as written. Nested blocks
    /// live in `children`, never here.
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(kind: ElementKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            children: Vec::new(),
        }
    }

    pub fn document(children: Vec<Element>) -> Self {
        Self {
            kind: ElementKind::Document,
            text: String::new(),
            children,
        }
    }

    pub fn heading_level(&self) -> Option<u8> {
        match self.kind {
            ElementKind::Heading(level) => Some(level),
            _ => None,
        }
    }

    pub fn is_list_item(&self) -> bool {
        self.kind == ElementKind::ListItem
    }
}
