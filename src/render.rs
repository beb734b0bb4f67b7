//! Line-oriented markdown reader producing the block tree the extractors walk.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{Element, ElementKind};

static LIST_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([ \t]*)(?:[-*+]|\d{1,9}[.)])(?:[ \t]+(.*))?$").expect("valid list regex")
});

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {0,3}(#{1,6})(?:[ \t]+(.*?))?[ \t#]*$").expect("valid heading regex"));

pub fn parse(text: &str) -> Element {
    let mut builder = Builder::default();
    for line in text.lines() {
        builder.line(line);
    }
    builder.finish()
}

#[derive(Default)]
struct Builder {
    blocks: Vec<Element>,
    list: Option<Element>,
    items: Vec<(usize, Element)>,
    paragraph: Option<Element>,
    fence: Option<(String, Element)>,
    last_blank: bool,
}

impl Builder {
    fn line(&mut self, line: &str) {
        let indent = indent_width(line);
        let trimmed = line.trim();

        if let Some(closing) = self
            .fence
            .as_ref()
            .map(|(marker, _)| trimmed.starts_with(marker.as_str()))
        {
            if closing {
                if let Some((_, code)) = self.fence.take() {
                    self.push_nested(code);
                }
            } else if let Some((_, code)) = self.fence.as_mut() {
                if !code.text.is_empty() {
                    code.text.push('\n');
                }
                code.text.push_str(line);
            }
            return;
        }

        if trimmed.is_empty() {
            self.close_paragraph();
            self.last_blank = true;
            return;
        }
        let continues_item = !self.items.is_empty() && (indent > 0 || !self.last_blank);
        self.last_blank = false;

        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            self.close_paragraph();
            if indent == 0 {
                self.close_lists();
            }
            let marker = trimmed[..3].to_string();
            self.fence = Some((marker, Element::new(ElementKind::CodeBlock, "")));
            return;
        }

        if let Some(caps) = LIST_ITEM_RE.captures(line) {
            self.close_paragraph();
            let indent = indent_width(&caps[1]);
            let text = caps.get(2).map_or("", |m| m.as_str()).trim();
            self.close_items(indent);
            self.items.push((indent, Element::new(ElementKind::ListItem, text)));
            return;
        }

        if let Some(caps) = HEADING_RE.captures(line) {
            self.close_paragraph();
            self.close_lists();
            let level = caps[1].len() as u8;
            let text = caps.get(2).map_or("", |m| m.as_str()).trim();
            self.blocks
                .push(Element::new(ElementKind::Heading(level), text));
            return;
        }

        if continues_item && self.paragraph.is_none() {
            if let Some((_, item)) = self.items.last_mut() {
                if !item.text.is_empty() {
                    item.text.push(' ');
                }
                item.text.push_str(trimmed);
                return;
            }
        }

        match self.paragraph.as_mut() {
            Some(p) => {
                p.text.push(' ');
                p.text.push_str(trimmed);
            }
            None => {
                self.close_lists();
                self.paragraph = Some(Element::new(ElementKind::Paragraph, trimmed));
            }
        }
    }

    fn finish(mut self) -> Element {
        self.close_paragraph();
        if let Some((_, code)) = self.fence.take() {
            self.push_nested(code);
        }
        self.close_lists();
        Element::document(self.blocks)
    }

    fn close_paragraph(&mut self) {
        if let Some(p) = self.paragraph.take() {
            self.blocks.push(p);
        }
    }

    /// Pop every open item indented at least `indent`, attaching each to the
    /// item below it on the stack (or to the top-level list).
    fn close_items(&mut self, indent: usize) {
        while self.items.last().is_some_and(|(i, _)| *i >= indent) {
            if let Some((_, item)) = self.items.pop() {
                self.attach(item);
            }
        }
    }

    fn attach(&mut self, item: Element) {
        match self.items.last_mut() {
            Some((_, parent)) => {
                let has_list = parent
                    .children
                    .last()
                    .is_some_and(|e| e.kind == ElementKind::List);
                if !has_list {
                    parent.children.push(Element::new(ElementKind::List, ""));
                }
                if let Some(list) = parent.children.last_mut() {
                    list.children.push(item);
                }
            }
            None => self
                .list
                .get_or_insert_with(|| Element::new(ElementKind::List, ""))
                .children
                .push(item),
        }
    }

    fn close_lists(&mut self) {
        self.close_items(0);
        if let Some(list) = self.list.take() {
            self.blocks.push(list);
        }
    }

    /// Blocks that may sit inside the open list item, or at top level otherwise.
    fn push_nested(&mut self, block: Element) {
        match self.items.last_mut() {
            Some((_, item)) => item.children.push(block),
            None => self.blocks.push(block),
        }
    }
}

fn indent_width(line: &str) -> usize {
    line.chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .map(|c| if c == '\t' { 4 } else { 1 })
        .sum()
}
