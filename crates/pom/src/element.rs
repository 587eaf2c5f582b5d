use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use retropom_core::LicenseEntry;

use crate::PomError;

/// An owned XML element: built by hand for the parts retropom writes, or read back from a
/// document by [`crate::parse_document`].
///
/// `text` holds the concatenated character data of the element itself; interleaving with
/// child elements is not tracked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Leaf element holding only text, e.g. `<name>...</name>`
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    /// First direct child with the given name
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    /// All direct children with the given name, in document order
    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Follows a `/`-separated path of first-match child names, e.g. `licenses/license/name`
    #[must_use]
    pub fn find_path(&self, path: &str) -> Option<&Element> {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .try_fold(self, |element, segment| element.find(segment))
    }

    #[must_use]
    pub fn child_names(&self) -> Vec<&str> {
        self.children.iter().map(|child| child.name.as_str()).collect()
    }

    /// Emit this element and its subtree as writer events.
    ///
    /// Elements without text and children are written self-closing.
    pub fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), PomError> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.text.is_empty() && self.children.is_empty() {
            return writer
                .write_event(Event::Empty(start))
                .map_err(PomError::serialize);
        }

        writer
            .write_event(Event::Start(start))
            .map_err(PomError::serialize)?;
        if !self.text.is_empty() {
            writer
                .write_event(Event::Text(BytesText::new(&self.text)))
                .map_err(PomError::serialize)?;
        }
        for child in &self.children {
            child.write_to(writer)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(self.name.as_str())))
            .map_err(PomError::serialize)
    }
}

impl From<&LicenseEntry> for Element {
    fn from(entry: &LicenseEntry) -> Self {
        Element::new("license")
            .child(Element::with_text("name", &entry.name))
            .child(Element::with_text("url", &entry.url))
            .child(Element::with_text("distribution", &entry.distribution))
    }
}

/// `<licenses>` holding one `<license>` per entry
#[must_use]
pub fn licenses_block(entries: &[LicenseEntry]) -> Element {
    entries
        .iter()
        .fold(Element::new("licenses"), |block, entry| {
            block.child(Element::from(entry))
        })
}
