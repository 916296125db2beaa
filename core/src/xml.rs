//! Immutable XML request tree and its serializer.
//!
//! Request builders assemble `XmlElement` values; nothing is rendered
//! until `to_document` walks the finished tree with a `quick_xml::Writer`.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Children(Vec<XmlElement>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    content: Content,
}

impl XmlElement {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: Content::Text(value.into()),
        }
    }

    pub fn parent(name: impl Into<String>, children: Vec<XmlElement>) -> Self {
        Self {
            name: name.into(),
            content: Content::Children(children),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    /// Text of a leaf element, `None` for parents.
    pub fn value(&self) -> Option<&str> {
        match &self.content {
            Content::Text(text) => Some(text),
            Content::Children(_) => None,
        }
    }

    pub fn children(&self) -> &[XmlElement] {
        match &self.content {
            Content::Text(_) => &[],
            Content::Children(children) => children,
        }
    }

    /// First direct child called `name`.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children().iter().find(|child| child.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children().iter().filter(move |child| child.name == name)
    }

    /// Render as a standalone document with an XML declaration.
    pub fn to_document(&self) -> Result<String, quick_xml::Error> {
        let mut writer = Writer::new(Vec::new());
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        write_element(&mut writer, self)?;
        Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
    }
}

fn write_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    element: &XmlElement,
) -> Result<(), quick_xml::Error> {
    let name = element.name.as_str();
    match &element.content {
        Content::Text(text) if text.is_empty() => {
            writer.write_event(Event::Empty(BytesStart::new(name)))?;
        }
        Content::Text(text) => {
            writer.write_event(Event::Start(BytesStart::new(name)))?;
            writer.write_event(Event::Text(BytesText::new(text)))?;
            writer.write_event(Event::End(BytesEnd::new(name)))?;
        }
        Content::Children(children) => {
            writer.write_event(Event::Start(BytesStart::new(name)))?;
            for child in children {
                write_element(writer, child)?;
            }
            writer.write_event(Event::End(BytesEnd::new(name)))?;
        }
    }
    Ok(())
}

/// Accumulates the children of one element, applying the emission policy.
#[derive(Debug)]
pub struct ElementBuilder {
    name: String,
    children: Vec<XmlElement>,
}

impl ElementBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Always emitted, even when empty.
    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.children.push(XmlElement::text(name, value));
        self
    }

    /// Emitted only when present and not blank.
    pub fn opt_text(self, name: &str, value: Option<&str>) -> Self {
        match value.filter(|v| !v.trim().is_empty()) {
            Some(value) => self.text(name, value),
            None => self,
        }
    }

    /// Emitted as `true` when set; absence means false.
    pub fn flag(self, name: &str, set: bool) -> Self {
        if set {
            self.text(name, "true")
        } else {
            self
        }
    }

    pub fn child(mut self, element: XmlElement) -> Self {
        self.children.push(element);
        self
    }

    pub fn build(self) -> XmlElement {
        XmlElement::parent(self.name, self.children)
    }

    pub fn into_children(self) -> Vec<XmlElement> {
        self.children
    }
}
