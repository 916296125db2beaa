//! Minimal reader for incoming request envelopes.

use quick_xml::events::Event;
use quick_xml::Reader;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    pub name: String,
    pub text: String,
    pub children: Vec<Node>,
}

impl Node {
    fn new(name: String) -> Self {
        Self {
            name,
            ..Default::default()
        }
    }

    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Text of the direct child `name`, if present and non-empty.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.child(name)
            .map(|child| child.text.as_str())
            .filter(|text| !text.is_empty())
    }
}

/// A parsed request: the root element and its descendants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fields {
    root: Node,
}

impl Fields {
    pub fn parse(input: &str) -> Result<Self, String> {
        let mut reader = Reader::from_str(input);
        reader.trim_text(true);

        let mut stack: Vec<Node> = Vec::new();
        let mut root: Option<Node> = None;
        loop {
            match reader.read_event().map_err(|err| err.to_string())? {
                Event::Start(start) => {
                    stack.push(Node::new(String::from_utf8_lossy(start.name().as_ref()).into_owned()));
                }
                Event::Empty(start) => {
                    let node = Node::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
                    attach(&mut stack, &mut root, node);
                }
                Event::Text(text) => {
                    let text = text.unescape().map_err(|err| err.to_string())?;
                    if let Some(open) = stack.last_mut() {
                        open.text.push_str(&text);
                    }
                }
                Event::End(_) => {
                    if let Some(node) = stack.pop() {
                        attach(&mut stack, &mut root, node);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err("unexpected end of document".to_string());
        }
        root.map(|root| Self { root })
            .ok_or_else(|| "document has no root element".to_string())
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Text of a direct child of the root element.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.root.get(name)
    }

    /// Elements at `path` (slash separated, relative to the root), in
    /// document order.
    pub fn groups(&self, path: &str) -> Vec<&Node> {
        let mut current = vec![&self.root];
        for segment in path.split('/') {
            current = current
                .into_iter()
                .flat_map(|node| node.children.iter().filter(move |child| child.name == segment))
                .collect();
        }
        current
    }
}

fn attach(stack: &mut [Node], root: &mut Option<Node>, node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => *root = Some(node),
    }
}
