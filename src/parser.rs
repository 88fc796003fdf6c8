//! SOAP response parsing into nested maps.
//!
//! Uses quick-xml which is safe against XXE by default (doesn't expand entities).
//! Elements are keyed by local name; namespace prefixes and attributes are
//! dropped. Repeated sibling tags become a [`XmlNode::List`], but a tag that
//! occurs once stays a single node even when the schema allows repeats, so
//! callers iterate through [`XmlNode::as_list`].

use crate::error::{CarrierError, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::BTreeMap;

/// A parsed XML value.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    /// Leaf element text (empty for `<Tag/>`)
    Text(String),
    /// Element with child elements, keyed by local name
    Element(BTreeMap<String, XmlNode>),
    /// Repeated sibling elements sharing one name
    List(Vec<XmlNode>),
}

impl XmlNode {
    /// Child element by local name.
    pub fn get(&self, key: &str) -> Option<&XmlNode> {
        match self {
            Self::Element(children) => children.get(key),
            _ => None,
        }
    }

    /// Walk a chain of child names.
    pub fn at(&self, path: &[&str]) -> Option<&XmlNode> {
        path.iter().try_fold(self, |node, key| node.get(key))
    }

    /// Text content of a leaf element.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// View this node as a sequence, wrapping a lone element.
    pub fn as_list(&self) -> Vec<&XmlNode> {
        match self {
            Self::List(items) => items.iter().collect(),
            other => vec![other],
        }
    }

    fn push_child(children: &mut BTreeMap<String, XmlNode>, name: String, node: XmlNode) {
        match children.remove(&name) {
            None => {
                children.insert(name, node);
            }
            Some(Self::List(mut items)) => {
                items.push(node);
                children.insert(name, Self::List(items));
            }
            Some(existing) => {
                children.insert(name, Self::List(vec![existing, node]));
            }
        }
    }
}

/// A parsed response document.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    root: XmlNode,
}

impl ParsedDocument {
    /// Parse raw bytes into a document.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let xml_str = std::str::from_utf8(data)
            .map_err(|e| CarrierError::malformed(format!("Invalid UTF-8: {}", e)))?;
        Self::parse_str(xml_str)
    }

    /// Parse an XML string into a document.
    pub fn parse_str(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut root: BTreeMap<String, XmlNode> = BTreeMap::new();
        let mut stack: Vec<Frame> = Vec::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    stack.push(Frame::new(utf8(e.local_name().as_ref())?));
                }

                Ok(Event::Empty(ref e)) => {
                    let name = utf8(e.local_name().as_ref())?;
                    let parent = stack.last_mut().map_or(&mut root, |f| &mut f.children);
                    XmlNode::push_child(parent, name, XmlNode::Text(String::new()));
                }

                Ok(Event::End(_)) => {
                    let frame = stack
                        .pop()
                        .ok_or_else(|| CarrierError::malformed("unbalanced closing tag"))?;
                    let (name, node) = frame.finish();
                    let parent = stack.last_mut().map_or(&mut root, |f| &mut f.children);
                    XmlNode::push_child(parent, name, node);
                }

                Ok(Event::Text(ref e)) => {
                    let text = e
                        .unescape()
                        .map_err(|e| CarrierError::malformed(format!("XML parse error: {}", e)))?;
                    if let Some(frame) = stack.last_mut() {
                        frame.text.push_str(&text);
                    }
                }

                Ok(Event::CData(e)) => {
                    let data = e.into_inner();
                    if let Some(frame) = stack.last_mut() {
                        frame.text.push_str(&String::from_utf8_lossy(&data));
                    }
                }

                // DOCTYPE is the only place entities can be declared
                Ok(Event::DocType(_)) => {
                    return Err(CarrierError::malformed(
                        "DOCTYPE declarations are not allowed",
                    ));
                }

                Ok(Event::Eof) => break,

                Err(e) => {
                    return Err(CarrierError::malformed(format!("XML parse error: {}", e)));
                }

                _ => {}
            }

            buf.clear();
        }

        if !stack.is_empty() {
            return Err(CarrierError::malformed("unexpected end of document"));
        }
        if root.is_empty() {
            return Err(CarrierError::malformed("empty document"));
        }

        Ok(Self {
            root: XmlNode::Element(root),
        })
    }

    /// Top-level node; its only child is the document element.
    pub fn root(&self) -> &XmlNode {
        &self.root
    }

    /// Walk a path starting at the document element's name.
    pub fn at(&self, path: &[&str]) -> Option<&XmlNode> {
        self.root.at(path)
    }

    /// SOAP 1.1 Fault carried in the body, as `(faultcode, faultstring)`.
    pub fn fault(&self) -> Option<(String, String)> {
        let fault = self.at(&["Envelope", "Body", "Fault"])?;
        let field = |name: &str| {
            fault
                .get(name)
                .and_then(XmlNode::text)
                .unwrap_or_default()
                .to_string()
        };
        Some((field("faultcode"), field("faultstring")))
    }
}

/// An element whose closing tag has not been read yet.
struct Frame {
    name: String,
    children: BTreeMap<String, XmlNode>,
    text: String,
}

impl Frame {
    fn new(name: String) -> Self {
        Self {
            name,
            children: BTreeMap::new(),
            text: String::new(),
        }
    }

    fn finish(self) -> (String, XmlNode) {
        let node = if self.children.is_empty() {
            XmlNode::Text(self.text)
        } else {
            XmlNode::Element(self.children)
        };
        (self.name, node)
    }
}

fn utf8(bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(String::from)
        .map_err(|e| CarrierError::malformed(format!("Invalid UTF-8 in tag name: {}", e)))
}
