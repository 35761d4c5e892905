use crate::error::{DashboardError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::path::Path;
use std::str::FromStr;

/// A parsed XML element with its attributes, children and text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlNode {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
    pub text: String,
}

impl XmlNode {
    fn from_start(e: &BytesStart<'_>) -> Self {
        let attributes = e
            .attributes()
            .flatten()
            .map(|attr| {
                let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
                let value = attr
                    .unescape_value()
                    .map(|value| value.to_string())
                    .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).to_string());
                (key, value)
            })
            .collect();
        Self {
            name: String::from_utf8_lossy(e.name().as_ref()).to_string(),
            attributes,
            children: Vec::new(),
            text: String::new(),
        }
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// Attribute parsed as `T`; `None` when absent or not a valid `T`.
    pub fn attr_as<T: FromStr>(&self, key: &str) -> Option<T> {
        self.attr(key).and_then(|value| value.trim().parse().ok())
    }

    /// Attribute that must be present and numeric.
    pub fn required_attr<T: FromStr>(&self, key: &str, path: &Path) -> Result<T> {
        self.attr_as(key).ok_or_else(|| {
            DashboardError::malformed(
                path,
                format!("<{}> is missing numeric attribute \"{}\"", self.name, key),
            )
        })
    }

    /// Attribute defaulting to zero when absent, but rejected when not numeric.
    pub fn optional_attr<T: FromStr + Default>(&self, key: &str, path: &Path) -> Result<T> {
        match self.attr(key) {
            None => Ok(T::default()),
            Some(_) => self.required_attr(key, path),
        }
    }

    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|child| child.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }
}

pub fn parse(xml: &str) -> Result<XmlNode> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => stack.push(XmlNode::from_start(&e)),
            Event::Empty(e) => {
                let node = XmlNode::from_start(&e);
                attach(&mut stack, &mut root, node);
            }
            Event::End(_) => {
                if let Some(node) = stack.pop() {
                    attach(&mut stack, &mut root, node);
                }
            }
            Event::Text(e) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&e.unescape()?);
                }
            }
            Event::CData(e) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(DashboardError::malformed(
            Path::new("<xml>"),
            format!("element <{}> is never closed", open.name),
        ));
    }
    root.ok_or_else(|| {
        DashboardError::malformed(Path::new("<xml>"), "document has no root element")
    })
}

fn attach(stack: &mut [XmlNode], root: &mut Option<XmlNode>, node: XmlNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => {
            if root.is_none() {
                *root = Some(node);
            }
        }
    }
}

/// Parses `content` read from `path`, tagging failures with the file name.
pub fn parse_report(content: &str, path: &Path) -> Result<XmlNode> {
    parse(content).map_err(|e| match e {
        DashboardError::MalformedReport { reason, .. } => DashboardError::malformed(path, reason),
        other => DashboardError::malformed(path, other.to_string()),
    })
}
