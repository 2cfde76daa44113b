//! Namespace-qualified path queries over parsed XML.
//!
//! Parsing is done by `sxd-document` and evaluation by `sxd-xpath`. Matches are
//! returned as owned [`XmlNode`] snapshots so callers never hold borrows into
//! the parsed tree.

use crate::common::encoding::decode_xml_text;
use sxd_document::Package;
use sxd_document::dom::ChildOfElement;
use sxd_xpath::nodeset::Node;
use sxd_xpath::{Context, Factory, Value};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum XmlError {
    #[error("XML parse error: {0}")]
    Parse(String),

    #[error("Invalid path expression '{0}'")]
    InvalidQuery(String),

    #[error("Path evaluation failed for '{expr}': {reason}")]
    Evaluation { expr: String, reason: String },
}

/// What a matched node is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XmlNodeKind {
    Root,
    Element,
    Attribute,
    Text,
    /// Comments, processing instructions and namespace nodes
    Other,
    /// Scalar result of an expression such as `count(...)` or `string(...)`
    Value,
}

/// Owned snapshot of one query match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlNode {
    pub kind: XmlNodeKind,
    /// Local name of an element or attribute
    pub name: Option<String>,
    /// Text directly inside an element up to its first non-text child (element,
    /// comment or processing instruction), or the value of an attribute/text
    /// node. `None` when there is no such text.
    pub text: Option<String>,
    /// XPath string-value (all descendant text for elements)
    pub value: String,
    /// Child elements in document order
    pub children: Vec<XmlNode>,
}

/// A parsed XML document.
pub struct XmlTree {
    package: Package,
}

impl std::fmt::Debug for XmlTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XmlTree").finish_non_exhaustive()
    }
}

impl XmlTree {
    /// Parse raw XML bytes (UTF-8 or UTF-16).
    pub fn parse(bytes: &[u8]) -> Result<Self, XmlError> {
        let text = decode_xml_text(bytes).map_err(XmlError::Parse)?;
        let package =
            sxd_document::parser::parse(&text).map_err(|e| XmlError::Parse(format!("{:?}", e)))?;
        Ok(Self { package })
    }

    /// Evaluate `expr` with the given `(prefix, namespace URI)` bindings.
    ///
    /// Node-set results come back in document order. Scalar results are returned
    /// as a single [`XmlNodeKind::Value`] node.
    pub fn query(&self, expr: &str, namespaces: &[(&str, &str)]) -> Result<Vec<XmlNode>, XmlError> {
        let factory = Factory::new();
        let xpath = match factory.build(expr) {
            Ok(Some(xpath)) => xpath,
            _ => return Err(XmlError::InvalidQuery(expr.to_string())),
        };

        let mut context = Context::new();
        for (prefix, uri) in namespaces {
            context.set_namespace(prefix, uri);
        }

        let document = self.package.as_document();
        let value = xpath
            .evaluate(&context, document.root())
            .map_err(|e| XmlError::Evaluation {
                expr: expr.to_string(),
                reason: format!("{:?}", e),
            })?;

        Ok(match value {
            Value::Nodeset(nodes) => nodes.document_order().into_iter().map(snapshot).collect(),
            Value::Boolean(b) => vec![scalar(b.to_string())],
            Value::Number(n) => vec![scalar(n.to_string())],
            Value::String(s) => vec![scalar(s)],
        })
    }
}

fn scalar(value: String) -> XmlNode {
    XmlNode {
        kind: XmlNodeKind::Value,
        name: None,
        text: Some(value.clone()),
        value,
        children: Vec::new(),
    }
}

fn snapshot(node: Node<'_>) -> XmlNode {
    let value = node.string_value();
    match node {
        Node::Element(element) => {
            let mut leading = String::new();
            let mut leading_done = false;
            let mut children = Vec::new();
            for child in element.children() {
                match child {
                    ChildOfElement::Text(t) if !leading_done => leading.push_str(t.text()),
                    ChildOfElement::Text(_) => {},
                    ChildOfElement::Element(e) => {
                        leading_done = true;
                        children.push(snapshot(Node::Element(e)));
                    },
                    // Comments and processing instructions also end the leading run.
                    _ => leading_done = true,
                }
            }
            XmlNode {
                kind: XmlNodeKind::Element,
                name: Some(element.name().local_part().to_string()),
                text: (!leading.is_empty()).then_some(leading),
                value,
                children,
            }
        },
        Node::Attribute(attribute) => XmlNode {
            kind: XmlNodeKind::Attribute,
            name: Some(attribute.name().local_part().to_string()),
            text: Some(attribute.value().to_string()),
            value,
            children: Vec::new(),
        },
        Node::Text(text) => XmlNode {
            kind: XmlNodeKind::Text,
            name: None,
            text: Some(text.text().to_string()),
            value,
            children: Vec::new(),
        },
        Node::Root(_) => XmlNode {
            kind: XmlNodeKind::Root,
            name: None,
            text: None,
            value,
            children: Vec::new(),
        },
        _ => XmlNode {
            kind: XmlNodeKind::Other,
            name: None,
            text: None,
            value,
            children: Vec::new(),
        },
    }
}
