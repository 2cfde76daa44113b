//! XML helpers shared by the package layer.

pub mod query;

pub use query::{XmlError, XmlNode, XmlNodeKind, XmlTree};
