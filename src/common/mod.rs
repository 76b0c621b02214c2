//! Shared utilities: length units and the XML element tree.

pub mod unit;
pub mod xml;

pub use unit::{Length, LengthUnit};
pub use xml::{XmlDocument, XmlElement, XmlNode};
