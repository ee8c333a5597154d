use super::tree::{self, Element};
use super::SourceDialect;
#[cfg(feature = "idoc")]
use super::IdocDocument;
#[cfg(feature = "vasco")]
use super::VascoDocument;
use crate::core::raw::RawInvoice;
use crate::core::{Dialect, MappingError};

/// A parsed source document whose dialect has been decided.
#[derive(Debug, Clone)]
pub enum SourceDocument {
    #[cfg(feature = "idoc")]
    IDoc(IdocDocument),
    #[cfg(feature = "vasco")]
    Intermediary(VascoDocument),
}

impl SourceDocument {
    /// Parse XML text and detect its dialect.
    pub fn parse(xml: &str) -> Result<Self, MappingError> {
        Self::detect(tree::parse(xml)?)
    }

    /// Classify a document by its root: `INVOIC02/IDOC` or
    /// `Document/Invoice`. Any other root is rejected.
    pub fn detect(root: Element) -> Result<Self, MappingError> {
        let root_name = root.name.clone();
        let detected = match root_name.as_str() {
            #[cfg(feature = "idoc")]
            "INVOIC02" => {
                let idoc = take_child(root, "IDOC")
                    .ok_or_else(|| MappingError::missing("segment INVOIC02/IDOC"))?;
                Self::IDoc(IdocDocument::new(idoc))
            }
            #[cfg(feature = "vasco")]
            "Document" => {
                let invoice = take_child(root, "Invoice")
                    .ok_or_else(|| MappingError::missing("element Document/Invoice"))?;
                Self::Intermediary(VascoDocument::new(invoice))
            }
            other => return Err(MappingError::UnrecognizedRoot(other.to_string())),
        };
        tracing::debug!(dialect = detected.dialect().name(), "source dialect detected");
        Ok(detected)
    }
}

impl SourceDialect for SourceDocument {
    fn dialect(&self) -> Dialect {
        match self {
            #[cfg(feature = "idoc")]
            Self::IDoc(doc) => doc.dialect(),
            #[cfg(feature = "vasco")]
            Self::Intermediary(doc) => doc.dialect(),
        }
    }

    fn extract(&self) -> Result<RawInvoice, MappingError> {
        match self {
            #[cfg(feature = "idoc")]
            Self::IDoc(doc) => doc.extract(),
            #[cfg(feature = "vasco")]
            Self::Intermediary(doc) => doc.extract(),
        }
    }
}

fn take_child(mut parent: Element, name: &str) -> Option<Element> {
    let pos = parent.children.iter().position(|c| c.name == name)?;
    Some(parent.children.swap_remove(pos))
}
