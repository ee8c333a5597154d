use chrono::NaiveDate;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use rust_decimal::Decimal;
use std::io::Cursor;

use crate::core::{MappingError, round_to};

pub type XmlResult = Result<String, MappingError>;

fn xml_io(e: std::io::Error) -> MappingError {
    MappingError::Xml(format!("XML write error: {e}"))
}

pub struct XmlWriter {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl XmlWriter {
    pub fn new() -> Result<Self, MappingError> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_io)?;
        Ok(Self { writer })
    }

    pub fn into_string(self) -> XmlResult {
        let buf = self.writer.into_inner().into_inner();
        String::from_utf8(buf).map_err(|e| MappingError::Xml(format!("XML UTF-8 error: {e}")))
    }

    pub fn start_element(&mut self, name: &str) -> Result<&mut Self, MappingError> {
        self.writer
            .write_event(Event::Start(BytesStart::new(name)))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn start_element_with_attrs(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, MappingError> {
        let mut elem = BytesStart::new(name);
        for (k, v) in attrs {
            elem.push_attribute((*k, *v));
        }
        self.writer
            .write_event(Event::Start(elem))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn end_element(&mut self, name: &str) -> Result<&mut Self, MappingError> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn text_element(&mut self, name: &str, text: &str) -> Result<&mut Self, MappingError> {
        self.start_element(name)?;
        self.writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_io)?;
        self.end_element(name)
    }

    /// Write `name` only when `text` is present and not blank.
    pub fn optional_text_element(
        &mut self,
        name: &str,
        text: Option<&str>,
    ) -> Result<&mut Self, MappingError> {
        match text.map(str::trim).filter(|t| !t.is_empty()) {
            Some(t) => self.text_element(name, t),
            None => Ok(self),
        }
    }

    pub fn text_element_with_attrs(
        &mut self,
        name: &str,
        text: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, MappingError> {
        self.start_element_with_attrs(name, attrs)?;
        self.writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_io)?;
        self.end_element(name)
    }

    /// Write a decimal amount with currencyID attribute.
    pub fn amount_element(
        &mut self,
        name: &str,
        amount: Decimal,
        currency: &str,
    ) -> Result<&mut Self, MappingError> {
        self.text_element_with_attrs(name, &format_decimal(amount), &[("currencyID", currency)])
    }

    /// Write a unit price with exactly `scale` fractional digits.
    pub fn price_element(
        &mut self,
        name: &str,
        price: Decimal,
        scale: u32,
        currency: &str,
    ) -> Result<&mut Self, MappingError> {
        self.text_element_with_attrs(name, &format_fixed(price, scale), &[("currencyID", currency)])
    }

    /// Write a quantity with unitCode attribute.
    pub fn quantity_element(
        &mut self,
        name: &str,
        qty: Decimal,
        unit: &str,
    ) -> Result<&mut Self, MappingError> {
        self.text_element_with_attrs(name, &format_decimal(qty), &[("unitCode", unit)])
    }

    /// ISO 8601 calendar date (`YYYY-MM-DD`).
    pub fn date_element(&mut self, name: &str, date: NaiveDate) -> Result<&mut Self, MappingError> {
        self.text_element(name, &date.format("%Y-%m-%d").to_string())
    }

    /// `<wrapper><cbc:ID>value</cbc:ID></wrapper>`, the common UBL reference
    /// shape. Skipped when `value` is absent or blank.
    pub fn id_reference(
        &mut self,
        wrapper: &str,
        value: Option<&str>,
    ) -> Result<&mut Self, MappingError> {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(v) => {
                self.start_element(wrapper)?;
                self.text_element("cbc:ID", v)?;
                self.end_element(wrapper)
            }
            None => Ok(self),
        }
    }
}

/// Format a Decimal for XML output: at least 2 decimal places, trailing
/// zeros beyond that stripped.
pub fn format_decimal(d: Decimal) -> String {
    let s = d.normalize().to_string();
    if let Some(dot_pos) = s.find('.') {
        let decimals = s.len() - dot_pos - 1;
        if decimals < 2 {
            format!("{s}{}", "0".repeat(2 - decimals))
        } else {
            s
        }
    } else {
        format!("{s}.00")
    }
}

/// Format a Decimal with exactly `scale` fractional digits, rounding ties
/// away from zero.
pub fn format_fixed(d: Decimal, scale: u32) -> String {
    let mut fixed = round_to(d, scale);
    fixed.rescale(scale);
    fixed.to_string()
}
