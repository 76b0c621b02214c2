//! Shared formatting types and WordprocessingML schema ordering.

use crate::common::unit::Length;
use crate::common::xml::XmlElement;
use serde::{Deserialize, Serialize};

/// Paragraph alignment options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParagraphAlignment {
    Left,
    Center,
    Right,
    Justify,
}

impl ParagraphAlignment {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Justify => "both",
        }
    }

    pub(crate) fn from_attr(value: &str) -> Option<Self> {
        match value {
            "left" | "start" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" | "end" => Some(Self::Right),
            "both" | "distribute" => Some(Self::Justify),
            _ => None,
        }
    }
}

/// Horizontal placement of a whole table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableAlignment {
    Left,
    Center,
    Right,
}

impl TableAlignment {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }

    pub(crate) fn from_attr(value: &str) -> Option<Self> {
        match value {
            "left" | "start" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" | "end" => Some(Self::Right),
            _ => None,
        }
    }
}

/// Border styles for tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TableBorderStyle {
    None,
    Single,
    Thick,
    Double,
    Dotted,
    Dashed,
    DotDash,
    DotDotDash,
}

impl TableBorderStyle {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Single => "single",
            Self::Thick => "thick",
            Self::Double => "double",
            Self::Dotted => "dotted",
            Self::Dashed => "dashed",
            Self::DotDash => "dotDash",
            Self::DotDotDash => "dotDotDash",
        }
    }

    pub(crate) fn from_attr(value: &str) -> Option<Self> {
        match value {
            "none" | "nil" => Some(Self::None),
            "single" => Some(Self::Single),
            "thick" => Some(Self::Thick),
            "double" => Some(Self::Double),
            "dotted" => Some(Self::Dotted),
            "dashed" => Some(Self::Dashed),
            "dotDash" => Some(Self::DotDash),
            "dotDotDash" => Some(Self::DotDotDash),
            _ => None,
        }
    }
}

/// Border definition for one edge of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableBorder {
    /// Border style
    pub style: TableBorderStyle,
    /// Line weight, written in eighths of a point
    pub weight: Length,
    /// Border color in hex RGB format (e.g., "FF0000" for red)
    pub color: String,
}

impl Default for TableBorder {
    fn default() -> Self {
        Self {
            style: TableBorderStyle::Single,
            weight: Length::pt(0.5),
            color: "000000".to_string(),
        }
    }
}

impl TableBorder {
    fn to_element(&self, name: &str) -> XmlElement {
        let mut size = itoa::Buffer::new();
        XmlElement::new(name)
            .with_attr("w:val", self.style.as_str())
            .with_attr("w:sz", size.format(self.weight.eighth_points()))
            .with_attr("w:space", "0")
            .with_attr("w:color", self.color.as_str())
    }

    fn from_element(element: &XmlElement) -> Option<Self> {
        let style = TableBorderStyle::from_attr(element.attr("w:val")?)?;
        let eighths: u32 = element.attr("w:sz").and_then(|v| v.parse().ok()).unwrap_or(0);
        Some(Self {
            style,
            weight: Length::pt(f64::from(eighths) / 8.0),
            color: element.attr("w:color").unwrap_or("auto").to_string(),
        })
    }
}

/// Table borders (all sides).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableBorders {
    pub top: Option<TableBorder>,
    pub left: Option<TableBorder>,
    pub bottom: Option<TableBorder>,
    pub right: Option<TableBorder>,
    pub inside_h: Option<TableBorder>,
    pub inside_v: Option<TableBorder>,
}

impl TableBorders {
    /// The same border on every edge, inside lines included.
    pub fn uniform(border: TableBorder) -> Self {
        Self {
            top: Some(border.clone()),
            left: Some(border.clone()),
            bottom: Some(border.clone()),
            right: Some(border.clone()),
            inside_h: Some(border.clone()),
            inside_v: Some(border),
        }
    }

    fn edges(&self) -> [(&'static str, &Option<TableBorder>); 6] {
        [
            ("w:top", &self.top),
            ("w:left", &self.left),
            ("w:bottom", &self.bottom),
            ("w:right", &self.right),
            ("w:insideH", &self.inside_h),
            ("w:insideV", &self.inside_v),
        ]
    }

    pub(crate) fn to_element(&self) -> XmlElement {
        let mut element = XmlElement::new("w:tblBorders");
        for (name, border) in self.edges() {
            if let Some(border) = border {
                element = element.with_child(border.to_element(name));
            }
        }
        element
    }

    pub(crate) fn from_element(element: &XmlElement) -> Self {
        let edge = |names: &[&str]| {
            element
                .elements()
                .find(|e| names.contains(&e.name.as_str()))
                .and_then(TableBorder::from_element)
        };
        Self {
            top: edge(&["w:top"]),
            left: edge(&["w:left", "w:start"]),
            bottom: edge(&["w:bottom"]),
            right: edge(&["w:right", "w:end"]),
            inside_h: edge(&["w:insideH"]),
            inside_v: edge(&["w:insideV"]),
        }
    }
}

/// Page margins of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margins {
    pub top: Length,
    pub bottom: Length,
    pub left: Length,
    pub right: Length,
}

impl Margins {
    pub fn uniform(length: Length) -> Self {
        Self {
            top: length,
            bottom: length,
            left: length,
            right: length,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(Length::cm(2.54))
    }
}

static PPR_ORDER: phf::Map<&'static str, u8> = phf::phf_map! {
    "w:pStyle" => 0, "w:keepNext" => 1, "w:keepLines" => 2, "w:pageBreakBefore" => 3,
    "w:framePr" => 4, "w:widowControl" => 5, "w:numPr" => 6, "w:suppressLineNumbers" => 7,
    "w:pBdr" => 8, "w:shd" => 9, "w:tabs" => 10, "w:suppressAutoHyphens" => 11,
    "w:kinsoku" => 12, "w:wordWrap" => 13, "w:overflowPunct" => 14, "w:topLinePunct" => 15,
    "w:autoSpaceDE" => 16, "w:autoSpaceDN" => 17, "w:bidi" => 18, "w:adjustRightInd" => 19,
    "w:snapToGrid" => 20, "w:spacing" => 21, "w:ind" => 22, "w:contextualSpacing" => 23,
    "w:mirrorIndents" => 24, "w:suppressOverlap" => 25, "w:jc" => 26, "w:textDirection" => 27,
    "w:textAlignment" => 28, "w:textboxTightWrap" => 29, "w:outlineLvl" => 30, "w:divId" => 31,
    "w:cnfStyle" => 32, "w:rPr" => 33, "w:sectPr" => 34, "w:pPrChange" => 35,
};

static RPR_ORDER: phf::Map<&'static str, u8> = phf::phf_map! {
    "w:rStyle" => 0, "w:rFonts" => 1, "w:b" => 2, "w:bCs" => 3, "w:i" => 4, "w:iCs" => 5,
    "w:caps" => 6, "w:smallCaps" => 7, "w:strike" => 8, "w:dstrike" => 9, "w:outline" => 10,
    "w:shadow" => 11, "w:emboss" => 12, "w:imprint" => 13, "w:noProof" => 14,
    "w:snapToGrid" => 15, "w:vanish" => 16, "w:webHidden" => 17, "w:color" => 18,
    "w:spacing" => 19, "w:w" => 20, "w:kern" => 21, "w:position" => 22, "w:sz" => 23,
    "w:szCs" => 24, "w:highlight" => 25, "w:u" => 26, "w:effect" => 27, "w:bdr" => 28,
    "w:shd" => 29, "w:fitText" => 30, "w:vertAlign" => 31, "w:rtl" => 32, "w:cs" => 33,
    "w:em" => 34, "w:lang" => 35, "w:eastAsianLayout" => 36, "w:specVanish" => 37,
    "w:oMath" => 38, "w:rPrChange" => 39,
};

static TBLPR_ORDER: phf::Map<&'static str, u8> = phf::phf_map! {
    "w:tblStyle" => 0, "w:tblpPr" => 1, "w:tblOverlap" => 2, "w:bidiVisual" => 3,
    "w:tblStyleRowBandSize" => 4, "w:tblStyleColBandSize" => 5, "w:tblW" => 6, "w:jc" => 7,
    "w:tblCellSpacing" => 8, "w:tblInd" => 9, "w:tblBorders" => 10, "w:shd" => 11,
    "w:tblLayout" => 12, "w:tblCellMar" => 13, "w:tblLook" => 14, "w:tblCaption" => 15,
    "w:tblDescription" => 16, "w:tblPrChange" => 17,
};

static TCPR_ORDER: phf::Map<&'static str, u8> = phf::phf_map! {
    "w:cnfStyle" => 0, "w:tcW" => 1, "w:gridSpan" => 2, "w:hMerge" => 3, "w:vMerge" => 4,
    "w:tcBorders" => 5, "w:shd" => 6, "w:noWrap" => 7, "w:tcMar" => 8,
    "w:textDirection" => 9, "w:tcFitText" => 10, "w:vAlign" => 11, "w:hideMark" => 12,
    "w:headers" => 13, "w:cellIns" => 14, "w:cellDel" => 15, "w:cellMerge" => 16,
    "w:tcPrChange" => 17,
};

static SECTPR_ORDER: phf::Map<&'static str, u8> = phf::phf_map! {
    "w:headerReference" => 0, "w:footerReference" => 0, "w:footnotePr" => 1,
    "w:endnotePr" => 2, "w:type" => 3, "w:pgSz" => 4, "w:pgMar" => 5, "w:paperSrc" => 6,
    "w:pgBorders" => 7, "w:lnNumType" => 8, "w:pgNumType" => 9, "w:cols" => 10,
    "w:formProt" => 11, "w:vAlign" => 12, "w:noEndnote" => 13, "w:titlePg" => 14,
    "w:textDirection" => 15, "w:bidi" => 16, "w:rtlGutter" => 17, "w:docGrid" => 18,
    "w:printerSettings" => 19, "w:sectPrChange" => 20,
};

pub(crate) fn ppr_rank(name: &str) -> Option<u8> {
    PPR_ORDER.get(name).copied()
}

pub(crate) fn rpr_rank(name: &str) -> Option<u8> {
    RPR_ORDER.get(name).copied()
}

pub(crate) fn tblpr_rank(name: &str) -> Option<u8> {
    TBLPR_ORDER.get(name).copied()
}

pub(crate) fn tcpr_rank(name: &str) -> Option<u8> {
    TCPR_ORDER.get(name).copied()
}

pub(crate) fn sectpr_rank(name: &str) -> Option<u8> {
    SECTPR_ORDER.get(name).copied()
}

/// Whether an on/off property element (`<w:b/>`, `<w:b w:val="0"/>`) is on.
pub(crate) fn on_off(element: &XmlElement) -> bool {
    !matches!(element.attr("w:val"), Some("0" | "false" | "off"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_border_element() {
        let xml = TableBorders::uniform(TableBorder::default())
            .to_element()
            .to_xml_string();
        assert_eq!(
            xml,
            "<w:tblBorders>\
             <w:top w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"000000\"/>\
             <w:left w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"000000\"/>\
             <w:bottom w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"000000\"/>\
             <w:right w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"000000\"/>\
             <w:insideH w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"000000\"/>\
             <w:insideV w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"000000\"/>\
             </w:tblBorders>"
        );
    }

    #[test]
    fn test_borders_read_back() {
        let borders = TableBorders::uniform(TableBorder::default());
        assert_eq!(TableBorders::from_element(&borders.to_element()), borders);
    }

    #[test]
    fn test_alignment_attr_values() {
        assert_eq!(ParagraphAlignment::Justify.as_str(), "both");
        assert_eq!(
            ParagraphAlignment::from_attr("start"),
            Some(ParagraphAlignment::Left)
        );
        assert_eq!(TableAlignment::from_attr("center"), Some(TableAlignment::Center));
        assert_eq!(TableAlignment::from_attr("bogus"), None);
    }

    #[test]
    fn test_on_off() {
        assert!(on_off(&XmlElement::new("w:b")));
        assert!(on_off(&XmlElement::new("w:b").with_attr("w:val", "true")));
        assert!(!on_off(&XmlElement::new("w:b").with_attr("w:val", "0")));
    }
}
