//! Label layout engine
//!
//! Computes the placement of every element on one 4x6 inch label from a
//! canonical record. The output [`LayoutPlan`] is target-neutral: the PDF
//! renderer consumes it in 72 dpi points, the ZPL renderer scales the same
//! coordinates to printer dots, so both targets keep identical element
//! order and relative spacing.
//!
//! All geometry constants live in [`LayoutConfig`]. Historical revisions of
//! the label differed only in these constants; a revision is an alternate
//! config table, never a separate code path.

use crate::brand::{BrandTable, LogoVariant};
use crate::code128;
use crate::error::{LabelError, LabelResult};
use crate::record::{CanonicalLabelRecord, format_date};

/// Horizontal alignment within an element's box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Immutable style descriptor for one text element.
///
/// Renderers receive the full style with every element and keep no font
/// state of their own between elements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub bold: bool,
    pub align: Align,
}

/// One placed element. Coordinates are points (72 dpi), origin top-left.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Logo {
        x: f32,
        y: f32,
        width: f32,
        variant: LogoVariant,
    },
    Text {
        x: f32,
        y: f32,
        width: f32,
        text: String,
        style: TextStyle,
    },
    Rule {
        x: f32,
        y: f32,
        width: f32,
    },
    Barcode {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        data: String,
    },
}

/// Ordered element sequence for one label surface.
#[derive(Debug, Clone)]
pub struct LayoutPlan {
    pub page_width: f32,
    pub page_height: f32,
    pub elements: Vec<Element>,
}

/// Geometry and typography constants, in points on a 288x432 pt page.
///
/// One table per label revision; [`LayoutConfig::standard`] is the current
/// one.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,

    pub header_top: f32,
    pub logo_width: f32,
    pub title_size: f32,
    pub header_rule_y: f32,

    pub body_size: f32,
    pub row_height: f32,
    pub block_gap: f32,
    pub fields_top: f32,

    /// Deliberately larger than `block_gap`: separates the identifying
    /// header info from the product-identifying footer.
    pub sku_gap: f32,
    pub sku_size: f32,
    pub sku_advance: f32,

    pub barcode_height: f32,

    pub footer_size: f32,
    pub footer_height: f32,
    /// Bottom margin reserved for pre-printed stock text.
    pub footer_safety_margin: f32,
}

impl LayoutConfig {
    /// Current label revision (4x6 in at 72 dpi).
    pub fn standard() -> Self {
        Self {
            page_width: 288.0,
            page_height: 432.0,
            margin: 12.0,
            header_top: 10.0,
            logo_width: 120.0,
            title_size: 16.0,
            header_rule_y: 78.0,
            body_size: 9.0,
            row_height: 14.0,
            block_gap: 8.0,
            fields_top: 86.0,
            sku_gap: 16.0,
            sku_size: 14.0,
            sku_advance: 20.0,
            barcode_height: 40.0,
            footer_size: 18.0,
            footer_height: 22.0,
            footer_safety_margin: 24.0,
        }
    }

    pub fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::standard()
    }
}

/// Layout engine for the fixed return-label design.
pub struct LayoutEngine {
    cfg: LayoutConfig,
    brands: BrandTable,
}

impl LayoutEngine {
    pub fn new(cfg: LayoutConfig, brands: BrandTable) -> Self {
        Self { cfg, brands }
    }

    pub fn standard() -> Self {
        Self::new(LayoutConfig::standard(), BrandTable::standard())
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.cfg
    }

    /// Compute the full element placement for one record.
    ///
    /// Fails before producing any element when the SKU is missing or not
    /// barcode-encodable, so callers never see partial output for a bad
    /// record.
    pub fn plan(&self, record: &CanonicalLabelRecord) -> LabelResult<LayoutPlan> {
        let sku = record.sku.trim().to_string();
        if sku.is_empty() {
            return Err(LabelError::Input {
                record_id: record.identifier(),
                field: "sku",
            });
        }
        // Validate encodability up front; the PDF renderer encodes again
        // when drawing the bars.
        code128::encode(&sku)?;

        let cfg = &self.cfg;
        let left = cfg.margin;
        let content = cfg.content_width();
        let mut elements = Vec::new();

        // Header band: logo top-left, title top-right on the same baseline.
        elements.push(Element::Logo {
            x: left,
            y: cfg.header_top,
            width: cfg.logo_width,
            variant: self.brands.variant_for(record.lob_id),
        });
        elements.push(Element::Text {
            x: left,
            y: cfg.header_top,
            width: content,
            text: "Returns".to_uppercase(),
            style: TextStyle {
                size: cfg.title_size,
                bold: false,
                align: Align::Right,
            },
        });
        elements.push(Element::Rule {
            x: left,
            y: cfg.header_rule_y,
            width: content,
        });

        let mut cursor = cfg.fields_top;
        let row_style = TextStyle {
            size: cfg.body_size,
            bold: false,
            align: Align::Left,
        };
        let row = |elements: &mut Vec<Element>, cursor: &mut f32, label: &str, value: &str| {
            elements.push(Element::Text {
                x: left,
                y: *cursor,
                width: content,
                text: format!("{}: {}", label, value),
                style: row_style,
            });
            *cursor += cfg.row_height;
        };

        // Primary field block
        row(&mut elements, &mut cursor, "Date", &format_date(&record.create_date));
        row(&mut elements, &mut cursor, "Order #", &record.original_order_no);
        row(&mut elements, &mut cursor, "ASN #", &record.return_asn_id);

        elements.push(Element::Rule { x: left, y: cursor, width: content });
        cursor += cfg.block_gap;

        // Status block
        row(&mut elements, &mut cursor, "Return Status", &record.return_order_status);
        row(&mut elements, &mut cursor, "Reason", &record.return_reason);
        row(&mut elements, &mut cursor, "Category", &record.return_category);
        row(&mut elements, &mut cursor, "Instructions", &record.instructions);

        elements.push(Element::Rule { x: left, y: cursor, width: content });
        cursor += cfg.block_gap;

        // Identifiers block
        row(&mut elements, &mut cursor, "Receipt Id", &record.return_item_receipt_id);
        row(
            &mut elements,
            &mut cursor,
            "Condition",
            &record.return_order_line_inspection_status,
        );

        // Quantity row: three equal centered columns.
        let third = content / 3.0;
        let cells = [
            format!("Shp: {}", record.original_shipped_quantity),
            format!("Exp: {}", record.expected_return_quantity),
            format!("Act: {}", record.actual_return_quantity),
        ];
        for (i, cell) in cells.into_iter().enumerate() {
            elements.push(Element::Text {
                x: left + third * i as f32,
                y: cursor,
                width: third,
                text: cell,
                style: TextStyle {
                    size: cfg.body_size,
                    bold: false,
                    align: Align::Center,
                },
            });
        }
        cursor += cfg.row_height;

        // Rule, then the deliberately larger gap before the SKU block.
        elements.push(Element::Rule { x: left, y: cursor, width: content });
        cursor += cfg.sku_gap;

        elements.push(Element::Text {
            x: left,
            y: cursor,
            width: content,
            text: sku.clone(),
            style: TextStyle {
                size: cfg.sku_size,
                bold: false,
                align: Align::Center,
            },
        });
        cursor += cfg.sku_advance;

        elements.push(Element::Barcode {
            x: left,
            y: cursor,
            width: content,
            height: cfg.barcode_height,
            data: sku,
        });

        // Status footer: only when an inspection-verification status is
        // present. Anchored near the bottom of the page, above the safety
        // margin reserved for pre-printed stock text.
        if !record.ivc_status.trim().is_empty() {
            let y = cfg.page_height - cfg.footer_safety_margin - cfg.footer_height;
            elements.push(Element::Text {
                x: left,
                y,
                width: content,
                text: record.ivc_status.trim().to_string(),
                style: TextStyle {
                    size: cfg.footer_size,
                    bold: true,
                    align: Align::Center,
                },
            });
        }

        Ok(LayoutPlan {
            page_width: cfg.page_width,
            page_height: cfg.page_height,
            elements,
        })
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::standard()
    }
}
