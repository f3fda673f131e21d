//! ZPL command builder and renderer
//!
//! Provides a fluent API for building ZPL label data, and a renderer that
//! lowers a [`LayoutPlan`] onto it. Plan coordinates are 72 dpi points; the
//! renderer scales them to 203 dpi printer dots, so both label targets share
//! one geometry source.

use tracing::{info, instrument};

use crate::assets::AssetStore;
use crate::error::LabelResult;
use crate::layout::{Align, Element, LayoutPlan, TextStyle};

/// Dots per point on a 203 dpi printhead.
const DOTS_PER_PT: f32 = 203.0 / 72.0;

/// ZPL command builder
///
/// Builds one `^XA`..`^XZ` label format. Field data is sanitized so user
/// text cannot inject command or control prefixes.
pub struct ZplBuilder {
    buf: String,
}

impl ZplBuilder {
    pub fn new() -> Self {
        Self { buf: String::from("^XA\n") }
    }

    /// Set the label width and length in dots.
    pub fn page(&mut self, width: u32, height: u32) -> &mut Self {
        self.buf.push_str(&format!("^PW{}\n^LL{}\n", width, height));
        self
    }

    /// Position the next field at (x, y) dots from the label home.
    pub fn field_origin(&mut self, x: u32, y: u32) -> &mut Self {
        self.buf.push_str(&format!("^FO{},{}", x, y));
        self
    }

    /// Scalable font 0 at the given character height in dots.
    pub fn font(&mut self, height: u32) -> &mut Self {
        self.buf.push_str(&format!("^A0N,{},{}", height, height));
        self
    }

    /// Field block: wrap/align the next field data within `width` dots.
    pub fn field_block(&mut self, width: u32, align: Align) -> &mut Self {
        let justify = match align {
            Align::Left => 'L',
            Align::Center => 'C',
            Align::Right => 'R',
        };
        self.buf.push_str(&format!("^FB{},1,0,{},0", width, justify));
        self
    }

    /// Emit field data and close the field.
    pub fn field_data(&mut self, data: &str) -> &mut Self {
        self.buf.push_str("^FD");
        self.buf.push_str(&sanitize(data));
        self.buf.push_str("^FS\n");
        self
    }

    /// Filled box (used at 1-2 dots height as a horizontal rule).
    pub fn graphic_box(&mut self, width: u32, height: u32) -> &mut Self {
        self.buf
            .push_str(&format!("^GB{},{},{}^FS\n", width, height, height.min(width)));
        self
    }

    /// Code 128 barcode field without an interpretation line; the layout
    /// places the human-readable SKU as its own text element.
    pub fn barcode_code128(&mut self, module_width: u32, height: u32, data: &str) -> &mut Self {
        self.buf.push_str(&format!("^BY{}\n", module_width.max(1)));
        self.buf.push_str(&format!("^BCN,{},N,N,N", height));
        self.field_data(data)
    }

    /// Uncompressed bitmap graphic field (^GFA).
    pub fn graphic_field(&mut self, bytes_per_row: u32, rows: u32, hex: &str) -> &mut Self {
        let total = bytes_per_row * rows;
        self.buf
            .push_str(&format!("^GFA,{},{},{},{}^FS\n", total, total, bytes_per_row, hex));
        self
    }

    /// Close the format and return the command text.
    pub fn finish(mut self) -> String {
        self.buf.push_str("^XZ\n");
        self.buf
    }
}

impl Default for ZplBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip ZPL command/control prefixes from field data.
fn sanitize(data: &str) -> String {
    data.chars()
        .filter(|c| !matches!(c, '^' | '~') && !c.is_control())
        .collect()
}

/// ZPL renderer over a logo asset store.
pub struct ZplRenderer {
    assets: AssetStore,
}

impl ZplRenderer {
    pub fn new(assets: AssetStore) -> Self {
        Self { assets }
    }

    /// Lower one plan to one `^XA`..`^XZ` format.
    #[instrument(skip_all, fields(elements = plan.elements.len()))]
    pub fn render(&self, plan: &LayoutPlan) -> LabelResult<String> {
        let mut zpl = ZplBuilder::new();
        zpl.page(dots(plan.page_width), dots(plan.page_height));

        for element in &plan.elements {
            match element {
                Element::Logo { x, y, width, variant } => {
                    // Decorative: a missing asset drops the element, never
                    // the label.
                    if let Some(img) = self.assets.logo(*variant) {
                        let raster = rasterize(&img, dots(*width));
                        zpl.field_origin(dots(*x), dots(*y)).graphic_field(
                            raster.bytes_per_row,
                            raster.rows,
                            &raster.hex,
                        );
                    }
                }
                Element::Text { x, y, width, text, style } => {
                    render_text(&mut zpl, *x, *y, *width, text, style);
                }
                Element::Rule { x, y, width } => {
                    zpl.field_origin(dots(*x), dots(*y)).graphic_box(dots(*width), 2);
                }
                // The box width stays unused: the printer sizes native ^BC
                // symbols from the ^BY module width.
                Element::Barcode { x, y, width: _, height, data } => {
                    // Validate here so the command target fails for exactly
                    // the inputs the document target fails for.
                    crate::code128::encode(data)?;
                    zpl.field_origin(dots(*x), dots(*y))
                        .barcode_code128(2, dots(*height), data);
                }
            }
        }

        let text = zpl.finish();
        info!(bytes = text.len(), "rendered zpl format");
        Ok(text)
    }
}

fn dots(pt: f32) -> u32 {
    (pt * DOTS_PER_PT).round().max(0.0) as u32
}

fn render_text(zpl: &mut ZplBuilder, x: f32, y: f32, width: f32, text: &str, style: &TextStyle) {
    // ^A0 has no bold face; bold text gets a slightly taller glyph instead.
    let height = if style.bold { style.size * 1.1 } else { style.size };
    zpl.field_origin(dots(x), dots(y))
        .font(dots(height))
        .field_block(dots(width), style.align)
        .field_data(text);
}

/// 1-bit raster of a logo, packed MSB-first for ^GFA.
struct LogoRaster {
    bytes_per_row: u32,
    rows: u32,
    hex: String,
}

/// Resize to the target width (preserving aspect), threshold to monochrome,
/// and hex-encode row by row.
fn rasterize(img: &image::DynamicImage, target_width: u32) -> LogoRaster {
    let target_width = target_width.max(8);
    let target_height =
        ((target_width as f32 * img.height() as f32 / img.width() as f32).round() as u32).max(1);
    let gray = img
        .resize_exact(target_width, target_height, image::imageops::FilterType::Lanczos3)
        .to_luma8();

    let bytes_per_row = target_width.div_ceil(8);
    let mut hex = String::with_capacity((bytes_per_row * target_height * 2) as usize);
    for y in 0..target_height {
        for byte_x in 0..bytes_per_row {
            let mut byte = 0u8;
            for bit in 0..8 {
                let x = byte_x * 8 + bit;
                if x < target_width && gray.get_pixel(x, y).0[0] < 128 {
                    byte |= 0x80 >> bit;
                }
            }
            hex.push_str(&format!("{:02X}", byte));
        }
    }

    LogoRaster { bytes_per_row, rows: target_height, hex }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutEngine;
    use crate::record::CanonicalLabelRecord;

    fn renderer() -> ZplRenderer {
        ZplRenderer::new(AssetStore::new("/nonexistent/assets"))
    }

    fn record() -> CanonicalLabelRecord {
        CanonicalLabelRecord {
            sku: "IVM-100".to_string(),
            original_order_no: "1".to_string(),
            ivc_status: "PASS".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_format_is_delimited() {
        let plan = LayoutEngine::standard().plan(&record()).unwrap();
        let zpl = renderer().render(&plan).unwrap();
        assert!(zpl.starts_with("^XA"));
        assert!(zpl.trim_end().ends_with("^XZ"));
    }

    #[test]
    fn test_page_size_in_dots() {
        let plan = LayoutEngine::standard().plan(&record()).unwrap();
        let zpl = renderer().render(&plan).unwrap();
        // 288 pt and 432 pt at 203 dpi
        assert!(zpl.contains("^PW812"));
        assert!(zpl.contains("^LL1218"));
    }

    #[test]
    fn test_barcode_carries_sku() {
        let plan = LayoutEngine::standard().plan(&record()).unwrap();
        let zpl = renderer().render(&plan).unwrap();
        assert!(zpl.contains("^BCN"));
        assert!(zpl.contains("^FDIVM-100^FS"));
        // No interpretation line under the bars.
        assert!(zpl.contains(",N,N,N"));
    }

    #[test]
    fn test_field_data_is_sanitized() {
        let mut zpl = ZplBuilder::new();
        zpl.field_origin(0, 0).field_data("A^B~C\u{1}D");
        let out = zpl.finish();
        assert!(out.contains("^FDABCD^FS"));
    }

    #[test]
    fn test_rasterize_packs_rows() {
        let img = image::DynamicImage::ImageLuma8(image::GrayImage::from_pixel(16, 8, image::Luma([0])));
        let raster = rasterize(&img, 16);
        assert_eq!(raster.bytes_per_row, 2);
        assert_eq!(raster.rows, 8);
        // All-black source stays all-ones after threshold.
        assert_eq!(raster.hex, "FF".repeat(16));
    }

    #[test]
    fn test_missing_logo_asset_does_not_fail_render() {
        let plan = LayoutEngine::standard().plan(&record()).unwrap();
        let zpl = renderer().render(&plan).unwrap();
        assert!(!zpl.contains("^GFA"));
    }
}
