//! Paginated-document rendering
//!
//! Draws [`LayoutPlan`]s into a PDF, one label per page. The plan's
//! coordinates are top-origin points; PDF pages are bottom-origin, so every
//! y flips against the page height on the way in. Barcodes are drawn as
//! filled bar rectangles from the encoded module sequence, so the printed
//! symbol is identical to what the printer-command target encodes natively.

use std::io::{BufWriter, Cursor};

use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, ColorBits, ColorSpace, ImageTransform, ImageXObject, IndirectFontRef, Line, Mm,
    PdfDocument, PdfLayerReference, Point, Polygon, Px,
};
use tracing::{info, instrument};

use crate::assets::AssetStore;
use crate::error::{LabelError, LabelResult};
use crate::layout::{Align, Element, LayoutPlan, TextStyle};
use crate::code128;

const PT_TO_MM: f32 = 0.352_777_78;

/// Helvetica average advance as a fraction of the font size. Good enough
/// for centering short single-line strings on a label.
const AVG_CHAR_WIDTH: f32 = 0.52;

/// Quiet-zone width on each side of a barcode, in modules.
const QUIET_ZONE_MODULES: usize = 10;

/// PDF renderer over a logo asset store.
pub struct PdfRenderer {
    assets: AssetStore,
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Fonts {
    fn get(&self, bold: bool) -> &IndirectFontRef {
        if bold { &self.bold } else { &self.regular }
    }
}

impl PdfRenderer {
    pub fn new(assets: AssetStore) -> Self {
        Self { assets }
    }

    /// Render one page per plan and return the document bytes.
    ///
    /// An empty plan list is rejected: the PDF format has no zero-page
    /// document and an empty batch is a caller error anyway.
    #[instrument(skip_all, fields(pages = plans.len()))]
    pub fn render(&self, plans: &[LayoutPlan]) -> LabelResult<Vec<u8>> {
        let first = plans
            .first()
            .ok_or_else(|| LabelError::Document("no pages to render".to_string()))?;

        let (doc, page1, layer1) = PdfDocument::new(
            "Return Labels",
            Mm(first.page_width * PT_TO_MM),
            Mm(first.page_height * PT_TO_MM),
            "Layer 1",
        );
        let fonts = Fonts {
            regular: doc
                .add_builtin_font(BuiltinFont::Helvetica)
                .map_err(|e| LabelError::Document(e.to_string()))?,
            bold: doc
                .add_builtin_font(BuiltinFont::HelveticaBold)
                .map_err(|e| LabelError::Document(e.to_string()))?,
        };

        for (i, plan) in plans.iter().enumerate() {
            let layer = if i == 0 {
                doc.get_page(page1).get_layer(layer1)
            } else {
                let (page, layer) = doc.add_page(
                    Mm(plan.page_width * PT_TO_MM),
                    Mm(plan.page_height * PT_TO_MM),
                    "Layer 1",
                );
                doc.get_page(page).get_layer(layer)
            };
            self.draw_page(plan, &layer, &fonts)?;
        }

        let mut buf = Vec::new();
        {
            let cursor = Cursor::new(&mut buf);
            let mut writer = BufWriter::new(cursor);
            doc.save(&mut writer)
                .map_err(|e| LabelError::Document(e.to_string()))?;
        }

        info!(pages = plans.len(), bytes = buf.len(), "rendered pdf document");
        Ok(buf)
    }

    fn draw_page(
        &self,
        plan: &LayoutPlan,
        layer: &PdfLayerReference,
        fonts: &Fonts,
    ) -> LabelResult<()> {
        let page_h = plan.page_height;
        for element in &plan.elements {
            match element {
                Element::Logo { x, y, width, variant } => {
                    // Decorative: a missing asset drops the element, never
                    // the page.
                    if let Some(img) = self.assets.logo(*variant) {
                        draw_logo(layer, &img, *x, *y, *width, page_h);
                    }
                }
                Element::Text { x, y, width, text, style } => {
                    draw_text(layer, fonts, text, *x, *y, *width, style, page_h);
                }
                Element::Rule { x, y, width } => {
                    draw_rule(layer, *x, *y, *width, page_h);
                }
                Element::Barcode { x, y, width, height, data } => {
                    let modules = code128::encode(data)?;
                    draw_barcode(layer, &modules, *x, *y, *width, *height, page_h);
                }
            }
        }
        Ok(())
    }
}

fn approx_text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * AVG_CHAR_WIDTH
}

fn draw_text(
    layer: &PdfLayerReference,
    fonts: &Fonts,
    text: &str,
    x: f32,
    y: f32,
    width: f32,
    style: &TextStyle,
    page_h: f32,
) {
    let x = match style.align {
        Align::Left => x,
        Align::Center => x + (width - approx_text_width(text, style.size)) / 2.0,
        Align::Right => x + width - approx_text_width(text, style.size),
    };
    // Plan y is the top of the text box; PDF draws from the baseline.
    let baseline = page_h - y - style.size * 0.8;
    layer.use_text(
        text,
        style.size,
        Mm(x * PT_TO_MM),
        Mm(baseline * PT_TO_MM),
        fonts.get(style.bold),
    );
}

fn draw_rule(layer: &PdfLayerReference, x: f32, y: f32, width: f32, page_h: f32) {
    let py = page_h - y;
    layer.set_outline_thickness(0.75);
    let points = vec![
        (Point::new(Mm(x * PT_TO_MM), Mm(py * PT_TO_MM)), false),
        (Point::new(Mm((x + width) * PT_TO_MM), Mm(py * PT_TO_MM)), false),
    ];
    layer.add_line(Line { points, is_closed: false });
}

fn fill_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32) {
    let points = vec![
        (Point::new(Mm(x * PT_TO_MM), Mm(y * PT_TO_MM)), false),
        (Point::new(Mm((x + w) * PT_TO_MM), Mm(y * PT_TO_MM)), false),
        (Point::new(Mm((x + w) * PT_TO_MM), Mm((y + h) * PT_TO_MM)), false),
        (Point::new(Mm(x * PT_TO_MM), Mm((y + h) * PT_TO_MM)), false),
    ];
    layer.add_polygon(Polygon {
        rings: vec![points],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    });
}

/// Draw an encoded symbol as bar rectangles, with quiet zones on both
/// sides inside the element box. Consecutive bar modules merge into one
/// rectangle.
fn draw_barcode(
    layer: &PdfLayerReference,
    modules: &[bool],
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    page_h: f32,
) {
    let total = modules.len() + 2 * QUIET_ZONE_MODULES;
    let module_w = width / total as f32;
    let bottom = page_h - y - height;

    let mut i = 0;
    while i < modules.len() {
        if modules[i] {
            let run_start = i;
            while i < modules.len() && modules[i] {
                i += 1;
            }
            let bar_x = x + (QUIET_ZONE_MODULES + run_start) as f32 * module_w;
            let bar_w = (i - run_start) as f32 * module_w;
            fill_rect(layer, bar_x, bottom, bar_w, height);
        } else {
            i += 1;
        }
    }
}

fn draw_logo(
    layer: &PdfLayerReference,
    img: &image::DynamicImage,
    x: f32,
    y: f32,
    width: f32,
    page_h: f32,
) {
    let (img_w, img_h) = (img.width() as f32, img.height() as f32);
    let render_h = width * img_h / img_w;
    let rgb = img.to_rgb8();

    let xobject = ImageXObject {
        width: Px(img.width() as usize),
        height: Px(img.height() as usize),
        color_space: ColorSpace::Rgb,
        bits_per_component: ColorBits::Bit8,
        interpolate: true,
        image_data: rgb.into_raw(),
        image_filter: None,
        clipping_bbox: None,
        smask: None,
    };

    // 72 dpi makes 1 px equal 1 pt, then the scale factors fit the image
    // into the element box.
    let bottom = page_h - y - render_h;
    printpdf::Image::from(xobject).add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(x * PT_TO_MM)),
            translate_y: Some(Mm(bottom * PT_TO_MM)),
            scale_x: Some(width / img_w),
            scale_y: Some(render_h / img_h),
            dpi: Some(72.0),
            ..Default::default()
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brand::BrandTable;
    use crate::layout::{LayoutConfig, LayoutEngine};
    use crate::record::CanonicalLabelRecord;

    fn renderer() -> PdfRenderer {
        PdfRenderer::new(AssetStore::new("/nonexistent/assets"))
    }

    fn plan() -> LayoutPlan {
        let record = CanonicalLabelRecord {
            sku: "IVM-100".to_string(),
            original_order_no: "1".to_string(),
            ivc_status: "PASS".to_string(),
            ..Default::default()
        };
        LayoutEngine::new(LayoutConfig::standard(), BrandTable::standard())
            .plan(&record)
            .unwrap()
    }

    #[test]
    fn test_empty_batch_is_rejected() {
        assert!(renderer().render(&[]).is_err());
    }

    #[test]
    fn test_single_page_document() {
        let bytes = renderer().render(&[plan()]).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_multi_page_grows_document() {
        let one = renderer().render(&[plan()]).unwrap();
        let three = renderer().render(&[plan(), plan(), plan()]).unwrap();
        assert!(three.len() > one.len());
    }

    #[test]
    fn test_missing_logo_asset_does_not_fail_render() {
        // The store points at a path with no assets; render must succeed.
        let bytes = renderer().render(&[plan()]).unwrap();
        assert!(!bytes.is_empty());
    }

    #[test]
    fn test_render_is_deterministic_in_page_count() {
        let a = renderer().render(&[plan(), plan()]).unwrap();
        let b = renderer().render(&[plan(), plan()]).unwrap();
        assert_eq!(a.len(), b.len());
    }
}
