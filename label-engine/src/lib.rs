//! # label-engine
//!
//! Return-label rendering library - normalization, layout, and rendering
//! capabilities only.
//!
//! ## Scope
//!
//! This crate handles HOW to build a label:
//! - Display-record normalization to canonical fields
//! - Physical label count resolution
//! - Fixed 4x6 layout planning (one plan, two targets)
//! - PDF rendering (72 dpi points)
//! - ZPL rendering (203 dpi dots)
//! - Code 128 encoding
//! - Network printing (TCP port 9100)
//!
//! Business logic (WHAT gets served and printed where) stays in
//! application code: label-server.
//!
//! ## Example
//!
//! ```ignore
//! use label_engine::{AssetStore, Assembler, DisplayRecord, normalize};
//!
//! let record = normalize(&display_record);
//! let assembler = Assembler::standard(AssetStore::new("assets"));
//! let pdf = assembler.build_single(&record, None)?;
//! let zpl = assembler.build_command_text(&record, Some(3.0))?;
//! ```

mod assemble;
mod assets;
mod brand;
mod code128;
mod error;
mod layout;
mod pdf;
mod printer;
mod quantity;
mod record;
mod zpl;

// Re-exports
pub use assemble::{Assembler, PdfArtifact, ZplArtifact};
pub use assets::AssetStore;
pub use brand::{BrandTable, LEGACY_LOB_ID, LogoVariant};
pub use error::{LabelError, LabelResult};
pub use layout::{Align, Element, LayoutConfig, LayoutEngine, LayoutPlan, TextStyle};
pub use pdf::PdfRenderer;
pub use printer::{NetworkPrinter, Printer, RAW_PORT};
pub use quantity::{LabelJob, resolve_count};
pub use record::{CanonicalLabelRecord, DisplayRecord, format_date, normalize};
pub use zpl::{ZplBuilder, ZplRenderer};
