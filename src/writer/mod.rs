//! Low-level PDF generation.
//!
//! The report renderer drives these pieces: [`object`] for PDF syntax,
//! [`content_stream`] for page operators, [`fonts`] for Base-14 metrics
//! and wrapping, [`images`] for XObject embedding, and [`pdf_writer`] for
//! final document assembly.

pub mod content_stream;
pub mod fonts;
pub mod images;
pub mod object;
pub mod pdf_writer;

pub use content_stream::{ContentStreamBuilder, ContentStreamOp};
pub use fonts::Font;
pub use images::{ColorSpace, ImageData, ImageFormat};
pub use object::{Object, ObjectRef, ObjectSerializer};
pub use pdf_writer::{DocumentConfig, PdfWriter};
