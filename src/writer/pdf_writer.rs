//! Document assembly.
//!
//! Collects pages, fonts, and image XObjects and serializes the complete
//! file: header, body objects, cross-reference table, and trailer. Content
//! streams can optionally be Flate-compressed.

use std::collections::BTreeMap;
use std::io::Write;

use bytes::Bytes;

use crate::error::Result;
use crate::writer::content_stream::ContentStreamBuilder;
use crate::writer::fonts::Font;
use crate::writer::images::ImageData;
use crate::writer::object::{Object, ObjectSerializer};

/// Document-level settings and metadata.
#[derive(Debug, Clone)]
pub struct DocumentConfig {
    /// PDF version written into the header
    pub version: String,
    /// Document title (Info dictionary)
    pub title: Option<String>,
    /// Document author
    pub author: Option<String>,
    /// Document subject
    pub subject: Option<String>,
    /// Producing application
    pub creator: Option<String>,
    /// Whether to Flate-compress content streams
    pub compress: bool,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            version: "1.7".to_string(),
            title: None,
            author: None,
            subject: None,
            creator: None,
            compress: false,
        }
    }
}

impl DocumentConfig {
    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the document author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set the document subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set the producing application.
    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = Some(creator.into());
        self
    }

    /// Enable or disable content stream compression.
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }
}

struct PageData {
    width: f32,
    height: f32,
    content: ContentStreamBuilder,
}

/// Writer that accumulates pages and produces the final byte stream.
pub struct PdfWriter {
    config: DocumentConfig,
    pages: Vec<PageData>,
    images: Vec<(String, ImageData)>,
}

impl PdfWriter {
    /// A4 page size in points.
    pub const A4: (f32, f32) = (595.0, 842.0);

    /// Create a writer with default config.
    pub fn new() -> Self {
        Self::with_config(DocumentConfig::default())
    }

    /// Create a writer with explicit config.
    pub fn with_config(config: DocumentConfig) -> Self {
        Self {
            config,
            pages: Vec::new(),
            images: Vec::new(),
        }
    }

    /// Number of pages added so far.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Add a page and get its content stream builder.
    pub fn add_page(&mut self, width: f32, height: f32) -> &mut ContentStreamBuilder {
        self.pages.push(PageData {
            width,
            height,
            content: ContentStreamBuilder::new(),
        });
        // Just pushed, so last() is present
        &mut self.pages.last_mut().unwrap().content
    }

    /// Add an A4 page.
    pub fn add_a4_page(&mut self) -> &mut ContentStreamBuilder {
        self.add_page(Self::A4.0, Self::A4.1)
    }

    /// Content builder for the most recently added page, if any.
    pub fn current_page(&mut self) -> Option<&mut ContentStreamBuilder> {
        self.pages.last_mut().map(|p| &mut p.content)
    }

    /// Content builder for the last page, adding an A4 page when the
    /// document is still empty.
    pub fn last_page(&mut self) -> &mut ContentStreamBuilder {
        if self.pages.is_empty() {
            self.add_a4_page();
        }
        // A page exists at this point
        &mut self.pages.last_mut().unwrap().content
    }

    /// Register an image for use with [`ContentStreamBuilder::draw_image`].
    ///
    /// Returns the assigned resource id (`Im1`, `Im2`, ...), valid on any
    /// page of the document.
    pub fn register_image(&mut self, image: ImageData) -> String {
        let resource_id = format!("Im{}", self.images.len() + 1);
        self.images.push((resource_id.clone(), image));
        resource_id
    }

    /// Serialize the complete document.
    pub fn finish(self) -> Result<Vec<u8>> {
        let serializer = ObjectSerializer::new();
        let mut output = Vec::new();
        let mut xref_offsets: Vec<(u32, usize)> = Vec::new();

        writeln!(output, "%PDF-{}", self.config.version)?;
        // Binary marker so transports treat the file as binary
        output.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");

        let mut next_id = 1u32;
        let mut alloc = || {
            let id = next_id;
            next_id += 1;
            id
        };

        let catalog_id = alloc();
        let pages_id = alloc();

        let fonts = [Font::Helvetica, Font::HelveticaBold];
        let font_ids: Vec<u32> = fonts.iter().map(|_| alloc()).collect();

        // Each image gets an XObject id, plus one for its soft mask
        let image_ids: Vec<(u32, Option<u32>)> = self
            .images
            .iter()
            .map(|(_, image)| (alloc(), image.soft_mask.as_ref().map(|_| alloc())))
            .collect();

        let page_ids: Vec<(u32, u32)> = self.pages.iter().map(|_| (alloc(), alloc())).collect();
        let info_id = alloc();

        // Shared resource dictionary: both fonts plus all image XObjects
        let font_resources: BTreeMap<String, Object> = fonts
            .iter()
            .zip(&font_ids)
            .map(|(font, id)| (font.resource_name().to_string(), Object::reference(*id, 0)))
            .collect();
        let xobject_resources: BTreeMap<String, Object> = self
            .images
            .iter()
            .zip(&image_ids)
            .map(|((resource_id, _), (id, _))| (resource_id.clone(), Object::reference(*id, 0)))
            .collect();

        let mut resources = vec![("Font", Object::Dictionary(font_resources))];
        if !xobject_resources.is_empty() {
            resources.push(("XObject", Object::Dictionary(xobject_resources)));
        }
        let resources = Object::dict(resources);

        // Catalog and page tree
        let catalog_obj = Object::dict(vec![
            ("Type", Object::name("Catalog")),
            ("Pages", Object::reference(pages_id, 0)),
        ]);
        let pages_obj = Object::dict(vec![
            ("Type", Object::name("Pages")),
            (
                "Kids",
                Object::Array(page_ids.iter().map(|(id, _)| Object::reference(*id, 0)).collect()),
            ),
            ("Count", Object::Integer(self.pages.len() as i64)),
        ]);

        xref_offsets.push((catalog_id, output.len()));
        output.extend_from_slice(&serializer.serialize_indirect(catalog_id, 0, &catalog_obj));
        xref_offsets.push((pages_id, output.len()));
        output.extend_from_slice(&serializer.serialize_indirect(pages_id, 0, &pages_obj));

        // Font objects
        for (font, id) in fonts.iter().zip(&font_ids) {
            let font_obj = Object::dict(vec![
                ("Type", Object::name("Font")),
                ("Subtype", Object::name("Type1")),
                ("BaseFont", Object::name(font.base_name())),
                ("Encoding", Object::name("WinAnsiEncoding")),
            ]);
            xref_offsets.push((*id, output.len()));
            output.extend_from_slice(&serializer.serialize_indirect(*id, 0, &font_obj));
        }

        // Image XObjects and their soft masks
        for ((_, image), (id, mask_id)) in self.images.iter().zip(&image_ids) {
            let mut dict = image.xobject_dict();
            if let Some(mask_id) = mask_id {
                dict.insert("SMask".to_string(), Object::reference(*mask_id, 0));
            }
            let obj = Object::Stream {
                dict,
                data: Bytes::from(image.data.clone()),
            };
            xref_offsets.push((*id, output.len()));
            output.extend_from_slice(&serializer.serialize_indirect(*id, 0, &obj));

            if let (Some(mask_id), Some(mask_dict), Some(mask_data)) =
                (mask_id, image.soft_mask_dict(), image.soft_mask.as_ref())
            {
                let obj = Object::Stream {
                    dict: mask_dict,
                    data: Bytes::from(mask_data.clone()),
                };
                xref_offsets.push((*mask_id, output.len()));
                output.extend_from_slice(&serializer.serialize_indirect(*mask_id, 0, &obj));
            }
        }

        // Page and content stream objects
        for (page, (page_id, content_id)) in self.pages.iter().zip(&page_ids) {
            let raw_content = page.content.build()?;
            let (content_bytes, compressed) = if self.config.compress {
                (flate_compress(&raw_content)?, true)
            } else {
                (raw_content, false)
            };

            let mut content_dict = BTreeMap::new();
            if compressed {
                content_dict.insert("Filter".to_string(), Object::name("FlateDecode"));
            }

            let page_obj = Object::dict(vec![
                ("Type", Object::name("Page")),
                ("Parent", Object::reference(pages_id, 0)),
                ("MediaBox", Object::rect(0.0, 0.0, page.width as f64, page.height as f64)),
                ("Contents", Object::reference(*content_id, 0)),
                ("Resources", resources.clone()),
            ]);

            xref_offsets.push((*page_id, output.len()));
            output.extend_from_slice(&serializer.serialize_indirect(*page_id, 0, &page_obj));
            xref_offsets.push((*content_id, output.len()));
            output.extend_from_slice(&serializer.serialize_indirect(
                *content_id,
                0,
                &Object::Stream {
                    dict: content_dict,
                    data: Bytes::from(content_bytes),
                },
            ));
        }

        // Info dictionary
        let mut info_entries = Vec::new();
        if let Some(title) = &self.config.title {
            info_entries.push(("Title", Object::string(title)));
        }
        if let Some(author) = &self.config.author {
            info_entries.push(("Author", Object::string(author)));
        }
        if let Some(subject) = &self.config.subject {
            info_entries.push(("Subject", Object::string(subject)));
        }
        if let Some(creator) = &self.config.creator {
            info_entries.push(("Creator", Object::string(creator)));
        }
        xref_offsets.push((info_id, output.len()));
        output.extend_from_slice(&serializer.serialize_indirect(
            info_id,
            0,
            &Object::dict(info_entries),
        ));

        // Cross-reference table
        let xref_start = output.len();
        writeln!(output, "xref")?;
        writeln!(output, "0 {}", next_id)?;
        writeln!(output, "0000000000 65535 f ")?;
        xref_offsets.sort_by_key(|(id, _)| *id);
        for (_, offset) in &xref_offsets {
            writeln!(output, "{:010} 00000 n ", offset)?;
        }

        let trailer = Object::dict(vec![
            ("Size", Object::Integer(next_id as i64)),
            ("Root", Object::reference(catalog_id, 0)),
            ("Info", Object::reference(info_id, 0)),
        ]);
        writeln!(output, "trailer")?;
        output.extend_from_slice(&serializer.serialize(&trailer));
        writeln!(output)?;
        writeln!(output, "startxref")?;
        writeln!(output, "{}", xref_start)?;
        write!(output, "%%EOF")?;

        log::debug!("wrote {} pages, {} bytes", page_ids.len(), output.len());
        Ok(output)
    }

    /// Serialize and write the document to a file.
    pub fn save(self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let bytes = self.finish()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn flate_compress(data: &[u8]) -> std::io::Result<Vec<u8>> {
    use flate2::write::ZlibEncoder;
    use flate2::Compression;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}
