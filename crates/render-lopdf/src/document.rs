use crate::error::RenderError;
use crate::fonts::DocumentFonts;
use crate::images::DocumentImages;
use crate::options::RenderOptions;
use crate::page::{DrawContext, draw_page};
use labelpress_layout::{ComposedLabel, SharedFontLibrary};
use labelpress_types::{ExportWarning, MM_TO_PT};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use std::io::Write;

const PRODUCER: &str = concat!("labelpress ", env!("CARGO_PKG_VERSION"));

/// Bytes of a finished document plus everything that degraded on the way.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub warnings: Vec<ExportWarning>,
}

/// Builds a PDF 1.7 document one label page at a time.
///
/// All pages share one resource dictionary; fonts are written when the
/// document is finished so embedded programs only carry glyphs from every page.
pub struct LabelRenderer {
    doc: Document,
    pages_id: ObjectId,
    resources_id: ObjectId,
    page_ids: Vec<ObjectId>,
    fonts: DocumentFonts,
    images: DocumentImages,
    library: SharedFontLibrary,
    options: RenderOptions,
    warnings: Vec<ExportWarning>,
}

impl LabelRenderer {
    pub fn new(library: SharedFontLibrary, options: RenderOptions) -> Self {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let resources_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            resources_id,
            page_ids: Vec::new(),
            fonts: DocumentFonts::new(options.embedding),
            images: DocumentImages::new(),
            library,
            options,
            warnings: Vec::new(),
        }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    pub fn warnings(&self) -> &[ExportWarning] {
        &self.warnings
    }

    /// Draws `label` on a new page sized to the label.
    pub fn add_page(&mut self, label: &ComposedLabel) -> Result<ObjectId, RenderError> {
        let (width, height) = (label.size.width, label.size.height);
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(RenderError::Other(format!("invalid label size {}x{} mm", width, height)));
        }
        for warning in &label.warnings {
            if !self.warnings.contains(warning) {
                self.warnings.push(warning.clone());
            }
        }

        let mut ctx = DrawContext {
            doc: &mut self.doc,
            fonts: &mut self.fonts,
            images: &mut self.images,
            library: &self.library,
            options: &self.options,
            warnings: &mut self.warnings,
        };
        let content = draw_page(&mut ctx, width, height, &label.components, &label.bounds_rects)?;
        let content_id = self.doc.add_object(Stream::new(Dictionary::new(), content.encode()?));

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0.into(), 0.into(), (width * MM_TO_PT).into(), (height * MM_TO_PT).into()],
            "Contents" => content_id,
            "Resources" => self.resources_id,
        });
        self.page_ids.push(page_id);
        log::debug!(
            "Page {} drawn: {} component(s), {:.1}x{:.1} mm",
            self.page_ids.len(),
            label.components.len(),
            width,
            height
        );
        Ok(page_id)
    }

    /// Writes fonts, resources and the document catalog, then saves to `writer`.
    pub fn finish<W: Write>(mut self, writer: &mut W) -> Result<Vec<ExportWarning>, RenderError> {
        if self.page_ids.is_empty() {
            return Err(RenderError::Other("document has no pages".into()));
        }

        let fonts = self.fonts.write(&mut self.doc)?;
        let mut resources = Dictionary::new();
        if !fonts.is_empty() {
            resources.set("Font", fonts);
        }
        if !self.images.is_empty() {
            resources.set("XObject", self.images.resources());
        }
        self.doc.objects.insert(self.resources_id, Object::Dictionary(resources));

        let kids: Vec<Object> = self.page_ids.iter().map(|id| Object::Reference(*id)).collect();
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => self.page_ids.len() as i64,
            }),
        );
        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        let info_id = self.doc.add_object(dictionary! {
            "Producer" => Object::string_literal(PRODUCER),
            "Creator" => Object::string_literal(format!("labelpress ({})", self.options.format)),
        });
        self.doc.trailer.set("Root", catalog_id);
        self.doc.trailer.set("Info", info_id);

        self.doc.compress();
        self.doc.save_to(writer)?;
        log::info!(
            "Finished {} document: {} page(s), {} warning(s)",
            self.options.format,
            self.page_ids.len(),
            self.warnings.len()
        );
        Ok(self.warnings)
    }

    pub fn finish_to_vec(self) -> Result<RenderedDocument, RenderError> {
        let mut bytes = Vec::new();
        let warnings = self.finish(&mut bytes)?;
        Ok(RenderedDocument { bytes, warnings })
    }
}

/// Renders one composed label as a single-page document.
pub fn render_label(
    label: &ComposedLabel,
    library: &SharedFontLibrary,
    options: &RenderOptions,
) -> Result<RenderedDocument, RenderError> {
    render_pages(std::slice::from_ref(label), library, options)
}

/// Renders every label as its own page of one document.
pub fn render_pages(
    labels: &[ComposedLabel],
    library: &SharedFontLibrary,
    options: &RenderOptions,
) -> Result<RenderedDocument, RenderError> {
    let mut renderer = LabelRenderer::new(library.clone(), options.clone());
    for label in labels {
        renderer.add_page(label)?;
    }
    renderer.finish_to_vec()
}
