//! Print-document serializer
//!
//! Renders the shared row/column projection as a titled, paginated HTML
//! document suitable for hard copy: the title as a heading, rows chunked
//! into fixed-size pages, and a page footer on each. The template is
//! embedded in the binary.

use rust_embed::RustEmbed;
use serde::Serialize;
use tera::{Context, Tera};

use crate::core::column::Column;
use crate::core::error::ExportError;
use crate::core::record::Record;
use crate::export::resolve_table;

#[derive(RustEmbed)]
#[folder = "templates/"]
struct Templates;

const PRINT_TEMPLATE: &str = "print.html";

#[derive(Serialize)]
struct PageContext {
    number: usize,
    rows: Vec<Vec<String>>,
}

/// Render rows into a paginated print document. Empty row sets yield a
/// single page holding only the header row.
pub fn render_print_document<R: Record>(
    rows: &[&R],
    columns: &[&Column<R>],
    title: &str,
    rows_per_page: usize,
) -> Result<String, ExportError> {
    let (headers, cells) = resolve_table(rows, columns);

    let per_page = rows_per_page.max(1);
    let mut pages: Vec<PageContext> = cells
        .chunks(per_page)
        .enumerate()
        .map(|(i, chunk)| PageContext {
            number: i + 1,
            rows: chunk.to_vec(),
        })
        .collect();
    if pages.is_empty() {
        pages.push(PageContext {
            number: 1,
            rows: Vec::new(),
        });
    }

    let mut tera = Tera::default();
    tera.add_raw_template(PRINT_TEMPLATE, &template_source()?)?;

    let mut context = Context::new();
    context.insert("title", title);
    context.insert("headers", &headers);
    context.insert("total_pages", &pages.len());
    context.insert("pages", &pages);

    Ok(tera.render(PRINT_TEMPLATE, &context)?)
}

fn template_source() -> Result<String, ExportError> {
    let file = Templates::get("print.html.tera")
        .ok_or_else(|| tera::Error::msg("embedded template 'print.html.tera' missing"))?;
    String::from_utf8(file.data.into_owned())
        .map_err(|e| ExportError::Template(tera::Error::msg(e.to_string())))
}
