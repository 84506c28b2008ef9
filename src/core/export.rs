//! Report and receipt renderers.
//!
//! Renders a [`SalesSummary`] to CSV, a paginated A4 PDF, or an XLSX
//! workbook, and a single invoice to a receipt PDF. All renderers return raw
//! bytes; the HTTP layer only sets headers.

use crate::{
    config::settings::AppSettings,
    core::{invoice::InvoiceDetail, report::SalesSummary},
    errors::{Error, Result},
};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};
use rust_xlsxwriter::{Format, Workbook};
use std::io::BufWriter;

const SUMMARY_HEADER: [&str; 7] = [
    "Invoice #",
    "Date",
    "Patient",
    "Cashier",
    "Services",
    "Total",
    "Paid",
];

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const TOP_MARGIN_MM: f32 = 280.0;
const BOTTOM_MARGIN_MM: f32 = 20.0;
const LINE_HEIGHT_MM: f32 = 4.5;

fn render_error(err: impl std::fmt::Display) -> Error {
    Error::Render {
        message: err.to_string(),
    }
}

fn paid_label(is_paid: bool) -> &'static str {
    if is_paid { "Paid" } else { "Unpaid" }
}

/// Renders a sales summary as CSV: header, one row per invoice, a blank
/// separator, then `TOTAL_INVOICES` and `TOTAL_SALES` trailer rows.
pub fn render_sales_csv(summary: &SalesSummary) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(vec![]);
    writer.write_record(SUMMARY_HEADER).map_err(render_error)?;
    for row in &summary.rows {
        writer
            .write_record([
                row.invoice_id.to_string(),
                row.date.to_string(),
                row.patient_name.clone(),
                row.cashier.clone(),
                row.services.clone(),
                format!("{:.2}", row.total),
                paid_label(row.is_paid).to_string(),
            ])
            .map_err(render_error)?;
    }
    writer.write_record([""]).map_err(render_error)?;
    writer
        .write_record(["TOTAL_INVOICES", &summary.total_invoices.to_string()])
        .map_err(render_error)?;
    writer
        .write_record(["TOTAL_SALES", &format!("{:.2}", summary.total_sales)])
        .map_err(render_error)?;

    writer
        .into_inner()
        .map_err(|e| render_error(e.to_string()))
}

/// Cursor over A4 pages, adding a new page when a line would run past the
/// bottom margin.
struct PdfCursor<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
}

impl PdfCursor<'_> {
    fn line(&mut self, font: &IndirectFontRef, size: f32, text: &str) {
        if self.y < BOTTOM_MARGIN_MM {
            let (page, layer) = self
                .doc
                .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = TOP_MARGIN_MM;
        }
        self.layer
            .use_text(text, size, Mm(15.0), Mm(self.y), font);
        self.y -= LINE_HEIGHT_MM;
    }

    fn gap(&mut self) {
        self.y -= LINE_HEIGHT_MM;
    }
}

fn save_pdf(doc: PdfDocumentReference) -> Result<Vec<u8>> {
    let mut writer = BufWriter::new(Vec::new());
    doc.save(&mut writer).map_err(render_error)?;
    writer.into_inner().map_err(|e| render_error(e.to_string()))
}

/// Renders a sales summary as a paginated A4 PDF with the clinic header and a
/// totals footer.
pub fn render_sales_pdf(summary: &SalesSummary, settings: &AppSettings) -> Result<Vec<u8>> {
    let (doc, page, layer) =
        PdfDocument::new("Sales Summary", Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(render_error)?;
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(render_error)?;

    let mut cursor = PdfCursor {
        doc: &doc,
        layer: doc.get_page(page).get_layer(layer),
        y: TOP_MARGIN_MM,
    };

    cursor.line(&bold, 14.0, &settings.clinic_name);
    cursor.line(&font, 9.0, &settings.clinic_address);
    cursor.gap();
    cursor.line(&bold, 11.0, "Sales Summary");
    let range = format!(
        "From {} to {}",
        summary
            .range
            .start
            .map_or_else(|| "beginning".to_string(), |d| d.to_string()),
        summary
            .range
            .end
            .map_or_else(|| "today".to_string(), |d| d.to_string()),
    );
    cursor.line(&font, 9.0, &range);
    cursor.gap();

    cursor.line(&bold, 9.0, &SUMMARY_HEADER.join("  |  "));
    for row in &summary.rows {
        let line = format!(
            "#{}  {}  {}  {}  {}  {:.2}  {}",
            row.invoice_id,
            row.date,
            row.patient_name,
            row.cashier,
            row.services,
            row.total,
            paid_label(row.is_paid),
        );
        cursor.line(&font, 9.0, &line);
    }

    cursor.gap();
    cursor.line(&bold, 10.0, &format!("Total invoices: {}", summary.total_invoices));
    cursor.line(&bold, 10.0, &format!("Total sales: {:.2}", summary.total_sales));

    save_pdf(doc)
}

/// Renders a sales summary as an XLSX workbook with a bold header row,
/// widened columns, and summary rows below the data.
pub fn render_sales_xlsx(summary: &SalesSummary) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Sales Summary").map_err(render_error)?;

    for (col, title) in SUMMARY_HEADER.iter().enumerate() {
        sheet
            .write_string_with_format(0, u16::try_from(col).unwrap_or(0), *title, &bold)
            .map_err(render_error)?;
    }

    let mut widths = SUMMARY_HEADER.map(str::len);
    for (i, row) in summary.rows.iter().enumerate() {
        let r = u32::try_from(i + 1).map_err(render_error)?;
        let cells = [
            row.invoice_id.to_string(),
            row.date.to_string(),
            row.patient_name.clone(),
            row.cashier.clone(),
            row.services.clone(),
            String::new(),
            paid_label(row.is_paid).to_string(),
        ];
        for (col, value) in cells.iter().enumerate() {
            widths[col] = widths[col].max(value.len());
            if col == 5 {
                sheet.write_number(r, 5, row.total).map_err(render_error)?;
            } else {
                sheet
                    .write_string(r, u16::try_from(col).unwrap_or(0), value)
                    .map_err(render_error)?;
            }
        }
    }
    for (col, width) in widths.iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        sheet
            .set_column_width(u16::try_from(col).unwrap_or(0), *width as f64 + 2.0)
            .map_err(render_error)?;
    }

    let footer = u32::try_from(summary.rows.len() + 2).map_err(render_error)?;
    sheet
        .write_string_with_format(footer, 0, "TOTAL_INVOICES", &bold)
        .map_err(render_error)?;
    #[allow(clippy::cast_precision_loss)]
    sheet
        .write_number(footer, 1, summary.total_invoices as f64)
        .map_err(render_error)?;
    sheet
        .write_string_with_format(footer + 1, 0, "TOTAL_SALES", &bold)
        .map_err(render_error)?;
    sheet
        .write_number(footer + 1, 1, summary.total_sales)
        .map_err(render_error)?;

    workbook.save_to_buffer().map_err(render_error)
}

/// Renders one invoice as a receipt PDF.
pub fn render_receipt_pdf(detail: &InvoiceDetail, settings: &AppSettings) -> Result<Vec<u8>> {
    let title = format!("Receipt #{}", detail.invoice.id);
    let (doc, page, layer) =
        PdfDocument::new(&title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(render_error)?;
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(render_error)?;

    let mut cursor = PdfCursor {
        doc: &doc,
        layer: doc.get_page(page).get_layer(layer),
        y: TOP_MARGIN_MM,
    };

    cursor.line(&bold, 14.0, &settings.clinic_name);
    cursor.line(&font, 9.0, &settings.clinic_address);
    cursor.gap();
    cursor.line(&bold, 11.0, &title);
    cursor.line(
        &font,
        9.0,
        &format!("Date: {}", detail.invoice.date_created.date_naive()),
    );
    let patient = detail.patient_name.as_deref().unwrap_or("Walk-in");
    cursor.line(&font, 9.0, &format!("Patient: {patient}"));
    cursor.gap();

    for item in &detail.items {
        let line = format!(
            "{} x{} @ {:.2} = {:.2}",
            item.service_name_at_time,
            item.quantity,
            item.price_at_time,
            item.total_price(),
        );
        cursor.line(&font, 9.0, &line);
    }

    cursor.gap();
    cursor.line(&bold, 11.0, &format!("Total: {:.2}", detail.total_amount));
    cursor.line(
        &font,
        9.0,
        paid_label(detail.invoice.is_paid),
    );

    save_pdf(doc)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        core::{
            invoice::get_invoice,
            report::{DateRange, sales_summary},
        },
        test_utils::*,
    };

    async fn summary_fixture(db: &sea_orm::DatabaseConnection) -> Result<SalesSummary> {
        let patient = create_test_patient(db, "Jane", "Doe").await?;
        let checkup = create_test_service(db, "Check-up", 500.0).await?;
        create_test_invoice(db, Some(patient.id), &[(checkup.id, 2)]).await?;
        create_test_invoice(db, None, &[(checkup.id, 1)]).await?;
        sales_summary(db, DateRange::default()).await
    }

    fn test_settings() -> AppSettings {
        AppSettings {
            bind_addr: "127.0.0.1:0".to_string(),
            clinic_name: "Test Dental Clinic".to_string(),
            clinic_address: "123 Test St".to_string(),
        }
    }

    #[tokio::test]
    async fn test_render_sales_csv_content() -> Result<()> {
        let db = setup_test_db().await?;
        let summary = summary_fixture(&db).await?;

        let bytes = render_sales_csv(&summary)?;
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("Invoice #,Date,Patient,Cashier,Services,Total,Paid"));
        assert!(text.contains("Jane Doe"));
        assert!(text.contains("Check-up x2"));
        assert!(text.contains("1000.00"));
        assert!(text.contains("Walk-in"));
        assert!(text.contains("TOTAL_INVOICES,2"));
        assert!(text.contains("TOTAL_SALES,1500.00"));
        Ok(())
    }

    #[tokio::test]
    async fn test_render_sales_pdf_is_pdf() -> Result<()> {
        let db = setup_test_db().await?;
        let summary = summary_fixture(&db).await?;

        let bytes = render_sales_pdf(&summary, &test_settings())?;
        assert!(bytes.starts_with(b"%PDF"));
        Ok(())
    }

    #[tokio::test]
    async fn test_render_sales_xlsx_nonempty() -> Result<()> {
        let db = setup_test_db().await?;
        let summary = summary_fixture(&db).await?;

        let bytes = render_sales_xlsx(&summary)?;
        // XLSX files are ZIP containers
        assert!(bytes.starts_with(b"PK"));
        Ok(())
    }

    #[tokio::test]
    async fn test_render_receipt_pdf() -> Result<()> {
        let db = setup_test_db().await?;
        let checkup = create_test_service(&db, "Check-up", 500.0).await?;
        let invoice = create_test_invoice(&db, None, &[(checkup.id, 2)]).await?;
        let detail = get_invoice(&db, invoice.id).await?;

        let bytes = render_receipt_pdf(&detail, &test_settings())?;
        assert!(bytes.starts_with(b"%PDF"));
        Ok(())
    }
}
