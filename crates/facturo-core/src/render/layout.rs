//! Invoice layouts.
//!
//! Rendering runs in two passes. [`InvoiceContent::collect`] does every
//! fallible conversion up front, so a bad value aborts the record before
//! anything is drawn; the draw functions then place the strings with a
//! single running cursor. The order of cursor updates is part of the layout:
//! every block below the charges table is positioned from the cursor, never
//! from an absolute page offset.

use rust_decimal::Decimal;
use tracing::{trace, warn};

use crate::error::RenderError;
use crate::invoice::rules::{format_decimal, parse_amount, FieldFormatter};
use crate::models::config::FacturoConfig;
use crate::models::record::InvoiceRecord;
use crate::models::schema::{fields, LayoutVariant};
use crate::sheet::Cell;

use super::{Canvas, Document, Font, CM};

/// Optional charge lines of the itemized layout: label and source field.
pub const CHARGES: [(&str, &str); 10] = [
    ("Surclassement", fields::UPGRADE_HT),
    ("2ème Conducteur", fields::SECOND_DRIVER_HT),
    ("Out of Hours", fields::OUT_OF_HOURS_HT),
    ("CDW", fields::CDW_HT),
    ("TPC", fields::TPC_HT),
    ("PAI", fields::PAI_HT),
    ("SUPER CDW", fields::SUPER_CDW_HT),
    ("GPS", fields::GPS_HT),
    ("Siège Bébé", fields::CHILD_SEAT_HT),
    ("One Way", fields::ONE_WAY_HT),
];

const LEFT: f32 = 30.0;
const RIGHT: f32 = 550.0;
const AMOUNT_X: f32 = 450.0;

const GRAY: f32 = 0.9;

/// The itemized tax value is read from the 20% VAT column.
const ITEMIZED_TAX_LABEL: &str = "TVA 20%";

/// Lays out one record as a single A4 page.
#[derive(Debug, Clone)]
pub struct InvoiceRenderer {
    variant: LayoutVariant,
    formatter: FieldFormatter,
    currency: String,
    footer_lines: Vec<String>,
    tax_rate: Decimal,
}

impl InvoiceRenderer {
    /// Renderer for a variant with default settings.
    pub fn new(variant: LayoutVariant) -> Self {
        Self::from_config(&FacturoConfig::for_variant(variant))
    }

    pub fn from_config(config: &FacturoConfig) -> Self {
        Self {
            variant: config.layout.variant,
            formatter: FieldFormatter::new(config.amount_fallback()),
            currency: config.layout.currency.clone(),
            footer_lines: config.layout.footer_lines.clone(),
            tax_rate: config.formatting.tax_rate,
        }
    }

    pub fn variant(&self) -> LayoutVariant {
        self.variant
    }

    pub fn formatter(&self) -> &FieldFormatter {
        &self.formatter
    }

    /// Render one record.
    ///
    /// Fails only when a value the layout computes with (a charge to test
    /// against zero, the day count, a total) is not numeric.
    pub fn render(&self, record: &InvoiceRecord) -> Result<Document, RenderError> {
        let content = InvoiceContent::collect(self, record)?;
        trace!(
            "Row {}: {} charge lines",
            record.row(),
            content.charges.len()
        );

        let mut canvas = Canvas::a4();
        match self.variant {
            LayoutVariant::Itemized => self.draw_itemized(&mut canvas, &content),
            LayoutVariant::Summary | LayoutVariant::SummaryWithWords => {
                draw_summary(&mut canvas, &content)
            }
        }

        Ok(canvas.finish(format!("Facture {}", content.number)))
    }

    fn money(&self, amount: String) -> String {
        format!("{} {}", amount, self.currency)
    }

    /// Label of the computed summary tax line.
    fn summary_tax_label(&self) -> String {
        let percent = (self.tax_rate * Decimal::ONE_HUNDRED).normalize();
        format!("TVA {}%", percent)
    }

    fn draw_itemized(&self, c: &mut Canvas, content: &InvoiceContent) {
        let top = c.height() - 8.0 * CM;

        c.set_font(Font::HelveticaBold, 14.0);
        c.draw_string(LEFT, top, "FACTURE");

        c.set_font(Font::Helvetica, 11.0);
        c.draw_string(400.0, top, format!("N° : {}", content.number));
        c.draw_string(400.0, top - 20.0, format!("Date : {}", content.date));

        c.draw_string(LEFT, top - 60.0, "Client:");
        c.set_font(Font::HelveticaBold, 11.0);
        c.draw_string(LEFT, top - 80.0, content.client.as_str());

        c.set_font(Font::Helvetica, 11.0);
        let mut y = top - 120.0;
        c.draw_string(LEFT, y, format!("Véhicule : {}", content.vehicle));
        c.draw_string(LEFT, y - 20.0, format!("Immatriculation : {}", content.plate));
        c.draw_string(
            LEFT,
            y - 40.0,
            format!(
                "Période de location : Du {} au {}",
                content.departure, content.return_date
            ),
        );
        c.draw_string(LEFT, y - 60.0, format!("Nombre de jours : {}", content.days));

        y -= 100.0;
        c.set_font(Font::Helvetica, 10.0);
        c.draw_string(LEFT, y, "Désignation");
        c.draw_string(AMOUNT_X, y, "Montant HT");
        y -= 20.0;
        c.line(LEFT, y + 15.0, RIGHT, y + 15.0);

        c.draw_string(LEFT, y, "Prix location");
        c.draw_string(AMOUNT_X, y, content.rental.as_str());

        for (label, amount) in &content.charges {
            y -= 20.0;
            c.draw_string(LEFT, y, *label);
            c.draw_string(AMOUNT_X, y, amount.as_str());
        }

        y -= 30.0;
        c.line(350.0, y + 25.0, RIGHT, y + 25.0);
        c.draw_string(350.0, y + 10.0, "Total HT");
        c.draw_string(AMOUNT_X, y + 10.0, content.total_ht.as_str());

        y -= 20.0;
        c.draw_string(350.0, y, content.tax_label.as_str());
        c.draw_string(AMOUNT_X, y, content.tax.as_str());

        y -= 20.0;
        c.line(350.0, y + 15.0, RIGHT, y + 15.0);
        c.draw_string(350.0, y, "Total TTC");
        c.draw_string(AMOUNT_X, y, content.total_ttc.as_str());

        c.set_font(Font::Helvetica, 8.0);
        let footer_y = 1.5 * CM;
        for (i, line) in self.footer_lines.iter().enumerate() {
            let x = (c.width() - c.string_width(line)) / 2.0;
            c.draw_string(x, footer_y + i as f32 * 12.0, line.as_str());
        }
    }
}

fn draw_summary(c: &mut Canvas, content: &InvoiceContent) {
    let top = c.height() - 6.0 * CM;

    c.set_font(Font::HelveticaBold, 14.0);
    c.draw_string(LEFT, top, "FACTURE");

    c.set_font(Font::HelveticaBold, 11.0);
    c.draw_string(LEFT, top - 30.0, format!("N° : {}.", content.number));
    c.draw_string(LEFT, top - 50.0, format!("Date : {}.", content.date));

    c.draw_string(400.0, top - 30.0, "Client:");
    c.set_font(Font::Helvetica, 11.0);
    c.draw_string(400.0, top - 50.0, format!("{}.", content.client));

    c.set_font(Font::HelveticaBold, 11.0);
    let mut y = top - 80.0;
    c.draw_string(LEFT, y, format!("Véhicule : {}.", content.vehicle));
    c.draw_string(LEFT, y - 20.0, format!("Immatriculation : {}.", content.plate));
    c.draw_string(
        LEFT,
        y - 40.0,
        format!(
            "Période de location : Du {} au {}.",
            content.departure, content.return_date
        ),
    );

    c.draw_string(LEFT, y - 60.0, "Nombre de jours :");
    c.set_font(Font::Helvetica, 11.0);
    c.draw_string(120.0, y - 60.0, format!("{}.", content.days));
    c.set_font(Font::HelveticaBold, 11.0);
    if let Some(daily) = &content.daily_ttc {
        c.draw_string(150.0, y - 60.0, format!("Prix par jour TTC : {}.", daily));
    }

    // Table
    y -= 120.0;
    let header_height = 20.0;
    c.fill_rect(LEFT, y + 15.0, RIGHT - LEFT, header_height, GRAY);

    c.set_font(Font::HelveticaBold, 10.0);
    c.draw_string(LEFT + 5.0, y + 20.0, "Désignation.");
    c.draw_string(AMOUNT_X, y + 20.0, "Montant HT.");
    c.line(LEFT, y + 15.0, RIGHT, y + 15.0);

    y -= 5.0;
    c.set_font(Font::Helvetica, 10.0);
    c.draw_string(LEFT + 5.0, y, "Prix location");
    c.draw_string(AMOUNT_X, y, content.rental.as_str());
    c.line(LEFT, y - 5.0, RIGHT, y - 5.0);

    // Vertical borders span the header and the rental row
    let start_y = y + header_height + 20.0;
    let split_x = AMOUNT_X - 20.0;
    c.line(LEFT, start_y, LEFT, y - 5.0);
    c.line(split_x, start_y, split_x, y - 5.0);
    c.line(RIGHT, start_y, RIGHT, y - 5.0);

    // Totals
    y -= 20.0;
    let totals_start = y + 15.0;
    let totals_x = AMOUNT_X - 120.0;
    let totals_width = RIGHT - totals_x;
    let label_x = AMOUNT_X - 100.0;

    c.set_font(Font::HelveticaBold, 10.0);
    c.draw_string(label_x, y, "Total HT");
    c.draw_string(AMOUNT_X, y, content.total_ht.as_str());

    y -= 20.0;
    c.draw_string(label_x, y, content.tax_label.as_str());
    c.draw_string(AMOUNT_X, y, content.tax.as_str());

    y -= 20.0;
    let totals_end = y - 5.0;

    c.rect(totals_x, y + 15.0, totals_width, totals_start - y - 15.0);
    c.line(totals_x, y + 35.0, RIGHT, y + 35.0);
    c.line(split_x, totals_start, split_x, y + 15.0);

    c.fill_rect(totals_x, totals_end, totals_width, 20.0, GRAY);
    c.draw_string(label_x, y, "Total TTC");
    c.draw_string(AMOUNT_X, y, content.total_ttc.as_str());
    c.line(totals_x, totals_end, RIGHT, totals_end);

    if let Some(words) = &content.words {
        y -= 40.0;
        c.set_font(Font::HelveticaBold, 10.0);
        let sentence = format!("Arrêtée la présente facture à la somme de : {}.", words);
        let width = c.string_width(&sentence);
        c.draw_string(LEFT, y, sentence);
        c.line(LEFT, y - 2.0, LEFT + width, y - 2.0);

        y -= 40.0;
        c.set_font(Font::HelveticaBold, 11.0);
        let width = c.string_width("Signature");
        c.draw_string(520.0 - width, y, "Signature");
    }
}

/// Every display string of one invoice, formatted before drawing.
#[derive(Debug, Clone, PartialEq)]
struct InvoiceContent {
    number: String,
    date: String,
    client: String,
    vehicle: String,
    plate: String,
    departure: String,
    return_date: String,
    days: String,
    daily_ttc: Option<String>,
    rental: String,
    charges: Vec<(&'static str, String)>,
    total_ht: String,
    tax_label: String,
    tax: String,
    total_ttc: String,
    words: Option<String>,
}

impl InvoiceContent {
    fn collect(renderer: &InvoiceRenderer, record: &InvoiceRecord) -> Result<Self, RenderError> {
        let f = &renderer.formatter;
        let amount = |field: &str| -> Result<String, RenderError> {
            Ok(renderer.money(f.format_amount(record.require(field)?)))
        };

        let mut content = InvoiceContent {
            number: record.text(fields::INVOICE_NUMBER),
            date: f.format_date(record.require(fields::INVOICE_DATE)?),
            client: record.text(fields::CLIENT),
            vehicle: record.text(fields::VEHICLE),
            plate: record.text(fields::PLATE),
            departure: f.format_date(record.require(fields::DEPARTURE_DATE)?),
            return_date: f.format_date(record.require(fields::RETURN_DATE)?),
            days: record.text(fields::DAYS),
            daily_ttc: None,
            rental: String::new(),
            charges: Vec::new(),
            total_ht: amount(fields::TOTAL_HT)?,
            tax_label: String::new(),
            tax: String::new(),
            total_ttc: amount(fields::TOTAL_TTC)?,
            words: None,
        };

        match renderer.variant {
            LayoutVariant::Itemized => {
                content.rental = amount(fields::RENTAL_PRICE_HT)?;
                content.tax_label = ITEMIZED_TAX_LABEL.to_string();
                content.tax = amount(fields::VAT_20)?;

                for (label, field) in CHARGES {
                    let cell = record.require(field)?;
                    if !numeric(field, cell)?.is_zero() {
                        content.charges.push((label, renderer.money(f.format_amount(cell))));
                    }
                }
            }
            LayoutVariant::Summary | LayoutVariant::SummaryWithWords => {
                let ht = numeric(fields::TOTAL_HT, record.require(fields::TOTAL_HT)?)?;
                let days = numeric(fields::DAYS, record.require(fields::DAYS)?)?.trunc();

                let daily = if days > Decimal::ZERO {
                    ht.checked_div(days)
                        .and_then(|d| d.checked_mul(Decimal::ONE + renderer.tax_rate))
                        .unwrap_or_default()
                } else {
                    Decimal::ZERO
                };

                let tax = ht.checked_mul(renderer.tax_rate).unwrap_or_default();
                if let Ok(ttc) = parse_amount(record.require(fields::TOTAL_TTC)?) {
                    if ((ht + tax) - ttc).abs() >= Decimal::new(1, 2) {
                        warn!(
                            "Row {}: Total HT plus {} does not match TOTAL TTC {}",
                            record.row(),
                            renderer.summary_tax_label(),
                            ttc
                        );
                    }
                }

                content.rental = content.total_ht.clone();
                content.daily_ttc = Some(renderer.money(format_decimal(daily)));
                content.tax_label = renderer.summary_tax_label();
                content.tax = renderer.money(format_decimal(tax));

                if renderer.variant == LayoutVariant::SummaryWithWords {
                    let ttc = record.require(fields::TOTAL_TTC)?;
                    content.words = Some(f.amount_to_words(ttc).map_err(|source| {
                        RenderError::InvalidValue {
                            field: fields::TOTAL_TTC.to_string(),
                            source,
                        }
                    })?);
                }
            }
        }

        Ok(content)
    }
}

fn numeric(field: &str, cell: &Cell) -> Result<Decimal, RenderError> {
    parse_amount(cell).map_err(|source| RenderError::InvalidValue {
        field: field.to_string(),
        source,
    })
}
