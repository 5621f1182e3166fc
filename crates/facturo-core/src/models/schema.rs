//! Expected spreadsheet schemas and layout variants.

use serde::{Deserialize, Serialize};

use crate::invoice::rules::AmountFallback;

/// Canonical field names as they appear in spreadsheet headers.
pub mod fields {
    pub const INVOICE_NUMBER: &str = "Facture Numero";
    pub const INVOICE_DATE: &str = "Date de facture";
    pub const CLIENT: &str = "Client";
    pub const DEPARTURE_DATE: &str = "Date de Depart";
    pub const RETURN_DATE: &str = "Date de Retour";
    pub const VEHICLE: &str = "Marque du Vehicule";
    pub const PLATE: &str = "Matricule";
    pub const DAYS: &str = "Nombre de jours";
    pub const DAILY_RATE_HT: &str = "Prix par jour HT";
    pub const RENTAL_PRICE_HT: &str = "Prix location total HT";
    pub const UPGRADE_HT: &str = "Surclassement HT";
    pub const SECOND_DRIVER_HT: &str = "Sup 2eme Conducteur HT";
    pub const OUT_OF_HOURS_HT: &str = "Out of Hours HT";
    pub const CDW_HT: &str = "CDW HT";
    pub const TPC_HT: &str = "TPC HT";
    pub const PAI_HT: &str = "PAI HT";
    pub const SUPER_CDW_HT: &str = "SUPER CDW HT";
    pub const GPS_HT: &str = "GPS HT";
    pub const CHILD_SEAT_HT: &str = "Siege Bebe HT";
    pub const ONE_WAY_HT: &str = "One Way HT";
    pub const TOTAL_HT: &str = "Total Location HT";
    pub const VAT_20: &str = "TVA 20 %";
    pub const TOTAL_TTC: &str = "TOTAL TTC";
}

use fields::*;

const ITEMIZED_FIELDS: [&str; 23] = [
    INVOICE_NUMBER,
    INVOICE_DATE,
    CLIENT,
    DEPARTURE_DATE,
    RETURN_DATE,
    VEHICLE,
    PLATE,
    DAYS,
    DAILY_RATE_HT,
    RENTAL_PRICE_HT,
    UPGRADE_HT,
    SECOND_DRIVER_HT,
    OUT_OF_HOURS_HT,
    CDW_HT,
    TPC_HT,
    PAI_HT,
    SUPER_CDW_HT,
    GPS_HT,
    CHILD_SEAT_HT,
    ONE_WAY_HT,
    TOTAL_HT,
    VAT_20,
    TOTAL_TTC,
];

const SUMMARY_FIELDS: [&str; 10] = [
    INVOICE_NUMBER,
    INVOICE_DATE,
    CLIENT,
    DEPARTURE_DATE,
    RETURN_DATE,
    VEHICLE,
    PLATE,
    DAYS,
    TOTAL_HT,
    TOTAL_TTC,
];

/// An ordered set of canonical field names.
///
/// Order defines where a field sits in a strictly matched header row; name
/// matching itself does not depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectedSchema {
    name: &'static str,
    fields: &'static [&'static str],
}

impl ExpectedSchema {
    /// The 23-column itemized schema.
    pub const fn itemized() -> Self {
        Self {
            name: "itemized",
            fields: &ITEMIZED_FIELDS,
        }
    }

    /// The 10-column summary schema.
    pub const fn summary() -> Self {
        Self {
            name: "summary",
            fields: &SUMMARY_FIELDS,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fields(&self) -> &'static [&'static str] {
        self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains(&field)
    }
}

/// Fixed-geometry document template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutVariant {
    /// Multi-charge invoice with one line per non-zero surcharge.
    #[default]
    Itemized,
    /// Single-line invoice with a boxed, shaded totals block.
    Summary,
    /// Summary invoice with the total spelled out and a signature slot.
    SummaryWithWords,
}

impl LayoutVariant {
    /// Schema the variant's spreadsheets must follow.
    pub fn schema(&self) -> ExpectedSchema {
        match self {
            LayoutVariant::Itemized => ExpectedSchema::itemized(),
            LayoutVariant::Summary | LayoutVariant::SummaryWithWords => ExpectedSchema::summary(),
        }
    }

    /// Amount fallback used when the configuration does not pick one.
    pub fn default_amount_fallback(&self) -> AmountFallback {
        match self {
            LayoutVariant::Itemized => AmountFallback::Zero,
            LayoutVariant::Summary | LayoutVariant::SummaryWithWords => AmountFallback::Original,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutVariant::Itemized => "itemized",
            LayoutVariant::Summary => "summary",
            LayoutVariant::SummaryWithWords => "summary_with_words",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_sizes() {
        assert_eq!(ExpectedSchema::itemized().len(), 23);
        assert_eq!(ExpectedSchema::summary().len(), 10);
    }

    #[test]
    fn test_variant_schema() {
        assert_eq!(LayoutVariant::Itemized.schema(), ExpectedSchema::itemized());
        assert_eq!(LayoutVariant::SummaryWithWords.schema(), ExpectedSchema::summary());
        assert!(ExpectedSchema::itemized().contains(GPS_HT));
        assert!(!ExpectedSchema::summary().contains(GPS_HT));
    }

    #[test]
    fn test_variant_serde_names() {
        let json = serde_json::to_string(&LayoutVariant::SummaryWithWords).unwrap();
        assert_eq!(json, "\"summary_with_words\"");

        let variant: LayoutVariant = serde_json::from_str("\"summary\"").unwrap();
        assert_eq!(variant, LayoutVariant::Summary);
    }
}
