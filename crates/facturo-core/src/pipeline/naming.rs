//! Deterministic output file names.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Anything outside the portable file name set
    static ref UNSAFE_CHARS: Regex = Regex::new(r"[^A-Za-z0-9._-]").unwrap();
}

/// Replace characters that are unsafe in file names with `_`.
pub fn sanitize(name: &str) -> String {
    UNSAFE_CHARS.replace_all(name.trim(), "_").into_owned()
}

/// Hands out `<prefix>_<number>[_<stamp>].pdf` names, unique within a batch.
#[derive(Debug, Clone)]
pub struct FileNamer {
    prefix: String,
    stamp: Option<String>,
    used: HashSet<String>,
}

impl FileNamer {
    pub fn new(prefix: impl Into<String>, stamp: Option<String>) -> Self {
        Self {
            prefix: prefix.into(),
            stamp,
            used: HashSet::new(),
        }
    }

    /// Name for the next document with this invoice number.
    ///
    /// A number seen before in the batch gets a `-2`, `-3`, ... suffix.
    pub fn name_for(&mut self, invoice_number: &str) -> String {
        let mut base = format!("{}_{}", sanitize(&self.prefix), sanitize(invoice_number));
        if let Some(stamp) = &self.stamp {
            base.push('_');
            base.push_str(stamp);
        }

        let mut candidate = format!("{}.pdf", base);
        let mut n = 2;
        while !self.used.insert(candidate.clone()) {
            candidate = format!("{}-{}.pdf", base, n);
            n += 1;
        }
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize(" F-2024/001 "), "F-2024_001");
        assert_eq!(sanitize("N°12"), "N_12");
        assert_eq!(sanitize("../etc"), ".._etc");
        assert_eq!(sanitize("A.B_c-9"), "A.B_c-9");
    }

    #[test]
    fn test_names_with_and_without_stamp() {
        let mut plain = FileNamer::new("facture", None);
        assert_eq!(plain.name_for("F-1"), "facture_F-1.pdf");

        let mut stamped = FileNamer::new("facture", Some("20240301120000".to_string()));
        assert_eq!(stamped.name_for("F-1"), "facture_F-1_20240301120000.pdf");
    }

    #[test]
    fn test_duplicates_get_counter() {
        let mut namer = FileNamer::new("facture", None);
        assert_eq!(namer.name_for("F-1"), "facture_F-1.pdf");
        assert_eq!(namer.name_for("F-1"), "facture_F-1-2.pdf");
        assert_eq!(namer.name_for("F-1"), "facture_F-1-3.pdf");
        assert_eq!(namer.name_for("F/1"), "facture_F_1.pdf");
    }
}
