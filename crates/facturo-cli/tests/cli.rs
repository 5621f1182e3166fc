use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use rust_xlsxwriter::Workbook;
use tempfile::TempDir;

const SUMMARY_HEADER: [&str; 10] = [
    "Facture Numero",
    "Date de facture",
    "Client",
    "Date de Depart",
    "Date de Retour",
    "Marque du Vehicule",
    "Matricule",
    "Nombre de jours",
    "Total Location HT",
    "TOTAL TTC",
];

fn write_summary_workbook(path: &Path, header: &[&str], rows: &[[&str; 10]]) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, name) in header.iter().enumerate() {
        sheet.write_string(0, col as u16, *name).unwrap();
    }
    for (r, row) in rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate().take(header.len()) {
            if !value.is_empty() {
                sheet.write_string(r as u32 + 1, col as u16, *value).unwrap();
            }
        }
    }

    workbook.save(path).unwrap();
}

fn row<'a>(number: &'a str, plate: &'a str) -> [&'a str; 10] {
    [
        number,
        "2024-03-10 00:00:00",
        "ACME SARL",
        "2024-03-01 09:00:00",
        "2024-03-05 09:00:00",
        "Dacia Logan",
        plate,
        "4",
        "1000",
        "1200",
    ]
}

fn facturo(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("facturo").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"));
    cmd
}

fn sample(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("locations.xlsx");
    write_summary_workbook(
        &path,
        &SUMMARY_HEADER,
        &[row("F-1", "1-A-1"), row("F-2", ""), row("F-3", "3-A-3")],
    );
    path
}

#[test]
fn generate_writes_one_pdf_per_complete_row() {
    let tmp = TempDir::new().unwrap();
    let input = sample(&tmp);
    let out = tmp.path().join("out");

    facturo(&tmp)
        .arg("generate")
        .arg(&input)
        .args(["--variant", "summary", "--no-timestamp", "--json", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""success":true"#))
        .stdout(predicate::str::contains("2 factures générées avec succès"))
        .stdout(predicate::str::contains("facture_F-3.pdf"));

    assert!(out.join("facture_F-1.pdf").exists());
    assert!(!out.join("facture_F-2.pdf").exists());
    let bytes = fs::read(out.join("facture_F-3.pdf")).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn generate_reports_missing_columns() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("incomplete.xlsx");
    let header: Vec<&str> = SUMMARY_HEADER
        .iter()
        .copied()
        .filter(|h| *h != "Client")
        .collect();
    write_summary_workbook(&input, &header, &[row("F-1", "1-A-1")]);

    facturo(&tmp)
        .arg("generate")
        .arg(&input)
        .args(["--variant", "summary", "--json", "-o"])
        .arg(tmp.path().join("out"))
        .assert()
        .failure()
        .stdout(predicate::str::contains(r#""success":false"#))
        .stdout(predicate::str::contains(
            "Colonnes manquantes dans le fichier Excel: Client",
        ));

    assert!(!tmp.path().join("out").exists());
}

#[test]
fn generate_rejects_other_file_types() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("notes.txt");
    fs::write(&input, "hello").unwrap();

    facturo(&tmp)
        .arg("generate")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Type de fichier non autorisé"));
}

#[test]
fn config_file_drives_generation() {
    let tmp = TempDir::new().unwrap();
    let input = sample(&tmp);
    let config = tmp.path().join("facturo.json");
    let out = tmp.path().join("pdf");

    facturo(&tmp)
        .args(["config", "init", "-o"])
        .arg(&config)
        .assert()
        .success();

    for (key, value) in [
        ("layout.variant", "summary_with_words"),
        ("output.file_prefix", "invoice"),
        ("output.timestamp_suffix", "false"),
    ] {
        facturo(&tmp)
            .arg("--config")
            .arg(&config)
            .args(["config", "set", key, value])
            .assert()
            .success();
    }

    facturo(&tmp)
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "layout.variant"])
        .assert()
        .success()
        .stdout(predicate::str::contains("summary_with_words"));

    facturo(&tmp)
        .arg("--config")
        .arg(&config)
        .arg("generate")
        .arg(&input)
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 factures générées avec succès"));

    assert!(out.join("invoice_F-1.pdf").exists());
    assert!(out.join("invoice_F-3.pdf").exists());
}

#[test]
fn config_init_refuses_to_overwrite() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("facturo.json");
    fs::write(&config, "{}").unwrap();

    facturo(&tmp)
        .args(["config", "init", "-o"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
}

#[test]
fn batch_processes_glob_and_writes_summary() {
    let tmp = TempDir::new().unwrap();
    let inputs = tmp.path().join("in");
    fs::create_dir_all(&inputs).unwrap();
    write_summary_workbook(&inputs.join("mars.xlsx"), &SUMMARY_HEADER, &[row("M-1", "1-B-1")]);
    write_summary_workbook(
        &inputs.join("avril.xlsx"),
        &SUMMARY_HEADER,
        &[row("A-1", "1-C-1"), row("A-2", "2-C-2")],
    );
    write_summary_workbook(&inputs.join("vide.xlsx"), &SUMMARY_HEADER, &[]);
    let out = tmp.path().join("out");

    facturo(&tmp)
        .arg("batch")
        .arg(format!("{}/*.xlsx", inputs.display()))
        .args(["--variant", "summary", "--summary", "--continue-on-error", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 successful, 1 failed, 3 invoices"));

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    assert!(summary.starts_with("filename,status,documents"));
    assert!(summary.contains("avril.xlsx,success,2"));
    assert!(summary.contains("vide.xlsx,error"));

    let written = fs::read_dir(out.join("avril")).unwrap().count();
    assert_eq!(written, 2);
}

#[test]
fn batch_stops_on_first_error_by_default() {
    let tmp = TempDir::new().unwrap();
    write_summary_workbook(&tmp.path().join("vide.xlsx"), &SUMMARY_HEADER, &[]);

    facturo(&tmp)
        .arg("batch")
        .arg(format!("{}/*.xlsx", tmp.path().display()))
        .args(["--variant", "summary"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Processing failed"));
}
