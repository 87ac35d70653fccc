use std::path::Path;

use gdc_consolidate::domain::SampleId;
use gdc_consolidate::sample_id::{extract_sample_id, normalize_barcode};

#[test]
fn barcode_in_file_name() {
    let id = extract_sample_id("downloads/TCGA-AB-1234.quantification.mirbase21.txt");
    assert_eq!(id.as_str(), "TCGA-AB-1234");
}

#[test]
fn aliquot_barcode_is_truncated() {
    let id = extract_sample_id("TCGA-A6-2671-01A-01T-1410-13_RPPA_data.txt");
    assert_eq!(id.as_str(), "TCGA-A6-2671");
}

#[test]
fn uuid_when_no_barcode() {
    let id = extract_sample_id(
        "gdc/0a1b2c3d-4e5f-6789-abcd-ef0123456789.mirbase21.mirnas.quantification.txt",
    );
    assert_eq!(id.as_str(), "0a1b2c3d-4e5f-6789-abcd-ef0123456789");
}

#[test]
fn barcode_beats_uuid() {
    let id = extract_sample_id("0a1b2c3d-4e5f-6789-abcd-ef0123456789.TCGA-AB-1234.seg.txt");
    assert_eq!(id.as_str(), "TCGA-AB-1234");
}

#[test]
fn stem_is_the_fallback() {
    assert_eq!(extract_sample_id("data/sample_7.seg.txt").as_str(), "sample_7.seg");
    assert_eq!(extract_sample_id("data/plain.txt").as_str(), "plain");
}

#[test]
fn extraction_is_total() {
    for name in ["", ".txt", "x", "TCGA-.txt", "/", "a/b/"] {
        let id = extract_sample_id(Path::new(name));
        assert!(!id.as_str().is_empty(), "empty id for {name:?}");
    }
}

#[test]
fn canonicalization_is_idempotent() {
    for raw in [
        "TCGA-AB-1234",
        "TCGA-AB-1234-01A-11R-A123-07",
        "TCGA-ab-cd-ef",
        "TCGA-X",
        "0a1b2c3d-4e5f-6789-abcd-ef0123456789",
        "free-form",
    ] {
        let once = normalize_barcode(raw);
        assert_eq!(normalize_barcode(&once), once);

        let id: SampleId = raw.parse().unwrap();
        assert_eq!(id.clone().canonicalize(), id);
    }
}
