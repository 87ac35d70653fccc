use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::SampleId;

static BARCODE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"TCGA-[A-Z0-9-]+").expect("barcode token regex"));

static CANONICAL_BARCODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^TCGA-[A-Z0-9]{2}-[A-Z0-9]{4}").expect("canonical barcode regex")
});

static UUID_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
        .expect("uuid regex")
});

/// Reduces a TCGA barcode to its participant part, `TCGA-XX-YYYY`.
///
/// Longer aliquot barcodes (`TCGA-AB-1234-01A-11R-A123-07`) lose every group
/// after the second. Identifiers that are not TCGA barcodes come back as-is.
pub fn normalize_barcode(identifier: &str) -> String {
    if let Some(found) = CANONICAL_BARCODE.find(identifier) {
        return found.as_str().to_string();
    }
    if identifier.starts_with("TCGA-") {
        let parts = identifier.split('-').collect::<Vec<_>>();
        if parts.len() >= 3 {
            return format!("TCGA-{}-{}", parts[1], parts[2]);
        }
    }
    identifier.to_string()
}

/// Derives the sample identifier for a downloaded file.
///
/// Tries, in order: a TCGA barcode anywhere in the file name, a GDC UUID,
/// and finally the file stem. Always yields a non-empty id.
pub fn extract_sample_id(path: impl AsRef<Path>) -> SampleId {
    let path = path.as_ref();
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    if let Some(found) = BARCODE_TOKEN.find(&name) {
        return SampleId::new_unchecked(normalize_barcode(found.as_str()));
    }
    if let Some(found) = UUID_TOKEN.find(&name) {
        return SampleId::new_unchecked(found.as_str().to_string());
    }

    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .or_else(|| Some(path.to_string_lossy().into_owned()).filter(|full| !full.is_empty()))
        .unwrap_or_else(|| "unknown".to_string());
    SampleId::new_unchecked(normalize_barcode(&stem))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn barcode_is_truncated_to_participant() {
        assert_eq!(normalize_barcode("TCGA-AB-1234-01A-11R-A123-07"), "TCGA-AB-1234");
        assert_eq!(normalize_barcode("TCGA-AB-1234"), "TCGA-AB-1234");
    }

    #[test]
    fn short_groups_are_rebuilt() {
        assert_eq!(normalize_barcode("TCGA-a1-b2-c3"), "TCGA-a1-b2");
        assert_eq!(normalize_barcode("TCGA-X"), "TCGA-X");
        assert_eq!(normalize_barcode("sample_7"), "sample_7");
    }
}
