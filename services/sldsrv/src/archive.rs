//! Zip packaging of a diagram
//!
//! Entries are `{id}.svg` then `{id}.json`, deflated, stamped 1980-01-01 so
//! the same diagram always yields the same bytes.

use crate::error::Result;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

pub fn package(voltage_level_id: &str, svg: &str, metadata: &str) -> Result<Vec<u8>> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    writer.start_file(format!("{}.svg", voltage_level_id), options)?;
    writer.write_all(svg.as_bytes())?;

    writer.start_file(format!("{}.json", voltage_level_id), options)?;
    writer.write_all(metadata.as_bytes())?;

    Ok(writer.finish()?.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    fn entries(bytes: Vec<u8>) -> Vec<(String, String)> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        (0..archive.len())
            .map(|i| {
                let mut file = archive.by_index(i).unwrap();
                let mut content = String::new();
                file.read_to_string(&mut content).unwrap();
                (file.name().to_string(), content)
            })
            .collect()
    }

    #[test]
    fn test_round_trip() {
        let bytes = package("VL1", "<svg/>", r#"{"nodes":[]}"#).unwrap();
        assert_eq!(
            entries(bytes),
            vec![
                ("VL1.svg".to_string(), "<svg/>".to_string()),
                ("VL1.json".to_string(), r#"{"nodes":[]}"#.to_string()),
            ]
        );
    }

    #[test]
    fn test_deterministic_bytes() {
        let svg = "<svg>é</svg>".repeat(100);
        let first = package("VL1", &svg, "{}").unwrap();
        let second = package("VL1", &svg, "{}").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_entries_are_deflated() {
        let bytes = package("VL2", &"x".repeat(4096), "{}").unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let file = archive.by_index(0).unwrap();
        assert_eq!(file.compression(), CompressionMethod::Deflated);
        assert!(file.compressed_size() < file.size());
    }

    #[test]
    fn test_empty_documents() {
        let found = entries(package("VL1", "", "").unwrap());
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|(_, content)| content.is_empty()));
    }
}
