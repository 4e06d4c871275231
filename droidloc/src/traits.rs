//! Reading and writing of whole resource files.

use std::{
    fs::File,
    io::{BufRead, BufWriter, Cursor, Read, Write},
    path::Path,
};

use crate::error::Error;

/// Decoding from and encoding to one resource file.
///
/// Implementors supply [`decode`](ResourceCodec::decode) and
/// [`encode`](ResourceCodec::encode); the file and in-memory helpers are
/// built on those two.
///
/// ```rust,no_run
/// use droidloc::{Document, traits::ResourceCodec};
/// let document = Document::read_file("app/src/main/res/values/strings.xml")?;
/// document.write_file("app/src/main/res/values-fr/strings.xml")?;
/// Ok::<(), droidloc::Error>(())
/// ```
pub trait ResourceCodec: Sized {
    fn decode<R: BufRead>(reader: R) -> Result<Self, Error>;

    fn encode<W: Write>(&self, writer: W) -> Result<(), Error>;

    /// UTF-8 with or without BOM and UTF-16 with BOM are all accepted.
    fn read_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let file = File::open(path)?;
        let mut utf8 = String::new();
        encoding_rs_io::DecodeReaderBytesBuilder::new()
            .bom_override(true)
            .build(file)
            .read_to_string(&mut utf8)?;
        Self::parse_str(&utf8)
    }

    fn write_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.encode(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    fn parse_str(s: &str) -> Result<Self, Error> {
        Self::decode(s.as_bytes())
    }

    fn parse_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Self::decode(Cursor::new(bytes))
    }

    fn encode_to_string(&self) -> Result<String, Error> {
        let mut bytes = Vec::new();
        self.encode(&mut bytes)?;
        String::from_utf8(bytes).map_err(|e| Error::DataMismatch(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Document;

    #[test]
    fn test_read_file_strips_utf8_bom() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("strings.xml");
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(br#"<resources><string name="a">A</string></resources>"#);
        std::fs::write(&path, bytes).unwrap();

        let document = Document::read_file(&path).unwrap();
        assert_eq!(document.find_string("a").unwrap().content, "A");
    }

    #[test]
    fn test_read_file_decodes_utf16() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("strings.xml");
        let xml = r#"<resources><string name="a">Été</string></resources>"#;
        let mut bytes = vec![0xFF, 0xFE];
        for unit in xml.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        std::fs::write(&path, bytes).unwrap();

        let document = Document::read_file(&path).unwrap();
        assert_eq!(document.find_string("a").unwrap().content, "Été");
    }

    #[test]
    fn test_write_file_then_read_back() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("strings.xml");
        let document = Document::parse_str(r#"<resources><string name="b">B</string></resources>"#)
            .unwrap();

        document.write_file(&path).unwrap();

        assert_eq!(Document::read_file(&path).unwrap(), document);
        assert!(document.encode_to_string().unwrap().starts_with("<?xml"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Document::read_file("/no/such/dir/strings.xml").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
