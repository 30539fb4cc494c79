//! Zip-backed containers. Both `.dsl` captures and `.sr` sessions are plain zip
//! archives, so one reader and one writer cover both sides of a conversion.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, Write};
use std::path::{Path, PathBuf};

use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::{ContainerReader, ContainerWriter};
use crate::config::OutputCompression;
use crate::error::Result;

/// Upper bound on how much of an entry's declared size is reserved up front.
const MAX_PREALLOCATION: u64 = 1 << 24;

//==================================================================================
// 1. Reader
//==================================================================================

pub struct ZipContainerReader<R: Read + Seek> {
    archive: ZipArchive<R>,
}

impl ZipContainerReader<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }
}

impl<R: Read + Seek> ZipContainerReader<R> {
    pub fn from_reader(reader: R) -> Result<Self> {
        Ok(Self {
            archive: ZipArchive::new(reader)?,
        })
    }
}

impl<R: Read + Seek> ContainerReader for ZipContainerReader<R> {
    fn entry_names(&self) -> Vec<String> {
        self.archive.file_names().map(str::to_string).collect()
    }

    fn entry_exists(&self, name: &str) -> bool {
        self.archive.file_names().any(|n| n == name)
    }

    fn read_entry(&mut self, name: &str) -> Result<Option<Vec<u8>>> {
        match self.archive.by_name(name) {
            Ok(mut entry) => {
                let reserve = entry.size().min(MAX_PREALLOCATION) as usize;
                let mut buf = Vec::with_capacity(reserve);
                entry.read_to_end(&mut buf)?;
                Ok(Some(buf))
            }
            Err(ZipError::FileNotFound) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

//==================================================================================
// 2. Writer
//==================================================================================

/// Writes whole entries into a zip archive. Call [`ZipContainerWriter::finish`]
/// to write the central directory and surface any error doing so.
pub struct ZipContainerWriter<W: Write + Seek> {
    writer: ZipWriter<W>,
    options: SimpleFileOptions,
}

impl ZipContainerWriter<BufWriter<File>> {
    pub fn create(path: &Path, compression: OutputCompression) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file), compression))
    }
}

impl<W: Write + Seek> ZipContainerWriter<W> {
    pub fn new(inner: W, compression: OutputCompression) -> Self {
        let method = match compression {
            OutputCompression::Deflated => CompressionMethod::Deflated,
            OutputCompression::Stored => CompressionMethod::Stored,
        };
        Self {
            writer: ZipWriter::new(inner),
            options: SimpleFileOptions::default().compression_method(method),
        }
    }

    /// Writes the central directory and hands back the underlying writer.
    pub fn finish(self) -> Result<W> {
        Ok(self.writer.finish()?)
    }
}

impl<W: Write + Seek> ContainerWriter for ZipContainerWriter<W> {
    fn write_entry(&mut self, name: &str, data: &[u8]) -> Result<()> {
        let large = data.len() as u64 >= u64::from(u32::MAX);
        self.writer
            .start_file(name, self.options.large_file(large))?;
        self.writer.write_all(data)?;
        Ok(())
    }
}

/// A zip writer for a path that is only created once the first entry arrives.
/// Until then an existing file at `path` is left as it was.
pub struct DeferredZipWriter {
    path: PathBuf,
    compression: OutputCompression,
    writer: Option<ZipContainerWriter<BufWriter<File>>>,
}

impl DeferredZipWriter {
    pub fn new(path: impl Into<PathBuf>, compression: OutputCompression) -> Self {
        Self {
            path: path.into(),
            compression,
            writer: None,
        }
    }

    pub fn is_started(&self) -> bool {
        self.writer.is_some()
    }

    /// Finishes the archive, creating an empty one if nothing was written.
    pub fn finish(self) -> Result<()> {
        let writer = match self.writer {
            Some(writer) => writer,
            None => ZipContainerWriter::create(&self.path, self.compression)?,
        };
        writer.finish()?.flush()?;
        Ok(())
    }
}

impl ContainerWriter for DeferredZipWriter {
    fn write_entry(&mut self, name: &str, data: &[u8]) -> Result<()> {
        let writer = match self.writer.take() {
            Some(writer) => writer,
            None => {
                log::debug!("creating output archive {}", self.path.display());
                ZipContainerWriter::create(&self.path, self.compression)?
            }
        };
        self.writer.insert(writer).write_entry(name, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn write_archive(compression: OutputCompression) -> Vec<u8> {
        let mut writer = ZipContainerWriter::new(Cursor::new(Vec::new()), compression);
        writer.write_entry("version", b"2").unwrap();
        writer.write_entry("logic-1-1", &[0x01, 0x02, 0x04]).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_written_entries_read_back() {
        for compression in [OutputCompression::Deflated, OutputCompression::Stored] {
            let bytes = write_archive(compression);
            let mut reader = ZipContainerReader::from_reader(Cursor::new(bytes)).unwrap();

            assert_eq!(reader.entry_names(), vec!["version", "logic-1-1"]);
            assert!(reader.entry_exists("logic-1-1"));
            assert_eq!(reader.read_entry("version").unwrap(), Some(b"2".to_vec()));
            assert_eq!(
                reader.read_entry("logic-1-1").unwrap(),
                Some(vec![0x01, 0x02, 0x04])
            );
        }
    }

    #[test]
    fn test_absent_entry_is_none_not_error() {
        let bytes = write_archive(OutputCompression::Stored);
        let mut reader = ZipContainerReader::from_reader(Cursor::new(bytes)).unwrap();
        assert!(!reader.entry_exists("O-0/0"));
        assert!(reader.read_entry("O-0/0").unwrap().is_none());
    }

    #[test]
    fn test_garbage_is_zip_error() {
        let result = ZipContainerReader::from_reader(Cursor::new(b"not a zip".to_vec()));
        assert!(matches!(result, Err(crate::error::ConvertError::Zip(_))));
    }

    #[test]
    fn test_deferred_writer_leaves_existing_file_until_first_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.sr");
        std::fs::write(&path, b"previous session").unwrap();

        let writer = DeferredZipWriter::new(&path, OutputCompression::Stored);
        assert!(!writer.is_started());
        drop(writer);
        assert_eq!(std::fs::read(&path).unwrap(), b"previous session");

        let mut writer = DeferredZipWriter::new(&path, OutputCompression::Deflated);
        writer.write_entry("version", b"2").unwrap();
        writer.write_entry("metadata", b"[global]\n").unwrap();
        assert!(writer.is_started());
        writer.finish().unwrap();

        let mut reader = ZipContainerReader::open(&path).unwrap();
        assert_eq!(reader.entry_names(), vec!["version", "metadata"]);
        assert_eq!(reader.read_entry("version").unwrap(), Some(b"2".to_vec()));
    }

    #[test]
    fn test_deferred_writer_finish_without_entries_is_empty_archive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.sr");
        DeferredZipWriter::new(&path, OutputCompression::Stored)
            .finish()
            .unwrap();
        let reader = ZipContainerReader::open(&path).unwrap();
        assert!(reader.entry_names().is_empty());
    }

    #[test]
    fn test_declared_size_larger_than_cap_still_reads_fully() {
        let big = vec![0x5Au8; (MAX_PREALLOCATION as usize) + 3];
        let mut writer =
            ZipContainerWriter::new(Cursor::new(Vec::new()), OutputCompression::Stored);
        writer.write_entry("O-0/0", &big).unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let mut reader = ZipContainerReader::from_reader(Cursor::new(bytes)).unwrap();
        assert_eq!(reader.read_entry("O-0/0").unwrap().map(|b| b.len()), Some(big.len()));
    }
}
