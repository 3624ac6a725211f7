use csv::{Reader, ReaderBuilder, StringRecord};
use std::fs::File;
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;

use crate::error::Result;

// A single parsed source line. Empty cells are treated as missing
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    fields: Vec<Option<String>>,
}

impl Record {
    pub fn new(fields: Vec<Option<String>>) -> Self {
        Self { fields }
    }

    fn from_csv(record: &StringRecord) -> Self {
        let fields = record
            .iter()
            .map(|field| {
                if field.is_empty() {
                    None
                } else {
                    Some(field.to_string())
                }
            })
            .collect();
        Self { fields }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.fields.get(index).and_then(|f| f.as_deref())
    }

    pub fn fields(&self) -> &[Option<String>] {
        &self.fields
    }
}

/// A contiguous group of records drawn from the source, sharing its header.
#[derive(Debug, Clone)]
pub struct Batch {
    index: usize,
    headers: Arc<Vec<String>>,
    records: Vec<Record>,
}

impl Batch {
    pub fn new(index: usize, headers: Arc<Vec<String>>, records: Vec<Record>) -> Self {
        Self {
            index,
            headers,
            records,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    // Position of a named column in the header
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// Lazily reads a CSV file in fixed-size batches.
///
/// Only one batch is held in memory at a time. Once the source is exhausted, or
/// a read error has been yielded, the iterator keeps returning `None`.
pub struct CsvChunkReader {
    reader: Reader<File>,
    headers: Arc<Vec<String>>,
    chunk_size: usize,
    next_index: usize,
    finished: bool,
}

impl CsvChunkReader {
    pub fn open<P: AsRef<Path>>(path: P, chunk_size: NonZeroUsize) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_path(path.as_ref())?;

        let headers = reader
            .headers()?
            .iter()
            .map(|h| h.to_string())
            .collect::<Vec<_>>();

        Ok(Self {
            reader,
            headers: Arc::new(headers),
            chunk_size: chunk_size.get(),
            next_index: 0,
            finished: false,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    fn read_chunk(&mut self) -> Result<Vec<Record>> {
        let mut records = Vec::with_capacity(self.chunk_size);
        let mut row = StringRecord::new();
        while records.len() < self.chunk_size {
            if !self.reader.read_record(&mut row)? {
                self.finished = true;
                break;
            }
            records.push(Record::from_csv(&row));
        }
        Ok(records)
    }
}

impl Iterator for CsvChunkReader {
    type Item = Result<Batch>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.read_chunk() {
            Ok(records) if records.is_empty() => None,
            Ok(records) => {
                let batch = Batch::new(self.next_index, Arc::clone(&self.headers), records);
                self.next_index += 1;
                Some(Ok(batch))
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}
