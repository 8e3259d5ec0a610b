use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use serde::{Serialize, de::DeserializeOwned};

use super::ExchangeError;

///
/// dump_json
///
/// Writes `value` as pretty-printed JSON with a trailing newline, creating
/// parent directories as needed.
///

pub(super) fn dump_json<T: Serialize>(path: &Path, value: &T) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let mut file = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut file, value)?;
    file.write_all(b"\n")?;

    file.flush()
}

///
/// Sink
///

enum Sink {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Plain(w) => w.write(buf),
            Self::Gzip(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Plain(w) => w.flush(),
            Self::Gzip(w) => w.flush(),
        }
    }
}

///
/// JsonlWriter
///
/// Streams serialized rows to a `.jsonl` file, one JSON document per line.
/// Output is gzip-compressed when requested. Callers must invoke `finish`,
/// dropping the writer silently discards buffered output errors.
///

pub(super) struct JsonlWriter {
    sink: Sink,
    rows: u64,
}

impl JsonlWriter {
    pub fn create(path: &Path, compress: bool) -> io::Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let file = BufWriter::new(File::create(path)?);
        let sink = if compress {
            Sink::Gzip(GzEncoder::new(file, Compression::default()))
        } else {
            Sink::Plain(file)
        };

        Ok(Self { sink, rows: 0 })
    }

    pub fn write<T: Serialize>(&mut self, row: &T) -> io::Result<()> {
        serde_json::to_writer(&mut self.sink, row)?;
        self.sink.write_all(b"\n")?;
        self.rows += 1;

        Ok(())
    }

    // flushes all buffers and returns the number of rows written
    pub fn finish(self) -> io::Result<u64> {
        match self.sink {
            Sink::Plain(mut w) => w.flush()?,
            Sink::Gzip(enc) => enc.finish()?.flush()?,
        }

        Ok(self.rows)
    }
}

///
/// Source
///

enum Source {
    Plain(BufReader<File>),
    Gzip(BufReader<GzDecoder<File>>),
}

impl Source {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        match self {
            Self::Plain(r) => r.read_line(buf),
            Self::Gzip(r) => r.read_line(buf),
        }
    }
}

///
/// JsonlReader
///
/// Line-oriented reader over a `.jsonl` or `.jsonl.gz` file. Blank lines are
/// skipped; any other undecodable line surfaces as `MalformedRow` with the
/// offending path and line number.
///

pub(super) struct JsonlReader<T> {
    source: Source,
    path: PathBuf,
    line: usize,
    buf: String,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> Iterator for JsonlReader<T> {
    type Item = Result<T, ExchangeError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            let read = match self.source.read_line(&mut self.buf) {
                Ok(n) => n,
                Err(err) => return Some(Err(err.into())),
            };
            if read == 0 {
                return None;
            }
            self.line += 1;

            let trimmed = self.buf.trim();
            if trimmed.is_empty() {
                continue;
            }

            return Some(serde_json::from_str(trimmed).map_err(|source| {
                ExchangeError::MalformedRow {
                    path: self.path.clone(),
                    line: self.line,
                    source,
                }
            }));
        }
    }
}

// Opens a jsonl file for reading, transparently decompressing `.gz` files.
pub(super) fn read_jsonl<T: DeserializeOwned>(path: &Path) -> io::Result<JsonlReader<T>> {
    let file = File::open(path)?;
    let source = if is_gz(path) {
        Source::Gzip(BufReader::new(GzDecoder::new(file)))
    } else {
        Source::Plain(BufReader::new(file))
    };

    Ok(JsonlReader {
        source,
        path: path.to_path_buf(),
        line: 0,
        buf: String::new(),
        _marker: PhantomData,
    })
}

fn is_gz(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Row {
        id: String,
        n: u32,
    }

    fn rows() -> Vec<Row> {
        (0..5)
            .map(|n| Row {
                id: format!("r{n}"),
                n,
            })
            .collect()
    }

    #[test]
    fn writes_and_reads_plain_jsonl() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("rows.jsonl");

        let mut writer = JsonlWriter::create(&path, false).expect("create");
        for row in rows() {
            writer.write(&row).expect("write");
        }
        assert_eq!(writer.finish().expect("finish"), 5);

        let back: Vec<Row> = read_jsonl(&path)
            .expect("open")
            .collect::<Result<_, _>>()
            .expect("read");
        assert_eq!(back, rows());
    }

    #[test]
    fn gzip_roundtrip_produces_gzip_magic() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("rows.jsonl.gz");

        let mut writer = JsonlWriter::create(&path, true).expect("create");
        for row in rows() {
            writer.write(&row).expect("write");
        }
        writer.finish().expect("finish");

        let raw = fs::read(&path).expect("read bytes");
        assert_eq!(&raw[..2], &[0x1f, 0x8b], "expected gzip magic bytes");

        let back: Vec<Row> = read_jsonl(&path)
            .expect("open")
            .collect::<Result<_, _>>()
            .expect("read");
        assert_eq!(back, rows());
    }

    #[test]
    fn reader_skips_blank_lines() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("rows.jsonl");
        fs::write(&path, "{\"id\":\"a\",\"n\":1}\n\n   \n{\"id\":\"b\",\"n\":2}\n").expect("write");

        let back: Vec<Row> = read_jsonl(&path)
            .expect("open")
            .collect::<Result<_, _>>()
            .expect("read");
        assert_eq!(back.len(), 2);
        assert_eq!(back[1].id, "b");
    }

    #[test]
    fn malformed_line_reports_path_and_line() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("rows.jsonl");
        fs::write(&path, "{\"id\":\"a\",\"n\":1}\n\nnot json\n").expect("write");

        let err = read_jsonl::<Row>(&path)
            .expect("open")
            .collect::<Result<Vec<_>, _>>()
            .expect_err("should fail");
        match err {
            ExchangeError::MalformedRow { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn dump_json_creates_parent_dirs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested/deep/value.json");

        dump_json(&path, &serde_json::json!({"ok": true})).expect("dump");

        let text = fs::read_to_string(&path).expect("read");
        assert!(text.contains("\"ok\": true"));
        assert!(text.ends_with('\n'));
    }
}
