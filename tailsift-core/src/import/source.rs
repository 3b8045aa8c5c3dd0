use async_compression::tokio::bufread::GzipDecoder;
use chrono::{DateTime, Utc};
use std::io::SeekFrom;
use std::path::Path;
use tokio::fs::{self, File};
use tokio::io::{AsyncBufRead, AsyncSeekExt, BufReader};

const READ_BUFFER_BYTES: usize = 64 * 1024;

pub(crate) type LineReader = Box<dyn AsyncBufRead + Send + Unpin>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FileStat {
    pub(crate) size: u64,
    pub(crate) mtime: DateTime<Utc>,
}

pub(crate) async fn stat(path: &Path) -> std::io::Result<FileStat> {
    let meta = fs::metadata(path).await?;
    Ok(FileStat {
        size: meta.len(),
        mtime: meta.modified()?.into(),
    })
}

/// Opens `path` for line reading. Plain files start at `offset`; gzip files
/// always start at the beginning of the decompressed stream.
pub(crate) async fn open(path: &Path, gzip: bool, offset: u64) -> std::io::Result<LineReader> {
    let mut file = File::open(path).await?;

    if gzip {
        let mut decoder = GzipDecoder::new(BufReader::new(file));
        decoder.multiple_members(true);
        return Ok(Box::new(BufReader::with_capacity(READ_BUFFER_BYTES, decoder)));
    }

    if offset > 0 {
        file.seek(SeekFrom::Start(offset)).await?;
    }

    Ok(Box::new(BufReader::with_capacity(READ_BUFFER_BYTES, file)))
}
