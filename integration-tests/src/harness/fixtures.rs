use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A Caddy access log line for `uri`, without the trailing newline.
pub fn access_line(uri: &str, status: u16) -> String {
    format!(
        concat!(
            r#"{{"level":"info","ts":1700000000.5,"logger":"http.log.access","msg":"handled request","#,
            r#""request":{{"remote_ip":"203.0.113.9","client_ip":"203.0.113.9","proto":"HTTP/1.1","#,
            r#""method":"GET","host":"example.com","uri":"{uri}","#,
            r#""headers":{{"User-Agent":["Mozilla/5.0 (X11; Linux x86_64; rv:120.0) Gecko/20100101 Firefox/120.0"]}}}},"#,
            r#""duration":0.01,"size":256,"status":{status}}}"#
        ),
        uri = uri,
        status = status
    )
}

/// `count` newline-terminated lines with URIs `{prefix}/0`, `{prefix}/1`, ...
pub fn lines(prefix: &str, count: usize) -> String {
    (0..count)
        .map(|i| format!("{}\n", access_line(&format!("{prefix}/{i}"), 200)))
        .collect()
}

/// A temporary directory holding one logical log path and its siblings.
pub struct LogDir {
    dir: TempDir,
}

impl Default for LogDir {
    fn default() -> Self {
        Self::new()
    }
}

impl LogDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// The live file, `access.log`.
    pub fn base(&self) -> PathBuf {
        self.dir.path().join("access.log")
    }

    pub fn sibling(&self, suffix: &str) -> PathBuf {
        self.dir.path().join(format!("access.log{suffix}"))
    }

    /// A database path outside the `access.log*` glob.
    pub fn db(&self) -> PathBuf {
        self.dir.path().join("state").join("tailsift.db")
    }

    pub fn write(&self, path: &Path, contents: &str) {
        fs::write(path, contents).unwrap();
    }

    pub fn append(&self, path: &Path, contents: &str) {
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
    }

    pub fn write_gzip(&self, path: &Path, contents: &str) {
        let file = fs::File::create(path).unwrap();
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(contents.as_bytes()).unwrap();
        encoder.finish().unwrap();
    }

    /// Moves the live file aside the way logrotate does and starts a new one.
    pub fn rotate(&self, suffix: &str, new_contents: &str) {
        fs::rename(self.base(), self.sibling(suffix)).unwrap();
        self.write(&self.base(), new_contents);
    }
}
