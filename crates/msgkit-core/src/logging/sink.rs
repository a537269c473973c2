//! Output sinks
//!
//! A `Sink` is a shared handle to a write destination. Loggers write to sinks
//! but never own them: closing a file or draining a buffer is up to whoever
//! created the sink.

use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;

/// Something a sink can write whole chunks into
trait SinkWriter: Send + Sync {
    fn write_chunk(&self, buf: &[u8]) -> io::Result<()>;
}

impl<W: Write + Send> SinkWriter for Mutex<W> {
    fn write_chunk(&self, buf: &[u8]) -> io::Result<()> {
        let mut writer = self.lock();
        writer.write_all(buf)?;
        writer.flush()
    }
}

enum Console {
    Stdout,
    Stderr,
}

impl SinkWriter for Console {
    fn write_chunk(&self, buf: &[u8]) -> io::Result<()> {
        match self {
            Console::Stdout => {
                let mut out = io::stdout().lock();
                out.write_all(buf)?;
                out.flush()
            }
            Console::Stderr => {
                let mut err = io::stderr().lock();
                err.write_all(buf)?;
                err.flush()
            }
        }
    }
}

static STDOUT: Lazy<Sink> = Lazy::new(|| Sink::from_writer("stdout", Arc::new(Console::Stdout)));
static STDERR: Lazy<Sink> = Lazy::new(|| Sink::from_writer("stderr", Arc::new(Console::Stderr)));

/// A cloneable, shared write destination
///
/// # Example
///
/// ```
/// use msgkit_core::logging::{MemorySink, Sink};
///
/// let memory = MemorySink::new();
/// let sinks = vec![Sink::stdout(), memory.sink()];
/// assert_eq!(sinks[0].label(), "stdout");
/// ```
#[derive(Clone)]
pub struct Sink {
    label: Arc<str>,
    writer: Arc<dyn SinkWriter>,
}

impl Sink {
    /// Wrap a writer. The sink takes the writer; clones share it.
    pub fn new<W: Write + Send + 'static>(label: impl Into<String>, writer: W) -> Self {
        Self::shared(label, Arc::new(Mutex::new(writer)))
    }

    /// Wrap a writer the caller keeps a handle to
    pub fn shared<W: Write + Send + 'static>(label: impl Into<String>, writer: Arc<Mutex<W>>) -> Self {
        Self::from_writer(label, writer)
    }

    /// The process standard output
    pub fn stdout() -> Self {
        STDOUT.clone()
    }

    /// The process standard error
    pub fn stderr() -> Self {
        STDERR.clone()
    }

    /// Open `path` for appending, creating it if needed.
    ///
    /// The file is closed when the last clone of the sink is dropped.
    pub fn append_file(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(path.display().to_string(), file))
    }

    fn from_writer(label: impl Into<String>, writer: Arc<dyn SinkWriter>) -> Self {
        let label: String = label.into();
        Self {
            label: Arc::from(label),
            writer,
        }
    }

    /// Name used to identify the sink in diagnostics
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Write the whole buffer and flush
    pub fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        self.writer.write_chunk(buf)
    }

    /// Whether both handles refer to the same destination
    pub fn same_as(&self, other: &Sink) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.writer), Arc::as_ptr(&other.writer))
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink").field("label", &self.label).finish()
    }
}

/// In-memory sink for tests and output capture
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink handle writing into this buffer
    pub fn sink(&self) -> Sink {
        Sink::shared("memory", self.buf.clone())
    }

    /// Everything written so far, lossily decoded as UTF-8
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock()).into_owned()
    }

    /// Written text split into lines
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.buf.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.buf.lock().clear();
    }
}
