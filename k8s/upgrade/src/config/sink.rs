use std::{
    fmt,
    io::{self, Write},
    sync::{Arc, Mutex},
};

/// A shared handle to a writable output target, e.g. a terminal stream, a file or an in-memory
/// buffer. Clones write into the same underlying writer.
#[derive(Clone)]
pub struct Sink(Arc<Mutex<dyn Write + Send>>);

impl Sink {
    /// Wraps a writer which is owned by the sink from now on.
    pub fn new<W>(writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        Self(Arc::new(Mutex::new(writer)))
    }

    /// Wraps a writer which the caller keeps a handle to, so that it may be inspected later.
    pub fn from_shared<W>(writer: Arc<Mutex<W>>) -> Self
    where
        W: Write + Send + 'static,
    {
        Self(writer)
    }

    /// Returns true if both sinks write into the same writer.
    #[cfg(test)]
    pub(crate) fn same_as(&self, other: &Sink) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.0) as *const (),
            Arc::as_ptr(&other.0) as *const (),
        )
    }
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "sink lock poisoned"))?
            .write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "sink lock poisoned"))?
            .flush()
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Sink").finish()
    }
}
