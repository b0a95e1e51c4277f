//! Readers and writers for tests that need to observe I/O and cleanup.

use crate::sink::Destination;
use std::cell::{Cell, RefCell};
use std::io::{self, BufRead, Read, Write};
use std::rc::Rc;

/// Writer whose bytes stay inspectable after it has been moved away.
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn text(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Set once the wrapped resource is dropped.
#[derive(Clone, Default)]
pub struct CloseFlag(Rc<Cell<bool>>);

impl CloseFlag {
    pub fn is_closed(&self) -> bool {
        self.0.get()
    }
}

/// Wraps a reader or writer and raises a [`CloseFlag`] on drop.
pub struct Tracked<T> {
    inner: T,
    closed: CloseFlag,
}

impl<T> Tracked<T> {
    pub fn new(inner: T) -> (Self, CloseFlag) {
        let closed = CloseFlag::default();
        (
            Self {
                inner,
                closed: closed.clone(),
            },
            closed,
        )
    }
}

impl<T> Drop for Tracked<T> {
    fn drop(&mut self) {
        self.closed.0.set(true);
    }
}

impl<T: Read> Read for Tracked<T> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<T: BufRead> BufRead for Tracked<T> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.inner.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.inner.consume(amt)
    }
}

impl<T: Write> Write for Tracked<T> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Returns `data` on the first read and an error on every read after.
pub struct FailingReader {
    data: Option<Vec<u8>>,
}

impl FailingReader {
    pub fn new(data: &str) -> Self {
        Self {
            data: Some(data.as_bytes().to_vec()),
        }
    }
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.data.take() {
            Some(data) => {
                assert!(data.len() <= buf.len());
                buf[..data.len()].copy_from_slice(&data);
                Ok(data.len())
            }
            None => Err(io::Error::other("disk on fire")),
        }
    }
}

/// Accepts `lines` newline-terminated writes, then fails.
pub struct FailingWriter {
    lines: usize,
    out: SharedBuffer,
}

impl FailingWriter {
    pub fn new(lines: usize, out: SharedBuffer) -> Self {
        Self { lines, out }
    }
}

impl Write for FailingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.lines == 0 {
            return Err(io::Error::new(io::ErrorKind::StorageFull, "no space left"));
        }
        if buf.contains(&b'\n') {
            self.lines -= 1;
        }
        self.out.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Counts opens and tracks closes of a [`MemoryDestination`].
#[derive(Clone, Default)]
pub struct DestinationProbe {
    opened: Rc<Cell<usize>>,
    closed: Rc<RefCell<Vec<CloseFlag>>>,
}

impl DestinationProbe {
    pub fn opened(&self) -> usize {
        self.opened.get()
    }

    /// True once every writer handed out so far has been dropped.
    pub fn all_closed(&self) -> bool {
        self.closed.borrow().iter().all(CloseFlag::is_closed)
    }
}

/// Destination writing into a [`SharedBuffer`], optionally failing after
/// a number of lines.
pub struct MemoryDestination {
    out: SharedBuffer,
    fail_after: Option<usize>,
    probe: DestinationProbe,
}

impl MemoryDestination {
    pub fn new(out: SharedBuffer) -> Self {
        Self {
            out,
            fail_after: None,
            probe: DestinationProbe::default(),
        }
    }

    pub fn failing_after(mut self, lines: usize) -> Self {
        self.fail_after = Some(lines);
        self
    }

    pub fn probe(&self) -> DestinationProbe {
        self.probe.clone()
    }
}

impl Destination for MemoryDestination {
    fn location(&self) -> &str {
        "memory"
    }

    fn create(&self) -> io::Result<Box<dyn Write>> {
        self.probe.opened.set(self.probe.opened.get() + 1);
        let writer: Box<dyn Write> = match self.fail_after {
            Some(lines) => {
                let (w, flag) = Tracked::new(FailingWriter::new(lines, self.out.clone()));
                self.probe.closed.borrow_mut().push(flag);
                Box::new(w)
            }
            None => {
                let (w, flag) = Tracked::new(self.out.clone());
                self.probe.closed.borrow_mut().push(flag);
                Box::new(w)
            }
        };
        Ok(writer)
    }
}
