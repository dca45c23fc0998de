use std::io::{self, Read, Write};

use tokio_util::sync::CancellationToken;

fn check(token: Option<&CancellationToken>) -> io::Result<()> {
    match token {
        Some(t) if t.is_cancelled() => Err(io::Error::other("operation cancelled")),
        _ => Ok(()),
    }
}

/// `Write` adapter that fails every write once the token is cancelled.
pub(crate) struct CancellableWriter<'a, W> {
    inner: W,
    token: Option<&'a CancellationToken>,
}

impl<'a, W: Write> CancellableWriter<'a, W> {
    pub(crate) fn new(inner: W, token: Option<&'a CancellationToken>) -> Self {
        Self { inner, token }
    }

    pub(crate) fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for CancellableWriter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        check(self.token)?;
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// `Read` adapter that fails every read once the token is cancelled.
pub(crate) struct CancellableReader<'a, R> {
    inner: R,
    token: Option<&'a CancellationToken>,
}

impl<'a, R: Read> CancellableReader<'a, R> {
    pub(crate) fn new(inner: R, token: Option<&'a CancellationToken>) -> Self {
        Self { inner, token }
    }
}

impl<R: Read> Read for CancellableReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        check(self.token)?;
        self.inner.read(buf)
    }
}
