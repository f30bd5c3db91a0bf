//! Shared plumbing for command output
//!
//! Commands write through `Repository`'s writer so output can be swapped
//! out: stdout normally, a pager for long history, a buffer in tests.

use derive_new::new;
use minus::Pager;
use std::io::{self, Write};

/// Adapter implementing `Write` on top of the minus pager
///
/// The pager consumes strings rather than bytes, so written chunks must be
/// valid UTF-8. Flushing is a no-op; the pager renders once handed to
/// `minus::page_all`.
#[derive(new)]
pub struct PagerWriter {
    pager: Pager,
}

impl PagerWriter {
    pub fn pager(&self) -> &Pager {
        &self.pager
    }
}

impl Write for PagerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let s =
            std::str::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.pager.push_str(s).map_err(io::Error::other)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
