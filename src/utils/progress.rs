//! Progress-reporting stream copy and nested progress scaling.

use std::io::{Read, Write};

use crate::{Error, Result};

/// Copies `reader` to `writer` in chunks, reporting cumulative bytes after
/// each chunk.
///
/// The callback receives the total number of bytes copied so far; the final
/// invocation carries the return value. Copying is synchronous - scheduling
/// around it is the caller's concern.
///
/// # Errors
///
/// [`Error::Configuration`] for a zero `chunk_size`; [`Error::IoError`] for
/// read or write failures.
///
/// # Examples
///
/// ```rust
/// use dotresolve::utils::copy_with_progress;
///
/// let data = vec![0u8; 10_000];
/// let mut out = Vec::new();
/// let mut reports = Vec::new();
///
/// let copied = copy_with_progress(&mut data.as_slice(), &mut out, 4096, |done| {
///     reports.push(done);
/// })?;
///
/// assert_eq!(copied, 10_000);
/// assert_eq!(reports, vec![4096, 8192, 10_000]);
/// # Ok::<(), dotresolve::Error>(())
/// ```
pub fn copy_with_progress<R, W, F>(
    reader: &mut R,
    writer: &mut W,
    chunk_size: usize,
    mut on_progress: F,
) -> Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
    F: FnMut(u64),
{
    if chunk_size == 0 {
        return Err(Error::Configuration(
            "chunk_size must be greater than zero".to_string(),
        ));
    }

    let mut buffer = vec![0u8; chunk_size];
    let mut copied = 0u64;

    loop {
        let read = reader.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        writer.write_all(&buffer[..read])?;
        copied += read as u64;
        on_progress(copied);
    }

    Ok(copied)
}

/// Maps a child operation's progress into a sub-range of a parent's.
///
/// A composite operation that spans several sub-operations gives each one a
/// scale; the sub-operation reports its own 0..=total progress and the scale
/// translates it into the parent's units.
///
/// # Examples
///
/// ```rust
/// use dotresolve::utils::ProgressScale;
///
/// // Second quarter of a 400-unit parent operation.
/// let scale = ProgressScale::new(100, 100, 50);
/// assert_eq!(scale.map(0), 100);
/// assert_eq!(scale.map(25), 150);
/// assert_eq!(scale.map(50), 200);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ProgressScale {
    offset: u64,
    span: u64,
    child_total: u64,
}

impl ProgressScale {
    /// Creates a scale translating `0..=child_total` into
    /// `offset..=offset + span` parent units.
    #[must_use]
    pub fn new(offset: u64, span: u64, child_total: u64) -> Self {
        ProgressScale {
            offset,
            span,
            child_total,
        }
    }

    /// Translates a child progress value into parent units.
    ///
    /// Child progress beyond `child_total` clamps to the end of the range;
    /// a zero `child_total` maps everything to the range start.
    #[must_use]
    pub fn map(&self, child_progress: u64) -> u64 {
        if self.child_total == 0 {
            return self.offset;
        }
        let clamped = child_progress.min(self.child_total);
        // The intermediate product exceeds u64 for multi-gigabyte byte
        // ranges; widen before dividing.
        #[allow(clippy::cast_possible_truncation)]
        let scaled =
            (u128::from(self.span) * u128::from(clamped) / u128::from(self.child_total)) as u64;
        self.offset + scaled
    }
}
