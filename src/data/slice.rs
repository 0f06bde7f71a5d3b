use std::fmt;
use std::rc::Rc;

use once_cell::unsync::OnceCell;

use crate::data::Source;
use crate::diagnostics::Result;

/// A lazy view of `length` bytes at `offset` in a [`Source`].
///
/// Creating a slice never reads. The first call to [`Slice::data`] reads the
/// range and caches it; every clone of the slice shares that cache, so a
/// slice materialises at most once and always yields the same bytes.
#[derive(Clone)]
pub struct Slice {
    source: Source,
    offset: u64,
    length: u64,
    cache: Rc<OnceCell<Rc<[u8]>>>,
}

impl Slice {
    /// Creates a slice if the range is available in `source`, `None` otherwise.
    pub fn create(source: Source, offset: u64, length: u64) -> Result<Option<Slice>> {
        if !source.is_available(offset, length)? {
            return Ok(None);
        }
        Ok(Some(Self::unchecked(source, offset, length)))
    }

    /// A slice covering all of `bytes`, backed by a constant source.
    pub fn from_bytes(bytes: impl Into<Rc<[u8]>>) -> Slice {
        let bytes: Rc<[u8]> = bytes.into();
        let length = bytes.len() as u64;
        let slice = Self::unchecked(Source::Constant(Rc::clone(&bytes)), 0, length);
        // Constants are already materialised.
        let _ = slice.cache.set(bytes);
        slice
    }

    fn unchecked(source: Source, offset: u64, length: u64) -> Slice {
        Slice {
            source,
            offset,
            length,
            cache: Rc::new(OnceCell::new()),
        }
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn length(&self) -> u64 {
        self.length
    }

    /// Whether the bytes have been read already.
    pub fn is_materialized(&self) -> bool {
        self.cache.get().is_some()
    }

    /// The bytes of this slice, read on first use.
    pub fn data(&self) -> Result<Rc<[u8]>> {
        self.cache
            .get_or_try_init(|| {
                self.source
                    .read(self.offset, self.length)
                    .map(Rc::from)
            })
            .map(Rc::clone)
    }

    /// At most `limit` leading bytes, without materialising the whole slice.
    pub fn data_prefix(&self, limit: u64) -> Result<Vec<u8>> {
        if let Some(data) = self.cache.get() {
            let end = data.len().min(usize::try_from(limit).unwrap_or(usize::MAX));
            return Ok(data[..end].to_vec());
        }
        self.source.read(self.offset, self.length.min(limit))
    }
}

impl PartialEq for Slice {
    fn eq(&self, other: &Self) -> bool {
        self.offset == other.offset
            && self.length == other.length
            && self.source.same_as(&other.source)
    }
}

impl fmt::Debug for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Slice({:?}@{}:{})", self.source, self.offset, self.length)
    }
}
