use im::Vector;

use super::{OptionalValue, Value};

/// An immutable, ordered list of possibly-absent values.
///
/// The head is the most recently bound value: when a name is bound several
/// times, looking it up yields the latest binding first and the earliest
/// last. Cloning is O(1) and prepending shares the existing elements.
///
/// # Examples
///
/// ```rust
/// use strata::encoding::Encoding;
/// use strata::value::{OptionalValueList, Value};
/// let list = OptionalValueList::empty()
///     .add(Some(Value::new(vec![1], Encoding::default())))
///     .add(None);
/// assert_eq!(list.len(), 2);
/// assert!(list.contains_empty());
/// assert!(list.head().unwrap().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionalValueList(Vector<OptionalValue>);

impl OptionalValueList {
    pub fn empty() -> Self {
        Self(Vector::new())
    }

    pub fn single(value: OptionalValue) -> Self {
        Self(Vector::unit(value))
    }

    pub fn of(value: Value) -> Self {
        Self::single(Some(value))
    }

    /// Returns a new list with `head` prepended.
    pub fn add(&self, head: OptionalValue) -> Self {
        let mut values = self.0.clone();
        values.push_front(head);
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The most recent element.
    pub fn head(&self) -> Option<&OptionalValue> {
        self.0.front()
    }

    /// Everything but the head.
    pub fn tail(&self) -> Self {
        Self(self.0.skip(1))
    }

    /// The earliest element.
    pub fn bottom(&self) -> Option<&OptionalValue> {
        self.0.back()
    }

    /// Element at `index`, counting from the head.
    pub fn get(&self, index: usize) -> Option<&OptionalValue> {
        self.0.get(index)
    }

    pub fn contains_empty(&self) -> bool {
        self.0.iter().any(Option::is_none)
    }

    pub fn reverse(&self) -> Self {
        self.0.iter().rev().cloned().collect()
    }

    /// Iterates from the head (most recent) to the bottom (earliest).
    pub fn iter(&self) -> im::vector::Iter<'_, OptionalValue> {
        self.0.iter()
    }
}

impl FromIterator<OptionalValue> for OptionalValueList {
    /// Collects in iteration order: the first item becomes the head.
    fn from_iter<I: IntoIterator<Item = OptionalValue>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a OptionalValueList {
    type Item = &'a OptionalValue;
    type IntoIter = im::vector::Iter<'a, OptionalValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
