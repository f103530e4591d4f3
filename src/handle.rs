use std::fmt::{Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};

// Strong/weak handle pair for manually managed resources.
//
// Owner is the ownership-bearing handle: the pointee is destroyed the moment
// the last Owner sharing its allocation goes away. Ref observes the same
// allocation without keeping the pointee alive; once every Owner is gone,
// Ref::get() reports absence instead of dangling.
//
// Both are backed by Rc/Weak, so count underflow and double-free are
// unrepresentable. Comparisons are by pointee address, never by allocation
// bookkeeping, so two distinct resources can never compare equal.

pub struct Owner<T: ?Sized>(Option<Rc<T>>);

impl<T> Owner<T>
{
    #[must_use]
    pub fn new(value: T) -> Self
    {
        Self(Some(Rc::new(value)))
    }
}
impl<T: ?Sized> Owner<T>
{
    #[must_use]
    pub const fn empty() -> Self { Self(None) }

    pub(crate) fn from_rc(rc: Rc<T>) -> Self { Self(Some(rc)) }
    pub(crate) fn as_rc(&self) -> Option<&Rc<T>> { self.0.as_ref() }

    #[inline] #[must_use]
    pub fn get(&self) -> Option<&T>
    {
        self.0.as_deref()
    }

    #[inline] #[must_use]
    pub fn is_empty(&self) -> bool { self.0.is_none() }

    // drop this handle's share of the ownership; destroys the pointee if this
    // was the last Owner. no-op on an empty handle
    pub fn release(&mut self)
    {
        self.0 = None;
    }

    #[must_use]
    pub fn create_ref(&self) -> Ref<T>
    {
        match &self.0
        {
            Some(rc) => Ref(Some(Rc::downgrade(rc))),
            None => Ref::empty(),
        }
    }

    // number of live Owner handles sharing this allocation (0 if empty)
    #[inline] #[must_use]
    pub fn strong_count(&self) -> usize
    {
        self.0.as_ref().map_or(0, Rc::strong_count)
    }

    // number of live Ref handles sharing this allocation (0 if empty)
    #[inline] #[must_use]
    pub fn weak_count(&self) -> usize
    {
        self.0.as_ref().map_or(0, Rc::weak_count)
    }

    // the observed pointee address; 0 when empty
    fn address(&self) -> usize
    {
        self.0.as_ref().map_or(0, |rc| Rc::as_ptr(rc).cast::<()>() as usize)
    }
}
impl<T: ?Sized> Clone for Owner<T>
{
    fn clone(&self) -> Self
    {
        Self(self.0.clone())
    }
}
impl<T: ?Sized> Default for Owner<T>
{
    fn default() -> Self { Self(None) }
}
impl<T: ?Sized> Debug for Owner<T>
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        write!(f, "Owner({:#x})", self.address())
    }
}
impl<T: ?Sized> PartialEq for Owner<T>
{
    fn eq(&self, other: &Self) -> bool { self.address() == other.address() }
}
impl<T: ?Sized> Eq for Owner<T> { }
impl<T: ?Sized> PartialEq<Ref<T>> for Owner<T>
{
    fn eq(&self, other: &Ref<T>) -> bool { self.address() == other.address() }
}
impl<T: ?Sized> PartialOrd for Owner<T>
{
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> { Some(self.cmp(other)) }
}
impl<T: ?Sized> Ord for Owner<T>
{
    fn cmp(&self, other: &Self) -> std::cmp::Ordering { self.address().cmp(&other.address()) }
}
impl<T: ?Sized> Hash for Owner<T>
{
    fn hash<H: Hasher>(&self, state: &mut H) { self.address().hash(state); }
}

pub struct Ref<T: ?Sized>(Option<Weak<T>>);

impl<T: ?Sized> Ref<T>
{
    #[must_use]
    pub const fn empty() -> Self { Self(None) }

    pub(crate) fn from_weak(weak: Weak<T>) -> Self { Self(Some(weak)) }

    // access the pointee while any Owner keeps it alive. the returned guard
    // holds the pointee in place for its own lifetime; keep it scoped tightly
    #[must_use]
    pub fn get(&self) -> Option<Rc<T>>
    {
        self.0.as_ref()?.upgrade()
    }

    #[inline] #[must_use]
    pub fn is_empty(&self) -> bool { self.0.is_none() }

    // true while the pointee has not been destroyed
    #[inline] #[must_use]
    pub fn is_alive(&self) -> bool
    {
        self.strong_count() > 0
    }

    pub fn release(&mut self)
    {
        self.0 = None;
    }

    #[inline] #[must_use]
    pub fn strong_count(&self) -> usize
    {
        self.0.as_ref().map_or(0, Weak::strong_count)
    }

    #[inline] #[must_use]
    pub fn weak_count(&self) -> usize
    {
        self.0.as_ref().map_or(0, Weak::weak_count)
    }

    // the observed pointee address; 0 when empty or destroyed, matching what
    // get() would report
    fn address(&self) -> usize
    {
        match &self.0
        {
            Some(weak) if weak.strong_count() > 0 => weak.as_ptr().cast::<()>() as usize,
            _ => 0,
        }
    }
}
impl<T: ?Sized> Clone for Ref<T>
{
    fn clone(&self) -> Self
    {
        Self(self.0.clone())
    }
}
impl<T: ?Sized> Default for Ref<T>
{
    fn default() -> Self { Self(None) }
}
impl<T: ?Sized> Debug for Ref<T>
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        write!(f, "Ref({:#x})", self.address())
    }
}
impl<T: ?Sized> PartialEq for Ref<T>
{
    fn eq(&self, other: &Self) -> bool { self.address() == other.address() }
}
impl<T: ?Sized> Eq for Ref<T> { }
impl<T: ?Sized> PartialEq<Owner<T>> for Ref<T>
{
    fn eq(&self, other: &Owner<T>) -> bool { other == self }
}
impl<T: ?Sized> PartialOrd for Ref<T>
{
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> { Some(self.cmp(other)) }
}
impl<T: ?Sized> Ord for Ref<T>
{
    fn cmp(&self, other: &Self) -> std::cmp::Ordering { self.address().cmp(&other.address()) }
}
impl<T: ?Sized> Hash for Ref<T>
{
    fn hash<H: Hasher>(&self, state: &mut H) { self.address().hash(state); }
}
