use ::core::cell::Cell;

/// Single-slot, move-only container used for the producer / caller hand-off.
///
/// Writing moves ownership in, reading moves it back out: there is never more
/// than one owner of the in-flight payload.
pub
struct Slot<T> /* = */ {
    value: Cell<Option<T>>,
}

impl<T> Slot<T> {
    /// An empty slot.
    #[allow(bad_style)]
    pub
    const None: Self = Self {
        value: Cell::new(None),
    };

    /// Moves the payload out, leaving the slot empty.
    pub
    fn take (self: &'_ Self)
      -> Option<T>
    {
        self.value.take()
    }

    /// Fills the slot, handing back whatever it previously held.
    pub
    fn set (self: &'_ Self, value: T)
      -> Option<T>
    {
        self.value.replace(Some(value))
    }

    /// Same as [`Slot::set`], but an occupied slot is a broken hand-off.
    pub
    fn put (self: &'_ Self, value: T)
    {
        let prev = self.set(value);
        assert!(prev.is_none(), "hand-off slot was already occupied");
    }

    /// Whether a payload is in flight.
    #[inline]
    pub
    fn is_some (self: &'_ Self)
      -> bool
    {
        let value = self.value.take();
        let is_some = value.is_some();
        self.value.set(value);
        is_some
    }
}
