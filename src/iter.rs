use_prelude!();

/// Iterator over the values a [`Generator`] yields.
///
/// Iteration ends when the producer returns (its return value is discarded),
/// or right after reporting an error: a [`GeneratorError`] is yielded once,
/// and then the iterator is fused.
pub
struct Iter<Y, R = (), C = ()> (
    Option<Generator<Y, R, C>>,
);

impl<Y, R, C> Iterator for Iter<Y, R, C>
where
    Y : 'static,
    R : 'static,
    C : 'static,
{
    type Item = Result<Y, GeneratorError>;

    fn next (self: &'_ mut Self)
      -> Option<Self::Item>
    {
        let generator = self.0.as_ref()?;
        match generator.next() {
            | Ok(GeneratorState::Yielded(x)) => Some(Ok(x)),
            | Ok(GeneratorState::Returned(_))
            | Err(GeneratorError::Exhausted { .. })
            => {
                self.0 = None;
                None
            },
            | Err(err) => {
                self.0 = None;
                Some(Err(err))
            },
        }
    }
}

impl<Y, R, C> ::core::iter::FusedIterator for Iter<Y, R, C>
where
    Y : 'static,
    R : 'static,
    C : 'static,
{}

impl<Y, R, C> Generator<Y, R, C>
where
    Y : 'static,
    R : 'static,
    C : 'static,
{
    /// Iterates over this generator through another handle to it.
    ///
    /// ```rust
    /// use ::fiber_gen::prelude::*;
    ///
    /// let squares = Generator::<u32, ()>::new("squares", |co| {
    ///     for i in 1 ..= 4 {
    ///         co.yield_(i * i)?;
    ///     }
    ///     Ok(())
    /// });
    /// let head: Vec<u32> = squares.iter().take(2).map(Result::unwrap).collect();
    /// assert_eq!(head, [1, 4]);
    /// // the generator stays suspended where the iterator left it.
    /// assert!(matches!(squares.next(), Ok(GeneratorState::Yielded(9))));
    /// ```
    pub
    fn iter (self: &'_ Self)
      -> Iter<Y, R, C>
    {
        Iter(Some(self.clone()))
    }
}

impl<Y, R, C> IntoIterator for Generator<Y, R, C>
where
    Y : 'static,
    R : 'static,
    C : 'static,
{
    type IntoIter = Iter<Y, R, C>;
    type Item = Result<Y, GeneratorError>;

    #[inline]
    fn into_iter (self: Self)
      -> Iter<Y, R, C>
    {
        Iter(Some(self))
    }
}
