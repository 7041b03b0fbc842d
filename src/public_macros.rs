/// Defines, for the producer handle `$co`, a local `yield_!` macro.
///
/// `yield_!(value)` expands to `co.yield_(value)?`: it evaluates to whatever
/// the caller sent back, and an exception raised into the producer at that
/// point propagates out of the entry procedure.
///
/// ```rust
/// use ::fiber_gen::prelude::*;
///
/// let echo = Generator::<i32, Vec<i32>>::new("echo", |co| {
///     make_yield!(co);
///     let mut received = vec![];
///     let mut next = yield_!(0);
///     while let Some(value) = next {
///         received.push(value);
///         next = yield_!(value * 2);
///     }
///     Ok(received)
/// });
/// assert_eq!(echo.next().unwrap(), GeneratorState::Yielded(0));
/// assert_eq!(echo.send(21).unwrap(), GeneratorState::Yielded(42));
/// assert_eq!(echo.send(5).unwrap(), GeneratorState::Yielded(10));
/// assert_eq!(echo.next().unwrap(), GeneratorState::Returned(vec![21, 5]));
/// ```
#[macro_export]
macro_rules! make_yield {
    (
        @with_dollar![$dol:tt]
        $co:ident
    ) => (
        #[allow(unused_macros)]
        macro_rules! yield_ {(
            $dol value:expr $dol(,)?
        ) => (
            $co.yield_($dol value)?
        )}
    );

    (
        $co:ident
    ) => (
        $crate::make_yield!(
            @with_dollar![$]
            $co
        )
    )
}
