fn main ()
{
    use ::fiber_gen::prelude::*;

    fn countdown<Ret : 'static> (count: u8, value: Ret)
      -> Generator<u8, Ret>
    {
        Generator::new("countdown", move |co| {
            make_yield!(co);
            let mut current = count;
            while let Some(next) = current.checked_sub(1) {
                yield_!(current);
                current = next;
            }
            Ok(value)
        })
    }

    let generator = countdown(3, "Boom!");
    let next = || generator.next().unwrap();
    assert_eq!(next(), GeneratorState::Yielded(3));
    assert_eq!(next(), GeneratorState::Yielded(2));
    assert_eq!(next(), GeneratorState::Yielded(1));
    assert_eq!(next(), GeneratorState::Returned("Boom!"));
    assert!(generator.is_finished());
}
