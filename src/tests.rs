#![allow(unused_imports)]
use {
    ::core::{
        iter::FromIterator,
    },
    ::std::{*, cell::{Cell, RefCell}, panic, prelude::v1::*, rc::Rc},
    crate::{
        prelude::*,
    },
};

#[ctor::ctor]
fn init_test_logger ()
{
    let _ =
        ::env_logger::Builder::from_env(::env_logger::Env::default())
            .is_test(true)
            .try_init()
    ;
}

#[derive(Debug, ::thiserror::Error)]
#[error("custom failure #{0}")]
struct CustomError(u8);

#[test]
fn basic ()
{
    let generator = Generator::<u8>::new("basic", |co| {
        make_yield!(co);
        yield_!(42);
        yield_!(0);
        yield_!(27);
        Ok(())
    });
    assert_it_eq!(
        generator,
        [42, 0, 27],
    );
}

#[test]
fn yields_then_returns ()
{
    let generator = Generator::new("one-two-three", |co| {
        co.yield_(1)?;
        co.yield_(2)?;
        Ok(3)
    });
    assert_eq!(generator.status(), Status::Unused);
    assert_eq!(generator.next().unwrap(), GeneratorState::Yielded(1));
    assert_eq!(generator.status(), Status::Running);
    assert_eq!(generator.next().unwrap(), GeneratorState::Yielded(2));
    assert_eq!(generator.next().unwrap(), GeneratorState::Returned(3));
    assert_eq!(generator.status(), Status::Finished);
    assert!(generator.next().unwrap_err().is_exhausted());
}

#[test]
fn resume_args ()
{
    let generator = Generator::<i32, Vec<i32>>::new("resume args", |co| {
        make_yield!(co);
        let mut resume_args = vec![];
        let mut arg = yield_!(-1);
        while let Some(received) = arg.filter(|&it| it != 0) {
            resume_args.push(received);
            arg = yield_!(received);
        }
        Ok(resume_args)
    });

    assert_eq!(generator.next().unwrap(), GeneratorState::Yielded(-1));
    let resume = |arg| match generator.send(arg).unwrap() {
        | GeneratorState::Yielded(yielded_value) => {
            assert_eq!(yielded_value, arg);
            None
        },
        | GeneratorState::Returned(ret) => {
            assert_eq!(arg, 0);
            Some(ret)
        },
    };

    resume(12);
    resume(17);
    resume(47);
    assert_eq!(resume(0).unwrap(), vec![12, 17, 47]);
}

#[test]
fn sending_to_an_unused_generator_is_rejected ()
{
    let started = Rc::new(Cell::new(false));
    let flag = started.clone();
    let generator = Generator::<u8>::new("unstarted", move |co| {
        flag.set(true);
        co.yield_(1)?;
        Ok(())
    });
    assert!(matches!(
        generator.send(5),
        Err(GeneratorError::SentBeforeStart { .. }),
    ));
    assert_eq!(generator.status(), Status::Unused);
    assert!(started.get().not());
    assert_eq!(generator.next().unwrap(), GeneratorState::Yielded(1));
}

#[test]
fn range ()
{
    fn range (start: u8, end: u8)
      -> Generator<u8>
    {
        Generator::new("range", move |co| {
            let mut current = start;
            while current < end {
                co.yield_(current)?;
                current += 1;
            }
            Ok(())
        })
    }

    assert_it_eq!(
        range(2, 8),
        Vec::from_iter(2 .. 8),
    );
}

mod adaptors {
    use super::*;

    fn filter<T : 'static> (
        mut predicate: impl FnMut(&T) -> bool + 'static,
        source: Generator<T>,
    ) -> Generator<T>
    {
        Generator::new("filter", move |co| {
            for element in source {
                let element = element.map_err(|err| match err {
                    | GeneratorError::Raised(exception) => exception,
                    | other => Exception::new(other),
                })?;
                if predicate(&element) {
                    co.yield_(element)?;
                }
            }
            Ok(())
        })
    }

    fn map<T : 'static, U : 'static> (
        mut f: impl FnMut(T) -> U + 'static,
        source: Generator<T>,
    ) -> Generator<U>
    {
        Generator::new("map", move |co| {
            for element in source {
                co.yield_(f(element.map_err(Exception::new)?))?;
            }
            Ok(())
        })
    }

    fn range (start: u8, end: u8)
      -> Generator<u8>
    {
        Generator::new("range", move |co| {
            for current in start .. end {
                co.yield_(current)?;
            }
            Ok(())
        })
    }

    #[test]
    fn filter_range ()
    {
        let iterator = range(2, 7);
        let iterator = filter(|x| x % 2 == 0, iterator);
        assert_it_eq!(
            iterator,
            [2, 4, 6],
        );
    }

    #[test]
    fn filter_map_range ()
    {
        let iterator = range(2, 7);
        let iterator = filter(|x| x % 2 == 0, iterator);
        let iterator = map(|x| x * x, iterator);
        assert_it_eq!(
            iterator,
            [4, 16, 36],
        );
    }

    #[test]
    fn closing_the_outer_generator_closes_the_inner_ones ()
    {
        let released = Rc::new(Cell::new(0));
        let inner = {
            let released = released.clone();
            Generator::<u8, (), ()>::with_context(
                "counted range",
                (),
                move |()| released.set(released.get() + 1),
                |co, ()| {
                    for current in 0 .. {
                        co.yield_(current)?;
                    }
                    Ok(())
                },
            )
        };
        let outer = map(|x| x + 1, inner);
        assert_eq!(outer.next().unwrap(), GeneratorState::Yielded(1));
        assert_eq!(released.get(), 0);
        outer.close().unwrap();
        // the inner generator lived on the outer producer's stack.
        assert_eq!(released.get(), 1);
    }
}

#[test]
fn suspends_from_nested_calls ()
{
    fn visit (co: &mut Co<'_, String>, path: &str, depth: usize)
      -> Result<(), Exception>
    {
        co.yield_(path.to_owned())?;
        if depth > 0 {
            for child in &["a", "b"] {
                visit(co, &format!("{}/{}", path, child), depth - 1)?;
            }
        }
        Ok(())
    }

    let tree = Generator::new("tree", |co| visit(co, "", 2));
    assert_it_eq!(
        tree,
        ["", "/a", "/a/a", "/a/b", "/b", "/b/a", "/b/b"]
            .iter()
            .map(|&it| it.to_owned())
            .collect::<Vec<_>>(),
    );
}

#[test]
fn resuming_from_within_the_producer_is_rejected ()
{
    let observed = Rc::new(RefCell::new(None));
    let report = observed.clone();
    let generator = Generator::<u8>::new("reentrant", move |co| {
        {
            let this = co.generator().expect("alive while being resumed");
            assert!(this.is_running());
            let thrown = this.throw_into(Exception::new(CustomError(0)));
            *report.borrow_mut() = Some((this.next(), thrown, this.close(), this.status()));
        }
        co.yield_(1)?;
        Ok(())
    });
    assert_eq!(generator.next().unwrap(), GeneratorState::Yielded(1));
    match observed.borrow_mut().take() {
        | Some((resumed, thrown, closed, status)) => {
            assert!(matches!(resumed, Err(GeneratorError::Reentrancy { .. })));
            assert!(matches!(thrown, Err(GeneratorError::Reentrancy { .. })));
            assert!(matches!(closed, Err(GeneratorError::Reentrancy { .. })));
            assert_eq!(status, Status::Running);
        },
        | None => panic!("producer did not run"),
    }
    assert!(generator.is_running().not());
    assert_eq!(generator.next().unwrap(), GeneratorState::Returned(()));
}

#[test]
fn a_producer_looking_at_itself_does_not_keep_itself_alive ()
{
    let released = Rc::new(Cell::new(0));
    let counter = released.clone();
    let generator = Generator::<u8, (), ()>::with_context(
        "self-aware",
        (),
        move |()| counter.set(counter.get() + 1),
        |co, ()| {
            loop {
                let status = co.generator().map(|this| this.status());
                assert_eq!(status, Some(Status::Running));
                co.yield_(1)?;
            }
        },
    );
    let other = generator.clone();
    assert_eq!(generator.next().unwrap(), GeneratorState::Yielded(1));
    assert_eq!(other.next().unwrap(), GeneratorState::Yielded(1));
    drop(other);
    assert_eq!(released.get(), 0);
    drop(generator);
    assert_eq!(released.get(), 1);
}

#[test]
fn error_identity_is_preserved ()
{
    let raised = Exception::new(CustomError(1));
    let thrown = raised.clone();
    let generator = Generator::<u8>::new("failing", move |co| {
        co.yield_(1)?;
        Err(thrown)
    });
    assert_eq!(generator.next().unwrap(), GeneratorState::Yielded(1));
    match generator.next() {
        | Err(GeneratorError::Raised(caught)) => {
            assert!(Exception::ptr_eq(&caught, &raised));
            assert_eq!(caught.kind(), "CustomError");
            assert_eq!(caught.traceback(), [Rc::<str>::from("failing")]);
        },
        | other => panic!("unexpected {:?}", other),
    }
    assert!(generator.is_finished());
    assert!(generator.next().unwrap_err().is_exhausted());
}

#[test]
fn thrown_exceptions_surface_at_the_yield_point ()
{
    let generator = Generator::<u8, &'static str>::new("catcher", |co| {
        match co.yield_(1) {
            | Err(exception) if exception.is::<CustomError>() => {
                co.yield_(2)?;
                Ok("handled")
            },
            | Err(exception) => Err(exception),
            | Ok(_) => Ok("not thrown"),
        }
    });
    assert_eq!(generator.next().unwrap(), GeneratorState::Yielded(1));
    assert_eq!(
        generator.throw_into(Exception::new(CustomError(2))).unwrap(),
        GeneratorState::Yielded(2),
    );
    assert_eq!(generator.next().unwrap(), GeneratorState::Returned("handled"));
}

#[test]
fn unhandled_thrown_exceptions_propagate_back ()
{
    let generator = Generator::<u8>::new("uncaught", |co| {
        loop {
            co.yield_(0)?;
        }
    });
    assert_eq!(generator.next().unwrap(), GeneratorState::Yielded(0));
    let thrown = Exception::new(CustomError(3));
    match generator.throw_into(thrown.clone()) {
        | Err(GeneratorError::Raised(caught)) => {
            assert!(Exception::ptr_eq(&caught, &thrown));
        },
        | other => panic!("unexpected {:?}", other),
    }
    assert!(generator.is_finished());
}

#[test]
fn throwing_into_an_unused_generator_never_runs_it ()
{
    let ran = Rc::new(Cell::new(false));
    let flag = ran.clone();
    let generator = Generator::<u8>::new("never run", move |_| {
        flag.set(true);
        Ok(())
    });
    let thrown = Exception::new(CustomError(4));
    match generator.throw_into(thrown.clone()) {
        | Err(GeneratorError::Raised(caught)) => {
            assert!(Exception::ptr_eq(&caught, &thrown));
            assert!(caught.traceback().is_empty());
        },
        | other => panic!("unexpected {:?}", other),
    }
    assert!(ran.get().not());
    assert_eq!(generator.status(), Status::Finished);
    // a finished generator raises it unchanged as well.
    let again = Exception::new(CustomError(5));
    match generator.throw_into(again.clone()) {
        | Err(GeneratorError::Raised(caught)) => {
            assert!(Exception::ptr_eq(&caught, &again));
        },
        | other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn close_is_idempotent ()
{
    let generator = Generator::<u8>::new("closed", |co| {
        co.yield_(1)?;
        co.yield_(2)?;
        Ok(())
    });
    generator.close().unwrap();
    assert_eq!(generator.status(), Status::Finished);
    generator.close().unwrap();

    let generator = Generator::<u8>::new("closed while suspended", |co| {
        co.yield_(1)?;
        co.yield_(2)?;
        Ok(())
    });
    assert_eq!(generator.next().unwrap(), GeneratorState::Yielded(1));
    generator.close().unwrap();
    assert!(generator.is_finished());
    generator.close().unwrap();
    assert!(generator.next().unwrap_err().is_exhausted());
}

#[test]
fn close_can_be_answered_by_returning ()
{
    let generator = Generator::<u8, u8>::new("polite", |co| {
        match co.yield_(1) {
            | Err(exception) if exception.is_generator_exit() => Ok(0),
            | other => other.map(|_| 1),
        }
    });
    assert_eq!(generator.next().unwrap(), GeneratorState::Yielded(1));
    generator.close().unwrap();
    assert!(generator.is_finished());
}

#[test]
fn close_reports_other_exceptions ()
{
    let generator = Generator::<u8>::new("grumpy", |co| {
        co.yield_(1).map_err(|_| Exception::new(CustomError(6)))?;
        Ok(())
    });
    assert_eq!(generator.next().unwrap(), GeneratorState::Yielded(1));
    match generator.close() {
        | Err(GeneratorError::Raised(exception)) => {
            assert_eq!(exception.downcast_ref::<CustomError>().map(|it| it.0), Some(6));
        },
        | other => panic!("unexpected {:?}", other),
    }
    assert!(generator.is_finished());
}

#[test]
#[should_panic(expected = "yielded after being closed")]
fn yielding_after_close_is_fatal ()
{
    let generator = Generator::<u8>::new("stubborn", |co| {
        loop {
            let _ = co.yield_(1);
        }
    });
    assert_eq!(generator.next().unwrap(), GeneratorState::Yielded(1));
    let _ = generator.close();
}

#[test]
fn yielding_after_close_still_cleans_up ()
{
    let released = Rc::new(Cell::new(0));
    let counter = released.clone();
    let generator = Generator::<u8, (), ()>::with_context(
        "stubborn",
        (),
        move |()| counter.set(counter.get() + 1),
        |co, ()| {
            loop {
                let _ = co.yield_(1);
            }
        },
    );
    assert_eq!(generator.next().unwrap(), GeneratorState::Yielded(1));
    let closing = panic::catch_unwind(panic::AssertUnwindSafe(|| generator.close()));
    assert!(closing.is_err());
    assert!(generator.is_finished());
    assert_eq!(released.get(), 1);
    drop(generator);
    assert_eq!(released.get(), 1);
}

#[test]
fn producer_panics_reach_the_caller ()
{
    let generator = Generator::<u8>::new("panicky", |co| {
        co.yield_(1)?;
        panic!("producer panicked");
    });
    assert_eq!(generator.next().unwrap(), GeneratorState::Yielded(1));
    let resumed = panic::catch_unwind(panic::AssertUnwindSafe(|| generator.next()));
    assert!(resumed.is_err());
    assert!(generator.is_running().not());
    assert!(generator.next().unwrap_err().is_exhausted());
    assert!(generator.is_finished());
}

#[test]
fn fiber_allocation_failure_leaves_the_generator_unused ()
{
    let config = Config::default().stack_size(usize::MAX / 2);
    let generator = Generator::<u8>::with_config("too big", config, |co| {
        co.yield_(1)?;
        Ok(())
    });
    for _ in 0 .. 2 {
        match generator.next() {
            | Err(GeneratorError::FiberAllocation { stack_size, .. }) => {
                assert_eq!(stack_size, usize::MAX / 2);
            },
            | other => panic!("unexpected {:?}", other),
        }
        assert_eq!(generator.status(), Status::Unused);
    }
}

#[test]
fn nested_generators ()
{
    let outer = Generator::<u32, u32>::new("outer", |co| {
        let inner = Generator::<u32, u32>::new("inner", |co| {
            co.yield_(1)?;
            co.yield_(2)?;
            Ok(10)
        });
        let mut total = 0;
        loop {
            match inner.next().map_err(Exception::new)? {
                | GeneratorState::Yielded(value) => {
                    total += value;
                    co.yield_(value * 100)?;
                },
                | GeneratorState::Returned(value) => return Ok(total + value),
            }
        }
    });
    assert_eq!(outer.next().unwrap(), GeneratorState::Yielded(100));
    assert_eq!(outer.next().unwrap(), GeneratorState::Yielded(200));
    assert_eq!(outer.next().unwrap(), GeneratorState::Returned(13));
}

#[test]
fn handles_share_one_generator ()
{
    let generator = Generator::<u8>::new("shared", |co| {
        co.yield_(1)?;
        co.yield_(2)?;
        Ok(())
    });
    let other = generator.clone();
    assert!(Generator::ptr_eq(&generator, &other));
    assert_eq!(generator.next().unwrap(), GeneratorState::Yielded(1));
    assert_eq!(other.next().unwrap(), GeneratorState::Yielded(2));
    assert_eq!(other.name(), "shared");
    assert_eq!(
        format!("{:?}", generator),
        r#"Generator { name: "shared", status: Running, running: false }"#,
    );
}

#[test]
fn iteration_reports_errors_once ()
{
    let generator = Generator::<u8>::new("faulty", |co| {
        co.yield_(1)?;
        Err(Exception::new(CustomError(7)))
    });
    let mut iter = generator.into_iter();
    assert!(matches!(iter.next(), Some(Ok(1))));
    assert!(matches!(iter.next(), Some(Err(GeneratorError::Raised(_)))));
    assert!(iter.next().is_none());
    assert!(iter.next().is_none());
}

use ::core::ops::Not as _;

macro_rules! assert_it_eq {(
    $left:expr, $right:expr $(, $($msg:expr $(,)?)?)?
) => (
    assert_eq!(
        $left
            .into_iter()
            .collect::<Result<Vec<_>, _>>()
            .unwrap(),
        $right,
        $($($msg ,)?)?
    )
)}
use assert_it_eq;
