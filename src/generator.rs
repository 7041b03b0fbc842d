//! Stackful generators: a producer running on its own [`Fiber`], pulled on
//! demand by its caller.

use_prelude!();

use ::core::{marker::PhantomData, ops::Not as _};
use crate::{
    config::Config,
    fiber::{self, Fiber, Suspender, Switch},
    state::{self, Action, Operation},
};

/// Value obtained when [resuming][`Generator::resume`] a [`Generator`].
///
/// This corresponds to:
///
///   - either a [suspension point][`GeneratorState::Yielded`],
///
///   - or a [termination point][`GeneratorState::Returned`]
///
/// A producer that terminates by letting an exception escape does not produce
/// a `GeneratorState`: the exception is returned as
/// [`GeneratorError::Raised`] instead.
#[derive(
    Debug,
    Clone, Copy,
    PartialOrd, Ord,
    PartialEq, Eq,
    Hash
)]
pub
enum GeneratorState<Yield, Return = ()> {
    /// The producer suspended at a yield point with a value.
    ///
    /// The generator may be resumed again, which will make the producer carry
    /// on right after that yield point.
    Yielded(Yield),

    /// The producer _completed_ with a return value.
    ///
    /// The generator is now `Finished`: resuming it again fails with
    /// [`GeneratorError::Exhausted`].
    Returned(Return),
}

impl<Yield> GeneratorState<Yield, ()> {
    /// Alias for `Returned(())`.
    #[allow(nonstandard_style)]
    pub
    const Complete: Self = Self::Returned(());
}

impl<Yield, Return> GeneratorState<Yield, Return> {
    /// The yielded value, if any.
    #[inline]
    pub
    fn yielded (self: Self)
      -> Option<Yield>
    {
        match self {
            | Self::Yielded(value) => Some(value),
            | Self::Returned(_) => None,
        }
    }

    /// The return value, if any.
    #[inline]
    pub
    fn returned (self: Self)
      -> Option<Return>
    {
        match self {
            | Self::Yielded(_) => None,
            | Self::Returned(value) => Some(value),
        }
    }
}

type Entry<Y, R, C> =
    Box<dyn FnOnce(&mut Co<'_, Y, R, C>, &mut C) -> Result<R, Exception>>
;

type Cleanup<C> = Box<dyn FnOnce(C)>;

/// The part of a generator reachable from both sides of the switch.
struct Shared<Y, R, C> {
    name: Rc<str>,
    status: Cell<Status>,
    /// Whether control is currently inside the producer.
    running: Cell<bool>,
    /// Values yielded to the caller, or sent back to the producer.
    value: Slot<Y>,
    /// Exceptions injected by the caller into the producer.
    error: Slot<Exception>,
    /// How the producer terminated, until the caller observes it.
    outcome: Slot<Result<R, Exception>>,
    context: RefCell<Option<C>>,
}

struct Inner<Y, R, C> {
    shared: Rc<Shared<Y, R, C>>,
    this: Weak<Inner<Y, R, C>>,
    config: Config,
    entry: Cell<Option<Entry<Y, R, C>>>,
    cleanup: Cell<Option<Cleanup<C>>>,
    fiber: RefCell<Option<Fiber>>,
}

/// A suspendable computation producing values on demand.
///
/// The producer (the _entry procedure_) runs on a dedicated stack of its own,
/// so that it can suspend from anywhere, nested calls and loops included, by
/// calling [`Co::yield_`]. The caller pulls the values out with
/// [`.resume()`][`Generator::resume`] and its [`.next()`][`Generator::next`] /
/// [`.send()`][`Generator::send`] shorthands, and may interrupt the producer
/// with [`.throw_into()`][`Generator::throw_into`] or
/// [`.close()`][`Generator::close`].
///
/// # Example
///
/// ```rust
/// use ::fiber_gen::prelude::*;
///
/// let generator = Generator::new("countdown", |co| {
///     for i in (1 ..= 2).rev() {
///         co.yield_(i)?;
///     }
///     Ok(3)
/// });
/// assert!(matches!(generator.next(), Ok(GeneratorState::Yielded(2))));
/// assert!(matches!(generator.next(), Ok(GeneratorState::Yielded(1))));
/// assert!(matches!(generator.next(), Ok(GeneratorState::Returned(3))));
/// assert!(matches!(generator.next(), Err(GeneratorError::Exhausted { .. })));
/// ```
///
/// # Handles
///
/// A `Generator` is a reference-counted handle: cloning it yields another
/// handle to the very same generator. Dropping the last handle of a generator
/// that is not finished yet [closes][`Generator::close`] it, so that whatever
/// the producer holds across its current yield point gets released.
pub
struct Generator<Y, R = (), C = ()> (
    Rc<Inner<Y, R, C>>,
);

/// The producer's view of its [`Generator`], handed to the entry procedure.
pub
struct Co<'fiber, Y, R = (), C = ()> {
    shared: Rc<Shared<Y, R, C>>,
    this: Weak<Inner<Y, R, C>>,
    suspender: Suspender<'fiber>,
}

impl<Y, R> Generator<Y, R>
where
    Y : 'static,
    R : 'static,
{
    /// Creates an `Unused` generator, which will run `entry` with the default
    /// [`Config`] once first resumed.
    ///
    /// No stack is allocated until then.
    pub
    fn new<F> (name: impl Into<Rc<str>>, entry: F)
      -> Self
    where
        F : FnOnce(&mut Co<'_, Y, R>) -> Result<R, Exception> + 'static,
    {
        Self::with_config(name, Config::default(), entry)
    }

    /// Same as [`Generator::new`], with an explicit [`Config`].
    pub
    fn with_config<F> (name: impl Into<Rc<str>>, config: Config, entry: F)
      -> Self
    where
        F : FnOnce(&mut Co<'_, Y, R>) -> Result<R, Exception> + 'static,
    {
        Self::create(name, config, (), |()| {}, move |co, _| entry(co))
    }
}

impl<Y, R, C> Generator<Y, R, C>
where
    Y : 'static,
    R : 'static,
    C : 'static,
{
    /// Creates an `Unused` generator owning a `context` payload.
    ///
    /// The producer gets `&mut` access to the payload while it runs, and
    /// `cleanup` receives it back exactly once, when the generator is
    /// finalized: after completion, after an exception escaped the producer,
    /// on close, or when the last handle is dropped; started or not.
    pub
    fn with_context<F, D> (
        name: impl Into<Rc<str>>,
        context: C,
        cleanup: D,
        entry: F,
    ) -> Self
    where
        F : FnOnce(&mut Co<'_, Y, R, C>, &mut C) -> Result<R, Exception> + 'static,
        D : FnOnce(C) + 'static,
    {
        Self::create(name, Config::default(), context, cleanup, entry)
    }

    /// The most general constructor.
    pub
    fn create<F, D> (
        name: impl Into<Rc<str>>,
        config: Config,
        context: C,
        cleanup: D,
        entry: F,
    ) -> Self
    where
        F : FnOnce(&mut Co<'_, Y, R, C>, &mut C) -> Result<R, Exception> + 'static,
        D : FnOnce(C) + 'static,
    {
        let shared = Rc::new(Shared {
            name: name.into(),
            status: Cell::new(Status::Unused),
            running: Cell::new(false),
            value: Slot::None,
            error: Slot::None,
            outcome: Slot::None,
            context: RefCell::new(Some(context)),
        });
        let entry: Entry<Y, R, C> = Box::new(entry);
        let cleanup: Cleanup<C> = Box::new(cleanup);
        Self(Rc::new_cyclic(|this| Inner {
            shared,
            this: this.clone(),
            config,
            entry: Cell::new(Some(entry)),
            cleanup: Cell::new(Some(cleanup)),
            fiber: RefCell::new(None),
        }))
    }

    /// Resumes the producer, optionally sending it a value.
    ///
    /// The first resume allocates the producer's stack and starts running the
    /// entry procedure; later ones carry on from its last yield point, where
    /// `sent` is what [`Co::yield_`] returns.
    ///
    /// Returns once the producer yields again or terminates:
    ///
    ///   - [`GeneratorState::Yielded`] with the yielded value,
    ///
    ///   - [`GeneratorState::Returned`] with the return value,
    ///
    ///   - [`GeneratorError::Raised`] with the very exception that escaped the
    ///     producer.
    ///
    /// The call fails without side effects with
    /// [`GeneratorError::Reentrancy`] from within the producer,
    /// [`GeneratorError::Exhausted`] once finished, and
    /// [`GeneratorError::SentBeforeStart`] when sending a value to an unused
    /// generator.
    pub
    fn resume (self: &'_ Self, sent: Option<Y>)
      -> Result<GeneratorState<Y, R>, GeneratorError>
    {
        self.0.resume(sent)
    }

    /// `.resume(None)`.
    #[inline]
    pub
    fn next (self: &'_ Self)
      -> Result<GeneratorState<Y, R>, GeneratorError>
    {
        self.resume(None)
    }

    /// `.resume(Some(value))`.
    #[inline]
    pub
    fn send (self: &'_ Self, value: Y)
      -> Result<GeneratorState<Y, R>, GeneratorError>
    {
        self.resume(Some(value))
    }
}

impl<Y, R, C> Generator<Y, R, C> {
    /// Raises `exception` inside the producer, at its current yield point.
    ///
    /// The producer may handle it and yield or return, in which case this
    /// behaves like [`.resume()`][`Generator::resume`]; otherwise the same
    /// exception comes back as [`GeneratorError::Raised`].
    ///
    /// An unused generator is finalized without ever running its producer, and
    /// the exception is raised straight away; so is it for a finished one.
    pub
    fn throw_into (self: &'_ Self, exception: Exception)
      -> Result<GeneratorState<Y, R>, GeneratorError>
    {
        self.0.throw_into(exception)
    }

    /// Finishes the generator, letting a suspended producer unwind.
    ///
    /// A suspended producer gets [`GeneratorExit`][`crate::GeneratorExit`]
    /// raised at its yield point, and is resumed once so that it runs its own
    /// release logic. Terminating, or letting the `GeneratorExit` escape, are
    /// both fine; another escaping exception is returned.
    ///
    /// No-op on a finished generator; an unused one is merely finalized.
    ///
    /// # Panics
    ///
    /// If the producer yields again instead of terminating. Its stack is
    /// forcibly unwound and the generator finalized before panicking. While
    /// the thread is already panicking, the stack is released without being
    /// unwound, and the violation is only logged.
    pub
    fn close (self: &'_ Self)
      -> Result<(), GeneratorError>
    {
        self.0.close()
    }

    /// The name given at creation, reported in errors and tracebacks.
    pub
    fn name (self: &'_ Self)
      -> &'_ str
    {
        &self.0.shared.name
    }

    /// Where the generator stands in its `Unused -> Running -> Finished`
    /// lifecycle.
    pub
    fn status (self: &'_ Self)
      -> Status
    {
        self.0.shared.status.get()
    }

    /// Whether the generator is `Finished`: no value will ever come out of it
    /// again.
    #[inline]
    pub
    fn is_finished (self: &'_ Self)
      -> bool
    {
        self.status().is_finished()
    }

    /// Whether control is currently inside the producer.
    #[inline]
    pub
    fn is_running (self: &'_ Self)
      -> bool
    {
        self.0.shared.running.get()
    }

    /// Whether both handles refer to the same generator.
    #[inline]
    pub
    fn ptr_eq (this: &'_ Self, other: &'_ Self)
      -> bool
    {
        Rc::ptr_eq(&this.0, &other.0)
    }
}

impl<Y, R, C> Clone for Generator<Y, R, C> {
    fn clone (self: &'_ Self)
      -> Self
    {
        Self(self.0.clone())
    }
}

impl<Y, R, C> fmt::Debug for Generator<Y, R, C> {
    fn fmt (self: &'_ Self, f: &'_ mut fmt::Formatter<'_>)
      -> fmt::Result
    {
        f   .debug_struct("Generator")
            .field("name", &self.name())
            .field("status", &self.status())
            .field("running", &self.is_running())
            .finish()
    }
}

impl<Y, R, C> Co<'_, Y, R, C> {
    /// Hands `value` over to the caller and suspends until resumed.
    ///
    /// Returns what the caller sent along with the resume (`None` for a plain
    /// [`.next()`][`Generator::next`]), or, when the caller raised an
    /// exception into the producer ([`Generator::throw_into`],
    /// [`Generator::close`]), that exception, as if it had been thrown right
    /// here; the intended way to handle it being `?` or a `match`.
    pub
    fn yield_ (self: &'_ mut Self, value: Y)
      -> Result<Option<Y>, Exception>
    {
        let shared = &*self.shared;
        assert!(
            shared.error.is_some().not(),
            "generator `{}` yields with an exception in flight",
            shared.name,
        );
        shared.value.put(value);
        ::log::trace!("generator `{}` switches out", shared.name);
        self.suspender.switch_out();
        ::log::trace!("generator `{}` switched back in", shared.name);
        match shared.error.take() {
            | Some(exception) => {
                ::log::trace!(
                    "generator `{}` raises injected {}",
                    shared.name, exception.kind(),
                );
                Err(exception)
            },
            | None => Ok(shared.value.take()),
        }
    }

    /// Name of the generator this producer belongs to.
    pub
    fn name (self: &'_ Self)
      -> &'_ str
    {
        &self.shared.name
    }

    /// A view of the generator this producer belongs to, unless the
    /// generator is being dropped.
    ///
    /// The view borrows `self`, so that it cannot be held across a yield
    /// point, where it would keep the generator alive from within its own
    /// stack:
    ///
    /// ```rust,compile_fail
    /// use ::fiber_gen::prelude::*;
    ///
    /// let generator = Generator::<u8>::new("selfish", |co| {
    ///     let this = co.generator();
    ///     co.yield_(1)?;
    ///     drop(this);
    ///     Ok(())
    /// });
    /// ```
    pub
    fn generator (self: &'_ Self)
      -> Option<GeneratorRef<'_, Y, R, C>>
    {
        self.this.upgrade().map(|inner| GeneratorRef {
            generator: Generator(inner),
            _co: PhantomData,
        })
    }
}

/// A producer's view of its own [`Generator`], obtained through
/// [`Co::generator`].
///
/// Since control is inside the producer for as long as this view exists,
/// resuming, throwing into, or closing the generator through it fails with
/// [`GeneratorError::Reentrancy`].
pub
struct GeneratorRef<'co, Y, R = (), C = ()> {
    generator: Generator<Y, R, C>,
    _co: PhantomData<&'co ()>,
}

impl<Y, R, C> GeneratorRef<'_, Y, R, C>
where
    Y : 'static,
    R : 'static,
    C : 'static,
{
    /// See [`Generator::resume`].
    pub
    fn resume (self: &'_ Self, sent: Option<Y>)
      -> Result<GeneratorState<Y, R>, GeneratorError>
    {
        self.generator.resume(sent)
    }

    /// See [`Generator::next`].
    pub
    fn next (self: &'_ Self)
      -> Result<GeneratorState<Y, R>, GeneratorError>
    {
        self.generator.next()
    }

    /// See [`Generator::send`].
    pub
    fn send (self: &'_ Self, value: Y)
      -> Result<GeneratorState<Y, R>, GeneratorError>
    {
        self.generator.send(value)
    }
}

impl<Y, R, C> GeneratorRef<'_, Y, R, C> {
    /// See [`Generator::throw_into`].
    pub
    fn throw_into (self: &'_ Self, exception: Exception)
      -> Result<GeneratorState<Y, R>, GeneratorError>
    {
        self.generator.throw_into(exception)
    }

    /// See [`Generator::close`].
    pub
    fn close (self: &'_ Self)
      -> Result<(), GeneratorError>
    {
        self.generator.close()
    }

    /// See [`Generator::name`].
    pub
    fn name (self: &'_ Self)
      -> &'_ str
    {
        self.generator.name()
    }

    /// See [`Generator::status`].
    pub
    fn status (self: &'_ Self)
      -> Status
    {
        self.generator.status()
    }

    /// See [`Generator::is_running`].
    pub
    fn is_running (self: &'_ Self)
      -> bool
    {
        self.generator.is_running()
    }

    /// Whether `generator` is the generator this view refers to.
    pub
    fn is (self: &'_ Self, generator: &'_ Generator<Y, R, C>)
      -> bool
    {
        Generator::ptr_eq(&self.generator, generator)
    }
}

impl<Y, R, C> fmt::Debug for GeneratorRef<'_, Y, R, C> {
    fn fmt (self: &'_ Self, f: &'_ mut fmt::Formatter<'_>)
      -> fmt::Result
    {
        f   .debug_tuple("GeneratorRef")
            .field(&self.generator)
            .finish()
    }
}

impl<Y, R, C> Inner<Y, R, C>
where
    Y : 'static,
    R : 'static,
    C : 'static,
{
    fn resume (self: &'_ Self, sent: Option<Y>)
      -> Result<GeneratorState<Y, R>, GeneratorError>
    {
        self.ensure_not_running()?;
        if sent.is_some() && self.shared.status.get() == Status::Unused {
            return Err(GeneratorError::SentBeforeStart {
                name: self.shared.name.clone(),
            });
        }
        match self.apply(Operation::Resume) {
            | Action::Start => self.start()?,
            | Action::SwitchIn => if let Some(value) = sent {
                self.shared.value.put(value);
            },
            | Action::Exhausted => return Err(GeneratorError::Exhausted {
                name: self.shared.name.clone(),
            }),
            | action => self.illegal(Operation::Resume, action),
        }
        self.drive()
    }

    fn start (self: &'_ Self)
      -> Result<(), GeneratorError>
    {
        let stack_size = self.config.stack_size;
        let allocation_failure = || GeneratorError::FiberAllocation {
            name: self.shared.name.clone(),
            stack_size,
        };
        fiber::check_stack_size(stack_size).map_err(|_| allocation_failure())?;
        // a previous allocation failure consumed it.
        let entry = self.entry.take().ok_or_else(allocation_failure)?;
        let shared = self.shared.clone();
        let this = self.this.clone();
        let fiber = Fiber::new(stack_size, move |suspender| {
            let outcome = {
                let mut context = shared.context.borrow_mut();
                let context =
                    context
                        .as_mut()
                        .expect("context payload released while the producer runs")
                ;
                let mut co = Co {
                    shared: shared.clone(),
                    this,
                    suspender,
                };
                entry(&mut co, context)
            };
            if let Err(exception) = &outcome {
                exception.push_frame(&shared.name);
            }
            shared.outcome.put(outcome);
        });
        let fiber = fiber.map_err(|_| allocation_failure())?;
        ::log::debug!(
            "generator `{}` starts on a {}-byte stack",
            self.shared.name, stack_size,
        );
        *self.fiber.borrow_mut() = Some(fiber);
        self.shared.status.set(Status::Running);
        Ok(())
    }
}

impl<Y, R, C> Inner<Y, R, C> {
    fn ensure_not_running (self: &'_ Self)
      -> Result<(), GeneratorError>
    {
        if self.shared.running.get() {
            return Err(GeneratorError::Reentrancy {
                name: self.shared.name.clone(),
            });
        }
        Ok(())
    }

    /// Looks `operation` up in the transition table and commits the new
    /// status, except for `Start`, which commits it once the fiber exists.
    fn apply (self: &'_ Self, operation: Operation)
      -> Action
    {
        let status = self.shared.status.get();
        let (next, action) = state::transition(status, operation);
        if action == Action::Illegal {
            self.illegal(operation, action);
        }
        if action != Action::Start {
            self.shared.status.set(next);
        }
        ::log::trace!(
            "generator `{}`: {} --{:?}--> {} ({:?})",
            self.shared.name, status, operation, next, action,
        );
        action
    }

    fn illegal (self: &'_ Self, operation: Operation, action: Action)
      -> !
    {
        panic!(
            "generator `{}`: {:?} cannot lead to {:?} while {}",
            self.shared.name, operation, action, self.shared.status.get(),
        );
    }

    fn throw_into (self: &'_ Self, exception: Exception)
      -> Result<GeneratorState<Y, R>, GeneratorError>
    {
        self.ensure_not_running()?;
        match self.apply(Operation::Throw) {
            | Action::Raise => {
                self.finalize();
                Err(GeneratorError::Raised(exception))
            },
            | Action::SwitchIn => {
                ::log::trace!(
                    "injecting {} into generator `{}`",
                    exception.kind(), self.shared.name,
                );
                self.shared.error.put(exception);
                self.drive()
            },
            | action => self.illegal(Operation::Throw, action),
        }
    }

    fn close (self: &'_ Self)
      -> Result<(), GeneratorError>
    {
        self.ensure_not_running()?;
        match self.apply(Operation::Close) {
            | Action::Nothing => Ok(()),
            | Action::Finalize => {
                self.finalize();
                Ok(())
            },
            | Action::SwitchIn => {
                ::log::trace!("closing generator `{}`", self.shared.name);
                self.shared.error.put(Exception::generator_exit());
                match self.drive() {
                    | Ok(GeneratorState::Returned(_)) => Ok(()),
                    | Err(GeneratorError::Raised(exception))
                        if exception.is_generator_exit()
                    => Ok(()),
                    // the producer had already been unwound by a panic.
                    | Err(GeneratorError::Exhausted { .. }) => Ok(()),
                    | Err(err) => Err(err),
                    | Ok(GeneratorState::Yielded(_)) => {
                        ::log::warn!(
                            "generator `{}` ignored GeneratorExit",
                            self.shared.name,
                        );
                        self.abandon();
                        if ::std::thread::panicking() {
                            // a second panic would abort.
                            return Ok(());
                        }
                        panic!(
                            "generator `{}` yielded after being closed",
                            self.shared.name,
                        );
                    },
                }
            },
            | action => self.illegal(Operation::Close, action),
        }
    }

    /// Switches into the producer, and interprets how it came back.
    fn drive (self: &'_ Self)
      -> Result<GeneratorState<Y, R>, GeneratorError>
    {
        match self.switch_in() {
            | Switch::Suspended => {
                let action = self.apply(Operation::Yielded);
                debug_assert_eq!(action, Action::Deliver);
                match self.shared.value.take() {
                    | Some(value) => Ok(GeneratorState::Yielded(value)),
                    | None => panic!(
                        "generator `{}` switched out without yielding a value",
                        self.shared.name,
                    ),
                }
            },
            | Switch::Finished => {
                let action = self.apply(Operation::Terminated);
                debug_assert_eq!(action, Action::Finalize);
                let outcome = self.shared.outcome.take();
                self.finalize();
                match outcome {
                    | Some(Ok(value)) => Ok(GeneratorState::Returned(value)),
                    | Some(Err(exception)) => Err(GeneratorError::Raised(exception)),
                    | None => Err(GeneratorError::Exhausted {
                        name: self.shared.name.clone(),
                    }),
                }
            },
        }
    }

    fn switch_in (self: &'_ Self)
      -> Switch
    {
        let mut fiber = self.fiber.borrow_mut();
        let fiber = match fiber.as_mut() {
            | Some(fiber) => fiber,
            | None => return Switch::Finished,
        };
        ::log::trace!("switching into generator `{}`", self.shared.name);
        self.while_running(|| fiber.switch_in())
    }

    /// Runs `f`, during which control is deemed to be inside the producer, even
    /// if it unwinds.
    fn while_running<Ret> (self: &'_ Self, f: impl FnOnce() -> Ret)
      -> Ret
    {
        let running = &self.shared.running;
        ::unwind_safe::with_state(())
            .try_eval(move |&mut ()| {
                running.set(true);
                f()
            })
            .finally(move |()| {
                running.set(false);
            })
    }

    /// Forces a not yet finished generator into `Finished`, tearing down its
    /// producer without giving it a chance to run.
    fn abandon (self: &'_ Self)
    {
        let operation = match self.shared.status.get() {
            | Status::Unused => Operation::Close,
            | Status::Running => Operation::Terminated,
            | Status::Finished => return,
        };
        let action = self.apply(operation);
        debug_assert_eq!(action, Action::Finalize);
        self.finalize();
    }

    /// Releases everything the generator owns, the cleanup callback running
    /// last, once the producer can no longer run.
    fn finalize (self: &'_ Self)
    {
        debug_assert!(self.shared.status.get().is_finished());
        let fiber = self.fiber.borrow_mut().take();
        if let Some(fiber) = fiber {
            self.while_running(|| fiber.destroy());
        }
        drop(self.entry.take());
        drop(self.shared.value.take());
        drop(self.shared.error.take());
        drop(self.shared.outcome.take());
        if let Some(cleanup) = self.cleanup.take() {
            ::log::debug!("finalizing generator `{}`", self.shared.name);
            // a producer released without unwinding still borrows it.
            let context = match self.shared.context.try_borrow_mut() {
                | Ok(mut context) => context.take(),
                | Err(_) => {
                    ::log::warn!(
                        "generator `{}`: context payload leaked with its stack",
                        self.shared.name,
                    );
                    None
                },
            };
            if let Some(context) = context {
                cleanup(context);
            }
        }
    }
}

impl<Y, R, C> Drop for Inner<Y, R, C> {
    fn drop (self: &'_ mut Self)
    {
        if self.shared.status.get().is_finished() {
            return;
        }
        let this = &*self;
        ::unwind_safe::with_state(())
            .try_eval(move |&mut ()| {
                if let Err(err) = this.close() {
                    ::log::warn!(
                        "generator `{}` failed to close on drop: {}",
                        this.shared.name, err,
                    );
                }
            })
            .finally(move |()| this.abandon())
    }
}
