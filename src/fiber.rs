//! The fiber primitive: a stackful execution context, and nothing more.
//!
//! A [`Fiber`] owns its own stack and runs an entry function on it. Control is
//! transferred explicitly, in both directions:
//!
//!   - [`Fiber::switch_in`] suspends the current context and resumes the fiber
//!     where it last suspended (or at its entry, the first time);
//!
//!   - [`Suspender::switch_out`], only reachable from within the fiber,
//!     suspends it and resumes whichever context switched in.
//!
//! No value travels through a switch: data is exchanged through slots owned by
//! whoever created the fiber, written before switching and read after.
//!
//! The actual register / stack swapping is performed by the [`generator`]
//! crate's stackful contexts; this module only narrows it down to the
//! create / switch / destroy interface. It is the only place in the crate
//! allowed to use `unsafe`, for the one call switching out of a thread-local
//! context.
//!
//! [`generator`]: https://docs.rs/generator

use ::core::{mem, ops::Not as _};
use ::generator::{Gn, LocalGenerator};
use ::std::panic::{self, AssertUnwindSafe};

/// Smallest stack a fiber may be created with, in bytes.
pub
const MIN_STACK_SIZE: usize = 4 * 1024;

/// Largest stack a fiber may be created with, in bytes.
pub
const MAX_STACK_SIZE: usize = 1 << 30;

/// Outcome of a [`Fiber::switch_in`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub
enum Switch {
    /// The fiber called [`Suspender::switch_out`], and may be switched into
    /// again.
    Suspended,

    /// The fiber's entry function is over (returned or unwound).
    Finished,
}

/// The stack could not be set up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ::thiserror::Error)]
#[error("cannot allocate a fiber stack of {stack_size} bytes")]
pub
struct AllocationFailure {
    /// The requested size, in bytes.
    pub stack_size: usize,
}

/// Rejects stack sizes a [`Fiber`] cannot be created with.
pub
fn check_stack_size (stack_size: usize)
  -> Result<(), AllocationFailure>
{
    if (MIN_STACK_SIZE ..= MAX_STACK_SIZE).contains(&stack_size).not() {
        return Err(AllocationFailure { stack_size });
    }
    Ok(())
}

/// Handle given to a fiber's entry function, to switch back out of it.
pub
struct Suspender<'fiber> {
    switch_out: &'fiber mut dyn FnMut(),
}

impl Suspender<'_> {
    /// Suspends the fiber, resuming the context that last switched into it.
    ///
    /// Returns once the fiber is switched into again. Should the fiber be
    /// destroyed while suspended, this unwinds instead of returning.
    #[inline]
    pub
    fn switch_out (self: &'_ mut Self)
    {
        (self.switch_out)()
    }
}

/// A stackful execution context.
pub
struct Fiber {
    context: LocalGenerator<'static, (), ()>,
    stack_size: usize,
    started: bool,
}

impl Fiber {
    /// Binds `entry` to a fresh stack of `stack_size` bytes.
    ///
    /// `entry` does not run until the first [`switch_in`][`Fiber::switch_in`].
    pub
    fn new<F> (stack_size: usize, entry: F)
      -> Result<Self, AllocationFailure>
    where
        F : for<'fiber> FnOnce(Suspender<'fiber>) + 'static,
    {
        check_stack_size(stack_size)?;
        let words = stack_size / mem::size_of::<usize>();
        // the backend aborts the allocation by panicking.
        let context = panic::catch_unwind(AssertUnwindSafe(move || {
            Gn::<()>::new_scoped_opt_local(words, move |mut scope| {
                let mut switch_out = || {
                    #[allow(unsafe_code)]
                    // SAFETY: `scope` is only reachable through this closure,
                    // which is borrowed by the `Suspender` handed to `entry`
                    // and thus never outlives the fiber's own entry function,
                    // i.e., the generator context `scope` belongs to.
                    let _ = unsafe { scope.yield_unsafe(()) };
                };
                entry(Suspender { switch_out: &mut switch_out });
            })
        }));
        match context {
            | Ok(context) => {
                ::log::debug!("allocated a {}-byte fiber stack", stack_size);
                Ok(Self { context, stack_size, started: false })
            },
            | Err(_) => Err(AllocationFailure { stack_size }),
        }
    }

    /// Suspends the current context until the fiber switches out or finishes.
    pub
    fn switch_in (self: &'_ mut Self)
      -> Switch
    {
        if self.context.is_done() {
            return Switch::Finished;
        }
        self.started = true;
        let _ = self.context.resume();
        if self.context.is_done() {
            Switch::Finished
        } else {
            Switch::Suspended
        }
    }

    /// Whether the entry function is over.
    #[inline]
    pub
    fn is_finished (self: &'_ Self)
      -> bool
    {
        self.context.is_done()
    }

    /// Size of the fiber's stack, in bytes.
    #[inline]
    pub
    fn stack_size (self: &'_ Self)
      -> usize
    {
        self.stack_size
    }

    /// Releases the fiber's stack.
    ///
    /// A fiber suspended mid-way is first unwound from its suspension point,
    /// so that the destructors of whatever lives on its stack do run. While
    /// the current thread is already panicking, the stack is released without
    /// unwinding it.
    pub
    fn destroy (mut self: Self)
    {
        if self.started && self.context.is_done().not() {
            if ::std::thread::panicking() {
                ::log::warn!("releasing a suspended fiber without unwinding it");
            } else {
                ::log::trace!("unwinding a suspended fiber");
                self.context.cancel();
            }
        }
        drop(self);
    }
}

impl ::core::fmt::Debug for Fiber {
    fn fmt (self: &'_ Fiber, f: &'_ mut ::core::fmt::Formatter<'_>)
      -> ::core::fmt::Result
    {
        f   .debug_struct("Fiber")
            .field("stack_size", &self.stack_size)
            .field("started", &self.started)
            .field("finished", &self.context.is_done())
            .finish()
    }
}
