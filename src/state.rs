//! The generator lifecycle as an explicit transition table.
//!
//! Every caller-side operation and every producer-side event is looked up in
//! [`transition`] before anything happens; the [`Generator`] then carries out
//! the returned [`Action`]. The set of legal transitions can thus be checked on
//! its own, independently of any fiber switching.

use_prelude!();

/// Lifecycle status of a [`Generator`].
///
/// Ordered: a generator's status never decreases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub
enum Status {
    /// Created, the producer has never run and owns no stack yet.
    Unused,

    /// The producer fiber exists: it is either executing or suspended at a
    /// yield point.
    Running,

    /// Terminated: no more values to come, producer stack released.
    Finished,
}

/// Something that may change a generator's [`Status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub
enum Operation {
    /// Caller: [`Generator::resume`] (and its `next` / `send` sugar).
    Resume,

    /// Caller: [`Generator::throw_into`].
    Throw,

    /// Caller: [`Generator::close`], explicit or on drop.
    Close,

    /// Producer: switched back to the caller from a yield point.
    Yielded,

    /// Producer: returned or let an exception escape.
    Terminated,
}

/// What the generator has to do to honor an [`Operation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub
enum Action {
    /// Allocate the producer fiber and switch into it.
    Start,

    /// Switch into the suspended producer.
    SwitchIn,

    /// Hand the yielded value over to the caller.
    Deliver,

    /// Release the producer fiber and run the cleanup callback.
    Finalize,

    /// Finalize if needed, and raise the injected exception to the caller
    /// without entering the producer.
    Raise,

    /// Fail with [`GeneratorError::Exhausted`].
    Exhausted,

    /// Nothing to do.
    Nothing,

    /// This pair cannot happen; reaching it is a bug in the generator.
    Illegal,
}

/// The transition table: `(status, operation) -> (next status, action)`.
pub
fn transition (status: Status, operation: Operation)
  -> (Status, Action)
{
    use self::{Action::*, Operation::*, Status::*};

    match (status, operation) {
        | (Unused, Resume) => (Running, Start),
        | (Unused, Throw) => (Finished, Raise),
        | (Unused, Close) => (Finished, Finalize),
        | (Unused, Yielded)
        | (Unused, Terminated)
        => (Unused, Illegal),

        | (Running, Resume)
        | (Running, Throw)
        | (Running, Close)
        => (Running, SwitchIn),
        | (Running, Yielded) => (Running, Deliver),
        | (Running, Terminated) => (Finished, Finalize),

        | (Finished, Resume) => (Finished, Exhausted),
        | (Finished, Throw) => (Finished, Raise),
        | (Finished, Close) => (Finished, Nothing),
        | (Finished, Yielded)
        | (Finished, Terminated)
        => (Finished, Illegal),
    }
}

impl Status {
    /// Every status, in lifecycle order.
    pub
    const ALL: [Status; 3] = [Status::Unused, Status::Running, Status::Finished];

    /// Whether this is `Finished`.
    #[inline]
    pub
    fn is_finished (self: Self)
      -> bool
    {
        self == Status::Finished
    }
}

impl Operation {
    /// Every operation, caller-side ones first.
    pub
    const ALL: [Operation; 5] = [
        Operation::Resume,
        Operation::Throw,
        Operation::Close,
        Operation::Yielded,
        Operation::Terminated,
    ];
}

impl fmt::Display for Status {
    fn fmt (self: &'_ Self, f: &'_ mut fmt::Formatter<'_>)
      -> fmt::Result
    {
        f.write_str(match *self {
            | Status::Unused => "unused",
            | Status::Running => "running",
            | Status::Finished => "finished",
        })
    }
}
