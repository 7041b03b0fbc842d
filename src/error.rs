use_prelude!();

/// Why a caller-side operation on a [`Generator`] did not produce a
/// [`GeneratorState`].
#[derive(Debug, Clone, ::thiserror::Error)]
pub
enum GeneratorError {
    /// The generator was resumed (or thrown into, or closed) while it was
    /// already running, _i.e._, from within its own producer.
    #[error("generator `{name}` is already running")]
    Reentrancy {
        /// Name of the generator.
        name: Rc<str>,
    },

    /// The generator is `Finished`: there is nothing left to resume.
    #[error("generator `{name}` is exhausted")]
    Exhausted {
        /// Name of the generator.
        name: Rc<str>,
    },

    /// A value was sent to a generator that has not reached any yield point
    /// yet, so there is nobody to receive it.
    #[error("can't send a value to the just-started generator `{name}`")]
    SentBeforeStart {
        /// Name of the generator.
        name: Rc<str>,
    },

    /// An exception escaped the producer (possibly one injected with
    /// [`Generator::throw_into`]). This is the very same exception object.
    #[error("{0}")]
    Raised(Exception),

    /// The producer's stack could not be allocated; the generator remains
    /// unused.
    #[error("failed to allocate a {stack_size}-byte stack for generator `{name}`")]
    FiberAllocation {
        /// Name of the generator.
        name: Rc<str>,
        /// The configured stack size, in bytes.
        stack_size: usize,
    },
}

impl GeneratorError {
    /// The propagated exception, if this is a [`GeneratorError::Raised`].
    pub
    fn exception (self: &'_ Self)
      -> Option<&'_ Exception>
    {
        match self {
            | Self::Raised(exception) => Some(exception),
            | _ => None,
        }
    }

    /// Whether this is a [`GeneratorError::Exhausted`].
    pub
    fn is_exhausted (self: &'_ Self)
      -> bool
    {
        matches!(self, Self::Exhausted { .. })
    }
}

impl From<Exception> for GeneratorError {
    fn from (exception: Exception)
      -> Self
    {
        Self::Raised(exception)
    }
}
