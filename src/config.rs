//! Producer fiber configuration.

use_prelude!();

/// Environment variable read by [`Config::from_env`]: stack size, in bytes.
pub
const STACK_SIZE_ENV_VAR: &str = "FIBER_GEN_STACK_SIZE";

/// Stack size used when none is configured.
pub
const DEFAULT_STACK_SIZE: usize = 256 * 1024;

/// How a [`Generator`]'s producer fiber gets set up.
///
/// ```rust
/// use ::fiber_gen::prelude::*;
///
/// let config = Config::default().stack_size(64 * 1024);
/// let generator = Generator::<u8, ()>::with_config("small", config, |co| {
///     co.yield_(42)?;
///     Ok(())
/// });
/// assert!(matches!(generator.next(), Ok(GeneratorState::Yielded(42))));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub
struct Config {
    pub(in crate) stack_size: usize,
}

impl Default for Config {
    fn default ()
      -> Self
    {
        Self { stack_size: DEFAULT_STACK_SIZE }
    }
}

impl Config {
    /// Sets the producer's stack size, in bytes.
    ///
    /// Out of range sizes are only reported when the stack is allocated, _i.e._,
    /// on the first resume, as [`GeneratorError::FiberAllocation`].
    pub
    fn stack_size (self: Self, stack_size: usize)
      -> Self
    {
        Self { stack_size, ..self }
    }

    /// The producer's stack size, in bytes.
    #[inline]
    pub
    fn get_stack_size (self: &'_ Self)
      -> usize
    {
        self.stack_size
    }

    /// The default configuration, with the stack size overridden by the
    /// `FIBER_GEN_STACK_SIZE` environment variable when it is set.
    pub
    fn from_env ()
      -> Self
    {
        let config = Self::default();
        match ::std::env::var(STACK_SIZE_ENV_VAR) {
            | Ok(raw) => match raw.trim().parse::<usize>() {
                | Ok(stack_size) => config.stack_size(stack_size),
                | Err(err) => {
                    ::log::warn!(
                        "ignoring {}={:?} ({}); using {} bytes",
                        STACK_SIZE_ENV_VAR, raw, err, config.stack_size,
                    );
                    config
                },
            },
            | Err(_) => config,
        }
    }
}

