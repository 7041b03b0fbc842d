//! Identity-preserving error values travelling between producer and caller.

use_prelude!();

use ::std::error::Error as StdError;

/// Raised inside a suspended producer to ask it to unwind.
///
/// [`Generator::close`] injects it at the producer's suspension point; letting
/// it escape (e.g., through `?`) is the expected way for a producer to react.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ::thiserror::Error)]
#[error("GeneratorExit")]
pub
struct GeneratorExit;

/// An exception: one error value, its kind, and the traceback of the
/// generators it escaped from, kept together behind a single shared pointer.
///
/// Cloning an `Exception` yields another reference to the _same_ exception,
/// so that identity survives being handed across a fiber switch:
///
/// ```rust
/// use ::fiber_gen::prelude::*;
///
/// #[derive(Debug, ::thiserror::Error)]
/// #[error("boom")]
/// struct Boom;
///
/// let raised = Exception::new(Boom);
/// let thrown = raised.clone();
/// let generator = Generator::<(), ()>::new("boom", move |_| Err(thrown));
/// match generator.next() {
///     | Err(GeneratorError::Raised(caught)) => {
///         assert!(Exception::ptr_eq(&caught, &raised));
///         assert_eq!(&*caught.traceback()[0], "boom");
///     },
///     | _ => unreachable!(),
/// }
/// ```
#[derive(Clone)]
pub
struct Exception(Rc<Raised>);

struct Raised {
    kind: &'static str,
    value: Box<dyn StdError + 'static>,
    traceback: RefCell<Vec<Rc<str>>>,
}

impl Exception {
    /// Wraps `error`, tagging it with the name of its type.
    pub
    fn new<E> (error: E)
      -> Self
    where
        E : StdError + 'static,
    {
        Self(Rc::new(Raised {
            kind: short_type_name::<E>(),
            value: Box::new(error),
            traceback: RefCell::new(Vec::new()),
        }))
    }

    /// A fresh [`GeneratorExit`] exception.
    pub
    fn generator_exit ()
      -> Self
    {
        Self::new(GeneratorExit)
    }

    /// Whether this is a [`GeneratorExit`], as injected by
    /// [`Generator::close`].
    #[inline]
    pub
    fn is_generator_exit (self: &'_ Self)
      -> bool
    {
        self.is::<GeneratorExit>()
    }

    /// The (unqualified) type name of the wrapped error.
    #[inline]
    pub
    fn kind (self: &'_ Self)
      -> &'static str
    {
        self.0.kind
    }

    /// The wrapped error.
    #[inline]
    pub
    fn value (self: &'_ Self)
      -> &'_ (dyn StdError + 'static)
    {
        &*self.0.value
    }

    /// Whether the wrapped error is an `E`.
    pub
    fn is<E : StdError + 'static> (self: &'_ Self)
      -> bool
    {
        self.0.value.is::<E>()
    }

    /// The wrapped error, if it is an `E`.
    pub
    fn downcast_ref<E : StdError + 'static> (self: &'_ Self)
      -> Option<&'_ E>
    {
        self.0.value.downcast_ref::<E>()
    }

    /// Names of the generators this exception escaped from, innermost first.
    pub
    fn traceback (self: &'_ Self)
      -> Vec<Rc<str>>
    {
        self.0.traceback.borrow().clone()
    }

    /// Whether both handles refer to the very same raised exception.
    #[inline]
    pub
    fn ptr_eq (this: &'_ Self, other: &'_ Self)
      -> bool
    {
        Rc::ptr_eq(&this.0, &other.0)
    }

    pub(in crate)
    fn push_frame (self: &'_ Self, generator_name: &'_ Rc<str>)
    {
        self.0.traceback.borrow_mut().push(generator_name.clone());
    }
}

fn short_type_name<E> ()
  -> &'static str
{
    let full = ::core::any::type_name::<E>();
    // strip the module path, but not the generic arguments' ones.
    let base = full.split('<').next().unwrap_or(full);
    let start = base.rfind("::").map_or(0, |at| at + 2);
    &full[start ..]
}

impl fmt::Debug for Exception {
    fn fmt (self: &'_ Self, f: &'_ mut fmt::Formatter<'_>)
      -> fmt::Result
    {
        f   .debug_struct("Exception")
            .field("kind", &self.0.kind)
            .field("value", &self.0.value)
            .field("traceback", &*self.0.traceback.borrow())
            .finish()
    }
}

impl fmt::Display for Exception {
    fn fmt (self: &'_ Self, f: &'_ mut fmt::Formatter<'_>)
      -> fmt::Result
    {
        write!(f, "{}: {}", self.0.kind, self.0.value)
    }
}

impl StdError for Exception {
    fn source (self: &'_ Self)
      -> Option<&'_ (dyn StdError + 'static)>
    {
        Some(self.value())
    }
}

impl From<GeneratorExit> for Exception {
    fn from (_: GeneratorExit)
      -> Self
    {
        Self::generator_exit()
    }
}
