//! The crate prelude: reexport the most essential utilities so that blob
//! `use`-ing them should enable the most straight-forward usage.

pub use crate::{
    Co,
    Config,
    Exception,
    Generator,
    GeneratorError,
    GeneratorExit,
    GeneratorState,
    make_yield,
    Status,
};
