#[macro_use]
mod macros;

pub(in crate) mod prelude;

pub(in crate) use self::slot::Slot;
mod slot;
