pub(in crate)
use {
    ::core::{
        cell::{
            Cell,
            RefCell,
        },
        fmt,
    },
    ::std::{
        rc::{
            Rc,
            Weak,
        },
    },
    crate::{
        error::GeneratorError,
        exception::Exception,
        generator::{
            Generator,
            GeneratorState,
        },
        state::Status,
        utils::Slot,
    },
};
