/// Contains macros.
pub(crate) mod macros;
