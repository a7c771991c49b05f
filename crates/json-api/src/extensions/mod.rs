//! Extension traits

mod depot;
mod result;
mod value;

pub(crate) use depot::DepotExt as _;
pub(crate) use result::ResultExt as _;
pub(crate) use value::IntegerFieldExt as _;
