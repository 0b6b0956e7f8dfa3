pub mod writer;

pub use writer::write_derived_to_xlsx;
