pub mod dotted_path;
pub mod validation;
pub mod value;
