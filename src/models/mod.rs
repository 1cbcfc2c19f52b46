pub mod date_range;
pub mod field;
pub mod record;
pub mod schema;
