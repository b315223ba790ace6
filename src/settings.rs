pub mod normalize;
pub mod record;
pub mod schema;
