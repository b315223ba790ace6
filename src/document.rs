pub mod dom;
pub mod inject;
