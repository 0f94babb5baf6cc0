pub mod bulk_import;
pub mod health;
