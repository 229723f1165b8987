//! Store operation tests

mod delete_test;
mod list_test;
