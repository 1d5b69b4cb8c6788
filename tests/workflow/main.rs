//! Block workflow integration tests.


mod create;
mod crud;
