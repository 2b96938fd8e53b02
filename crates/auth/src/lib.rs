//! `garage-auth`: account registration and login, decoupled from HTTP and
//! storage.
//!
//! Passwords are kept and compared as submitted; there is no session or
//! token layer on top of a successful login.

pub mod user;

pub use user::{ACCOUNTS, Credentials, Registration, User};
