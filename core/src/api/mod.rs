//! Typed operations over the service's HTTP surface, grouped the way the
//! application uses them: recognition intake, people records, generic image
//! upload, and account management. All of them are thin `impl ApiClient`
//! blocks delegating to the request pipeline.

pub mod people;
pub mod recognition;
pub mod upload;
pub mod user;
