pub mod application;
pub mod catalog;
pub mod domain;
pub mod interfaces;
pub mod protocol;
pub mod rpc;
pub mod storage;
