pub mod compare;
pub mod error;
pub mod failure;
pub mod soft_assert;
