#![cfg_attr(not(feature = "std"), no_std)]

//! Common code shared by the signature, accumulator and proof system crates: hashing to field and
//! group elements, fixed-base multiplication, polynomial helpers and serde support for arkworks objects.

#[macro_use]
pub mod macros;
#[macro_use]
pub mod serde_utils;
pub mod hashing_utils;
pub mod msm;
pub mod poly;
pub mod signature;
