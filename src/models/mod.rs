mod client;
mod phone;
mod search;

pub use client::{Client, ClientPatch};
pub use phone::{Phone, PhoneNumbers};
pub use search::{ContactRow, SearchColumn, SearchFilter};
