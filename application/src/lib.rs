pub mod gateway;
pub mod ports;

pub use gateway::{PersistenceGateway, decode_list};
