pub mod bridge;
pub mod error;
pub mod frame;
pub mod packet;
pub mod safety;
pub mod transport;

// Re-export the Bridge struct for easy access
pub use bridge::Bridge;
