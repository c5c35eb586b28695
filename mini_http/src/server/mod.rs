//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! ```text
//! accept loop ──push──► WorkQueue ──pop──► worker 0..N ──► handle_connection
//! ```
//!
//! 1. `tcp`: bind, accept loop y ciclo de vida (`run` / `stop`)
//! 2. `queue`: cola FIFO compartida (mutex + condvar)
//! 3. `pool`: workers que vacían la cola
//! 4. `connection`: un request completo por conexión

pub mod connection;
pub mod pool;
pub mod queue;
pub mod tcp;

// Re-exportar para facilitar el uso
pub use connection::{handle_connection, ConnectionOutcome};
pub use queue::WorkQueue;
pub use tcp::{Server, ServerHandle};
