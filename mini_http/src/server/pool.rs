//! # Pool de Workers
//! src/server/pool.rs
//!
//! N threads de larga vida que vacían la misma cola de conexiones. Cada
//! worker procesa una conexión completa antes de volver a la cola: no hay
//! robo de trabajo ni prioridades.

use super::connection::{handle_connection, ConnectionOutcome};
use super::queue::WorkQueue;
use crate::error::{Result, ServerError};
use crate::router::Router;
use std::net::TcpStream;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

/// Pool fijo de workers
///
/// Al soltarse cierra la cola y espera a todos sus threads, así que ningún
/// worker queda colgando aunque `run()` salga por un panic.
pub struct WorkerPool {
    workers: Vec<JoinHandle<()>>,
    queue: Arc<WorkQueue<TcpStream>>,
}

impl WorkerPool {
    /// Lanza `size` workers sobre `queue`
    ///
    /// Si algún thread no puede crearse, cierra la cola, espera a los ya
    /// lanzados y retorna el error.
    pub fn spawn(
        size: usize,
        queue: Arc<WorkQueue<TcpStream>>,
        router: Arc<Router>,
    ) -> Result<Self> {
        let mut workers = Vec::with_capacity(size);

        for id in 0..size {
            let queue_for_worker = Arc::clone(&queue);
            let router = Arc::clone(&router);

            let spawned = thread::Builder::new()
                .name(format!("mini-http-worker-{}", id))
                .spawn(move || worker_loop(id, &queue_for_worker, &router));

            match spawned {
                Ok(handle) => workers.push(handle),
                Err(e) => {
                    // El Drop del pool parcial cierra la cola y espera
                    drop(WorkerPool { workers, queue });
                    return Err(ServerError::Spawn(e));
                }
            }
        }

        Ok(Self { workers, queue })
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Cierra la cola y espera a que todos los workers terminen
    ///
    /// Los items que ya estaban en cola se procesan antes de salir.
    pub fn join(mut self) {
        self.join_all();
    }

    fn join_all(&mut self) {
        self.queue.close();
        for handle in self.workers.drain(..) {
            let name = handle.thread().name().map(str::to_string);
            if handle.join().is_err() {
                warn!(worker = ?name, "worker thread panicked");
            }
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.join_all();
    }
}

/// Loop principal del worker: termina cuando la cola está cerrada y vacía
fn worker_loop(id: usize, queue: &WorkQueue<TcpStream>, router: &Router) {
    debug!(worker = id, "worker started");

    while let Some(mut stream) = queue.pop() {
        let peer = stream
            .peer_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        match handle_connection(&mut stream, router) {
            ConnectionOutcome::Served { status } => {
                debug!(worker = id, peer = %peer, status, "connection served")
            }
            ConnectionOutcome::Aborted => {
                debug!(worker = id, peer = %peer, "connection aborted")
            }
        }
        // `stream` se cierra acá, una sola vez
    }

    debug!(worker = id, "worker exiting");
}
