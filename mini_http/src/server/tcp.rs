//! # Servidor TCP con Pool de Workers
//! src/server/tcp.rs
//!
//! Ciclo de vida: `Created → Running → Stopped`.
//!
//! - `run()` hace bind, lanza N workers y ejecuta el accept loop en el thread
//!   que lo llamó. Bloquea hasta que alguien llame a `stop()`.
//! - `stop()` es idempotente y se puede llamar desde cualquier thread (también
//!   vía [`ServerHandle`]). Solo la llamada que gana la transición
//!   `true → false` cierra la cola y despierta al accept loop.
//! - Al salir, `run()` espera a todos los workers. Las conexiones que ya
//!   estaban en cola se atienden antes de que los workers terminen.
//!
//! `std::net::TcpListener` no se puede cerrar desde otro thread mientras está
//! bloqueado en `accept`, así que `stop()` lo despierta con una conexión de
//! loopback descartable. El accept loop ve el flag apagado, sale y suelta
//! el listener.

use super::pool::WorkerPool;
use super::queue::WorkQueue;
use crate::config::Config;
use crate::error::{Result, ServerError};
use crate::http::{Request, Response};
use crate::router::{HandlerResult, Router};
use std::io::ErrorKind;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Pausa tras un error de accept no transitorio (ej: EMFILE)
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(10);

const WAKE_TIMEOUT: Duration = Duration::from_secs(1);

/// Estado compartido entre el servidor, sus handles y el accept loop
struct Shared {
    running: AtomicBool,
    started: AtomicBool,
    queue: Arc<WorkQueue<TcpStream>>,
    local_addr: Mutex<Option<SocketAddr>>,
}

impl Shared {
    fn local_addr(&self) -> Option<SocketAddr> {
        *self.local_addr.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn stop(&self) -> bool {
        if self
            .running
            .compare_exchange(true, false, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            // Ya detenido o nunca arrancó
            return false;
        }

        self.queue.close();

        if let Some(addr) = self.local_addr() {
            let target = wake_address(addr);
            if let Err(e) = TcpStream::connect_timeout(&target, WAKE_TIMEOUT) {
                warn!(error = %e, addr = %target, "failed to wake accept loop");
            }
        }

        true
    }
}

/// Servidor HTTP/1.1 con pool fijo de workers
pub struct Server {
    config: Config,
    router: Router,
    shared: Arc<Shared>,
}

/// Handle clonable para detener o consultar un servidor desde otro thread
#[derive(Clone)]
pub struct ServerHandle {
    shared: Arc<Shared>,
}

impl ServerHandle {
    /// Ver [`Server::stop`]
    pub fn stop(&self) -> bool {
        self.shared.stop()
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    /// Dirección real de escucha, una vez hecho el bind
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.shared.local_addr()
    }
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            router: Router::new(),
            shared: Arc::new(Shared {
                running: AtomicBool::new(false),
                started: AtomicBool::new(false),
                queue: Arc::new(WorkQueue::new()),
                local_addr: Mutex::new(None),
            }),
        }
    }

    /// Registra un handler para (method, path) exactos
    ///
    /// Solo antes de `run()`: toma `&mut self`, así que no puede competir
    /// con el despacho.
    pub fn register<F>(&mut self, method: &str, path: &str, handler: F) -> &mut Self
    where
        F: Fn(&Request, &mut Response) -> HandlerResult + Send + Sync + 'static,
    {
        self.router.register(method, path, handler);
        self
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn handle(&self) -> ServerHandle {
        ServerHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Arranca el servidor y bloquea hasta que se detenga
    ///
    /// Un error de bind retorna de inmediato, sin lanzar workers.
    pub fn run(&self) -> Result<()> {
        if self.shared.started.swap(true, Ordering::SeqCst) {
            return Err(ServerError::AlreadyStarted);
        }

        let address = self.config.address();
        let listener = TcpListener::bind(&address).map_err(|source| ServerError::Bind {
            addr: address.clone(),
            source,
        })?;
        let local_addr = listener.local_addr().map_err(|source| ServerError::Bind {
            addr: address.clone(),
            source,
        })?;

        // `running` antes que la dirección: quien vea la dirección ya puede detenernos
        self.shared.running.store(true, Ordering::SeqCst);
        *self
            .shared
            .local_addr
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(local_addr);

        let pool = match WorkerPool::spawn(
            self.config.effective_workers(),
            Arc::clone(&self.shared.queue),
            Arc::new(self.router.clone()),
        ) {
            Ok(pool) => pool,
            Err(e) => {
                self.shared.stop();
                return Err(e);
            }
        };

        info!(addr = %local_addr, workers = pool.size(), "listening on http://{}", local_addr);

        // Solo sale con `running` apagado, o sea después de stop()
        self.accept_loop(listener);
        pool.join();

        info!(addr = %local_addr, "server stopped");
        Ok(())
    }

    /// Detiene el servidor (idempotente, thread-safe)
    ///
    /// Retorna `true` solo para la llamada que efectivamente lo detuvo. No
    /// interrumpe handlers en curso ni lecturas/escrituras bloqueadas.
    pub fn stop(&self) -> bool {
        self.shared.stop()
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    /// Acepta conexiones y las encola hasta que se apague el flag
    ///
    /// Al retornar suelta el listener: el socket se cierra una sola vez.
    fn accept_loop(&self, listener: TcpListener) {
        while self.is_running() {
            match listener.accept() {
                Ok((stream, peer)) => {
                    if !self.is_running() {
                        // Conexión de wake-up (o llegó justo con el stop)
                        break;
                    }
                    debug!(peer = %peer, "accepted connection");
                    if self.shared.queue.push(stream).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    if !self.is_running() {
                        break;
                    }
                    if is_transient(e.kind()) {
                        continue;
                    }
                    warn!(error = %e, "accept failed");
                    thread::sleep(ACCEPT_ERROR_BACKOFF);
                }
            }
        }
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        // Los workers no viven acá: run() los espera antes de retornar y el
        // Drop de WorkerPool cubre el unwind. Solo queda el stop best-effort.
        self.shared.stop();
    }
}

fn is_transient(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::Interrupted
            | ErrorKind::WouldBlock
            | ErrorKind::ConnectionAborted
            | ErrorKind::ConnectionReset
    )
}

/// Un listener en 0.0.0.0 / [::] se despierta conectando a loopback
fn wake_address(addr: SocketAddr) -> SocketAddr {
    let ip = match addr.ip() {
        IpAddr::V4(ip) if ip.is_unspecified() => IpAddr::V4(Ipv4Addr::LOCALHOST),
        IpAddr::V6(ip) if ip.is_unspecified() => IpAddr::V6(Ipv6Addr::LOCALHOST),
        ip => ip,
    };
    SocketAddr::new(ip, addr.port())
}
