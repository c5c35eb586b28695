//! # Configuración del Servidor
//! src/config.rs
//!
//! El puerto es el único parámetro que normalmente hace falta tocar. Por
//! defecto se escucha en todas las interfaces (`0.0.0.0`); `with_host` o
//! `--host` lo restringen.
//!
//! ## Ejemplos de uso
//!
//! ### CLI (binario de demo)
//! ```bash
//! ./mini_http --port 8080 --workers 4
//! ```
//!
//! ### Embebido
//! ```
//! use mini_http::config::Config;
//!
//! let config = Config::new(3000).with_workers(2);
//! assert_eq!(config.address(), "0.0.0.0:3000");
//! ```

use clap::Parser;
use thiserror::Error;

/// Errores de validación de la configuración
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("workers must be >= 1")]
    NoWorkers,
}

/// Configuración del servidor HTTP/1.1
#[derive(Debug, Clone, Parser)]
#[command(name = "mini_http")]
#[command(about = "Servidor HTTP/1.1 mínimo con pool fijo de workers")]
#[command(version)]
pub struct Config {
    /// Puerto en el que escucha el servidor (0 = elegido por el SO)
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    /// Host/IP en el que escucha (default: todas las interfaces)
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Número de workers (default: paralelismo disponible del host)
    #[arg(short, long, default_value_t = default_workers())]
    pub workers: usize,
}

/// Paralelismo aparente del host, mínimo 1
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .max(1)
}

impl Config {
    /// Configuración por defecto escuchando en `port`
    pub fn new(port: u16) -> Self {
        Self {
            port,
            ..Self::default()
        }
    }

    /// Parsea argumentos de línea de comandos
    pub fn from_args() -> Self {
        Config::parse()
    }

    pub fn with_host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    /// Fija la cantidad de workers; 0 se corrige a 1 al arrancar
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Obtiene la dirección completa para bind (host:port)
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Workers que realmente se lanzan (nunca menos de 1)
    pub fn effective_workers(&self) -> usize {
        self.workers.max(1)
    }

    /// Valida la configuración
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "0.0.0.0".to_string(),
            workers: default_workers(),
        }
    }
}
