//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Mapea (method, path) exactos a handlers.
//!
//! ```text
//! Request → Router → Handler → Response
//! ```
//!
//! - El primer binding registrado que coincide gana
//! - La comparación es exacta y sensible a mayúsculas en ambos campos
//! - No hay wildcards, parámetros de path ni parsing de query
//!
//! La tabla se arma antes de arrancar el servidor y después solo se lee.

use crate::http::{Request, Response};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Error que puede devolver un handler; cualquier `std::error::Error` sirve con `?`
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

pub type HandlerResult = Result<(), HandlerError>;

/// Tipo de función handler
///
/// Recibe el request y una `Response` por defecto (200 OK) que puede modificar.
pub type Handler = Arc<dyn Fn(&Request, &mut Response) -> HandlerResult + Send + Sync>;

/// Resultado de despachar un request
#[derive(Debug)]
pub enum Dispatch {
    /// El handler terminó bien
    Handled(Response),

    /// Ningún binding coincide
    NotFound,

    /// El handler devolvió `Err` o hizo panic; contiene la descripción
    Failed(String),
}

/// Binding (method, path exacto) → handler
#[derive(Clone)]
struct Route {
    method: String,
    path: String,
    handler: Handler,
}

/// Router que mapea (method, path) a handlers
#[derive(Clone, Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    /// Crea un nuevo router vacío
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Registra una ruta con su handler (sin validación ni deduplicación)
    ///
    /// # Ejemplo
    /// ```
    /// use mini_http::router::Router;
    ///
    /// let mut router = Router::new();
    /// router.register("GET", "/hello", |_req, res| {
    ///     res.set_body("hello\n");
    ///     Ok(())
    /// });
    /// assert_eq!(router.len(), 1);
    /// ```
    pub fn register<F>(&mut self, method: &str, path: &str, handler: F)
    where
        F: Fn(&Request, &mut Response) -> HandlerResult + Send + Sync + 'static,
    {
        self.routes.push(Route {
            method: method.to_string(),
            path: path.to_string(),
            handler: Arc::new(handler),
        });
    }

    /// Busca el primer handler para (method, target)
    pub fn find(&self, method: &str, target: &str) -> Option<&Handler> {
        self.routes
            .iter()
            .find(|route| route.method == method && route.path == target)
            .map(|route| &route.handler)
    }

    /// Busca y ejecuta el handler apropiado para un request
    ///
    /// Un `Err` o un panic dentro del handler se convierten en
    /// [`Dispatch::Failed`]; nunca salen de esta función.
    pub fn dispatch(&self, request: &Request) -> Dispatch {
        let Some(handler) = self.find(request.method(), request.target()) else {
            return Dispatch::NotFound;
        };

        let mut response = Response::default();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| handler(request, &mut response)));

        match outcome {
            Ok(Ok(())) => Dispatch::Handled(response),
            Ok(Err(e)) => Dispatch::Failed(e.to_string()),
            Err(payload) => Dispatch::Failed(panic_message(payload.as_ref())),
        }
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Extrae el texto de un panic (`&str` o `String`)
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("panic: {}", msg)
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("panic: {}", msg)
    } else {
        "panic: unknown payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_of(dispatch: Dispatch) -> Vec<u8> {
        match dispatch {
            Dispatch::Handled(response) => response.body().to_vec(),
            other => panic!("expected Handled, got {:?}", other),
        }
    }

    #[test]
    fn test_router_creation() {
        let router = Router::new();
        assert!(router.is_empty());
    }

    #[test]
    fn test_route_found() {
        let mut router = Router::new();
        router.register("GET", "/test", |_req, res| {
            res.set_body("ok");
            Ok(())
        });

        let dispatch = router.dispatch(&Request::new("GET", "/test"));
        assert_eq!(body_of(dispatch), b"ok");
    }

    #[test]
    fn test_method_must_match() {
        let mut router = Router::new();
        router.register("POST", "/echo", |_req, _res| Ok(()));

        assert!(matches!(router.dispatch(&Request::new("GET", "/echo")), Dispatch::NotFound));
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let mut router = Router::new();
        router.register("GET", "/Hello", |_req, _res| Ok(()));

        assert!(router.find("get", "/Hello").is_none());
        assert!(router.find("GET", "/hello").is_none());
        assert!(router.find("GET", "/Hello").is_some());
    }

    #[test]
    fn test_query_string_is_part_of_target() {
        let mut router = Router::new();
        router.register("GET", "/hello", |_req, _res| Ok(()));

        assert!(router.find("GET", "/hello?x=1").is_none());
    }

    #[test]
    fn test_first_registration_wins() {
        let mut router = Router::new();
        router.register("GET", "/dup", |_req, res| {
            res.set_body("first");
            Ok(())
        });
        router.register("GET", "/dup", |_req, res| {
            res.set_body("second");
            Ok(())
        });

        assert_eq!(router.len(), 2);
        assert_eq!(body_of(router.dispatch(&Request::new("GET", "/dup"))), b"first");
    }

    #[test]
    fn test_handler_error_is_contained() {
        let mut router = Router::new();
        router.register("GET", "/fail", |_req, _res| Err("database unavailable".into()));

        match router.dispatch(&Request::new("GET", "/fail")) {
            Dispatch::Failed(msg) => assert_eq!(msg, "database unavailable"),
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[test]
    fn test_handler_panic_is_contained() {
        let mut router = Router::new();
        router.register("GET", "/boom", |_req, _res| panic!("kaboom"));

        match router.dispatch(&Request::new("GET", "/boom")) {
            Dispatch::Failed(msg) => assert!(msg.contains("kaboom")),
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[test]
    fn test_handler_receives_default_response() {
        let mut router = Router::new();
        router.register("GET", "/", |_req, res| {
            assert_eq!(res.status(), 200);
            assert_eq!(res.reason(), "OK");
            Ok(())
        });

        assert!(matches!(router.dispatch(&Request::new("GET", "/")), Dispatch::Handled(_)));
    }
}
