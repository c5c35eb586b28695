//! # Cola de Conexiones
//! src/server/queue.rs
//!
//! Cola FIFO thread-safe y sin límite: un productor (el accept loop) y N
//! consumidores (los workers).
//!
//! El flag `closed` vive bajo el mismo mutex que los items, así que un
//! `close()` nunca se pierde entre el chequeo de "cola vacía" de un worker y
//! su `wait`.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

struct QueueState<T> {
    items: VecDeque<T>,
    closed: bool,
}

/// Cola FIFO bloqueante
pub struct WorkQueue<T> {
    state: Mutex<QueueState<T>>,

    /// Condvar para notificar nuevos items o el cierre
    available: Condvar,
}

impl<T> WorkQueue<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                items: VecDeque::new(),
                closed: false,
            }),
            available: Condvar::new(),
        }
    }

    // Los handlers corren fuera del lock, así que un poison no deja el estado a medias
    fn lock(&self) -> MutexGuard<'_, QueueState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Encola un item y despierta a un worker
    ///
    /// Si la cola ya está cerrada devuelve el item para que el llamador lo descarte.
    pub fn push(&self, item: T) -> Result<(), T> {
        let mut state = self.lock();
        if state.closed {
            return Err(item);
        }
        state.items.push_back(item);
        drop(state);

        self.available.notify_one();
        Ok(())
    }

    /// Desencola el item más antiguo
    ///
    /// Bloquea mientras la cola esté vacía y abierta. Retorna `None` solo
    /// cuando está cerrada y vacía: los items encolados antes del cierre se
    /// siguen entregando.
    pub fn pop(&self) -> Option<T> {
        let mut state = self.lock();

        loop {
            if let Some(item) = state.items.pop_front() {
                return Some(item);
            }
            if state.closed {
                return None;
            }
            state = self
                .available
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Cierra la cola y despierta a todos los workers bloqueados
    pub fn close(&self) {
        self.lock().closed = true;
        self.available.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for WorkQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_fifo_order() {
        let queue = WorkQueue::new();
        for i in 0..5 {
            queue.push(i).unwrap();
        }

        let out: Vec<i32> = (0..5).map(|_| queue.pop().unwrap()).collect();
        assert_eq!(out, vec![0, 1, 2, 3, 4]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_pop_drains_after_close() {
        let queue = WorkQueue::new();
        queue.push("a").unwrap();
        queue.push("b").unwrap();
        queue.close();

        assert_eq!(queue.pop(), Some("a"));
        assert_eq!(queue.pop(), Some("b"));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn test_push_after_close_is_rejected() {
        let queue = WorkQueue::new();
        queue.close();

        assert_eq!(queue.push(7), Err(7));
        assert!(queue.is_closed());
    }

    #[test]
    fn test_close_wakes_blocked_consumers() {
        let queue: Arc<WorkQueue<u32>> = Arc::new(WorkQueue::new());

        let consumers: Vec<_> = (0..4)
            .map(|_| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || queue.pop())
            })
            .collect();

        thread::sleep(Duration::from_millis(50));
        queue.close();

        for consumer in consumers {
            assert_eq!(consumer.join().unwrap(), None);
        }
    }

    #[test]
    fn test_each_item_delivered_once() {
        let queue: Arc<WorkQueue<usize>> = Arc::new(WorkQueue::new());

        let consumers: Vec<_> = (0..4)
            .map(|_| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || {
                    let mut seen = Vec::new();
                    while let Some(item) = queue.pop() {
                        seen.push(item);
                    }
                    seen
                })
            })
            .collect();

        for i in 0..200 {
            queue.push(i).unwrap();
        }
        queue.close();

        let mut all = Vec::new();
        for consumer in consumers {
            all.extend(consumer.join().unwrap());
        }

        let unique: HashSet<_> = all.iter().copied().collect();
        assert_eq!(all.len(), 200);
        assert_eq!(unique.len(), 200);
    }
}
