use crate::actions::Action;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Action queue shared by the main loop, fetch tasks and the tick thread.
///
/// Actions dispatched from anywhere are only applied when the main loop
/// pops them, so reducers always run on the UI thread. A task that panics
/// while holding the lock does not take the queue down with it.
#[derive(Clone, Default)]
pub struct Dispatcher {
    queue: Arc<Mutex<VecDeque<Action>>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    fn queue(&self) -> MutexGuard<'_, VecDeque<Action>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn dispatch(&self, action: Action) {
        self.queue().push_back(action);
    }

    /// Oldest queued action
    pub fn pop(&self) -> Option<Action> {
        self.queue().pop_front()
    }

    /// Number of actions waiting for the main loop
    pub fn pending(&self) -> usize {
        self.queue().len()
    }

    #[cfg(test)]
    pub fn drain(&self) -> Vec<Action> {
        self.queue().drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actions_come_out_in_order() {
        let dispatcher = Dispatcher::new();
        dispatcher.dispatch(Action::NavigateNext);
        dispatcher.clone().dispatch(Action::NavigatePrevious);
        assert_eq!(dispatcher.pending(), 2);

        assert!(matches!(dispatcher.pop(), Some(Action::NavigateNext)));
        assert!(matches!(dispatcher.pop(), Some(Action::NavigatePrevious)));
        assert!(dispatcher.pop().is_none());
        assert_eq!(dispatcher.pending(), 0);
    }

    #[test]
    fn test_queue_survives_panicking_holder() {
        let dispatcher = Dispatcher::new();
        let shared = dispatcher.clone();
        let result = std::thread::spawn(move || {
            let _guard = shared.queue.lock().unwrap();
            panic!("task failed while holding the queue");
        })
        .join();
        assert!(result.is_err());

        dispatcher.dispatch(Action::GlobalQuit);
        assert!(matches!(dispatcher.drain().as_slice(), [Action::GlobalQuit]));
    }
}
