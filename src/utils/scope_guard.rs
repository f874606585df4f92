/// Runs a closure when dropped.
///
/// Used to tie transient state to a lexical scope: the reset runs on every
/// exit path, including panics, so the state can never be left set across an
/// asynchronous boundary.
#[must_use = "the guard resets on drop; binding it to _ would reset immediately"]
pub struct ScopeGuard<F: FnOnce()>(Option<F>);

impl<F: FnOnce()> ScopeGuard<F> {
    pub fn new(f: F) -> Self {
        Self(Some(f))
    }
}

impl<F: FnOnce()> Drop for ScopeGuard<F> {
    fn drop(&mut self) {
        if let Some(f) = self.0.take() {
            f();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn runs_on_scope_exit() {
        let flag = Cell::new(true);
        {
            let _guard = ScopeGuard::new(|| flag.set(false));
            assert!(flag.get());
        }
        assert!(!flag.get());
    }

    #[test]
    fn runs_on_unwind() {
        let flag = std::sync::Arc::new(std::sync::Mutex::new(true));
        let inner = flag.clone();
        let result = std::panic::catch_unwind(move || {
            let _guard = ScopeGuard::new(|| *inner.lock().unwrap() = false);
            panic!("boom");
        });
        assert!(result.is_err());
        assert!(!*flag.lock().unwrap());
    }
}
