use std::sync::atomic::{
    AtomicUsize,
    Ordering,
};

/// Navigation shell hook fired on logout and on authentication failure.
pub trait Navigator: Send + Sync {
    fn redirect_to_login(&self);
}

/// Records redirects so a shell without real routing can show its login
/// prompt once the current command finishes.
#[derive(Debug, Default)]
pub struct LoginRedirect {
    redirects: AtomicUsize,
}

impl LoginRedirect {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.redirects.load(Ordering::SeqCst)
    }

    pub fn requested(&self) -> bool {
        self.count() > 0
    }
}

impl Navigator for LoginRedirect {
    fn redirect_to_login(&self) {
        self.redirects.fetch_add(1, Ordering::SeqCst);
    }
}
