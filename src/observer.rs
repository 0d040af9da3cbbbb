/// Receives notice that the session was torn down after a failed refresh and the user
/// must authenticate again.
pub trait SessionObserver: Send + Sync {
    fn session_expired(&self, login_route: &str);
}

impl<F> SessionObserver for F
where
    F: Fn(&str) + Send + Sync,
{
    fn session_expired(&self, login_route: &str) {
        self(login_route)
    }
}

/// Default observer; the client still logs `session.expired` on teardown.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SessionObserver for NoopObserver {
    fn session_expired(&self, _login_route: &str) {}
}
