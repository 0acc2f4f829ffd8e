//! Window clients
//!
//! The gateway's view of open pages: enumerate, focus, open, claim. Hosts
//! supply the real implementation; `ClientList` is the in-memory one used
//! by tests and simple embedders.

/// An open page under the worker's scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowClient {
    pub id: u64,
    pub url: String,
    pub focused: bool,
}

/// Host-side client registry.
pub trait Clients {
    /// All open window clients.
    fn match_all(&self) -> Vec<WindowClient>;

    /// Focus a client; returns whether it existed.
    fn focus(&mut self, id: u64) -> bool;

    /// Open a new window at `url`; returns its client id.
    fn open_window(&mut self, url: &str) -> u64;

    /// Take control of all open clients immediately.
    fn claim(&mut self);
}

/// In-memory client registry.
#[derive(Debug, Default)]
pub struct ClientList {
    clients: Vec<WindowClient>,
    next_id: u64,
    claimed: bool,
}

impl ClientList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an open page.
    pub fn add(&mut self, url: &str) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.clients.push(WindowClient {
            id,
            url: url.to_string(),
            focused: false,
        });
        id
    }

    pub fn is_claimed(&self) -> bool {
        self.claimed
    }

    /// The currently focused client, if any.
    pub fn focused(&self) -> Option<&WindowClient> {
        self.clients.iter().find(|c| c.focused)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

impl Clients for ClientList {
    fn match_all(&self) -> Vec<WindowClient> {
        self.clients.clone()
    }

    fn focus(&mut self, id: u64) -> bool {
        let mut found = false;
        for client in &mut self.clients {
            client.focused = client.id == id;
            found |= client.focused;
        }
        found
    }

    fn open_window(&mut self, url: &str) -> u64 {
        tracing::info!(%url, "opening new window");
        let id = self.add(url);
        self.focus(id);
        id
    }

    fn claim(&mut self) {
        self.claimed = true;
    }
}
