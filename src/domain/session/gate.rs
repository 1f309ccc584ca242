use std::collections::HashMap;

/// The remote operations whose responses are applied to session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Catalog,
    Save,
    Run,
}

/// Handed out when a remote call is issued and handed back when it settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken {
    pub kind: RequestKind,
    pub generation: u64,
}

/// Tracks the newest request of each kind so that a response which settles
/// after a newer request of the same kind was issued can be recognised as stale.
#[derive(Debug, Default, Clone)]
pub struct RequestGate {
    latest: HashMap<RequestKind, u64>,
}

impl RequestGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self, kind: RequestKind) -> RequestToken {
        let generation = self.latest.entry(kind).or_insert(0);
        *generation += 1;
        RequestToken { kind, generation: *generation }
    }

    pub fn is_current(&self, token: &RequestToken) -> bool {
        self.latest.get(&token.kind) == Some(&token.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_newest_token_per_kind_is_current() {
        let mut gate = RequestGate::new();

        let first_run = gate.issue(RequestKind::Run);
        let catalog = gate.issue(RequestKind::Catalog);
        let second_run = gate.issue(RequestKind::Run);

        assert!(!gate.is_current(&first_run));
        assert!(gate.is_current(&second_run));
        assert!(gate.is_current(&catalog));
        assert_eq!(second_run.generation, 2);
    }

    #[test]
    fn generation_is_current_only_once_issued() {
        let mut gate = RequestGate::new();
        let token = RequestToken { kind: RequestKind::Save, generation: 1 };
        assert!(!gate.is_current(&token));

        gate.issue(RequestKind::Save);
        assert!(gate.is_current(&token));
    }
}
