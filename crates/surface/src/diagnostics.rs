/// Severity of a forwarded GPU diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    pub severity: Severity,
    pub text: String,
}

/// Pulls buffered diagnostic messages out of the graphics backend.
pub type DiagnosticSource = Box<dyn FnMut() -> Vec<DiagnosticMessage>>;

/// Receives forwarded diagnostic messages.
pub type DiagnosticSink = Box<dyn FnMut(&DiagnosticMessage)>;

/// Subscription list drained synchronously on the event-processing thread
/// after each presented frame. Without an attached source, draining is a
/// no-op, which is how a failed logger start degrades.
#[derive(Default)]
pub struct DiagnosticHub {
    source: Option<DiagnosticSource>,
    subscribers: Vec<DiagnosticSink>,
}

impl DiagnosticHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach_source(&mut self, source: DiagnosticSource) {
        self.source = Some(source);
    }

    pub fn subscribe(&mut self, sink: DiagnosticSink) {
        self.subscribers.push(sink);
    }

    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    pub fn drain(&mut self) {
        let Some(source) = self.source.as_mut() else {
            return;
        };
        for message in source() {
            for subscriber in &mut self.subscribers {
                subscriber(&message);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn drain_without_source_is_a_noop() {
        let mut hub = DiagnosticHub::new();
        hub.subscribe(Box::new(|_| panic!("no source, nothing to forward")));
        hub.drain();
    }

    #[test]
    fn drain_forwards_to_every_subscriber() {
        let mut hub = DiagnosticHub::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        for _ in 0..2 {
            let seen = Rc::clone(&seen);
            hub.subscribe(Box::new(move |msg| seen.borrow_mut().push(msg.text.clone())));
        }
        hub.attach_source(Box::new(|| {
            vec![DiagnosticMessage {
                severity: Severity::Warning,
                text: "validation".into(),
            }]
        }));
        hub.drain();
        assert_eq!(seen.borrow().len(), 2);
    }
}
