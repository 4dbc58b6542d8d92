use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn nested() -> (Document, NodeId, NodeId) {
    let mut doc = Document::new();
    let root = doc.root();
    let container = doc.append_element(root, "div", &[]).unwrap();
    let input = doc.append_element(container, "input", &[]).unwrap();
    (doc, container, input)
}

#[test]
fn test_event_bubbles_to_ancestors() {
    let (mut doc, container, input) = nested();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    doc.add_event_listener(container, EventKind::Input, move |_, event| {
        assert_eq!(event.target, input);
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });

    doc.dispatch_event(input, EventKind::Input).unwrap();
    doc.dispatch_event(input, EventKind::Change).unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn test_listener_sees_current_target() {
    let (mut doc, container, input) = nested();
    doc.add_event_listener(container, EventKind::Click, move |_, event| {
        if event.current_target == container && event.target == input {
            Ok(())
        } else {
            Err(ScriptError::new("wrong targets"))
        }
    });
    doc.dispatch_event(input, EventKind::Click).unwrap();
    assert!(doc.uncaught_errors().is_empty());
}

#[test]
fn test_listener_can_mutate_document() {
    let (mut doc, container, input) = nested();
    doc.add_event_listener(input, EventKind::Input, move |doc, _| {
        doc.add_class(container, "touched")
            .map(|_| ())
            .map_err(|e| ScriptError::new(e.to_string()))
    });
    doc.dispatch_event(input, EventKind::Input).unwrap();
    assert!(doc.has_class(container, "touched"));
}

#[test]
fn test_remove_event_listener() {
    let (mut doc, _, input) = nested();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let id = doc.add_event_listener(input, EventKind::Change, move |_, _| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });
    assert!(doc.remove_event_listener(id));
    assert!(!doc.remove_event_listener(id));
    doc.dispatch_event(input, EventKind::Change).unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[test]
fn test_cancelled_token_drops_listener() {
    let (mut doc, _, input) = nested();
    let token = CancellationToken::new();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let inner = token.clone();
    doc.add_event_listener_with_token(input, EventKind::Input, token.clone(), move |_, _| {
        counter.fetch_add(1, Ordering::SeqCst);
        inner.cancel();
        Ok(())
    });

    assert_eq!(doc.listener_count(), 1);
    doc.dispatch_event(input, EventKind::Input).unwrap();
    doc.dispatch_event(input, EventKind::Input).unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(doc.listener_count(), 0);
}

#[test]
fn test_event_log_records_order() {
    let (mut doc, _, input) = nested();
    doc.dispatch_event(input, EventKind::Focus).unwrap();
    doc.dispatch_event(input, EventKind::Input).unwrap();
    doc.dispatch_event(input, EventKind::Change).unwrap();
    assert_eq!(
        doc.events_for(input),
        vec![EventKind::Focus, EventKind::Input, EventKind::Change]
    );
    doc.clear_event_log();
    assert!(doc.event_log().is_empty());
}

#[test]
fn test_event_kind_display() {
    assert_eq!(EventKind::MouseDown.to_string(), "mousedown");
    assert_eq!(EventKind::Change.to_string(), "change");
}

#[test]
fn test_dispatch_on_unknown_node() {
    let mut doc = Document::new();
    assert!(matches!(
        doc.dispatch_event(NodeId(99), EventKind::Click),
        Err(DomError::UnknownNode(_))
    ));
}
